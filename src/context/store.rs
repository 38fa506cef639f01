use std::sync::Arc;

use super::{AuthorizationContext, SecurityScope, Session};

/// Per-execution-unit storage consumed by [`ContextAccessor`](super::ContextAccessor).
///
/// Implementations must keep each execution unit's slots isolated from every other unit.
/// Population is not part of this trait: only reads and the removal `invalidate` needs.
pub trait ExecutionUnitStore {
    fn session(&self) -> Option<Arc<dyn Session>>;

    fn authorization_context(&self) -> Option<Arc<AuthorizationContext>>;

    fn contains_authorization_context(&self) -> bool;

    // Must be a no-op when the slot is empty.
    fn remove_authorization_context(&self);
}

impl<T: ExecutionUnitStore + ?Sized> ExecutionUnitStore for &T {
    fn session(&self) -> Option<Arc<dyn Session>> {
        (**self).session()
    }

    fn authorization_context(&self) -> Option<Arc<AuthorizationContext>> {
        (**self).authorization_context()
    }

    fn contains_authorization_context(&self) -> bool {
        (**self).contains_authorization_context()
    }

    fn remove_authorization_context(&self) {
        (**self).remove_authorization_context()
    }
}

/// The scope attached to the running task (or synchronous call).
///
/// Outside of an attached scope every read is absent and removal does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentScope;

impl CurrentScope {
    fn with<R>(f: impl FnOnce(&SecurityScope) -> R) -> Option<R> {
        SecurityScope::with_current(f)
    }
}

impl ExecutionUnitStore for CurrentScope {
    fn session(&self) -> Option<Arc<dyn Session>> {
        Self::with(|scope| scope.session()).flatten()
    }

    fn authorization_context(&self) -> Option<Arc<AuthorizationContext>> {
        Self::with(|scope| scope.authorization_context()).flatten()
    }

    fn contains_authorization_context(&self) -> bool {
        Self::with(|scope| scope.contains_authorization_context()).unwrap_or(false)
    }

    fn remove_authorization_context(&self) {
        Self::with(|scope| scope.remove_authorization_context());
    }
}
