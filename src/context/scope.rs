use std::{future::Future, sync::Arc};

use parking_lot::Mutex;

use super::{AuthorizationContext, ExecutionUnitStore, Session};

tokio::task_local! {
    static CURRENT: SecurityScope;
}

/// One execution unit's security state: a session slot and an authorization slot.
///
/// Clones are handles to the same slots. A scope is meant to be owned by a single
/// request; code deeper in the call chain reaches it either by being handed the value
/// or, after [`SecurityScope::scope`] / [`SecurityScope::sync_scope`], through
/// [`CurrentScope`](super::CurrentScope).
///
/// Tasks spawned from inside a scope do *not* inherit it.
#[derive(Debug, Clone, Default)]
pub struct SecurityScope {
    slots: Arc<Mutex<Slots>>,
}

#[derive(Debug, Default)]
struct Slots {
    session: Option<Arc<dyn Session>>,
    authorization_context: Option<Arc<AuthorizationContext>>,
}

impl SecurityScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(self, session: Arc<dyn Session>) -> Self {
        self.bind_session(session);
        self
    }

    pub fn with_authorization_context(self, ctx: AuthorizationContext) -> Self {
        self.bind_authorization_context(ctx);
        self
    }

    /// Replaces the session slot, returning whatever was bound before.
    pub fn bind_session(&self, session: Arc<dyn Session>) -> Option<Arc<dyn Session>> {
        self.slots.lock().session.replace(session)
    }

    pub fn bind_authorization_context(
        &self,
        ctx: AuthorizationContext,
    ) -> Option<Arc<AuthorizationContext>> {
        self.slots
            .lock()
            .authorization_context
            .replace(Arc::new(ctx))
    }

    /// Unbinds both slots without stopping the session.
    pub fn clear(&self) {
        let mut slots = self.slots.lock();
        slots.session = None;
        slots.authorization_context = None;
    }

    pub fn is_empty(&self) -> bool {
        let slots = self.slots.lock();
        slots.session.is_none() && slots.authorization_context.is_none()
    }

    /// Runs `fut` with this scope attached to the current task.
    pub async fn scope<F>(self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(self, fut).await
    }

    /// Runs `f` with this scope attached to the calling thread for the duration of the call.
    pub fn sync_scope<F, R>(self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT.sync_scope(self, f)
    }

    /// The scope attached to the running task or call, if any.
    pub fn current() -> Option<SecurityScope> {
        Self::with_current(|scope| scope.clone())
    }

    pub(super) fn with_current<R>(f: impl FnOnce(&SecurityScope) -> R) -> Option<R> {
        CURRENT.try_with(f).ok()
    }
}

impl ExecutionUnitStore for SecurityScope {
    fn session(&self) -> Option<Arc<dyn Session>> {
        self.slots.lock().session.clone()
    }

    fn authorization_context(&self) -> Option<Arc<AuthorizationContext>> {
        self.slots.lock().authorization_context.clone()
    }

    fn contains_authorization_context(&self) -> bool {
        self.slots.lock().authorization_context.is_some()
    }

    fn remove_authorization_context(&self) {
        self.slots.lock().authorization_context = None;
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use uuid::Uuid;

    use super::*;
    use crate::context::{ContextAccessor, CurrentScope};

    fn authz() -> AuthorizationContext {
        AuthorizationContext::new(Uuid::new_v4()).with_roles(["user"])
    }

    #[test]
    fn nothing_is_current_outside_a_scope() {
        assert!(SecurityScope::current().is_none());
        assert!(CurrentScope.authorization_context().is_none());
        assert!(!CurrentScope.contains_authorization_context());
        // removal outside of a scope is silently ignored
        CurrentScope.remove_authorization_context();
    }

    #[test]
    fn clones_share_slots() {
        let scope = SecurityScope::new();
        let handle = scope.clone();

        handle.bind_authorization_context(authz());
        assert!(scope.contains_authorization_context());

        scope.clear();
        assert!(handle.is_empty());
    }

    #[test]
    fn sync_scope_exposes_the_scope_for_the_call_only() {
        let ctx = authz();
        let principal = ctx.principal;
        let scope = SecurityScope::new().with_authorization_context(ctx);

        let seen = scope.sync_scope(|| {
            ContextAccessor::current()
                .authorization_context()
                .map(|a| a.principal)
        });

        assert_eq!(seen, Some(principal));
        assert!(SecurityScope::current().is_none());
    }

    #[test]
    fn threads_do_not_observe_each_other() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                thread::spawn(|| {
                    let ctx = authz();
                    let principal = ctx.principal;
                    let scope = SecurityScope::new().with_authorization_context(ctx);
                    scope.sync_scope(|| {
                        let accessor = ContextAccessor::current();
                        for _ in 0..100 {
                            let seen = accessor.authorization_context().map(|a| a.principal);
                            assert_eq!(seen, Some(principal));
                        }
                        accessor.invalidate().map(|_| principal)
                    })
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().expect("thread panicked").is_ok());
        }
    }

    #[tokio::test]
    async fn tasks_do_not_observe_each_other() {
        let first = SecurityScope::new().with_authorization_context(authz());
        let second = SecurityScope::new().with_authorization_context(authz());
        let first_principal = first.authorization_context().map(|a| a.principal);
        let second_principal = second.authorization_context().map(|a| a.principal);

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let a = tokio::spawn(first.scope(async move {
            // invalidate here, then let the other task check its own slot
            ContextAccessor::current().invalidate().expect("invalidate");
            let _ = tx.send(());
            ContextAccessor::current().authorization_context().is_none()
        }));

        let b = tokio::spawn(second.scope(async move {
            let _ = rx.await;
            ContextAccessor::current()
                .authorization_context()
                .map(|a| a.principal)
        }));

        assert!(a.await.expect("task a"));
        assert_eq!(b.await.expect("task b"), second_principal);
        assert_ne!(first_principal, second_principal);
    }

    #[tokio::test]
    async fn spawned_tasks_do_not_inherit_the_scope() {
        let scope = SecurityScope::new().with_authorization_context(authz());

        let inherited = scope
            .scope(async {
                tokio::spawn(async { SecurityScope::current().is_some() })
                    .await
                    .expect("spawned task")
            })
            .await;

        assert!(!inherited);
    }
}
