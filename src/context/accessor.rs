use std::sync::Arc;

use super::{
    AuthorizationContext, CurrentScope, ExecutionUnitStore, Session, SessionError, SessionId,
};

/// Typed view over the execution unit's security state.
///
/// ```ignore
/// let accessor = ContextAccessor::current();
/// if let Some(ctx) = accessor.authorization_context() { /* ... */ }
/// accessor.invalidate()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContextAccessor<S = CurrentScope> {
    store: S,
}

impl ContextAccessor<CurrentScope> {
    /// Accessor over the scope attached to the running task or call.
    pub fn current() -> Self {
        Self { store: CurrentScope }
    }
}

impl<S: ExecutionUnitStore> ContextAccessor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn session(&self) -> Option<Arc<dyn Session>> {
        self.store.session()
    }

    pub fn authorization_context(&self) -> Option<Arc<AuthorizationContext>> {
        self.store.authorization_context()
    }

    /// Stops the current session (if any), then drops the authorization context (if any).
    ///
    /// Both steps always run. A failed stop is returned only after the authorization
    /// context has been removed. The session slot itself is left bound.
    pub fn invalidate(&self) -> Result<(), InvalidateError> {
        let stopped = match self.session() {
            Some(session) => {
                let session_id = session.id();
                match session.stop() {
                    Ok(()) => {
                        tracing::debug!(session_id = %session_id, "session stopped");
                        Ok(())
                    }
                    Err(source) => {
                        tracing::warn!(
                            session_id = %session_id,
                            error = ?source,
                            "session stop failed"
                        );
                        Err(InvalidateError::SessionStop { session_id, source })
                    }
                }
            }
            None => Ok(()),
        };

        if self.store.contains_authorization_context() {
            self.store.remove_authorization_context();
            tracing::debug!("authorization context removed");
        }

        stopped
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidateError {
    #[error("failed to stop session {session_id}")]
    SessionStop {
        session_id: SessionId,
        #[source]
        source: SessionError,
    },
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use uuid::Uuid;

    use super::*;
    use crate::context::SecurityScope;

    #[derive(Debug)]
    struct CountingSession {
        id: SessionId,
        stops: AtomicUsize,
        fail: bool,
    }

    impl CountingSession {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                id: SessionId::new(),
                stops: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                id: SessionId::new(),
                stops: AtomicUsize::new(0),
                fail: true,
            })
        }

        fn stops(&self) -> usize {
            self.stops.load(Ordering::SeqCst)
        }
    }

    impl Session for CountingSession {
        fn id(&self) -> SessionId {
            self.id
        }

        fn stop(&self) -> Result<(), SessionError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(SessionError::Backend("store unavailable".into()))
            } else {
                Ok(())
            }
        }
    }

    fn authz() -> AuthorizationContext {
        AuthorizationContext::new(Uuid::new_v4())
    }

    // Records whether the authorization context was still bound when stop() ran.
    #[derive(Debug)]
    struct WitnessSession {
        id: SessionId,
        scope: SecurityScope,
        authorization_seen: parking_lot::Mutex<Option<bool>>,
    }

    impl Session for WitnessSession {
        fn id(&self) -> SessionId {
            self.id
        }

        fn stop(&self) -> Result<(), SessionError> {
            *self.authorization_seen.lock() = Some(self.scope.contains_authorization_context());
            Ok(())
        }
    }

    #[test]
    fn empty_unit_reads_absent_and_invalidates_cleanly() {
        let scope = SecurityScope::new();
        let accessor = ContextAccessor::new(&scope);

        assert!(accessor.session().is_none());
        assert!(accessor.authorization_context().is_none());
        assert!(accessor.invalidate().is_ok());
        assert!(scope.is_empty());
    }

    #[test]
    fn session_only_is_stopped_once_and_left_bound() {
        let session = CountingSession::new();
        let scope = SecurityScope::new().with_session(session.clone());
        let accessor = ContextAccessor::new(&scope);

        accessor.invalidate().expect("invalidate");

        assert_eq!(session.stops(), 1);
        let bound = accessor.session().expect("session still bound");
        assert_eq!(bound.id(), session.id);
    }

    #[test]
    fn session_and_authorization_are_both_torn_down() {
        let session = CountingSession::new();
        let scope = SecurityScope::new()
            .with_session(session.clone())
            .with_authorization_context(authz());
        let accessor = ContextAccessor::new(&scope);

        accessor.invalidate().expect("invalidate");

        assert_eq!(session.stops(), 1);
        assert!(!scope.contains_authorization_context());
        assert!(accessor.authorization_context().is_none());
    }

    #[test]
    fn invalidating_twice_matches_invalidating_once() {
        let scope = SecurityScope::new().with_authorization_context(authz());
        let accessor = ContextAccessor::new(&scope);

        accessor.invalidate().expect("first");
        accessor.invalidate().expect("second");

        assert!(scope.is_empty());
    }

    #[test]
    fn session_is_stopped_before_authorization_is_removed() {
        let scope = SecurityScope::new().with_authorization_context(authz());
        let session = Arc::new(WitnessSession {
            id: SessionId::new(),
            scope: scope.clone(),
            authorization_seen: parking_lot::Mutex::new(None),
        });
        scope.bind_session(session.clone());

        ContextAccessor::new(&scope).invalidate().expect("invalidate");

        assert_eq!(*session.authorization_seen.lock(), Some(true));
        assert!(!scope.contains_authorization_context());

        // the session holds a handle to its own scope; unbind to drop the cycle
        scope.clear();
    }

    #[test]
    fn invalidating_twice_with_a_session_bound_matches_invalidating_once() {
        let session = CountingSession::new();
        let scope = SecurityScope::new()
            .with_session(session.clone())
            .with_authorization_context(authz());
        let accessor = ContextAccessor::new(&scope);

        accessor.invalidate().expect("first");
        let bound_after_first = accessor.session().map(|s| s.id());
        accessor.invalidate().expect("second");

        // each call asks the session to stop; the end state is unchanged
        assert_eq!(session.stops(), 2);
        assert_eq!(accessor.session().map(|s| s.id()), bound_after_first);
        assert_eq!(bound_after_first, Some(session.id));
        assert!(accessor.authorization_context().is_none());
        assert!(!scope.contains_authorization_context());
    }

    #[test]
    fn failed_stop_still_removes_authorization() {
        let session = CountingSession::failing();
        let scope = SecurityScope::new()
            .with_session(session.clone())
            .with_authorization_context(authz());
        let accessor = ContextAccessor::new(&scope);

        let err = accessor.invalidate().expect_err("stop should fail");

        let InvalidateError::SessionStop { session_id, source } = err;
        assert_eq!(session_id, session.id);
        assert!(matches!(source, SessionError::Backend(_)));
        assert_eq!(session.stops(), 1);
        assert!(!scope.contains_authorization_context());
    }

    #[tokio::test]
    async fn current_accessor_reads_the_attached_scope() {
        let session = CountingSession::new();
        let ctx = authz();
        let principal = ctx.principal;
        let scope = SecurityScope::new()
            .with_session(session.clone())
            .with_authorization_context(ctx);

        let after = scope
            .clone()
            .scope(async {
                let accessor = ContextAccessor::current();
                assert_eq!(
                    accessor.authorization_context().map(|a| a.principal),
                    Some(principal)
                );
                tokio::task::yield_now().await;
                accessor.invalidate().expect("invalidate");
                accessor.authorization_context().is_none()
            })
            .await;

        assert!(after);
        assert_eq!(session.stops(), 1);
        assert!(!scope.contains_authorization_context());
    }

    #[test]
    fn current_accessor_outside_any_scope_is_inert() {
        let accessor = ContextAccessor::current();

        assert!(accessor.session().is_none());
        assert!(accessor.authorization_context().is_none());
        assert!(accessor.invalidate().is_ok());
    }
}
