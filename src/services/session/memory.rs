use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::context::{Session, SessionError, SessionId};

/// Process-local session.
///
/// `stop` is idempotent: the first call records `stopped_at`, later calls keep it.
#[derive(Debug)]
pub struct MemorySession {
    id: SessionId,
    principal: Uuid,
    started_at: DateTime<Utc>,
    state: Mutex<SessionState>,
}

#[derive(Debug)]
struct SessionState {
    last_accessed_at: DateTime<Utc>,
    stopped_at: Option<DateTime<Utc>>,
}

impl MemorySession {
    pub fn start(principal: Uuid) -> Self {
        Self::start_at(principal, Utc::now())
    }

    pub fn start_at(principal: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            principal,
            started_at: now,
            state: Mutex::new(SessionState {
                last_accessed_at: now,
                stopped_at: None,
            }),
        }
    }

    pub fn principal(&self) -> Uuid {
        self.principal
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn last_accessed_at(&self) -> DateTime<Utc> {
        self.state.lock().last_accessed_at
    }

    pub fn stopped_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().stopped_at
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at().is_some()
    }

    // Caller decides what now is.
    pub fn touch(&self, now: DateTime<Utc>) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        if state.stopped_at.is_some() {
            return Err(SessionError::Stopped(self.id));
        }
        state.last_accessed_at = now;
        Ok(())
    }
}

impl Session for MemorySession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn stop(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        if state.stopped_at.is_none() {
            state.stopped_at = Some(Utc::now());
        }
        Ok(())
    }
}
