use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use super::MemorySession;
use crate::context::{Session, SessionId};

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Live sessions keyed by principal.
///
/// Every `open` sweeps stopped and idle sessions out of the map. When the map is still
/// at `max_sessions`, the least recently accessed session is stopped and evicted.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Arc<MemorySession>>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Returns the principal's live session, starting a new one when there is none.
    pub fn open(&self, principal: Uuid) -> Arc<MemorySession> {
        self.open_at(principal, Utc::now())
    }

    // Caller decides what now is.
    pub fn open_at(&self, principal: Uuid, now: DateTime<Utc>) -> Arc<MemorySession> {
        let mut sessions = self.sessions.lock();
        self.sweep_locked(&mut sessions, now);

        if let Some(existing) = sessions.get(&principal) {
            if existing.touch(now).is_ok() {
                return existing.clone();
            }
        }

        if sessions.len() >= self.max_sessions {
            evict_least_recent(&mut sessions);
        }

        let session = Arc::new(MemorySession::start_at(principal, now));
        tracing::info!(
            session_id = %session.id(),
            principal = %principal,
            "session started"
        );
        sessions.insert(principal, session.clone());
        session
    }

    /// Drops stopped sessions, and stops + drops sessions idle for longer than the timeout.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock();
        self.sweep_locked(&mut sessions, now)
    }

    fn sweep_locked(
        &self,
        sessions: &mut HashMap<Uuid, Arc<MemorySession>>,
        now: DateTime<Utc>,
    ) -> usize {
        let before = sessions.len();

        sessions.retain(|_, session| {
            if session.is_stopped() {
                return false;
            }
            if !self.is_idle(session, now) {
                return true;
            }
            stop_evicted(session, "idle");
            false
        });

        before - sessions.len()
    }

    fn is_idle(&self, session: &MemorySession, now: DateTime<Utc>) -> bool {
        // a last access in the future (clock skew) is never idle
        (now - session.last_accessed_at())
            .to_std()
            .map(|idle| idle > self.idle_timeout)
            .unwrap_or(false)
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<MemorySession>> {
        self.sessions
            .lock()
            .values()
            .find(|s| s.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn evict_least_recent(sessions: &mut HashMap<Uuid, Arc<MemorySession>>) {
    let oldest = sessions
        .iter()
        .min_by_key(|(_, s)| s.last_accessed_at())
        .map(|(principal, _)| *principal);

    if let Some(session) = oldest.and_then(|principal| sessions.remove(&principal)) {
        stop_evicted(&session, "capacity");
    }
}

fn stop_evicted(session: &MemorySession, reason: &'static str) {
    match session.stop() {
        Ok(()) => tracing::debug!(session_id = %session.id(), reason, "session evicted"),
        Err(err) => tracing::warn!(
            session_id = %session.id(),
            reason,
            error = ?err,
            "evicted session failed to stop"
        ),
    }
}
