use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Identifier of a session (log correlation / registry lookup)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SessionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An authenticated user's ongoing interaction.
///
/// The security context only observes sessions; whoever created one owns its lifecycle.
/// `stop` is the single capability the context needs, and may be invoked on an already
/// stopped session (implementations decide whether that is a no-op or an error).
pub trait Session: Send + Sync + fmt::Debug {
    fn id(&self) -> SessionId;

    fn stop(&self) -> Result<(), SessionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session {0} is already stopped")]
    Stopped(SessionId),

    #[error("session backend error: {0}")]
    Backend(String),
}
