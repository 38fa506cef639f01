/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cheap to Clone (everything behind Arc)
 */
use std::sync::Arc;

use crate::services::session::SessionRegistry;

#[derive(Clone, Debug)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub default_roles: Arc<[String]>,
}

impl AppState {
    pub fn new(sessions: Arc<SessionRegistry>, default_roles: Vec<String>) -> Self {
        Self {
            sessions,
            default_roles: default_roles.into(),
        }
    }
}
