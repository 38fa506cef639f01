/*
 * Responsibility
 * - Response DTO of GET /me (what the current security context holds)
 */
use serde::Serialize;
use uuid::Uuid;

use crate::context::{AuthorizationContext, SessionId};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub session_id: Option<SessionId>,
    pub principal: Uuid,
    pub roles: Vec<String>,
    pub scopes: Vec<String>,
}

impl MeResponse {
    pub fn new(session_id: Option<SessionId>, ctx: &AuthorizationContext) -> Self {
        Self {
            session_id,
            principal: ctx.principal,
            roles: ctx.roles.clone(),
            scopes: ctx.scopes.clone(),
        }
    }
}
