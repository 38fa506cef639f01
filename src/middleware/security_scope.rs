//! Bearer → SecurityScope, attached to the request's task for the rest of the chain
//!
//! - `Authorization: Bearer <uuid>` is taken as the principal (dev format, no token verification)
//! - the principal's session is opened through the registry, the authorization context is
//!   built from the configured default roles, and both are bound into a fresh scope
//! - no header: the request runs in an empty scope (handlers see nothing established)
//! - the scope ends with the request; the session itself is only stopped by `invalidate()`

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use uuid::Uuid;

use crate::context::{AuthorizationContext, SecurityScope, Session};
use crate::error::AppError;
use crate::state::AppState;

/// Applies the security scope middleware to `router`.
///
/// ```ignore
/// let v1 = middleware::security_scope::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, security_scope_middleware))
}

async fn security_scope_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let scope = match bearer_principal(req.headers())? {
        Some(principal) => {
            let session = state.sessions.open(principal);
            let ctx = AuthorizationContext::new(principal)
                .with_roles(state.default_roles.iter().cloned());

            tracing::debug!(
                session_id = %session.id(),
                principal = %principal,
                "security scope established"
            );

            SecurityScope::new()
                .with_session(session)
                .with_authorization_context(ctx)
        }
        None => SecurityScope::new(),
    };

    Ok(scope.scope(next.run(req)).await)
}

fn bearer_principal(headers: &HeaderMap) -> Result<Option<Uuid>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    match Uuid::parse_str(token.trim()) {
        Ok(principal) => Ok(Some(principal)),
        Err(err) => {
            tracing::warn!(error = ?err, "malformed bearer principal");
            Err(AppError::Unauthorized)
        }
    }
}
