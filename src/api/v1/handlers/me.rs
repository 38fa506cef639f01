/*
 * Responsibility
 * - GET /me
 * - Reads the security context through the accessor; nothing is passed in from the middleware
 */
use axum::Json;

use crate::api::v1::dto::me::MeResponse;
use crate::context::ContextAccessor;
use crate::error::AppError;

pub async fn me() -> Result<Json<MeResponse>, AppError> {
    let accessor = ContextAccessor::current();

    let ctx = accessor
        .authorization_context()
        .ok_or(AppError::Unauthorized)?;
    let session_id = accessor.session().map(|s| s.id());

    Ok(Json(MeResponse::new(session_id, &ctx)))
}
