/*
 * Responsibility
 * - POST /logout
 * - Tears down the current security context (stop session, drop authorization)
 * - Anonymous calls are fine: nothing established, nothing to do
 */
use axum::http::StatusCode;

use crate::context::ContextAccessor;
use crate::error::AppError;

pub async fn logout() -> Result<StatusCode, AppError> {
    ContextAccessor::current().invalidate()?;
    Ok(StatusCode::NO_CONTENT)
}
