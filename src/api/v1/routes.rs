/*
 * Responsibility
 * - URL layout of v1
 * - /health is public; /me and /logout run inside the security scope middleware
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{health::health, logout::logout, me::me};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let scoped = Router::new()
        .route("/me", get(me))
        .route("/logout", post(logout));

    Router::new()
        .route("/health", get(health))
        .merge(middleware::security_scope::apply(scoped, state))
}
