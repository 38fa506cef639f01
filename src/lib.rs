//! Per-request security context: the current session and authorization context,
//! reachable from anywhere in the request's call chain, plus `invalidate()` to tear
//! them down. [`context`] is the library part; the remaining modules are the HTTP
//! service built on top of it.

pub mod api;
pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use context::{
    AuthorizationContext, ContextAccessor, CurrentScope, ExecutionUnitStore, InvalidateError,
    SecurityScope, Session, SessionError, SessionId,
};
