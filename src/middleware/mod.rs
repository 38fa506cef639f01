/*
 * Responsibility
 * - Public interface of the middleware layer
 */
pub mod http;
pub mod security_scope;
