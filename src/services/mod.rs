/*
 * Responsibility
 * - Process-level services shared through AppState (sessions)
 */
pub mod session;
