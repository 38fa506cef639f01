/*!
 * Security context of the current execution unit
 *
 * Responsibility:
 * - Provides the current session / authorization context to any depth of the call chain
 * - `invalidate()` tears the unit's security state down (stop session, drop authorization)
 *
 * Public API:
 * - ContextAccessor, InvalidateError
 * - ExecutionUnitStore, CurrentScope, SecurityScope
 * - Session, SessionId, SessionError, AuthorizationContext
 */

mod accessor;
mod authorization;
mod scope;
mod session;
mod store;

pub use accessor::{ContextAccessor, InvalidateError};
pub use authorization::AuthorizationContext;
pub use scope::SecurityScope;
pub use session::{Session, SessionError, SessionId};
pub use store::{CurrentScope, ExecutionUnitStore};
