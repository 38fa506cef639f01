/*
 * Responsibility
 * - The permissions/roles resolved for the current principal
 * - Middleware builds it and binds it into the scope; handlers read it through the accessor
 *
 * Notes
 * - Policy decisions (BOLA etc.) are not made here; the helpers are plain lookups
 */
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationContext {
    pub principal: Uuid,
    pub roles: Vec<String>,
    pub scopes: Vec<String>,
}

impl AuthorizationContext {
    pub fn new(principal: Uuid) -> Self {
        Self {
            principal,
            roles: Vec::new(),
            scopes: Vec::new(),
        }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}
