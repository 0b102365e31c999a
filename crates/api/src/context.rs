use casedesk_auth::{Role, User};
use casedesk_core::UserId;

/// Principal context for a request: the user the bearer token resolved to.
///
/// Inserted by the auth middleware; looked up fresh on every request, never
/// cached across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user: User,
}

impl PrincipalContext {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }
}
