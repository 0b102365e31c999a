//! Role and ownership policy checks.
//!
//! - No IO
//! - No panics
//! - Pure decisions over already-resolved identities

use thiserror::Error;

use casedesk_core::UserId;

use crate::{Role, User};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: {0} role required")]
    RoleRequired(Role),

    #[error("forbidden: not the owner of this resource")]
    NotOwner,
}

/// Require the authenticated user to hold exactly `role`.
pub fn require_role(user: &User, role: Role) -> Result<(), AuthzError> {
    match (user.role, role) {
        (Role::Admin, Role::Admin) | (Role::User, Role::User) => Ok(()),
        (Role::User, Role::Admin) | (Role::Admin, Role::User) => Err(AuthzError::RoleRequired(role)),
    }
}

/// Read access to a contract: its owner, or any admin.
pub fn can_read_contract(actor: &User, owner: UserId) -> Result<(), AuthzError> {
    if actor.id == owner || actor.role.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with(role: Role) -> User {
        User {
            id: UserId::new(),
            name: "n".into(),
            email: "n@x.com".into(),
            password_hash: String::new(),
            role,
            ip_address: None,
            registration_date: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn admin_role_gate() {
        assert_eq!(require_role(&user_with(Role::Admin), Role::Admin), Ok(()));
        assert_eq!(
            require_role(&user_with(Role::User), Role::Admin),
            Err(AuthzError::RoleRequired(Role::Admin))
        );
    }

    #[test]
    fn owner_and_admin_can_read_others_cannot() {
        let owner = user_with(Role::User);
        let admin = user_with(Role::Admin);
        let stranger = user_with(Role::User);

        assert!(can_read_contract(&owner, owner.id).is_ok());
        assert!(can_read_contract(&admin, owner.id).is_ok());
        assert_eq!(can_read_contract(&stranger, owner.id), Err(AuthzError::NotOwner));
    }
}
