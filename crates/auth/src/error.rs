use thiserror::Error;

use crate::{AuthzError, TokenError};

/// Why a request could not be attributed to (or authorized for) a user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no bearer token")]
    MissingToken,

    #[error(transparent)]
    InvalidToken(#[from] TokenError),

    /// The token verified but its subject no longer exists.
    #[error("token subject not found")]
    UnknownUser,

    #[error(transparent)]
    Forbidden(#[from] AuthzError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn wraps_token_and_policy_failures_transparently() {
        let token = AuthError::from(TokenError::Malformed);
        assert_eq!(token, AuthError::InvalidToken(TokenError::Malformed));
        assert_eq!(token.to_string(), "malformed token");

        let policy = AuthError::from(AuthzError::RoleRequired(Role::Admin));
        assert_eq!(policy.to_string(), "forbidden: admin role required");
    }
}
