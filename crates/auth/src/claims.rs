use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use casedesk_core::UserId;

/// Signed identity claim carried by a bearer token.
///
/// Timestamps are seconds since the Unix epoch, as JWT registered claims
/// require. The token is never persisted; `sub` is resolved to a user by
/// lookup on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user the token was issued to.
    pub sub: UserId,

    /// Issued-at (seconds).
    pub iat: i64,

    /// Expiration (seconds).
    pub exp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate token claims against `now`.
///
/// Signature verification happens before this, in [`crate::TokenService`].
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims_at(issued: DateTime<Utc>, ttl: Duration) -> TokenClaims {
        TokenClaims {
            sub: UserId::new(),
            iat: issued.timestamp(),
            exp: (issued + ttl).timestamp(),
        }
    }

    #[test]
    fn valid_inside_window() {
        let now = Utc::now();
        let claims = claims_at(now, Duration::days(30));
        assert_eq!(validate_claims(&claims, now + Duration::days(29)), Ok(()));
    }

    #[test]
    fn expired_at_exact_boundary() {
        let now = Utc::now();
        let claims = claims_at(now, Duration::days(30));
        assert_eq!(
            validate_claims(&claims, now + Duration::days(30)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn future_issued_at_is_rejected() {
        let now = Utc::now();
        let claims = claims_at(now + Duration::hours(1), Duration::days(1));
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Utc::now();
        let mut claims = claims_at(now, Duration::days(1));
        claims.exp = claims.iat;
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::InvalidTimeWindow));
    }
}
