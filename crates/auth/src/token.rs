//! Token issuance and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use thiserror::Error;

use casedesk_core::UserId;

use crate::claims::{TokenClaims, TokenValidationError, validate_claims};

/// Fixed validity window for issued tokens.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Development-only fallback signing secret.
///
/// Anyone who knows this value can forge tokens. Startup warns when it is in
/// use and refuses it in production mode.
pub const INSECURE_DEFAULT_SECRET: &str = "casedesk-insecure-dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token is not a well-formed JWT (bad segments, base64 or JSON).
    #[error("malformed token")]
    Malformed,

    /// Signature mismatch, wrong algorithm, or failed time-window check.
    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenValidationError> for TokenError {
    fn from(value: TokenValidationError) -> Self {
        TokenError::Invalid(value.to_string())
    }
}

/// Issues and verifies signed, time-limited identity tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time checks run in `validate_claims` against an injectable clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::days(TOKEN_TTL_DAYS),
        }
    }

    /// Sign a token for `user_id`, valid from `now` for the fixed window.
    pub fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = TokenClaims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and validity window, returning the subject.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_)
                | ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
                other => TokenError::Invalid(format!("{other:?}")),
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims.sub)
    }
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
