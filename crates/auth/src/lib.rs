//! `casedesk-auth` - authentication/authorization boundary.
//!
//! Password hashing, token issuance/verification and role policy live here.
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod error;
pub mod password;
pub mod roles;
pub mod token;
pub mod user;

pub use authorize::{AuthzError, can_read_contract, require_role};
pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use error::AuthError;
pub use password::{PasswordError, PasswordHasher};
pub use roles::{Role, UnknownRole};
pub use token::{INSECURE_DEFAULT_SECRET, TOKEN_TTL_DAYS, TokenError, TokenService};
pub use user::{
    LoginInput, NewUser, RegisterInput, User, UserProfile, UserSummary, ValidatedLogin,
    ValidatedRegistration,
};
