use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use casedesk_auth::{AuthError, AuthzError, PasswordError, TokenError};
use casedesk_core::{InvalidId, ValidationErrors};
use casedesk_infra::StoreError;

/// Message returned for every 500; details stay in the server log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

/// Application-level failure, mapped to an HTTP response by [`IntoResponse`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AppError {
    fn from(value: ValidationErrors) -> Self {
        AppError::Validation(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        AppError::Internal(value.to_string())
    }
}

impl From<PasswordError> for AppError {
    fn from(value: PasswordError) -> Self {
        AppError::Internal(value.to_string())
    }
}

impl From<TokenError> for AppError {
    /// Only issuing can fail here; verification failures go through [`AuthError`].
    fn from(value: TokenError) -> Self {
        AppError::Internal(value.to_string())
    }
}

impl From<AuthzError> for AppError {
    fn from(value: AuthzError) -> Self {
        AppError::Auth(AuthError::Forbidden(value))
    }
}

impl From<InvalidId> for AppError {
    fn from(value: InvalidId) -> Self {
        AppError::InvalidId(value.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({
                    "error": "validation_error",
                    "message": errors.to_string(),
                    "errors": errors,
                })),
            )
                .into_response(),
            AppError::UserAlreadyExists => {
                json_error(StatusCode::BAD_REQUEST, "user_exists", "User already exists")
            }
            AppError::InvalidCredentials => {
                json_error(StatusCode::BAD_REQUEST, "invalid_credentials", "Invalid credentials")
            }
            AppError::Auth(AuthError::MissingToken) => json_error(
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "No token, authorization denied",
            ),
            AppError::Auth(AuthError::InvalidToken(_) | AuthError::UnknownUser) => {
                json_error(StatusCode::UNAUTHORIZED, "invalid_token", "Token is not valid")
            }
            AppError::Auth(AuthError::Forbidden(AuthzError::RoleRequired(_))) => json_error(
                StatusCode::FORBIDDEN,
                "forbidden",
                "Access denied. Admin role required.",
            ),
            AppError::Auth(AuthError::Forbidden(AuthzError::NotOwner)) => {
                json_error(StatusCode::FORBIDDEN, "forbidden", "Access denied")
            }
            AppError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
            AppError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
            AppError::Internal(detail) => {
                error!(%detail, "request failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
