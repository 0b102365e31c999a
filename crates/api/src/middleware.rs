use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::debug;

use casedesk_auth::{AuthError, Role, TokenService, User, require_role};
use casedesk_infra::UserStore;

use crate::app::errors::AppError;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserStore>,
}

/// Resolve the bearer token in `headers` to a stored user.
pub async fn authenticate(headers: &HeaderMap, state: &AuthState) -> Result<User, AppError> {
    let token = extract_bearer(headers).ok_or(AuthError::MissingToken)?;

    let user_id = state.tokens.verify(token, Utc::now()).map_err(|e| {
        debug!(error = %e, "rejected bearer token");
        AuthError::InvalidToken(e)
    })?;

    match state.users.find_user(user_id).await? {
        Some(user) => Ok(user),
        None => {
            debug!(%user_id, "token subject no longer exists");
            Err(AuthError::UnknownUser.into())
        }
    }
}

pub async fn auth_middleware(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    let user = match authenticate(req.headers(), &state).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    req.extensions_mut().insert(PrincipalContext::new(user));
    next.run(req).await
}

/// Role gate for admin routes. Must be layered inside [`auth_middleware`];
/// without a principal the request is treated as unauthenticated.
pub async fn require_admin(req: Request, next: Next) -> Response {
    let Some(principal) = req.extensions().get::<PrincipalContext>() else {
        return AppError::from(AuthError::MissingToken).into_response();
    };

    if let Err(e) = require_role(principal.user(), Role::Admin) {
        debug!(user_id = %principal.user_id(), "admin role required");
        return AppError::from(AuthError::from(e)).into_response();
    }

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
