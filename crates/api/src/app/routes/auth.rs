use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{ConnectInfo, Extension},
    http::{HeaderMap, StatusCode},
    middleware::from_fn_with_state,
    routing::{get, post},
};

use casedesk_auth::{LoginInput, RegisterInput, UserProfile};

use crate::app::errors::AppError;
use crate::app::services::{AppServices, AuthResponse};
use crate::context::PrincipalContext;
use crate::middleware::{AuthState, auth_middleware};

pub fn router(auth_state: AuthState) -> Router {
    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(from_fn_with_state(auth_state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(body): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let ip = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    let res = services.auth.register(body, ip).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginInput>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(services.auth.login(body).await?))
}

pub async fn me(Extension(principal): Extension<PrincipalContext>) -> Json<UserProfile> {
    Json(principal.user().profile())
}

/// First `X-Forwarded-For` hop, else the socket peer.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}
