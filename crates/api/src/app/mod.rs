//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services/`: use cases over the store ports (auth, contracts, admin views)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: response envelopes that are not domain types
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use thiserror::Error;
use tower::ServiceBuilder;

use casedesk_auth::{PasswordHasher, TokenService};
use casedesk_infra::StoreError;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::Stores;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("store initialisation failed: {0}")]
    Store(#[from] StoreError),

    #[error("bootstrap admin could not be ensured: {0}")]
    Admin(#[from] errors::AppError),
}

/// Build the full HTTP router from configuration (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> Result<Router, StartupError> {
    let stores = Stores::from_config(config).await?;
    build_app_with(config, stores).await
}

/// Build the router over caller-supplied stores, ensuring the bootstrap
/// admin first when one is configured.
pub async fn build_app_with(config: &AppConfig, stores: Stores) -> Result<Router, StartupError> {
    let tokens = Arc::new(TokenService::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState {
        tokens: tokens.clone(),
        users: stores.users.clone(),
    };

    let services = Arc::new(services::AppServices::new(
        stores,
        tokens,
        PasswordHasher::new(config.bcrypt_cost),
    ));

    if let Some(admin) = &config.admin {
        services.auth.ensure_admin(admin).await?;
    }

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router(auth_state))
        .fallback(routes::system::not_found)
        .layer(ServiceBuilder::new().layer(Extension(services))))
}
