use axum::{Router, middleware::from_fn, middleware::from_fn_with_state};

use crate::middleware::{AuthState, auth_middleware, require_admin};

pub mod admin;
pub mod auth;
pub mod contracts;
pub mod system;

/// Router for everything under `/api`.
///
/// Layers run outermost-first: authentication always completes (and can
/// short-circuit) before the admin role gate sees the request.
pub fn router(auth_state: AuthState) -> Router {
    Router::new()
        .nest("/api/auth", auth::router(auth_state.clone()))
        .nest(
            "/api/contracts",
            contracts::router().layer(from_fn_with_state(auth_state.clone(), auth_middleware)),
        )
        .nest(
            "/api/admin",
            admin::router()
                .layer(from_fn(require_admin))
                .layer(from_fn_with_state(auth_state, auth_middleware)),
        )
}
