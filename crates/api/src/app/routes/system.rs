use axum::http::StatusCode;

use crate::app::errors::json_error;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found() -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "Route not found")
}
