//! Admin-only routes. The role gate is applied where this router is nested.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    routing::{get, put},
};

use casedesk_contracts::{RevenueSummary, StatusUpdate};
use casedesk_core::ContractId;

use crate::app::dto::{ContractFilter, ContractListResponse, Message, UserListResponse};
use crate::app::errors::AppError;
use crate::app::services::{AppServices, Dashboard};

pub fn router() -> Router {
    Router::new()
        .route("/contracts", get(list_contracts))
        .route("/contracts/:id", put(update_contract))
        .route("/users", get(list_users))
        .route("/revenue", get(revenue))
        .route("/dashboard", get(dashboard))
}

pub async fn list_contracts(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<ContractFilter>,
) -> Result<Json<ContractListResponse>, AppError> {
    let contracts = services.admin.list_contracts(filter.status.as_deref()).await?;
    Ok(Json(contracts.into()))
}

pub async fn update_contract(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Message>, AppError> {
    let id: ContractId = id.parse()?;
    services.contracts.update_status(id, body).await?;
    Ok(Json(Message {
        message: "Contract updated successfully",
    }))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<UserListResponse>, AppError> {
    Ok(Json(services.admin.list_users().await?.into()))
}

pub async fn revenue(Extension(services): Extension<Arc<AppServices>>) -> Result<Json<RevenueSummary>, AppError> {
    Ok(Json(services.admin.revenue_summary().await?))
}

pub async fn dashboard(Extension(services): Extension<Arc<AppServices>>) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(services.admin.dashboard().await?))
}
