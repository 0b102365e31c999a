use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::{get, post},
};

use casedesk_contracts::{Contract, ContractSubmission, ContractWithOwner};
use casedesk_core::ContractId;

use crate::app::dto::{ContractCreatedResponse, CreatedContract};
use crate::app::errors::AppError;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_contract))
        .route("/my-contracts", get(my_contracts))
        .route("/:id", get(get_contract))
}

pub async fn create_contract(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<ContractSubmission>,
) -> Result<(StatusCode, Json<ContractCreatedResponse>), AppError> {
    let contract = services.contracts.create(principal.user(), body).await?;
    Ok((
        StatusCode::CREATED,
        Json(ContractCreatedResponse {
            message: "Contract submitted successfully",
            contract: CreatedContract::from(&contract),
        }),
    ))
}

pub async fn my_contracts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Json<Vec<ContractWithOwner>>, AppError> {
    Ok(Json(services.contracts.find_by_user(principal.user_id()).await?))
}

pub async fn get_contract(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Json<Contract>, AppError> {
    let id: ContractId = id.parse()?;
    Ok(Json(services.contracts.find_by_id(principal.user(), id).await?))
}
