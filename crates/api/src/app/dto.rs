use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use casedesk_auth::UserProfile;
use casedesk_contracts::{Contract, ContractStatus, ContractWithOwner, ServiceType};
use casedesk_core::ContractId;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ContractFilter {
    pub status: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// Short view of a freshly created contract.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedContract {
    pub id: ContractId,
    pub contract_id: String,
    pub service_type: ServiceType,
    pub price: i64,
    pub status: ContractStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Contract> for CreatedContract {
    fn from(c: &Contract) -> Self {
        Self {
            id: c.id,
            contract_id: c.reference_code.clone(),
            service_type: c.service_type,
            price: c.price,
            status: c.status.clone(),
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContractCreatedResponse {
    pub message: &'static str,
    pub contract: CreatedContract,
}

/// Admin contract listing. Not paginated; `currentPage` is always 1.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractListResponse {
    pub contracts: Vec<ContractWithOwner>,
    pub total: usize,
    pub current_page: u32,
}

impl From<Vec<ContractWithOwner>> for ContractListResponse {
    fn from(contracts: Vec<ContractWithOwner>) -> Self {
        Self {
            total: contracts.len(),
            contracts,
            current_page: 1,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserProfile>,
    pub total: usize,
}

impl From<Vec<UserProfile>> for UserListResponse {
    fn from(users: Vec<UserProfile>) -> Self {
        Self {
            total: users.len(),
            users,
        }
    }
}
