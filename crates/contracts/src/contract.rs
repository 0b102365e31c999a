use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use casedesk_core::{ContractId, UserId, ValidationErrors, is_valid_email};

use crate::{ContractStatus, PaymentStatus, ServiceType};

/// Persisted contract record.
///
/// `price` is copied from the price table when the contract is created and
/// is never recomputed, whatever happens to status or payment afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    /// Human-readable reference handed to the client.
    #[serde(rename = "contract_id")]
    pub reference_code: String,
    pub user_id: UserId,
    pub service_type: ServiceType,
    pub payment_method: String,
    pub target_info: String,
    pub client_name: String,
    pub client_email: String,
    pub anonymous_service: bool,
    pub price: i64,
    pub status: ContractStatus,
    pub admin_notes: Option<String>,
    pub payment_status: PaymentStatus,
    pub amount_paid: i64,
    pub created_at: DateTime<Utc>,
}

/// Contract joined with a summary of its owner, as listed to admins.
///
/// The owner columns are optional because the join is a left join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractWithOwner {
    #[serde(flatten)]
    pub contract: Contract,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub ip_address: Option<String>,
}

/// A contract that has not been stored yet; the store assigns `id` and
/// `created_at`. Payment fields start as unpaid / zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContract {
    pub reference_code: String,
    pub user_id: UserId,
    pub service_type: ServiceType,
    pub payment_method: String,
    pub target_info: String,
    pub client_name: String,
    pub client_email: String,
    pub anonymous_service: bool,
    pub price: i64,
    pub status: ContractStatus,
}

impl NewContract {
    /// Build the row for `owner`, pricing it from the static table now.
    pub fn from_submission(owner: UserId, submission: ValidatedSubmission, reference_code: String) -> Self {
        Self {
            reference_code,
            user_id: owner,
            price: submission.service_type.price(),
            service_type: submission.service_type,
            payment_method: submission.payment_method,
            target_info: submission.target_info,
            client_name: submission.client_name,
            client_email: submission.client_email,
            anonymous_service: submission.anonymous_service,
            status: ContractStatus::Pending,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

/// Raw contract submission body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContractSubmission {
    pub service_type: String,
    pub payment_method: String,
    pub target_info: String,
    pub client_name: String,
    pub client_email: String,
    pub anonymous_service: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub service_type: ServiceType,
    pub payment_method: String,
    pub target_info: String,
    pub client_name: String,
    pub client_email: String,
    pub anonymous_service: bool,
}

impl ContractSubmission {
    pub fn validate(self) -> Result<ValidatedSubmission, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let service_type = self.service_type.trim().parse::<ServiceType>().ok();
        errors.check(service_type.is_some(), "serviceType", "Unknown service type");
        errors.check(
            !self.payment_method.trim().is_empty(),
            "paymentMethod",
            "Payment method is required",
        );
        errors.check(!self.target_info.trim().is_empty(), "targetInfo", "Target information is required");
        errors.check(!self.client_name.trim().is_empty(), "clientName", "Client name is required");
        errors.check(
            is_valid_email(&self.client_email),
            "clientEmail",
            "Please include a valid client email",
        );

        // A missing service type always carries its own field error.
        match service_type {
            Some(service_type) if errors.is_empty() => Ok(ValidatedSubmission {
                service_type,
                payment_method: self.payment_method.trim().to_string(),
                target_info: self.target_info,
                client_name: self.client_name.trim().to_string(),
                client_email: self.client_email.trim().to_string(),
                anonymous_service: self.anonymous_service.unwrap_or(false),
            }),
            _ => Err(errors),
        }
    }
}

/// Admin status update body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: String,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStatusUpdate {
    pub status: ContractStatus,
    pub admin_notes: Option<String>,
}

impl StatusUpdate {
    /// Any non-empty status is accepted; there is no transition table.
    pub fn validate(self) -> Result<ValidatedStatusUpdate, ValidationErrors> {
        let status = self.status.trim();
        let mut errors = ValidationErrors::new();
        errors.check(!status.is_empty(), "status", "Status is required");
        errors.into_result()?;

        Ok(ValidatedStatusUpdate {
            status: ContractStatus::from(status),
            admin_notes: self.admin_notes,
        })
    }
}
