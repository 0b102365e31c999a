//! Contract and payment status values.
//!
//! Both sets are open: admins may set any status string, and payment status
//! is written by whatever collects payments. Known values get their own
//! variant; everything else is preserved verbatim in `Other`.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a contract. New contracts start as `Pending`.
///
/// No transition table is enforced; any admin-supplied value is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContractStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Rejected,
    Other(String),
}

impl ContractStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ContractStatus::Pending => "pending",
            ContractStatus::InProgress => "in_progress",
            ContractStatus::Completed => "completed",
            ContractStatus::Rejected => "rejected",
            ContractStatus::Other(s) => s,
        }
    }
}

impl From<String> for ContractStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => ContractStatus::Pending,
            "in_progress" => ContractStatus::InProgress,
            "completed" => ContractStatus::Completed,
            "rejected" => ContractStatus::Rejected,
            _ => ContractStatus::Other(value),
        }
    }
}

impl From<&str> for ContractStatus {
    fn from(value: &str) -> Self {
        ContractStatus::from(value.to_string())
    }
}

impl From<ContractStatus> for String {
    fn from(value: ContractStatus) -> Self {
        match value {
            ContractStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state of a contract. Only `Paid` contracts count towards
/// per-service revenue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Other(s) => s,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "unpaid" => PaymentStatus::Unpaid,
            "paid" => PaymentStatus::Paid,
            _ => PaymentStatus::Other(value),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}
