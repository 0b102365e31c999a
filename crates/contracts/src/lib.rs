//! `casedesk-contracts` - service requests ("contracts") and their lifecycle.
//!
//! Pure domain: pricing, status, submission validation, reference codes and
//! the read-side aggregations used by the admin views.

pub mod contract;
pub mod pricing;
pub mod reference;
pub mod reporting;
pub mod status;

pub use contract::{
    Contract, ContractSubmission, ContractWithOwner, NewContract, StatusUpdate,
    ValidatedStatusUpdate, ValidatedSubmission,
};
pub use pricing::{ServiceType, UnknownServiceType};
pub use reference::{REFERENCE_PREFIX, generate_reference};
pub use reporting::{
    ContractStats, RECENT_LIMIT, RevenueSummary, ServiceRevenue, StatusCount, contract_stats,
    contracts_by_status, most_recent, revenue_by_service, revenue_summary,
};
pub use status::{ContractStatus, PaymentStatus};
