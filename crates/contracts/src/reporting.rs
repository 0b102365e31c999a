//! Read-side aggregations over the full contract list.
//!
//! Everything is recomputed from scratch on each call; nothing is cached or
//! maintained incrementally.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Contract, ContractStatus, ServiceType};

/// How many entries the "recent" dashboard lists hold.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRevenue {
    pub service: ServiceType,
    pub total: i64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ContractStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub total_revenue: i64,
    pub revenue_by_service: Vec<ServiceRevenue>,
    pub contracts_by_status: Vec<StatusCount>,
}

/// Contract-derived dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractStats {
    pub total_contracts: u64,
    pub pending_contracts: u64,
    pub completed_contracts: u64,
    /// Sum of `amount_paid` across all contracts.
    pub total_revenue: i64,
}

/// Paid amounts per service, counting only contracts whose payment status is
/// `paid`. Services without paid contracts are omitted.
pub fn revenue_by_service<'a, I>(contracts: I) -> Vec<ServiceRevenue>
where
    I: IntoIterator<Item = &'a Contract>,
{
    let mut by_service: BTreeMap<ServiceType, (i64, u64)> = BTreeMap::new();
    for c in contracts.into_iter().filter(|c| c.payment_status.is_paid()) {
        let entry = by_service.entry(c.service_type).or_default();
        entry.0 += c.amount_paid;
        entry.1 += 1;
    }

    by_service
        .into_iter()
        .map(|(service, (total, count))| ServiceRevenue { service, total, count })
        .collect()
}

/// Number of contracts per status, regardless of payment.
pub fn contracts_by_status<'a, I>(contracts: I) -> Vec<StatusCount>
where
    I: IntoIterator<Item = &'a Contract>,
{
    let mut by_status: BTreeMap<ContractStatus, u64> = BTreeMap::new();
    for c in contracts {
        *by_status.entry(c.status.clone()).or_default() += 1;
    }

    by_status
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect()
}

/// `total_revenue` comes from the payments ledger, not from the contracts.
pub fn revenue_summary(total_revenue: i64, contracts: &[Contract]) -> RevenueSummary {
    RevenueSummary {
        total_revenue,
        revenue_by_service: revenue_by_service(contracts),
        contracts_by_status: contracts_by_status(contracts),
    }
}

pub fn contract_stats<'a, I>(contracts: I) -> ContractStats
where
    I: IntoIterator<Item = &'a Contract>,
{
    contracts.into_iter().fold(ContractStats::default(), |mut acc, c| {
        acc.total_contracts += 1;
        match c.status {
            ContractStatus::Pending => acc.pending_contracts += 1,
            ContractStatus::Completed => acc.completed_contracts += 1,
            ContractStatus::InProgress | ContractStatus::Rejected | ContractStatus::Other(_) => {}
        }
        acc.total_revenue += c.amount_paid;
        acc
    })
}

/// Up to [`RECENT_LIMIT`] items, newest first by `created_at`.
pub fn most_recent<T, F>(mut items: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items.truncate(RECENT_LIMIT);
    items
}
