//! Admin read views. Everything is recomputed from the stores per call.

use std::sync::Arc;

use serde::Serialize;

use casedesk_auth::UserProfile;
use casedesk_contracts::{
    Contract, ContractStats, ContractStatus, ContractWithOwner, RevenueSummary, contract_stats, most_recent,
    revenue_summary,
};
use casedesk_infra::{ContractStore, PaymentStore, UserStore};

use crate::app::errors::AppError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    #[serde(flatten)]
    pub contracts: ContractStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_contracts: Vec<ContractWithOwner>,
    pub recent_users: Vec<UserProfile>,
}

pub struct AdminService {
    users: Arc<dyn UserStore>,
    contracts: Arc<dyn ContractStore>,
    payments: Arc<dyn PaymentStore>,
}

impl AdminService {
    pub fn new(users: Arc<dyn UserStore>, contracts: Arc<dyn ContractStore>, payments: Arc<dyn PaymentStore>) -> Self {
        Self {
            users,
            contracts,
            payments,
        }
    }

    /// All contracts with their owner summary, newest first. A blank filter
    /// means no filter.
    pub async fn list_contracts(&self, status: Option<&str>) -> Result<Vec<ContractWithOwner>, AppError> {
        let status = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ContractStatus::from);
        Ok(self.contracts.list_contracts(status.as_ref()).await?)
    }

    /// All users without password hashes, newest registration first.
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, AppError> {
        let users = self.users.list_users().await?;
        Ok(users.iter().map(|u| u.profile()).collect())
    }

    pub async fn revenue_summary(&self) -> Result<RevenueSummary, AppError> {
        let total_revenue = self.payments.total_completed_payments().await?;
        let contracts = self.all_contracts().await?;
        Ok(revenue_summary(total_revenue, &contracts))
    }

    pub async fn dashboard(&self) -> Result<Dashboard, AppError> {
        let users = self.list_users().await?;
        let contracts = self.contracts.list_contracts(None).await?;

        let stats = DashboardStats {
            total_users: users.len() as u64,
            contracts: contract_stats(contracts.iter().map(|c| &c.contract)),
        };

        Ok(Dashboard {
            stats,
            recent_contracts: most_recent(contracts, |c| c.contract.created_at),
            recent_users: most_recent(users, |u| u.registration_date),
        })
    }

    async fn all_contracts(&self) -> Result<Vec<Contract>, AppError> {
        Ok(self
            .contracts
            .list_contracts(None)
            .await?
            .into_iter()
            .map(|c| c.contract)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casedesk_auth::{NewUser, Role};
    use casedesk_contracts::{NewContract, PaymentStatus, ServiceType};
    use casedesk_core::UserId;
    use casedesk_infra::InMemoryStore;

    fn admin_service(store: &Arc<InMemoryStore>) -> AdminService {
        AdminService::new(store.clone(), store.clone(), store.clone())
    }

    async fn add_user(store: &InMemoryStore, email: &str) -> UserId {
        store
            .insert_user(NewUser {
                name: email.split('@').next().unwrap_or_default().to_string(),
                email: email.into(),
                password_hash: "hash".into(),
                role: Role::User,
                ip_address: Some("127.0.0.1".into()),
            })
            .await
            .unwrap()
            .id
    }

    async fn add_contract(store: &InMemoryStore, owner: UserId, service: ServiceType) -> Contract {
        store
            .insert_contract(NewContract {
                reference_code: "CDK-0-TEST0".into(),
                user_id: owner,
                service_type: service,
                payment_method: "card".into(),
                target_info: "x".into(),
                client_name: "A".into(),
                client_email: "a@x.com".into(),
                anonymous_service: false,
                price: service.price(),
                status: ContractStatus::Pending,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn revenue_combines_payment_ledger_and_paid_contracts() {
        let store = Arc::new(InMemoryStore::new());
        let owner = add_user(&store, "a@x.com").await;
        let paid = add_contract(&store, owner, ServiceType::Catfish).await;
        add_contract(&store, owner, ServiceType::Catfish).await;
        store.mark_contract_paid(paid.id, 299).unwrap();
        store.record_payment(299, "completed").unwrap();
        store.record_payment(50, "pending").unwrap();

        let summary = admin_service(&store).revenue_summary().await.unwrap();
        assert_eq!(summary.total_revenue, 299);
        assert_eq!(summary.revenue_by_service.len(), 1);
        assert_eq!(summary.revenue_by_service[0].service, ServiceType::Catfish);
        assert_eq!(summary.revenue_by_service[0].total, 299);
        assert_eq!(summary.revenue_by_service[0].count, 1);
        assert_eq!(summary.contracts_by_status.iter().map(|s| s.count).sum::<u64>(), 2);
    }

    #[tokio::test]
    async fn dashboard_caps_recent_lists() {
        let store = Arc::new(InMemoryStore::new());
        let mut last_user = UserId::new();
        for i in 0..7 {
            last_user = add_user(&store, &format!("u{i}@x.com")).await;
            add_contract(&store, last_user, ServiceType::Other).await;
        }
        let newest = add_contract(&store, last_user, ServiceType::Digital).await;
        store.mark_contract_paid(newest.id, 100).unwrap();

        let dash = admin_service(&store).dashboard().await.unwrap();
        assert_eq!(dash.stats.total_users, 7);
        assert_eq!(dash.stats.contracts.total_contracts, 8);
        assert_eq!(dash.stats.contracts.pending_contracts, 8);
        assert_eq!(dash.stats.contracts.total_revenue, 100);
        assert_eq!(dash.recent_contracts.len(), 5);
        assert_eq!(dash.recent_users.len(), 5);
        assert!(dash
            .recent_contracts
            .windows(2)
            .all(|w| w[0].contract.created_at >= w[1].contract.created_at));
        assert_eq!(dash.recent_contracts[0].contract.payment_status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn dashboard_serializes_flat_camel_case_stats() {
        let store = Arc::new(InMemoryStore::new());
        let dash = admin_service(&store).dashboard().await.unwrap();

        let json = serde_json::to_value(&dash).unwrap();
        for key in ["totalUsers", "totalContracts", "pendingContracts", "completedContracts", "totalRevenue"] {
            assert_eq!(json["stats"][key], 0, "{key}");
        }
        assert!(json["recentContracts"].as_array().unwrap().is_empty());
        assert!(json["recentUsers"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn contract_listing_filters_by_exact_status() {
        let store = Arc::new(InMemoryStore::new());
        let owner = add_user(&store, "a@x.com").await;
        let done = add_contract(&store, owner, ServiceType::Fraud).await;
        add_contract(&store, owner, ServiceType::Fraud).await;
        store
            .update_contract_status(done.id, &ContractStatus::Completed, None)
            .await
            .unwrap();

        let svc = admin_service(&store);
        assert_eq!(svc.list_contracts(None).await.unwrap().len(), 2);
        assert_eq!(svc.list_contracts(Some("")).await.unwrap().len(), 2);

        let completed = svc.list_contracts(Some("completed")).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].user_email.as_deref(), Some("a@x.com"));
        assert!(svc.list_contracts(Some("Completed")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn user_listing_is_newest_first_without_hashes() {
        let store = Arc::new(InMemoryStore::new());
        add_user(&store, "first@x.com").await;
        add_user(&store, "second@x.com").await;

        let users = admin_service(&store).list_users().await.unwrap();
        assert_eq!(users[0].email, "second@x.com");
        let json = serde_json::to_value(&users).unwrap();
        assert!(json[0].get("password_hash").is_none());
        assert!(json[0].get("passwordHash").is_none());
    }
}
