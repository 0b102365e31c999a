use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use casedesk_auth::{NewUser, User};
use casedesk_contracts::{Contract, ContractStatus, ContractWithOwner, NewContract, PaymentStatus};
use casedesk_core::{ContractId, UserId};

use super::r#trait::{ContractStore, PaymentStore, StoreError, UserStore};

#[derive(Debug, Clone)]
struct PaymentRow {
    amount: i64,
    status: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    contracts: Vec<Contract>,
    payments: Vec<PaymentRow>,
}

impl Tables {
    /// Left join of a contract with its owner row.
    fn with_owner(&self, contract: &Contract) -> ContractWithOwner {
        let owner = self.users.iter().find(|u| u.id == contract.user_id);
        ContractWithOwner {
            contract: contract.clone(),
            user_name: owner.map(|u| u.name.clone()),
            user_email: owner.map(|u| u.email.clone()),
            ip_address: owner.and_then(|u| u.ip_address.clone()),
        }
    }
}

/// In-memory users/contracts/payments tables.
///
/// Intended for tests/dev. Rows are kept in insertion order; listing
/// reverses that, which matches "newest first" because timestamps are taken
/// under the write lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    /// Add a row to the payments ledger (payment collection lives outside
    /// this service; this is how tests and dev setups seed it).
    pub fn record_payment(&self, amount: i64, status: &str) -> Result<(), StoreError> {
        self.write()?.payments.push(PaymentRow {
            amount,
            status: status.to_string(),
        });
        Ok(())
    }

    /// Mark a contract as paid with the given amount. Returns `false` if the
    /// contract does not exist.
    pub fn mark_contract_paid(&self, id: ContractId, amount: i64) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        match tables.contracts.iter_mut().find(|c| c.id == id) {
            Some(contract) => {
                contract.payment_status = PaymentStatus::Paid;
                contract.amount_paid = amount;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.write()?;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!("email {} already registered", user.email)));
        }

        let stored = User {
            id: UserId::new(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            ip_address: user.ip_address,
            registration_date: Utc::now(),
            last_login: None,
        };
        tables.users.push(stored.clone());
        Ok(stored)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn touch_last_login(&self, id: UserId) -> Result<(), StoreError> {
        if let Some(user) = self.write()?.users.iter_mut().find(|u| u.id == id) {
            user.last_login = Some(Utc::now());
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read()?.users.iter().rev().cloned().collect())
    }
}

#[async_trait::async_trait]
impl ContractStore for InMemoryStore {
    async fn insert_contract(&self, contract: NewContract) -> Result<Contract, StoreError> {
        let mut tables = self.write()?;
        let stored = Contract {
            id: ContractId::new(),
            reference_code: contract.reference_code,
            user_id: contract.user_id,
            service_type: contract.service_type,
            payment_method: contract.payment_method,
            target_info: contract.target_info,
            client_name: contract.client_name,
            client_email: contract.client_email,
            anonymous_service: contract.anonymous_service,
            price: contract.price,
            status: contract.status,
            admin_notes: None,
            payment_status: PaymentStatus::Unpaid,
            amount_paid: 0,
            created_at: Utc::now(),
        };
        tables.contracts.push(stored.clone());
        Ok(stored)
    }

    async fn find_contract(&self, id: ContractId) -> Result<Option<Contract>, StoreError> {
        Ok(self.read()?.contracts.iter().find(|c| c.id == id).cloned())
    }

    async fn list_contracts_by_user(&self, user_id: UserId) -> Result<Vec<ContractWithOwner>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .contracts
            .iter()
            .rev()
            .filter(|c| c.user_id == user_id)
            .map(|c| tables.with_owner(c))
            .collect())
    }

    async fn list_contracts(&self, status: Option<&ContractStatus>) -> Result<Vec<ContractWithOwner>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .contracts
            .iter()
            .rev()
            .filter(|c| status.is_none_or(|s| &c.status == s))
            .map(|c| tables.with_owner(c))
            .collect())
    }

    async fn update_contract_status(
        &self,
        id: ContractId,
        status: &ContractStatus,
        admin_notes: Option<&str>,
    ) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        match tables.contracts.iter_mut().find(|c| c.id == id) {
            Some(contract) => {
                contract.status = status.clone();
                contract.admin_notes = admin_notes.map(str::to_string);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl PaymentStore for InMemoryStore {
    async fn total_completed_payments(&self) -> Result<i64, StoreError> {
        Ok(self
            .read()?
            .payments
            .iter()
            .filter(|p| p.status == "completed")
            .map(|p| p.amount)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casedesk_auth::Role;
    use casedesk_contracts::ServiceType;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Alice".into(),
            email: email.into(),
            password_hash: "hash".into(),
            role: Role::User,
            ip_address: Some("10.0.0.1".into()),
        }
    }

    fn new_contract(owner: UserId, service: ServiceType) -> NewContract {
        NewContract {
            reference_code: format!("CDK-0-{}", service.as_str().to_uppercase()),
            user_id: owner,
            service_type: service,
            payment_method: "card".into(),
            target_info: "someone".into(),
            client_name: "Alice".into(),
            client_email: "alice@x.com".into(),
            anonymous_service: false,
            price: service.price(),
            status: ContractStatus::Pending,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryStore::new();
        store.insert_user(new_user("a@x.com")).await.unwrap();

        let err = store.insert_user(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn users_are_found_by_email_and_id() {
        let store = InMemoryStore::new();
        let alice = store.insert_user(new_user("a@x.com")).await.unwrap();

        assert_eq!(store.find_user_by_email("a@x.com").await.unwrap(), Some(alice.clone()));
        assert_eq!(store.find_user(alice.id).await.unwrap(), Some(alice));
        assert_eq!(store.find_user_by_email("b@x.com").await.unwrap(), None);
        assert_eq!(store.find_user(UserId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn touch_sets_last_login() {
        let store = InMemoryStore::new();
        let alice = store.insert_user(new_user("a@x.com")).await.unwrap();
        assert!(alice.last_login.is_none());

        store.touch_last_login(alice.id).await.unwrap();
        let reloaded = store.find_user(alice.id).await.unwrap().unwrap();
        assert!(reloaded.last_login.is_some());
    }

    #[tokio::test]
    async fn contracts_list_newest_first_per_owner() {
        let store = InMemoryStore::new();
        let alice = store.insert_user(new_user("a@x.com")).await.unwrap();
        let bob = store.insert_user(new_user("b@x.com")).await.unwrap();

        let first = store.insert_contract(new_contract(alice.id, ServiceType::Catfish)).await.unwrap();
        store.insert_contract(new_contract(bob.id, ServiceType::Fraud)).await.unwrap();
        let second = store.insert_contract(new_contract(alice.id, ServiceType::Digital)).await.unwrap();

        let mine = store.list_contracts_by_user(alice.id).await.unwrap();
        assert_eq!(mine.iter().map(|c| c.contract.id).collect::<Vec<_>>(), vec![second.id, first.id]);
        assert!(mine
            .iter()
            .all(|c| c.contract.payment_status == PaymentStatus::Unpaid && c.contract.amount_paid == 0));
        assert!(mine.iter().all(|c| c.user_email.as_deref() == Some("a@x.com")));
    }

    #[tokio::test]
    async fn admin_listing_joins_owner_and_filters_status() {
        let store = InMemoryStore::new();
        let alice = store.insert_user(new_user("a@x.com")).await.unwrap();
        let c1 = store.insert_contract(new_contract(alice.id, ServiceType::Catfish)).await.unwrap();
        store.insert_contract(new_contract(alice.id, ServiceType::Other)).await.unwrap();

        assert!(store
            .update_contract_status(c1.id, &ContractStatus::Completed, Some("done"))
            .await
            .unwrap());

        let all = store.list_contracts(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].user_email.as_deref(), Some("a@x.com"));
        assert_eq!(all[0].ip_address.as_deref(), Some("10.0.0.1"));

        let completed = store.list_contracts(Some(&ContractStatus::Completed)).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].contract.admin_notes.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn orphaned_contract_has_empty_owner_columns() {
        let store = InMemoryStore::new();
        store.insert_contract(new_contract(UserId::new(), ServiceType::Other)).await.unwrap();

        let rows = store.list_contracts(None).await.unwrap();
        assert_eq!(rows[0].user_name, None);
        assert_eq!(rows[0].user_email, None);
    }

    #[tokio::test]
    async fn updating_unknown_contract_reports_not_found() {
        let store = InMemoryStore::new();
        let found = store
            .update_contract_status(ContractId::new(), &ContractStatus::Rejected, None)
            .await
            .unwrap();
        assert!(!found);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_still_list_newest_first() {
        let store = std::sync::Arc::new(InMemoryStore::new());
        let owner = UserId::new();

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                let service = ServiceType::ALL[i % ServiceType::ALL.len()];
                tokio::spawn(async move { store.insert_contract(new_contract(owner, service)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let listed = store.list_contracts_by_user(owner).await.unwrap();
        assert_eq!(listed.len(), 64);
        assert!(listed.windows(2).all(|w| w[0].contract.created_at >= w[1].contract.created_at));
    }

    #[tokio::test]
    async fn only_completed_payments_are_totalled() {
        let store = InMemoryStore::new();
        store.record_payment(299, "completed").unwrap();
        store.record_payment(499, "completed").unwrap();
        store.record_payment(100, "failed").unwrap();

        assert_eq!(store.total_completed_payments().await.unwrap(), 798);
    }

    #[tokio::test]
    async fn mark_paid_updates_payment_columns() {
        let store = InMemoryStore::new();
        let c = store.insert_contract(new_contract(UserId::new(), ServiceType::Fraud)).await.unwrap();

        assert!(store.mark_contract_paid(c.id, 399).unwrap());
        let reloaded = store.find_contract(c.id).await.unwrap().unwrap();
        assert!(reloaded.payment_status.is_paid());
        assert_eq!(reloaded.amount_paid, 399);
        assert!(!store.mark_contract_paid(ContractId::new(), 1).unwrap());
    }
}
