use std::sync::Arc;

use thiserror::Error;

use casedesk_auth::{NewUser, User};
use casedesk_contracts::{Contract, ContractStatus, ContractWithOwner, NewContract};
use casedesk_core::{ContractId, UserId};

/// Storage operation error.
///
/// These are **infrastructure errors**; domain rules (validation, ownership)
/// are checked before a store is ever called.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (e.g. an email already taken).
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// The backend could not be reached or rejected the statement.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored row could not be mapped back into a domain record.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::Duplicate`] if the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Record a successful login.
    async fn touch_last_login(&self, id: UserId) -> Result<(), StoreError>;

    /// All users, newest registration first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
}

#[async_trait::async_trait]
pub trait ContractStore: Send + Sync {
    async fn insert_contract(&self, contract: NewContract) -> Result<Contract, StoreError>;

    async fn find_contract(&self, id: ContractId) -> Result<Option<Contract>, StoreError>;

    /// Contracts owned by `user_id` joined with the owner, newest first.
    async fn list_contracts_by_user(&self, user_id: UserId) -> Result<Vec<ContractWithOwner>, StoreError>;

    /// Every contract joined with its owner, newest first, optionally
    /// restricted to one status.
    async fn list_contracts(&self, status: Option<&ContractStatus>) -> Result<Vec<ContractWithOwner>, StoreError>;

    /// Overwrite status and admin notes. Returns `false` when no contract
    /// has that id.
    async fn update_contract_status(
        &self,
        id: ContractId,
        status: &ContractStatus,
        admin_notes: Option<&str>,
    ) -> Result<bool, StoreError>;
}

#[async_trait::async_trait]
pub trait PaymentStore: Send + Sync {
    /// Sum of all payments whose status is `completed`.
    async fn total_completed_payments(&self) -> Result<i64, StoreError>;
}

#[async_trait::async_trait]
impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        (**self).insert_user(user).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        (**self).find_user_by_email(email).await
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        (**self).find_user(id).await
    }

    async fn touch_last_login(&self, id: UserId) -> Result<(), StoreError> {
        (**self).touch_last_login(id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        (**self).list_users().await
    }
}

#[async_trait::async_trait]
impl<S> ContractStore for Arc<S>
where
    S: ContractStore + ?Sized,
{
    async fn insert_contract(&self, contract: NewContract) -> Result<Contract, StoreError> {
        (**self).insert_contract(contract).await
    }

    async fn find_contract(&self, id: ContractId) -> Result<Option<Contract>, StoreError> {
        (**self).find_contract(id).await
    }

    async fn list_contracts_by_user(&self, user_id: UserId) -> Result<Vec<ContractWithOwner>, StoreError> {
        (**self).list_contracts_by_user(user_id).await
    }

    async fn list_contracts(&self, status: Option<&ContractStatus>) -> Result<Vec<ContractWithOwner>, StoreError> {
        (**self).list_contracts(status).await
    }

    async fn update_contract_status(
        &self,
        id: ContractId,
        status: &ContractStatus,
        admin_notes: Option<&str>,
    ) -> Result<bool, StoreError> {
        (**self).update_contract_status(id, status, admin_notes).await
    }
}

#[async_trait::async_trait]
impl<S> PaymentStore for Arc<S>
where
    S: PaymentStore + ?Sized,
{
    async fn total_completed_payments(&self) -> Result<i64, StoreError> {
        (**self).total_completed_payments().await
    }
}
