use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use casedesk_auth::{User, can_read_contract};
use casedesk_contracts::{
    Contract, ContractSubmission, ContractWithOwner, NewContract, StatusUpdate, generate_reference,
};
use casedesk_core::{ContractId, UserId};
use casedesk_infra::ContractStore;

use crate::app::errors::AppError;

const CONTRACT_NOT_FOUND: &str = "Contract not found";

pub struct ContractService {
    contracts: Arc<dyn ContractStore>,
}

impl ContractService {
    pub fn new(contracts: Arc<dyn ContractStore>) -> Self {
        Self { contracts }
    }

    /// Validate, price and persist a submission owned by `owner`.
    pub async fn create(&self, owner: &User, submission: ContractSubmission) -> Result<Contract, AppError> {
        let submission = submission.validate()?;
        let reference = generate_reference(Utc::now(), &mut rand::thread_rng());

        let contract = self
            .contracts
            .insert_contract(NewContract::from_submission(owner.id, submission, reference))
            .await?;

        info!(
            contract_id = %contract.id,
            user_id = %owner.id,
            service = %contract.service_type,
            "contract submitted"
        );
        Ok(contract)
    }

    /// The user's contracts, each carrying the owner's name and email.
    pub async fn find_by_user(&self, user_id: UserId) -> Result<Vec<ContractWithOwner>, AppError> {
        Ok(self.contracts.list_contracts_by_user(user_id).await?)
    }

    /// Readable by the owner and by admins only.
    pub async fn find_by_id(&self, actor: &User, id: ContractId) -> Result<Contract, AppError> {
        let contract = self
            .contracts
            .find_contract(id)
            .await?
            .ok_or(AppError::NotFound(CONTRACT_NOT_FOUND))?;

        can_read_contract(actor, contract.user_id)?;
        Ok(contract)
    }

    /// Overwrite status and notes. Callers must already have checked the
    /// admin role; any non-empty status is accepted.
    pub async fn update_status(&self, id: ContractId, update: StatusUpdate) -> Result<(), AppError> {
        let update = update.validate()?;

        let found = self
            .contracts
            .update_contract_status(id, &update.status, update.admin_notes.as_deref())
            .await?;
        if !found {
            return Err(AppError::NotFound(CONTRACT_NOT_FOUND));
        }

        info!(contract_id = %id, status = %update.status, "contract status updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casedesk_auth::Role;
    use casedesk_contracts::{ContractStatus, ServiceType};
    use casedesk_infra::InMemoryStore;

    fn user(role: Role) -> User {
        User {
            id: UserId::new(),
            name: "n".into(),
            email: "n@x.com".into(),
            password_hash: String::new(),
            role,
            ip_address: None,
            registration_date: Utc::now(),
            last_login: None,
        }
    }

    fn submission(service_type: &str) -> ContractSubmission {
        ContractSubmission {
            service_type: service_type.into(),
            payment_method: "card".into(),
            target_info: "x".into(),
            client_name: "Alice".into(),
            client_email: "a@x.com".into(),
            anonymous_service: None,
        }
    }

    fn service() -> ContractService {
        ContractService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn created_contract_is_priced_pending_and_referenced() {
        let svc = service();
        let alice = user(Role::User);

        let c = svc.create(&alice, submission("catfish")).await.unwrap();
        assert_eq!(c.price, 299);
        assert_eq!(c.status, ContractStatus::Pending);
        assert_eq!(c.user_id, alice.id);
        assert_eq!(c.service_type, ServiceType::Catfish);
        assert!(c.reference_code.starts_with("CDK-"));
        assert!(!c.payment_status.is_paid());
    }

    #[tokio::test]
    async fn unknown_service_type_never_reaches_the_store() {
        let svc = service();
        let alice = user(Role::User);

        let err = svc.create(&alice, submission("stalking")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(svc.find_by_user(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn owner_and_admin_can_read_others_are_forbidden() {
        let svc = service();
        let owner = user(Role::User);
        let admin = user(Role::Admin);
        let stranger = user(Role::User);
        let c = svc.create(&owner, submission("fraud")).await.unwrap();

        assert_eq!(svc.find_by_id(&owner, c.id).await.unwrap().id, c.id);
        assert_eq!(svc.find_by_id(&admin, c.id).await.unwrap().id, c.id);
        assert!(matches!(
            svc.find_by_id(&stranger, c.id).await.unwrap_err(),
            AppError::Auth(casedesk_auth::AuthError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn unknown_contract_is_not_found() {
        let svc = service();
        let err = svc.find_by_id(&user(Role::Admin), ContractId::new()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn status_update_keeps_price() {
        let svc = service();
        let owner = user(Role::User);
        let c = svc.create(&owner, submission("corporate")).await.unwrap();

        svc.update_status(
            c.id,
            StatusUpdate {
                status: "completed".into(),
                admin_notes: Some("done".into()),
            },
        )
        .await
        .unwrap();

        let reloaded = svc.find_by_id(&owner, c.id).await.unwrap();
        assert_eq!(reloaded.status, ContractStatus::Completed);
        assert_eq!(reloaded.admin_notes.as_deref(), Some("done"));
        assert_eq!(reloaded.price, 799);
    }

    #[tokio::test]
    async fn status_update_on_missing_contract_is_not_found() {
        let svc = service();
        let err = svc
            .update_status(
                ContractId::new(),
                StatusUpdate {
                    status: "completed".into(),
                    admin_notes: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn my_contracts_are_newest_first() {
        let svc = service();
        let alice = user(Role::User);
        let first = svc.create(&alice, submission("other")).await.unwrap();
        let second = svc.create(&alice, submission("digital")).await.unwrap();
        svc.create(&user(Role::User), submission("other")).await.unwrap();

        let mine = svc.find_by_user(alice.id).await.unwrap();
        assert_eq!(mine.iter().map(|c| c.contract.id).collect::<Vec<_>>(), vec![second.id, first.id]);
    }
}
