//! Application services: request-scoped use cases over injected store handles.

use std::sync::Arc;

use casedesk_auth::{PasswordHasher, TokenService};
use casedesk_infra::{ContractStore, InMemoryStore, PaymentStore, PostgresStore, StoreError, UserStore};

use crate::config::AppConfig;

pub mod admin;
pub mod auth;
pub mod contracts;

pub use admin::{AdminService, Dashboard, DashboardStats};
pub use auth::{AuthResponse, AuthService};
pub use contracts::ContractService;

/// Store handles shared by every service.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub contracts: Arc<dyn ContractStore>,
    pub payments: Arc<dyn PaymentStore>,
}

impl Stores {
    /// All three ports backed by one adapter.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: UserStore + ContractStore + PaymentStore + 'static,
    {
        Self {
            users: store.clone(),
            contracts: store.clone(),
            payments: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::shared(Arc::new(InMemoryStore::new()))
    }

    /// Postgres when `DATABASE_URL` is configured, otherwise in-memory.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        match &config.database_url {
            Some(url) => {
                let store = PostgresStore::connect(url).await?;
                tracing::info!(backend = "postgres", "store ready");
                Ok(Self::shared(Arc::new(store)))
            }
            None => {
                tracing::info!(backend = "memory", "store ready; data is lost on restart");
                Ok(Self::in_memory())
            }
        }
    }
}

pub struct AppServices {
    pub auth: AuthService,
    pub contracts: ContractService,
    pub admin: AdminService,
}

impl AppServices {
    pub fn new(stores: Stores, tokens: Arc<TokenService>, hasher: PasswordHasher) -> Self {
        Self {
            auth: AuthService::new(stores.users.clone(), tokens, hasher),
            contracts: ContractService::new(stores.contracts.clone()),
            admin: AdminService::new(stores.users, stores.contracts, stores.payments),
        }
    }
}
