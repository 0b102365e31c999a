use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use casedesk_auth::{
    LoginInput, NewUser, PasswordError, PasswordHasher, RegisterInput, Role, TokenService, User, UserSummary,
};
use casedesk_core::normalize_email;
use casedesk_infra::{StoreError, UserStore};

use crate::app::errors::AppError;
use crate::config::AdminAccount;

/// Token plus the identity it was issued for.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>, hasher: PasswordHasher) -> Self {
        Self { users, tokens, hasher }
    }

    /// Create a `user`-role account and sign a token for it.
    ///
    /// The existence check and the insert are separate store calls; when two
    /// registrations race, the store's uniqueness constraint rejects the
    /// loser and it gets the same `UserAlreadyExists`.
    pub async fn register(&self, input: RegisterInput, ip_address: Option<String>) -> Result<AuthResponse, AppError> {
        let input = input.validate()?;

        if self.users.find_user_by_email(&input.email).await?.is_some() {
            return Err(AppError::UserAlreadyExists);
        }

        let password_hash = self.hash(input.password).await?;
        let user = self
            .users
            .insert_user(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
                role: Role::User,
                ip_address,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AppError::UserAlreadyExists,
                other => other.into(),
            })?;

        info!(user_id = %user.id, "user registered");
        self.respond(&user)
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, input: LoginInput) -> Result<AuthResponse, AppError> {
        let input = input.validate()?;

        let Some(user) = self.users.find_user_by_email(&input.email).await? else {
            return Err(AppError::InvalidCredentials);
        };

        if !self.verify(input.password, user.password_hash.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }

        if let Err(e) = self.users.touch_last_login(user.id).await {
            warn!(user_id = %user.id, error = %e, "failed to record last login");
        }

        self.respond(&user)
    }

    /// Create the configured admin unless an account with that email exists.
    /// Returns whether an account was created.
    pub async fn ensure_admin(&self, admin: &AdminAccount) -> Result<bool, AppError> {
        let email = normalize_email(&admin.email);
        if let Some(existing) = self.users.find_user_by_email(&email).await? {
            if !existing.role.is_admin() {
                warn!(user_id = %existing.id, "bootstrap admin email belongs to a non-admin account");
            }
            return Ok(false);
        }

        let password_hash = self.hash(admin.password.clone()).await?;
        let user = self
            .users
            .insert_user(NewUser {
                name: admin.name.clone(),
                email,
                password_hash,
                role: Role::Admin,
                ip_address: None,
            })
            .await?;

        info!(user_id = %user.id, "bootstrap admin created");
        Ok(true)
    }

    fn respond(&self, user: &User) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            token: self.tokens.issue(user.id, Utc::now())?,
            user: user.summary(),
        })
    }

    async fn hash(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher;
        run_blocking(move || hasher.hash(&password)).await
    }

    async fn verify(&self, password: String, hash: String) -> Result<bool, AppError> {
        let hasher = self.hasher;
        run_blocking(move || hasher.verify(&password, &hash)).await
    }
}

/// bcrypt is CPU-bound; run it off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("password task failed: {e}")))?
        .map_err(AppError::from)
}
