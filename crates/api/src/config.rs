//! Environment-driven process configuration.

use thiserror::Error;
use tracing::warn;

use casedesk_auth::{INSECURE_DEFAULT_SECRET, PasswordHasher};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// Admin account ensured at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set when CASEDESK_ENV=production")]
    MissingSecret,

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("ADMIN_EMAIL and ADMIN_PASSWORD must be set together")]
    IncompleteAdmin,
}

#[derive(Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub port: u16,
    /// PostgreSQL URL. `None` selects the in-memory stores.
    pub database_url: Option<String>,
    pub admin: Option<AdminAccount>,
    pub environment: Environment,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    /// Development defaults around an explicit signing secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            port: DEFAULT_PORT,
            database_url: None,
            admin: None,
            environment: Environment::Development,
            bcrypt_cost: PasswordHasher::DEFAULT_COST,
        }
    }

    pub fn with_admin(mut self, name: &str, email: &str, password: &str) -> Self {
        self.admin = Some(AdminAccount {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        });
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("CASEDESK_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if environment == Environment::Production => return Err(ConfigError::MissingSecret),
            None => {
                warn!("JWT_SECRET not set; using insecure dev default, tokens can be forged");
                INSECURE_DEFAULT_SECRET.to_string()
            }
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let bcrypt_cost = match var("BCRYPT_COST") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(cost) if (PasswordHasher::MIN_COST..=PasswordHasher::MAX_COST).contains(&cost) => cost,
                _ => return Err(ConfigError::Invalid { var: "BCRYPT_COST", value: raw }),
            },
            None => PasswordHasher::DEFAULT_COST,
        };

        let admin = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminAccount {
                name: var("ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
                email,
                password,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteAdmin),
        };

        Ok(Self {
            jwt_secret,
            port,
            database_url: var("DATABASE_URL"),
            admin,
            environment,
            bcrypt_cost,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == INSECURE_DEFAULT_SECRET
    }
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database", &self.database_url.as_ref().map(|_| "postgres"))
            .field("admin", &self.admin)
            .field("environment", &self.environment)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}
