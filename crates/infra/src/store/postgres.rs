//! Postgres-backed store implementation.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (other) | Any other | `Backend` |
//! | Column decode / unknown enum text | N/A | `Corrupt` |
//! | Other | N/A | `Backend` |
//!
//! Every operation is one statement, so there are no multi-step transactions
//! to roll back. Status values are stored as plain text.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use casedesk_auth::{NewUser, Role, User};
use casedesk_contracts::{Contract, ContractStatus, ContractWithOwner, NewContract, PaymentStatus, ServiceType};
use casedesk_core::{ContractId, UserId};

use super::r#trait::{ContractStore, PaymentStore, StoreError, UserStore};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, ip_address, registration_date, last_login";

const CONTRACT_COLUMNS: &str = "c.id, c.contract_id, c.user_id, c.service_type, c.payment_method, \
     c.target_info, c.client_name, c.client_email, c.anonymous_service, c.price, c.status, \
     c.admin_notes, c.payment_status, c.amount_paid, c.created_at";

/// Owner columns of a `contracts c LEFT JOIN users u` select.
const OWNER_COLUMNS: &str = "u.name AS user_name, u.email AS user_email, u.ip_address";

/// Postgres-backed users/contracts/payments store.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; clones share it.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    /// Open a pool against `database_url` and create any missing tables.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        crate::schema::ensure_schema(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresStore {
    #[instrument(skip_all, err)]
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, role, ip_address) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        );
        let id = UserId::new();
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.ip_address.as_deref())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_user", e))?;

        user_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_email", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn touch_last_login(&self, id: UserId) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("touch_last_login", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY registration_date DESC, id DESC");
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_users", e))?;

        rows.iter().map(user_from_row).collect()
    }
}

#[async_trait::async_trait]
impl ContractStore for PostgresStore {
    #[instrument(skip_all, fields(user_id = %contract.user_id), err)]
    async fn insert_contract(&self, contract: NewContract) -> Result<Contract, StoreError> {
        let sql = format!(
            "INSERT INTO contracts AS c (id, contract_id, user_id, service_type, payment_method, \
             target_info, client_name, client_email, anonymous_service, price, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {CONTRACT_COLUMNS}"
        );
        let id = ContractId::new();
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(&contract.reference_code)
            .bind(contract.user_id.as_uuid())
            .bind(contract.service_type.as_str())
            .bind(&contract.payment_method)
            .bind(&contract.target_info)
            .bind(&contract.client_name)
            .bind(&contract.client_email)
            .bind(contract.anonymous_service)
            .bind(contract.price)
            .bind(contract.status.as_str())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_contract", e))?;

        contract_from_row(&row)
    }

    #[instrument(skip(self), fields(contract_id = %id), err)]
    async fn find_contract(&self, id: ContractId) -> Result<Option<Contract>, StoreError> {
        let sql = format!("SELECT {CONTRACT_COLUMNS} FROM contracts c WHERE c.id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_contract", e))?;

        row.as_ref().map(contract_from_row).transpose()
    }

    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn list_contracts_by_user(&self, user_id: UserId) -> Result<Vec<ContractWithOwner>, StoreError> {
        let sql = format!(
            "SELECT {CONTRACT_COLUMNS}, {OWNER_COLUMNS} \
             FROM contracts c LEFT JOIN users u ON u.id = c.user_id \
             WHERE c.user_id = $1 \
             ORDER BY c.created_at DESC, c.id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.as_uuid())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_contracts_by_user", e))?;

        rows.iter().map(contract_with_owner_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn list_contracts(&self, status: Option<&ContractStatus>) -> Result<Vec<ContractWithOwner>, StoreError> {
        let sql = format!(
            "SELECT {CONTRACT_COLUMNS}, {OWNER_COLUMNS} \
             FROM contracts c LEFT JOIN users u ON u.id = c.user_id \
             WHERE ($1::TEXT IS NULL OR c.status = $1) \
             ORDER BY c.created_at DESC, c.id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_contracts", e))?;

        rows.iter().map(contract_with_owner_from_row).collect()
    }

    #[instrument(skip(self, admin_notes), fields(contract_id = %id), err)]
    async fn update_contract_status(
        &self,
        id: ContractId,
        status: &ContractStatus,
        admin_notes: Option<&str>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE contracts SET status = $1, admin_notes = $2 WHERE id = $3")
            .bind(status.as_str())
            .bind(admin_notes)
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_contract_status", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl PaymentStore for PostgresStore {
    #[instrument(skip(self), err)]
    async fn total_completed_payments(&self) -> Result<i64, StoreError> {
        // SUM(BIGINT) is NUMERIC in Postgres.
        let row = sqlx::query("SELECT COALESCE(SUM(amount), 0)::BIGINT AS total FROM payments WHERE status = 'completed'")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("total_completed_payments", e))?;

        get(&row, "total")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Row mapping
// ─────────────────────────────────────────────────────────────────────────────

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Corrupt(format!("failed to read {column}: {e}")))
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    let role: String = get(row, "role")?;
    Ok(User {
        id: UserId::from_uuid(get::<Uuid>(row, "id")?),
        name: get(row, "name")?,
        email: get(row, "email")?,
        password_hash: get(row, "password_hash")?,
        role: role
            .parse::<Role>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        ip_address: get(row, "ip_address")?,
        registration_date: get::<DateTime<Utc>>(row, "registration_date")?,
        last_login: get::<Option<DateTime<Utc>>>(row, "last_login")?,
    })
}

fn contract_from_row(row: &PgRow) -> Result<Contract, StoreError> {
    let service_type: String = get(row, "service_type")?;
    Ok(Contract {
        id: ContractId::from_uuid(get::<Uuid>(row, "id")?),
        reference_code: get(row, "contract_id")?,
        user_id: UserId::from_uuid(get::<Uuid>(row, "user_id")?),
        service_type: service_type
            .parse::<ServiceType>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        payment_method: get(row, "payment_method")?,
        target_info: get(row, "target_info")?,
        client_name: get(row, "client_name")?,
        client_email: get(row, "client_email")?,
        anonymous_service: get(row, "anonymous_service")?,
        price: get(row, "price")?,
        status: ContractStatus::from(get::<String>(row, "status")?),
        admin_notes: get(row, "admin_notes")?,
        payment_status: PaymentStatus::from(get::<String>(row, "payment_status")?),
        amount_paid: get(row, "amount_paid")?,
        created_at: get(row, "created_at")?,
    })
}

fn contract_with_owner_from_row(row: &PgRow) -> Result<ContractWithOwner, StoreError> {
    Ok(ContractWithOwner {
        contract: contract_from_row(row)?,
        user_name: get(row, "user_name")?,
        user_email: get(row, "user_email")?,
        ip_address: get(row, "ip_address")?,
    })
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code() {
                Some(code) if code.as_ref() == "23505" => StoreError::Duplicate(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {operation}")),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Corrupt(format!("{operation}: {err}"))
        }
        _ => StoreError::Backend(format!("sqlx error in {operation}: {err}")),
    }
}
