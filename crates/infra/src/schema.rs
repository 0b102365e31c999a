//! Table bootstrap for the Postgres store.
//!
//! Statements are idempotent (`IF NOT EXISTS`) and run in order on startup.
//! `contracts.contract_id` is meant to be unique but is not constrained; the
//! reference generator is random enough in practice.

use sqlx::PgPool;
use tracing::info;

use crate::StoreError;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id                UUID PRIMARY KEY,
            name              TEXT NOT NULL,
            email             TEXT NOT NULL UNIQUE,
            password_hash     TEXT NOT NULL,
            role              TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
            ip_address        TEXT NULL,
            registration_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            last_login        TIMESTAMPTZ NULL
        )
        "#,
    ),
    (
        "contracts",
        r#"
        CREATE TABLE IF NOT EXISTS contracts (
            id                UUID PRIMARY KEY,
            contract_id       TEXT NOT NULL,
            user_id           UUID NOT NULL REFERENCES users (id),
            service_type      TEXT NOT NULL,
            payment_method    TEXT NOT NULL,
            target_info       TEXT NOT NULL,
            client_name       TEXT NOT NULL,
            client_email      TEXT NOT NULL,
            anonymous_service BOOLEAN NOT NULL DEFAULT FALSE,
            price             BIGINT NOT NULL,
            status            TEXT NOT NULL DEFAULT 'pending',
            admin_notes       TEXT NULL,
            payment_status    TEXT NOT NULL DEFAULT 'unpaid',
            amount_paid       BIGINT NOT NULL DEFAULT 0,
            created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "contracts_user_idx",
        "CREATE INDEX IF NOT EXISTS contracts_user_created_idx ON contracts (user_id, created_at DESC)",
    ),
    (
        "payments",
        r#"
        CREATE TABLE IF NOT EXISTS payments (
            id          UUID PRIMARY KEY,
            contract_id UUID NULL REFERENCES contracts (id),
            amount      BIGINT NOT NULL,
            status      TEXT NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
];

/// Create any missing tables.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for (name, sql) in STATEMENTS {
        sqlx::query(sql)
            .execute(pool)
            .await
            .map_err(|e| StoreError::Backend(format!("failed to create {name}: {e}")))?;
    }
    info!(statements = STATEMENTS.len(), "database schema ensured");
    Ok(())
}
