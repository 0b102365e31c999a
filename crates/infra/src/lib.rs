//! Infrastructure layer: storage ports and their in-memory / Postgres adapters.

pub mod schema;
pub mod store;

pub use schema::ensure_schema;
pub use store::{
    ContractStore, InMemoryStore, PaymentStore, PostgresStore, StoreError, UserStore,
};
