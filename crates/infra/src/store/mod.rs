//! Persistence boundary for users, contracts and payments.
//!
//! Services only see the traits in [`r#trait`]; the adapters decide where the
//! rows live. Every operation is a single statement (or a single lock
//! acquisition), so a cancelled request never leaves a partial write behind.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use r#trait::{ContractStore, PaymentStore, StoreError, UserStore};
