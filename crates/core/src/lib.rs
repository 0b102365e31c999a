//! `casedesk-core`: identifiers and input validation shared by every crate.
//!
//! Pure code only; nothing here touches storage or HTTP.

pub mod id;
pub mod validation;

pub use id::{ContractId, InvalidId, UserId};
pub use validation::{FieldError, ValidationErrors, is_valid_email, normalize_email};
