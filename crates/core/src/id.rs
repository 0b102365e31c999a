//! Typed row identifiers.
//!
//! Both ids are UUIDv7 assigned by the store when a row is inserted. They are
//! distinct types so a user id can never be passed where a contract id is
//! expected, and they parse from the path segments of the HTTP API.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A path or token value that is not a valid identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind} '{input}'")]
pub struct InvalidId {
    pub kind: &'static str,
    pub input: String,
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Fresh time-ordered id.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|_| InvalidId {
                    kind: $kind,
                    input: s.to_string(),
                })
            }
        }
    };
}

typed_id!(
    /// Registered user.
    UserId,
    "user id"
);

typed_id!(
    /// Stored contract row. Not the human-readable reference code.
    ContractId,
    "contract id"
);
