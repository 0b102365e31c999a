//! Service catalogue and the static price table.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of service a client can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Catfish,
    Infidelity,
    Background,
    Fraud,
    Digital,
    Corporate,
    Other,
}

impl ServiceType {
    pub const ALL: [ServiceType; 7] = [
        ServiceType::Catfish,
        ServiceType::Infidelity,
        ServiceType::Background,
        ServiceType::Fraud,
        ServiceType::Digital,
        ServiceType::Corporate,
        ServiceType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Catfish => "catfish",
            ServiceType::Infidelity => "infidelity",
            ServiceType::Background => "background",
            ServiceType::Fraud => "fraud",
            ServiceType::Digital => "digital",
            ServiceType::Corporate => "corporate",
            ServiceType::Other => "other",
        }
    }

    /// List price in whole currency units. Fixed on the contract at creation.
    pub fn price(&self) -> i64 {
        match self {
            ServiceType::Catfish => 299,
            ServiceType::Infidelity => 499,
            ServiceType::Background => 199,
            ServiceType::Fraud => 399,
            ServiceType::Digital => 349,
            ServiceType::Corporate => 799,
            ServiceType::Other => 250,
        }
    }
}

impl core::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown service type '{0}'")]
pub struct UnknownServiceType(pub String);

impl FromStr for ServiceType {
    type Err = UnknownServiceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownServiceType(s.to_string()))
    }
}
