//! Salted password hashing (bcrypt).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Bcrypt hasher with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Work factor used for stored credentials.
    pub const DEFAULT_COST: u32 = 12;

    /// Bounds accepted by bcrypt.
    pub const MIN_COST: u32 = 4;
    pub const MAX_COST: u32 = 31;

    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(Self::MIN_COST, Self::MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        Ok(bcrypt::verify(password, hash)?)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordHasher {
        PasswordHasher::new(PasswordHasher::MIN_COST)
    }

    #[test]
    fn hash_is_salted_and_verifies() {
        let hasher = fast();
        let a = hasher.hash("secret1").unwrap();
        let b = hasher.hash("secret1").unwrap();

        assert_ne!(a, b);
        assert!(hasher.verify("secret1", &a).unwrap());
        assert!(hasher.verify("secret1", &b).unwrap());
        assert!(!hasher.verify("secret2", &a).unwrap());
    }

    #[test]
    fn corrupt_hash_is_an_error() {
        assert!(fast().verify("secret1", "not-a-bcrypt-hash").is_err());
    }

    #[test]
    fn cost_is_clamped() {
        assert_eq!(PasswordHasher::new(1).cost(), PasswordHasher::MIN_COST);
        assert_eq!(PasswordHasher::default().cost(), 12);
    }
}
