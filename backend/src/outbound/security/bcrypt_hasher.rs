//! Bcrypt implementation of the password hasher port.

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Hasher backed by the `bcrypt` crate.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Hasher at the library's default cost.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Hasher at an explicit cost. Tests use the minimum cost to stay fast.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        bcrypt::hash(password, self.cost)
            .map_err(|error| PasswordHashError::hashing(error.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        bcrypt::verify(password, hash)
            .map_err(|error| PasswordHashError::hashing(error.to_string()))
    }
}
