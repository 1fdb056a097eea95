//! One-way salted password hashing port.
//!
//! The hashing algorithm lives behind this seam; the domain never sees clear
//! passwords beyond the two calls below and never logs them.

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by hashing adapters.
    pub enum PasswordHashError {
        /// The underlying algorithm failed (malformed stored hash, cost error).
        Hashing => "password hashing failed: {message}",
    }
}

/// Salted one-way hashing of login credentials.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a clear password for storage.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Compare a submitted password against a stored hash.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}
