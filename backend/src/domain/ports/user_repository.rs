//! Port for user account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::account::{CredentialRecord, NewAccount, Role};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "user repository query failed: {message}",
        /// A unique email or phone constraint was violated.
        DuplicateIdentity => "duplicate identity: {message}",
    }
}

/// Port for registering users and loading login credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the account row and its default role assignment atomically.
    ///
    /// Both statements run inside one transaction so a crash cannot leave a
    /// user without a role.
    async fn create_with_role(
        &self,
        account: &NewAccount,
        role: Role,
    ) -> Result<(), UserRepositoryError>;

    /// Load the credential record whose email or phone matches `identifier`.
    async fn find_credentials(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, UserRepositoryError>;

    /// Load role names assigned to a user, in assignment order.
    async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<Role>, UserRepositoryError>;
}
