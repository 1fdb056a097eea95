//! PostgreSQL-backed `UserRepository` implementation using Diesel.
//!
//! Registration inserts the account row and its role assignment inside one
//! transaction; a unique-constraint violation on email or phone surfaces as
//! `DuplicateIdentity`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::account::{CredentialRecord, NewAccount, Role};
use crate::domain::ports::{UserRepository, UserRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewUserRow;
use super::pool::{DbPool, PoolError};
use super::schema::{roles, user_roles, users};

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// New repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> UserRepositoryError {
    map_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel(error: DieselError) -> UserRepositoryError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        return UserRepositoryError::duplicate_identity(
            info.constraint_name().unwrap_or("unique constraint").to_owned(),
        );
    }
    map_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create_with_role(
        &self,
        account: &NewAccount,
        role: Role,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = NewUserRow {
            id: account.id,
            email: account.email.as_ref(),
            phone: account.phone.as_ref(),
            password_hash: &account.password_hash,
            first_name: account.first_name.as_ref(),
            last_name: account.last_name.as_ref(),
            city: account.city.as_deref(),
            country: account.country.as_deref(),
            bio: account.bio.as_deref(),
        };
        let user_id = account.id;
        let role_name = role.as_str();

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                let role_id: Uuid = roles::table
                    .filter(roles::name.eq(role_name))
                    .select(roles::id)
                    .first(conn)
                    .await?;
                diesel::insert_into(user_roles::table)
                    .values((
                        user_roles::user_id.eq(user_id),
                        user_roles::role_id.eq(role_id),
                    ))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel)
    }

    async fn find_credentials(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<(Uuid, String, String)> = users::table
            .filter(users::email.eq(identifier).or(users::phone.eq(identifier)))
            .select((users::id, users::email, users::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        Ok(row.map(|(user_id, email, password_hash)| CredentialRecord {
            user_id,
            email,
            password_hash,
        }))
    }

    async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<Role>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let names: Vec<String> = user_roles::table
            .inner_join(roles::table)
            .filter(user_roles::user_id.eq(user_id))
            .order(user_roles::assigned_at.asc())
            .select(roles::name)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        names
            .into_iter()
            .map(|name| {
                name.parse::<Role>()
                    .map_err(|_| UserRepositoryError::query(format!("unknown role name: {name}")))
            })
            .collect()
    }
}
