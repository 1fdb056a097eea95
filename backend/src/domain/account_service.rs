//! Registration and login use-cases.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::account::{
    validate_place, AccountValidationError, Email, NewAccount, PersonName, Phone, Role,
    SessionUser,
};
use crate::domain::ports::{PasswordHasher, UserRepository, UserRepositoryError};
use crate::domain::Error;

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 6;

/// Raw registration input as submitted by the client.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Submitted email address.
    pub email: String,
    /// Submitted phone number.
    pub phone: String,
    /// Clear password; hashed before leaving this service.
    pub password: String,
    /// Submitted first name.
    pub first_name: String,
    /// Submitted last name.
    pub last_name: String,
    /// Optional city.
    pub city: Option<String>,
    /// Optional country.
    pub country: Option<String>,
    /// Optional biography.
    pub bio: Option<String>,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAccount {
    /// Identifier of the new user.
    pub user_id: Uuid,
    /// Roles assigned at registration (always `[USER]`).
    pub roles: Vec<Role>,
}

/// Registration and credential verification over the user repository.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::DuplicateIdentity { message } => {
            Error::conflict("Email or phone already registered")
                .with_details(json!({ "constraint": message }))
        }
        other => Error::internal(other.to_string()),
    }
}

fn map_validation_error(field: &'static str, error: &AccountValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

impl AccountService {
    /// Build the service over its ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Register a new user and assign the default `USER` role.
    ///
    /// Validation failures are `InvalidRequest` with the offending field in
    /// the details; duplicate email/phone is `Conflict`.
    pub async fn register(&self, request: RegistrationRequest) -> Result<RegisteredAccount, Error> {
        let email = Email::new(&request.email)
            .map_err(|err| map_validation_error("email", &err))?;
        let phone = Phone::new(&request.phone)
            .map_err(|err| map_validation_error("phone", &err))?;
        let first_name = PersonName::new(&request.first_name)
            .map_err(|err| map_validation_error("firstName", &err))?;
        let last_name = PersonName::new(&request.last_name)
            .map_err(|err| map_validation_error("lastName", &err))?;
        let city = request
            .city
            .as_deref()
            .map(|raw| validate_place("city", raw))
            .transpose()
            .map_err(|err| map_validation_error("city", &err))?;
        let country = request
            .country
            .as_deref()
            .map(|raw| validate_place("country", raw))
            .transpose()
            .map_err(|err| map_validation_error("country", &err))?;

        if request.password.chars().count() < PASSWORD_MIN {
            return Err(Error::invalid_request(format!(
                "password must be at least {PASSWORD_MIN} characters"
            ))
            .with_details(json!({ "field": "password" })));
        }

        let password_hash = self
            .hasher
            .hash(&request.password)
            .map_err(|err| Error::internal(err.to_string()))?;

        let account = NewAccount {
            id: Uuid::new_v4(),
            email,
            phone,
            password_hash,
            first_name,
            last_name,
            city,
            country,
            bio: request.bio.map(|bio| bio.trim().to_owned()),
        };

        self.users
            .create_with_role(&account, Role::User)
            .await
            .map_err(map_repository_error)?;

        info!(user_id = %account.id, "user registered");
        Ok(RegisteredAccount {
            user_id: account.id,
            roles: vec![Role::User],
        })
    }

    /// Verify an identifier/password pair and produce the session identity.
    ///
    /// Lookup miss and hash mismatch are indistinguishable to the caller.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<SessionUser, Error> {
        let credentials = self
            .users
            .find_credentials(identifier.trim())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("Invalid email or password"))?;

        let matches = self
            .hasher
            .verify(password, &credentials.password_hash)
            .map_err(|err| Error::internal(err.to_string()))?;
        if !matches {
            return Err(Error::unauthorized("Invalid email or password"));
        }

        let roles = self
            .users
            .roles_for_user(credentials.user_id)
            .await
            .map_err(map_repository_error)?;

        info!(user_id = %credentials.user_id, "login succeeded");
        Ok(SessionUser {
            user_id: credentials.user_id,
            email: credentials.email,
            roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rstest::rstest;

    use super::*;
    use crate::domain::account::CredentialRecord;
    use crate::domain::ports::{MockPasswordHasher, MockUserRepository, PasswordHashError};
    use crate::domain::ErrorCode;

    fn request() -> RegistrationRequest {
        RegistrationRequest {
            email: "a@x.com".into(),
            phone: "+15551234567".into(),
            password: "secret1".into(),
            first_name: "  Ada  Byron ".into(),
            last_name: "Lovelace".into(),
            city: Some("London".into()),
            country: Some("England".into()),
            bio: None,
        }
    }

    fn service(users: MockUserRepository, hasher: MockPasswordHasher) -> AccountService {
        AccountService::new(Arc::new(users), Arc::new(hasher))
    }

    #[tokio::test]
    async fn register_hashes_and_stores_with_default_role() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .with(eq("secret1"))
            .returning(|_| Ok("$2b$hash".into()));

        let mut users = MockUserRepository::new();
        users
            .expect_create_with_role()
            .withf(|account, role| {
                account.email.as_ref() == "a@x.com"
                    && account.first_name.as_ref() == "Ada Byron"
                    && account.password_hash == "$2b$hash"
                    && *role == Role::User
            })
            .returning(|_, _| Ok(()));

        let registered = service(users, hasher)
            .register(request())
            .await
            .expect("registration succeeds");
        assert_eq!(registered.roles, vec![Role::User]);
    }

    #[rstest]
    #[case::bad_email("email", |r: &mut RegistrationRequest| r.email = "nope".into())]
    #[case::bad_phone("phone", |r: &mut RegistrationRequest| r.phone = "123".into())]
    #[case::bad_city("city", |r: &mut RegistrationRequest| r.city = Some("X".into()))]
    #[case::short_password("password", |r: &mut RegistrationRequest| r.password = "abc".into())]
    #[tokio::test]
    async fn register_rejects_invalid_fields(
        #[case] field: &str,
        #[case] mutate: fn(&mut RegistrationRequest),
    ) {
        let mut req = request();
        mutate(&mut req);

        let error = service(MockUserRepository::new(), MockPasswordHasher::new())
            .register(req)
            .await
            .expect_err("invalid field must fail");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error
                .details()
                .and_then(|d| d.get("field"))
                .and_then(|f| f.as_str()),
            Some(field)
        );
    }

    #[tokio::test]
    async fn register_maps_duplicates_to_conflict() {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().returning(|_| Ok("h".into()));
        let mut users = MockUserRepository::new();
        users
            .expect_create_with_role()
            .returning(|_, _| Err(UserRepositoryError::duplicate_identity("users_email_key")));

        let error = service(users, hasher)
            .register(request())
            .await
            .expect_err("duplicate must fail");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn login_returns_session_identity() {
        let user_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials()
            .with(eq("a@x.com"))
            .returning(move |_| {
                Ok(Some(CredentialRecord {
                    user_id,
                    email: "a@x.com".into(),
                    password_hash: "$2b$hash".into(),
                }))
            });
        users
            .expect_roles_for_user()
            .with(eq(user_id))
            .returning(|_| Ok(vec![Role::User]));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .with(eq("secret1"), eq("$2b$hash"))
            .returning(|_, _| Ok(true));

        let session = service(users, hasher)
            .login("a@x.com", "secret1")
            .await
            .expect("login succeeds");
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.roles, vec![Role::User]);
    }

    #[tokio::test]
    async fn login_merges_unknown_user_and_wrong_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_credentials().returning(|_| Ok(None));
        let unknown = service(users, MockPasswordHasher::new())
            .login("ghost@x.com", "secret1")
            .await
            .expect_err("unknown user must fail");

        let mut users = MockUserRepository::new();
        users.expect_find_credentials().returning(|_| {
            Ok(Some(CredentialRecord {
                user_id: Uuid::new_v4(),
                email: "a@x.com".into(),
                password_hash: "$2b$hash".into(),
            }))
        });
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().returning(|_, _| Ok(false));
        let wrong = service(users, hasher)
            .login("a@x.com", "wrong")
            .await
            .expect_err("wrong password must fail");

        assert_eq!(unknown.code(), ErrorCode::Unauthorized);
        assert_eq!(wrong.code(), ErrorCode::Unauthorized);
        assert_eq!(unknown.message(), wrong.message());
    }

    #[tokio::test]
    async fn hasher_failures_surface_as_internal() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(PasswordHashError::hashing("cost out of range")));

        let error = service(MockUserRepository::new(), hasher)
            .register(request())
            .await
            .expect_err("hash failure must fail");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
