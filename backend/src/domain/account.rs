//! User account data model and registration validation.
//!
//! Identity fields (email, phone) are validated newtypes; free-text names are
//! normalised on construction (trimmed, inner whitespace collapsed). Password
//! material never appears here in clear text: registration receives an
//! already-hashed credential and login compares through the hasher port.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors raised by account value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    /// Email does not look like `local@domain.tld`.
    InvalidEmail,
    /// Phone is not a plausible international number.
    InvalidPhone,
    /// A name field is empty once trimmed.
    EmptyName,
    /// City or country contains digits or is shorter than two characters.
    InvalidPlaceName { field: &'static str },
    /// Unknown role name.
    UnknownRole { value: String },
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::InvalidPhone => write!(f, "phone number is not valid"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidPlaceName { field } => {
                write!(f, "{field} must be at least two letters")
            }
            Self::UnknownRole { value } => write!(f, "unknown role: {value}"),
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Permission tier attached to a user.
///
/// Stored by name in the `roles` table; the wire format matches the stored
/// names (`USER`, `ADMIN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// Default tier assigned at registration.
    #[serde(rename = "USER")]
    User,
    /// Administrative tier.
    #[serde(rename = "ADMIN")]
    Admin,
}

impl Role {
    /// Stored/wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(AccountValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PLACE_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Deliberately permissive; uniqueness is enforced by the database.
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn place_regex() -> &'static Regex {
    PLACE_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z\s\-']+$")
            .unwrap_or_else(|error| panic!("place regex failed to compile: {error}"))
    })
}

/// Validated email address, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = raw.as_ref().trim();
        if !email_regex().is_match(trimmed) {
            return Err(AccountValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated phone number in loose E.164 form: optional `+`, 7 to 15 digits.
///
/// Separator characters (spaces, hyphens, parentheses) are stripped before
/// validation so `+1 (555) 123-4567` and `+15551234567` normalise identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Validate and normalise a phone number.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let mut normalised = String::new();
        for (index, ch) in raw.as_ref().trim().chars().enumerate() {
            match ch {
                '+' if index == 0 => normalised.push(ch),
                '0'..='9' => normalised.push(ch),
                ' ' | '-' | '(' | ')' | '.' => {}
                _ => return Err(AccountValidationError::InvalidPhone),
            }
        }
        let digits = normalised.trim_start_matches('+').len();
        if !(7..=15).contains(&digits) {
            return Err(AccountValidationError::InvalidPhone);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Phone> for String {
    fn from(value: Phone) -> Self {
        value.0
    }
}

impl TryFrom<String> for Phone {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Trim a free-text name and collapse runs of inner whitespace.
#[must_use]
pub fn normalise_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalised person name (first or last), non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Normalise and validate a name field.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let normalised = normalise_name(raw.as_ref());
        if normalised.is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validate an optional city/country field: at least two characters, letters
/// plus spaces, hyphens, and apostrophes.
pub fn validate_place(
    field: &'static str,
    raw: &str,
) -> Result<String, AccountValidationError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < 2 || !place_regex().is_match(trimmed) {
        return Err(AccountValidationError::InvalidPlaceName { field });
    }
    Ok(trimmed.to_owned())
}

/// A registered user as exposed to the rest of the application.
///
/// The password hash is deliberately absent; credential checks go through
/// [`CredentialRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier (UUID v4).
    pub id: Uuid,
    /// Unique, immutable email address.
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: Email,
    /// Unique, immutable phone number.
    #[schema(value_type = String, example = "+15551234567")]
    pub phone: Phone,
    /// Normalised first name.
    #[schema(value_type = String)]
    pub first_name: PersonName,
    /// Normalised last name.
    #[schema(value_type = String)]
    pub last_name: PersonName,
    /// Optional home city.
    pub city: Option<String>,
    /// Optional home country.
    pub country: Option<String>,
    /// Optional free-text biography.
    pub bio: Option<String>,
}

/// New account record handed to the user repository.
///
/// `password_hash` is the output of the hasher port, never a clear password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Pre-generated identifier for the new user.
    pub id: Uuid,
    /// Validated email.
    pub email: Email,
    /// Validated phone.
    pub phone: Phone,
    /// Salted one-way hash of the submitted password.
    pub password_hash: String,
    /// Normalised first name.
    pub first_name: PersonName,
    /// Normalised last name.
    pub last_name: PersonName,
    /// Optional validated city.
    pub city: Option<String>,
    /// Optional validated country.
    pub country: Option<String>,
    /// Optional biography, trimmed.
    pub bio: Option<String>,
}

/// Minimal credential row loaded for a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Owning user id.
    pub user_id: Uuid,
    /// Stored email, echoed into the session on success.
    pub email: String,
    /// Stored salted hash.
    pub password_hash: String,
}

/// Identity carried by the cookie session after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Authenticated user id.
    pub user_id: Uuid,
    /// Email recorded at login time.
    pub email: String,
    /// Role names loaded at login time, in assignment order.
    pub roles: Vec<Role>,
}

impl SessionUser {
    /// The primary role consulted by the access guard.
    ///
    /// Only the first assigned role participates in authorisation; later
    /// assignments do not widen access.
    #[must_use]
    pub fn primary_role(&self) -> Option<Role> {
        self.roles.first().copied()
    }
}
