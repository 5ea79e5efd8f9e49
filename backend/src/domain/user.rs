//! User data model.
//!
//! Users are created from a validated [`Registration`], which also carries
//! the password. The password never becomes part of [`User`]; it is split
//! off into a [`Credential`](crate::domain::Credential) by the account
//! service.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::credential::{PASSWORD_MAX, PASSWORD_MIN, Password};
use crate::domain::record::define_record_id;
use crate::domain::schema::{self, EMAIL_MAX, FieldRule, Schema};
use crate::domain::Record;

/// Minimum allowed length for a first or last name.
pub const NAME_MIN: usize = 1;
/// Maximum allowed length for a first or last name.
pub const NAME_MAX: usize = 50;

/// Validation errors raised when constructing user value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Name shorter than `min` characters.
    NameTooShort { min: usize },
    /// Name longer than `max` characters.
    NameTooLong { max: usize },
    /// Email was blank after trimming.
    EmptyEmail,
    /// Email longer than `max` characters.
    EmailTooLong { max: usize },
    /// Email does not look like `local@domain`.
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameTooShort { min } => write!(f, "name must be at least {min} characters"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
        }
    }
}

impl std::error::Error for UserValidationError {}

define_record_id! {
    /// Stable user identifier stored as a UUID.
    UserId
}

/// First or last name of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, UserValidationError> {
        let length = name.chars().count();
        if length < NAME_MIN {
            return Err(UserValidationError::NameTooShort { min: NAME_MIN });
        }
        if length > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Normalised email address: trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise, validate, and construct an [`EmailAddress`].
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = schema::normalise_email(email.as_ref());
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !schema::is_email(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered user as stored and returned to clients.
///
/// ## Invariants
/// - `user_id` is server-assigned and never changes.
/// - `email` is normalised and unique across the users collection.
/// - `birth_date` serialises as `null` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    user_id: UserId,
    email: EmailAddress,
    first_name: PersonName,
    last_name: PersonName,
    #[serde(default)]
    birth_date: Option<NaiveDate>,
}

impl User {
    /// Stable user identifier.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Given name.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Family name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Date of birth, when known.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }
}

/// Validated profile fields used to create a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDraft {
    /// Normalised email address.
    pub email: EmailAddress,
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
    /// Optional date of birth.
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

/// Validated sign-up payload: profile plus password.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    email: EmailAddress,
    first_name: PersonName,
    last_name: PersonName,
    #[serde(default)]
    birth_date: Option<NaiveDate>,
    password: Password,
}

impl Registration {
    /// Split the payload into the public profile and the secret.
    pub fn into_parts(self) -> (UserDraft, Password) {
        let Self {
            email,
            first_name,
            last_name,
            birth_date,
            password,
        } = self;
        (
            UserDraft {
                email,
                first_name,
                last_name,
                birth_date,
            },
            password,
        )
    }
}

/// Validated login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Address the account was registered with.
    pub email: EmailAddress,
    /// Password to verify.
    pub password: Password,
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserPatch {
    /// New email address; must stay unique.
    #[serde(default)]
    pub email: Option<EmailAddress>,
    /// New given name.
    #[serde(default)]
    pub first_name: Option<PersonName>,
    /// New family name.
    #[serde(default)]
    pub last_name: Option<PersonName>,
    /// New date of birth. Cannot be cleared.
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl Record for User {
    type Id = UserId;
    type Draft = UserDraft;
    type Patch = UserPatch;

    const KIND: &'static str = "user";

    fn assemble(id: UserId, _created_at: DateTime<Utc>, draft: UserDraft) -> Self {
        let UserDraft {
            email,
            first_name,
            last_name,
            birth_date,
        } = draft;
        Self {
            user_id: id,
            email,
            first_name,
            last_name,
            birth_date,
        }
    }

    fn id(&self) -> &UserId {
        &self.user_id
    }

    fn apply(&mut self, patch: UserPatch, _now: DateTime<Utc>) {
        let UserPatch {
            email,
            first_name,
            last_name,
            birth_date,
        } = patch;
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(first_name) = first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            self.last_name = last_name;
        }
        if birth_date.is_some() {
            self.birth_date = birth_date;
        }
    }
}

fn profile_rules() -> [FieldRule; 4] {
    [
        FieldRule::email("email"),
        FieldRule::text("first_name").length(NAME_MIN, NAME_MAX),
        FieldRule::text("last_name").length(NAME_MIN, NAME_MAX),
        FieldRule::date("birth_date").optional(),
    ]
}

/// Schema for `POST /signup`.
pub fn registration_schema() -> Schema {
    Schema::new(
        profile_rules()
            .into_iter()
            .chain([FieldRule::text("password").length(PASSWORD_MIN, PASSWORD_MAX)]),
    )
}

/// Schema for profile updates; every field optional, password excluded.
pub fn profile_patch_schema() -> Schema {
    Schema::new(profile_rules()).as_patch()
}

/// Schema for `POST /login`.
pub fn login_schema() -> Schema {
    Schema::new([
        FieldRule::email("email"),
        FieldRule::text("password").length(PASSWORD_MIN, PASSWORD_MAX),
    ])
}

#[cfg(test)]
mod tests;
