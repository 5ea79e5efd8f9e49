//! Password credentials kept apart from the public user profile.
//!
//! Passwords are held in [`Zeroizing`] buffers and only leave this module
//! as a salted SHA-256 digest.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::domain::record::define_record_id;
use crate::domain::{Record, UserId};

/// Minimum allowed password length in characters.
pub const PASSWORD_MIN: usize = 8;
/// Maximum allowed password length in characters.
pub const PASSWORD_MAX: usize = 64;

const SALT_LEN: usize = 16;

/// Domain error returned when a password does not satisfy length rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordValidationError {
    /// Fewer than `min` characters.
    TooShort { min: usize },
    /// More than `max` characters.
    TooLong { max: usize },
}

impl fmt::Display for PasswordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { min } => write!(f, "password must be at least {min} characters"),
            Self::TooLong { max } => write!(f, "password must be at most {max} characters"),
        }
    }
}

impl std::error::Error for PasswordValidationError {}

/// Plain-text password supplied by a client.
///
/// Whitespace is preserved; the buffer is wiped on drop.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and wrap a password.
    pub fn new(password: impl Into<String>) -> Result<Self, PasswordValidationError> {
        let password = Zeroizing::new(password.into());
        let length = password.chars().count();
        if length < PASSWORD_MIN {
            return Err(PasswordValidationError::TooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(PasswordValidationError::TooLong { max: PASSWORD_MAX });
        }
        Ok(Self(password))
    }

    /// Plain-text password, for digesting only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

impl TryFrom<String> for Password {
    type Error = PasswordValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Salted password digest, both halves hex encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    salt: String,
    hash: String,
}

impl PasswordDigest {
    /// Digest a password with a fresh random salt.
    pub fn derive(password: &Password) -> Self {
        let mut salt = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self {
            salt: hex::encode(salt),
            hash: digest(&salt, password.expose()),
        }
    }

    /// Check a candidate password against a stored salt and hash.
    pub fn verify(salt: &str, hash: &str, candidate: &Password) -> bool {
        let Ok(salt) = hex::decode(salt) else {
            return false;
        };
        let expected = digest(&salt, candidate.expose());
        expected.len() == hash.len()
            && expected
                .bytes()
                .zip(hash.bytes())
                .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }

    /// Hex-encoded salt.
    pub fn salt(&self) -> &str {
        self.salt.as_str()
    }

    /// Hex-encoded SHA-256 of salt and password.
    pub fn hash(&self) -> &str {
        self.hash.as_str()
    }
}

fn digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

define_record_id! {
    /// Identifier of a stored credential.
    CredentialId
}

/// Stored password credential for one user.
///
/// ## Invariants
/// - Exactly one credential exists per user.
/// - Never serialised over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credential {
    credential_id: CredentialId,
    user_id: UserId,
    salt: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl Credential {
    /// Owner of this credential.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// When the credential was stored.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check a login attempt against this credential.
    pub fn matches(&self, candidate: &Password) -> bool {
        PasswordDigest::verify(&self.salt, &self.password_hash, candidate)
    }
}

/// Input used to store a new credential.
#[derive(Debug, Clone)]
pub struct CredentialDraft {
    /// Owner of the new credential.
    pub user_id: UserId,
    /// Salted digest of the password.
    pub digest: PasswordDigest,
}

impl Record for Credential {
    type Id = CredentialId;
    type Draft = CredentialDraft;
    type Patch = std::convert::Infallible;

    const KIND: &'static str = "credential";

    fn assemble(id: CredentialId, created_at: DateTime<Utc>, draft: CredentialDraft) -> Self {
        let CredentialDraft { user_id, digest } = draft;
        Self {
            credential_id: id,
            user_id,
            salt: digest.salt,
            password_hash: digest.hash,
            created_at,
        }
    }

    fn id(&self) -> &CredentialId {
        &self.credential_id
    }

    fn apply(&mut self, patch: Self::Patch, _now: DateTime<Utc>) {
        match patch {}
    }
}
