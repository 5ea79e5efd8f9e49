//! Driving port for user registration and profile management.
//!
//! Inbound adapters pass raw client fields straight through; validation
//! belongs to the implementation so every adapter applies the same rules.

use async_trait::async_trait;

use crate::domain::{Error, RawFields, User, UserId};

/// Domain use-case port for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Validate and register a user; the password is stored separately.
    async fn submit_user(&self, fields: RawFields) -> Result<User, Error>;

    /// Check an email and password pair and return the matching user.
    async fn login(&self, fields: RawFields) -> Result<User, Error>;

    /// All users in registration order.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    async fn get_user(&self, user_id: UserId) -> Result<User, Error>;

    /// Apply a partial profile update.
    async fn update_user(&self, user_id: UserId, fields: RawFields) -> Result<User, Error>;

    /// Delete a user and their credentials, returning the removed user.
    async fn delete_user(&self, user_id: UserId) -> Result<User, Error>;
}
