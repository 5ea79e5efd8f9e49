//! Account service backing the [`UserAccounts`] driving port.
//!
//! Users and their credentials live in separate collections joined by
//! [`UserId`]. Registration writes the user first and the credential second;
//! if the credential cannot be stored the user is removed again so no
//! account exists without a password. Deletion runs the other way round:
//! credentials go first and are reinstated if the user cannot be removed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::UserAccounts;
use crate::domain::record_store::{RecordStore, RecordStoreError};
use crate::domain::{
    Credential, CredentialDraft, EmailAddress, Error, LoginRequest, PasswordDigest, RawFields,
    Registration, User, UserId, UserPatch, login_schema, profile_patch_schema,
    registration_schema,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// User registration, login, and profile management over record stores.
#[derive(Clone)]
pub struct UserAccountService {
    users: Arc<RecordStore<User>>,
    credentials: Arc<RecordStore<Credential>>,
}

impl UserAccountService {
    /// Build the service over the users and credentials collections.
    pub fn new(users: Arc<RecordStore<User>>, credentials: Arc<RecordStore<Credential>>) -> Self {
        Self { users, credentials }
    }
}

fn email_taken(email: &EmailAddress) -> RecordStoreError {
    RecordStoreError::conflict(format!("email {email} is already registered"))
}

#[async_trait]
impl UserAccounts for UserAccountService {
    async fn submit_user(&self, fields: RawFields) -> Result<User, Error> {
        let registration: Registration = registration_schema().validate(&fields)?.into_typed()?;
        let (draft, password) = registration.into_parts();

        let user = self
            .users
            .append_checked(draft, |users, draft| {
                match users.iter().any(|user| user.email() == &draft.email) {
                    true => Err(email_taken(&draft.email)),
                    false => Ok(()),
                }
            })
            .await?;

        let credential = CredentialDraft {
            user_id: *user.user_id(),
            digest: PasswordDigest::derive(&password),
        };
        if let Err(err) = self.credentials.append(credential).await {
            warn!(user_id = %user.user_id(), "credential write failed; rolling back user");
            if let Err(rollback) = self.users.delete(user.user_id()).await {
                warn!(user_id = %user.user_id(), error = %rollback, "user rollback failed");
            }
            return Err(err.into());
        }

        info!(user_id = %user.user_id(), "user registered");
        Ok(user)
    }

    async fn login(&self, fields: RawFields) -> Result<User, Error> {
        let request: LoginRequest = login_schema().validate(&fields)?.into_typed()?;

        let user = self
            .users
            .find(|user| user.email() == &request.email)
            .await?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
        let user_id = *user.user_id();
        let credential = self
            .credentials
            .find(|credential| credential.user_id() == &user_id)
            .await?;

        match credential {
            Some(credential) if credential.matches(&request.password) => Ok(user),
            _ => Err(Error::unauthorized(INVALID_CREDENTIALS)),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        Ok(self.users.list_all().await?)
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, Error> {
        Ok(self.users.get(&user_id).await?)
    }

    async fn update_user(&self, user_id: UserId, fields: RawFields) -> Result<User, Error> {
        let patch: UserPatch = profile_patch_schema().validate(&fields)?.into_typed()?;
        let user = self
            .users
            .update_checked(&user_id, patch, |users, current, patch| {
                let Some(email) = patch.email.as_ref() else {
                    return Ok(());
                };
                let clash = users
                    .iter()
                    .any(|user| user.user_id() != current.user_id() && user.email() == email);
                match clash {
                    true => Err(email_taken(email)),
                    false => Ok(()),
                }
            })
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, user_id: UserId) -> Result<User, Error> {
        self.users.get(&user_id).await?;
        let credentials = self
            .credentials
            .remove_where(|credential| credential.user_id() == &user_id)
            .await?;
        let revoked = credentials.len();

        let user = match self.users.remove(&user_id).await {
            Ok(user) => user,
            Err(err) => {
                warn!(%user_id, "user removal failed; reinstating credentials");
                if let Err(rollback) = self.credentials.reinstate(credentials).await {
                    warn!(%user_id, error = %rollback, "credential reinstatement failed");
                }
                return Err(err.into());
            }
        };

        info!(%user_id, credentials = revoked, "user deleted");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "user_accounts_service_tests.rs"]
mod tests;
