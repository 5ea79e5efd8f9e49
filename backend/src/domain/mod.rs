//! Domain primitives, the record store, and the account and feed services.
//!
//! Purpose: define strongly typed entities and the validated append-only
//! store they are persisted through. Types document their invariants and
//! serialisation contracts (serde) in their Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Schema / FieldRule: validation of raw client fields.
//! - RecordStore / Record: one durable collection per record kind.
//! - User, Credential, Tweet: stored entities.
//! - UserAccountService, TweetFeedService: driving port implementations.

pub mod credential;
pub mod error;
pub mod ports;
pub mod record;
pub mod record_store;
pub mod schema;
pub mod trace_id;
pub mod tweet;
mod tweet_feed_service;
pub mod user;
mod user_accounts_service;

pub use self::credential::{
    Credential, CredentialDraft, CredentialId, Password, PasswordDigest, PasswordValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::record::{Record, RecordId};
pub use self::record_store::{RecordStore, RecordStoreError};
pub use self::schema::{
    FieldKind, FieldRule, FieldViolation, RawFields, Schema, ValidatedFields, ValidationErrors,
    ViolationCode,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::tweet::{
    Tweet, TweetAuthor, TweetBody, TweetContent, TweetDraft, TweetId, TweetPatch,
    TweetValidationError, author_schema, tweet_schema,
};
pub use self::tweet_feed_service::TweetFeedService;
pub use self::user::{
    EmailAddress, LoginRequest, PersonName, Registration, User, UserDraft, UserId, UserPatch,
    UserValidationError, login_schema, profile_patch_schema, registration_schema,
};
pub use self::user_accounts_service::UserAccountService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use twitter_api::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("tweet not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
