//! Tweet data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::record::define_record_id;
use crate::domain::schema::{FieldRule, Schema};
use crate::domain::{Record, UserId};

/// Minimum tweet length in characters.
pub const CONTENT_MIN: usize = 1;
/// Maximum tweet length in characters.
pub const CONTENT_MAX: usize = 256;

/// Validation errors raised when constructing [`TweetContent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TweetValidationError {
    /// Content was empty.
    #[error("tweet content must not be empty")]
    EmptyContent,
    #[error("tweet content must be at most {max} characters")]
    /// Content exceeded `max` characters.
    ContentTooLong { max: usize },
}

define_record_id! {
    /// Identifier of a stored tweet.
    TweetId
}

/// Body text of a tweet, 1 to 256 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TweetContent(String);

impl TweetContent {
    /// Validate and construct tweet content.
    ///
    /// # Examples
    /// ```
    /// use twitter_api::domain::TweetContent;
    ///
    /// assert!(TweetContent::new("hello").is_ok());
    /// assert!(TweetContent::new("").is_err());
    /// ```
    pub fn new(content: impl Into<String>) -> Result<Self, TweetValidationError> {
        let content = content.into();
        let length = content.chars().count();
        if length < CONTENT_MIN {
            return Err(TweetValidationError::EmptyContent);
        }
        if length > CONTENT_MAX {
            return Err(TweetValidationError::ContentTooLong { max: CONTENT_MAX });
        }
        Ok(Self(content))
    }
}

impl AsRef<str> for TweetContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<TweetContent> for String {
    fn from(value: TweetContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for TweetContent {
    type Error = TweetValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Snapshot of the author taken when the tweet was posted.
///
/// Not checked against the users collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TweetAuthor {
    /// Author's user identity.
    pub user_id: UserId,
}

/// Stored tweet.
///
/// ## Invariants
/// - `created_at` is set once by the store.
/// - `updated_at` is omitted from JSON until the first edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tweet {
    tweet_id: TweetId,
    content: TweetContent,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    by: TweetAuthor,
}

impl Tweet {
    /// Identity assigned by the store.
    pub fn tweet_id(&self) -> &TweetId {
        &self.tweet_id
    }

    /// Body text.
    pub fn content(&self) -> &TweetContent {
        &self.content
    }

    /// When the tweet was posted.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last edit, if any.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Author snapshot.
    pub fn by(&self) -> &TweetAuthor {
        &self.by
    }
}

/// Validated tweet body as posted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TweetBody {
    /// Body text.
    pub content: TweetContent,
}

/// Validated input used to create a [`Tweet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetDraft {
    /// Body text.
    pub content: TweetContent,
    /// Author snapshot.
    pub by: TweetAuthor,
}

impl TweetDraft {
    /// Attach an author to a validated body.
    pub fn new(body: TweetBody, author: UserId) -> Self {
        Self {
            content: body.content,
            by: TweetAuthor { user_id: author },
        }
    }
}

/// Partial tweet update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TweetPatch {
    /// Replacement body text.
    #[serde(default)]
    pub content: Option<TweetContent>,
}

impl Record for Tweet {
    type Id = TweetId;
    type Draft = TweetDraft;
    type Patch = TweetPatch;

    const KIND: &'static str = "tweet";

    fn assemble(id: TweetId, created_at: DateTime<Utc>, draft: TweetDraft) -> Self {
        Self {
            tweet_id: id,
            content: draft.content,
            created_at,
            updated_at: None,
            by: draft.by,
        }
    }

    fn id(&self) -> &TweetId {
        &self.tweet_id
    }

    fn apply(&mut self, patch: TweetPatch, now: DateTime<Utc>) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.updated_at = Some(now);
    }
}

/// Schema for the tweet body.
pub fn tweet_schema() -> Schema {
    Schema::new([FieldRule::text("content").length(CONTENT_MIN, CONTENT_MAX)])
}

/// Schema for the `by` author reference.
pub fn author_schema() -> Schema {
    Schema::new([FieldRule::uuid("user_id")])
}
