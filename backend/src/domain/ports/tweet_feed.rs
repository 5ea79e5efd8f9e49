//! Driving port for posting and reading tweets.

use async_trait::async_trait;

use crate::domain::{Error, RawFields, Tweet, TweetId, UserId};

/// Domain use-case port for the tweet feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TweetFeed: Send + Sync {
    /// Validate and store a tweet posted by `author`.
    ///
    /// The author is recorded as given; it is not checked against the users
    /// collection.
    async fn submit_tweet(&self, fields: RawFields, author: UserId) -> Result<Tweet, Error>;

    /// All tweets in posting order.
    async fn list_tweets(&self) -> Result<Vec<Tweet>, Error>;

    async fn get_tweet(&self, tweet_id: TweetId) -> Result<Tweet, Error>;

    /// Replace the content of a tweet and stamp `updated_at`.
    async fn update_tweet(&self, tweet_id: TweetId, fields: RawFields) -> Result<Tweet, Error>;

    /// Delete a tweet, returning the removed record.
    async fn delete_tweet(&self, tweet_id: TweetId) -> Result<Tweet, Error>;
}
