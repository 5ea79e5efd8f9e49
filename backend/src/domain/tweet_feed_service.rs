//! Tweet feed service backing the [`TweetFeed`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::TweetFeed;
use crate::domain::record_store::RecordStore;
use crate::domain::{
    Error, RawFields, Tweet, TweetBody, TweetDraft, TweetId, TweetPatch, UserId, tweet_schema,
};

/// Posts and reads tweets through a single record store.
#[derive(Clone)]
pub struct TweetFeedService {
    tweets: Arc<RecordStore<Tweet>>,
}

impl TweetFeedService {
    /// Build the service over the tweets collection.
    pub fn new(tweets: Arc<RecordStore<Tweet>>) -> Self {
        Self { tweets }
    }
}

#[async_trait]
impl TweetFeed for TweetFeedService {
    async fn submit_tweet(&self, fields: RawFields, author: UserId) -> Result<Tweet, Error> {
        let body: TweetBody = tweet_schema().validate(&fields)?.into_typed()?;
        let tweet = self.tweets.append(TweetDraft::new(body, author)).await?;
        info!(tweet_id = %tweet.tweet_id(), %author, "tweet posted");
        Ok(tweet)
    }

    async fn list_tweets(&self) -> Result<Vec<Tweet>, Error> {
        Ok(self.tweets.list_all().await?)
    }

    async fn get_tweet(&self, tweet_id: TweetId) -> Result<Tweet, Error> {
        Ok(self.tweets.get(&tweet_id).await?)
    }

    async fn update_tweet(&self, tweet_id: TweetId, fields: RawFields) -> Result<Tweet, Error> {
        let patch: TweetPatch = tweet_schema().as_patch().validate(&fields)?.into_typed()?;
        Ok(self.tweets.update(&tweet_id, patch).await?)
    }

    async fn delete_tweet(&self, tweet_id: TweetId) -> Result<Tweet, Error> {
        Ok(self.tweets.remove(&tweet_id).await?)
    }
}
