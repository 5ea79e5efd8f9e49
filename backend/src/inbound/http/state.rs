//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{TweetFeed, UserAccounts};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login, and profile use-cases.
    pub users: Arc<dyn UserAccounts>,
    /// Tweet feed use-cases.
    pub tweets: Arc<dyn TweetFeed>,
}

impl HttpState {
    /// Construct state from the driving ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use twitter_api::domain::{RecordStore, TweetFeedService, UserAccountService};
    /// use twitter_api::inbound::http::state::HttpState;
    /// use twitter_api::outbound::persistence::MemoryMedium;
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let users = Arc::new(RecordStore::new("users", Arc::new(MemoryMedium::empty()), clock.clone()));
    /// let credentials =
    ///     Arc::new(RecordStore::new("credentials", Arc::new(MemoryMedium::empty()), clock.clone()));
    /// let tweets = Arc::new(RecordStore::new("tweets", Arc::new(MemoryMedium::empty()), clock));
    ///
    /// let state = HttpState::new(
    ///     Arc::new(UserAccountService::new(users, credentials)),
    ///     Arc::new(TweetFeedService::new(tweets)),
    /// );
    /// let _tweets = state.tweets.clone();
    /// ```
    pub fn new(users: Arc<dyn UserAccounts>, tweets: Arc<dyn TweetFeed>) -> Self {
        Self { users, tweets }
    }
}
