//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use crate::domain::{RecordStore, TweetFeedService, UserAccountService};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::json_error_handler;
use crate::outbound::persistence::MemoryMedium;

/// Build handler state backed by in-memory collections.
///
/// Each invocation starts from three empty collections so tests never share
/// records.
pub fn memory_state() -> HttpState {
    let clock = Arc::new(DefaultClock);
    let users = Arc::new(RecordStore::new(
        "users",
        Arc::new(MemoryMedium::empty()),
        clock.clone(),
    ));
    let credentials = Arc::new(RecordStore::new(
        "credentials",
        Arc::new(MemoryMedium::empty()),
        clock.clone(),
    ));
    let tweets = Arc::new(RecordStore::new(
        "tweets",
        Arc::new(MemoryMedium::empty()),
        clock,
    ));
    HttpState::new(
        Arc::new(UserAccountService::new(users, credentials)),
        Arc::new(TweetFeedService::new(tweets)),
    )
}

/// JSON extractor configuration matching the production server.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}
