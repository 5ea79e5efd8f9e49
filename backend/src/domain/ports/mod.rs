//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`UserAccounts`], [`TweetFeed`]) are called by inbound
//! adapters. The driven port ([`CollectionMedium`]) is implemented by
//! outbound persistence adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod collection_medium;
mod tweet_feed;
mod user_accounts;

#[cfg(test)]
pub use collection_medium::MockCollectionMedium;
pub use collection_medium::{CollectionMedium, CollectionMediumError};
#[cfg(test)]
pub use tweet_feed::MockTweetFeed;
pub use tweet_feed::TweetFeed;
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::UserAccounts;
