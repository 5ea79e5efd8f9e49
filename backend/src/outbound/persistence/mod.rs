//! Collection media backing the record stores.
//!
//! # Architecture
//!
//! - **Byte-level contract**: media never decode records. Encoding, locking,
//!   and identity generation belong to `RecordStore`.
//! - **Atomic replacement**: `JsonFileMedium` stages a temp file, syncs it,
//!   and renames it into place.
//! - **Capability-scoped I/O**: file access goes through a `cap_std` handle on
//!   the data directory rather than ambient `std::fs` paths.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use mockable::DefaultClock;
//! use twitter_api::domain::{RecordStore, Tweet};
//! use twitter_api::outbound::persistence::JsonFileMedium;
//!
//! let medium = JsonFileMedium::open(Path::new("./data"), "tweets")?;
//! let tweets: RecordStore<Tweet> =
//!     RecordStore::new("tweets", Arc::new(medium), Arc::new(DefaultClock));
//! # Ok::<(), twitter_api::domain::ports::CollectionMediumError>(())
//! ```

mod json_file_medium;
mod memory_medium;

pub use json_file_medium::JsonFileMedium;
pub use memory_medium::MemoryMedium;
