//! Port abstraction for the byte-level backing of one collection.
//!
//! A medium stores the serialised collection as a single blob. The record
//! store owns encoding, locking, and identity; the medium only has to read
//! the whole blob and replace it atomically.

use super::define_port_error;

define_port_error! {
    /// Errors raised by collection media.
    pub enum CollectionMediumError {
        /// The backing blob does not exist.
        Missing { location: String } =>
            "collection backing is missing: {location}",
        /// Reading or replacing the blob failed.
        Io { location: String, message: String } =>
            "collection i/o failed at {location}: {message}",
    }
}

/// Port for reading and atomically replacing a collection blob.
///
/// Implementations are called from blocking worker threads and may block.
#[cfg_attr(test, mockall::automock)]
pub trait CollectionMedium: Send + Sync {
    /// Read the full current contents.
    fn read(&self) -> Result<Vec<u8>, CollectionMediumError>;

    /// Replace the full contents. Readers observe either the old or the new
    /// contents, never a mix.
    fn replace(&self, contents: &[u8]) -> Result<(), CollectionMediumError>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}
