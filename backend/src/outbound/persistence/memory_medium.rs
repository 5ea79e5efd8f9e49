//! Process-local collection medium used for ephemeral runs and tests.

use std::sync::{Mutex, MutexGuard};

use crate::domain::ports::{CollectionMedium, CollectionMediumError};

const LOCATION: &str = "memory";

/// Collection contents held in memory. `None` models a missing backing.
#[derive(Debug)]
pub struct MemoryMedium {
    contents: Mutex<Option<Vec<u8>>>,
}

impl MemoryMedium {
    /// Medium holding an empty collection.
    pub fn empty() -> Self {
        Self::with_contents(b"[]".to_vec())
    }

    /// Medium holding the given bytes.
    pub fn with_contents(contents: Vec<u8>) -> Self {
        Self {
            contents: Mutex::new(Some(contents)),
        }
    }

    /// Medium whose backing does not exist.
    pub fn missing() -> Self {
        Self {
            contents: Mutex::new(None),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, Option<Vec<u8>>>, CollectionMediumError> {
        self.contents
            .lock()
            .map_err(|_| CollectionMediumError::io(LOCATION, "memory medium lock poisoned"))
    }
}

impl Default for MemoryMedium {
    fn default() -> Self {
        Self::empty()
    }
}

impl CollectionMedium for MemoryMedium {
    fn read(&self) -> Result<Vec<u8>, CollectionMediumError> {
        self.guard()?
            .clone()
            .ok_or_else(|| CollectionMediumError::missing(LOCATION))
    }

    fn replace(&self, contents: &[u8]) -> Result<(), CollectionMediumError> {
        *self.guard()? = Some(contents.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        LOCATION.to_owned()
    }
}
