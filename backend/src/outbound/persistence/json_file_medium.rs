//! File-backed collection medium: one JSON document per collection.
//!
//! All access goes through a `cap_std` directory handle opened once on the
//! data directory. Replacement writes a uniquely named sibling temp file,
//! syncs it, and renames it over the collection file, so a reader never
//! observes a partially written document.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{CollectionMedium, CollectionMediumError};

const EMPTY_COLLECTION: &[u8] = b"[]";

/// Collection medium stored as `<data_dir>/<collection>.json`.
#[derive(Debug)]
pub struct JsonFileMedium {
    dir: Dir,
    root: PathBuf,
    file_name: String,
}

impl JsonFileMedium {
    /// Open the medium for `collection`, creating the data directory and an
    /// empty collection file when they do not exist yet.
    ///
    /// # Examples
    /// ```
    /// use twitter_api::domain::ports::CollectionMedium;
    /// use twitter_api::outbound::persistence::JsonFileMedium;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let medium = JsonFileMedium::open(dir.path(), "tweets")?;
    /// assert_eq!(medium.read()?, b"[]");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(data_dir: &Path, collection: &str) -> Result<Self, CollectionMediumError> {
        let io_error = |error: io::Error| {
            CollectionMediumError::io(data_dir.display().to_string(), error.to_string())
        };
        Dir::create_ambient_dir_all(data_dir, ambient_authority()).map_err(io_error)?;
        let dir = Dir::open_ambient_dir(data_dir, ambient_authority()).map_err(io_error)?;

        let medium = Self {
            dir,
            root: data_dir.to_path_buf(),
            file_name: format!("{collection}.json"),
        };
        if !medium.dir.exists(&medium.file_name) {
            medium.replace(EMPTY_COLLECTION)?;
            info!(path = %medium.location(), "initialised empty collection");
        }
        Ok(medium)
    }

    fn io_error(&self, error: io::Error) -> CollectionMediumError {
        if error.kind() == io::ErrorKind::NotFound {
            CollectionMediumError::missing(self.location())
        } else {
            CollectionMediumError::io(self.location(), error.to_string())
        }
    }

    fn write_staged(&self, staged: &str, contents: &[u8]) -> io::Result<()> {
        let mut file = self.dir.create(staged)?;
        file.write_all(contents)?;
        file.sync_all()
    }
}

impl CollectionMedium for JsonFileMedium {
    fn read(&self) -> Result<Vec<u8>, CollectionMediumError> {
        self.dir
            .read(&self.file_name)
            .map_err(|error| self.io_error(error))
    }

    fn replace(&self, contents: &[u8]) -> Result<(), CollectionMediumError> {
        let staged = format!(".{}.{}.tmp", self.file_name, Uuid::new_v4().simple());
        let result = self
            .write_staged(&staged, contents)
            .and_then(|()| self.dir.rename(&staged, &self.dir, &self.file_name));

        if let Err(error) = result {
            let _cleanup_result = self.dir.remove_file(&staged);
            return Err(CollectionMediumError::io(self.location(), error.to_string()));
        }
        debug!(path = %self.location(), bytes = contents.len(), "collection replaced");
        Ok(())
    }

    fn location(&self) -> String {
        self.root.join(&self.file_name).display().to_string()
    }
}
