//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with
//! the `test-support` feature.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! Collection files are only ever touched through `cap_std::fs::Dir`.
    //! These helpers let test suites inspect and corrupt them the same way.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Read a UTF-8 text file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twitter_api::test_support::cap_fs::{read_file_to_string, write_file};
    ///
    /// let path = std::env::temp_dir().join("cap-fs-read-example.txt");
    /// write_file(&path, b"hello\n")?;
    ///
    /// let content = read_file_to_string(&path)?;
    /// assert_eq!(content, "hello\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn read_file_to_string(path: &Path) -> io::Result<String> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read_to_string(Path::new(&file_name))
    }

    /// Write bytes to a file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twitter_api::test_support::cap_fs::{read_file_to_string, write_file};
    ///
    /// let path = std::env::temp_dir().join("cap-fs-write-example.txt");
    /// write_file(&path, b"snapshot\n")?;
    /// assert_eq!(read_file_to_string(&path)?, "snapshot\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    /// Return true when `path` exists, false when it does not.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twitter_api::test_support::cap_fs::{path_exists, write_file};
    ///
    /// let path = std::env::temp_dir().join("cap-fs-exists-example.txt");
    /// write_file(&path, b"exists\n")?;
    /// assert!(path_exists(&path));
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn path_exists(path: &Path) -> bool {
        let Ok((parent, file_name)) = parent_and_file_name(path) else {
            return false;
        };
        let Ok(directory) = Dir::open_ambient_dir(parent, ambient_authority()) else {
            return false;
        };
        directory.exists(Path::new(&file_name))
    }

    /// Remove a directory tree, treating a missing path as success.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twitter_api::test_support::cap_fs::{path_exists, remove_directory, write_file};
    /// use cap_std::{ambient_authority, fs::Dir};
    ///
    /// let directory = std::env::temp_dir().join("cap-fs-remove-example");
    /// Dir::create_ambient_dir_all(&directory, ambient_authority())?;
    /// let file = directory.join("entry.txt");
    /// write_file(&file, b"cleanup\n")?;
    /// assert!(path_exists(&file));
    ///
    /// remove_directory(&directory)?;
    /// assert!(!path_exists(&file));
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn remove_directory(path: &Path) -> io::Result<()> {
        let (parent, directory_name) = parent_and_file_name(path)?;
        let directory = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(directory) => directory,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(error),
        };
        match directory.remove_dir_all(Path::new(&directory_name)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error),
        }
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file or directory name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod data_dir {
    //! Scratch data directories for file-backed collections.

    use std::io;

    use tempfile::TempDir;

    /// Create an empty directory that is removed when the guard drops.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twitter_api::test_support::data_dir::scratch_data_dir;
    ///
    /// let dir = scratch_data_dir()?;
    /// assert!(dir.path().is_dir());
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn scratch_data_dir() -> io::Result<TempDir> {
        tempfile::Builder::new().prefix("twitter-api-").tempdir()
    }
}

pub mod clock {
    //! Controllable clocks for timestamp assertions.

    use std::sync::Mutex;

    use chrono::{DateTime, Duration, Local, Utc};
    use mockable::Clock;

    /// Clock returning a settable instant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::{Duration, TimeZone, Utc};
    /// use mockable::Clock;
    /// use twitter_api::test_support::clock::MutableClock;
    ///
    /// let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid");
    /// let clock = MutableClock::new(start);
    /// clock.advance(Duration::minutes(5));
    /// assert_eq!(clock.utc(), start + Duration::minutes(5));
    /// ```
    #[derive(Debug)]
    pub struct MutableClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl MutableClock {
        /// Start the clock at `now`.
        #[must_use]
        pub fn new(now: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        /// Move the clock forward by `step`.
        pub fn advance(&self, step: Duration) {
            let mut now = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            *now += step;
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }
}

pub mod medium {
    //! Collection media with injectable write failures.

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, PoisonError};

    use crate::domain::ports::{CollectionMedium, CollectionMediumError};

    const LOCATION: &str = "flaky";

    /// In-memory medium whose writes can be made to fail on demand.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twitter_api::domain::ports::CollectionMedium;
    /// use twitter_api::test_support::medium::FlakyMedium;
    ///
    /// let medium = FlakyMedium::with_contents(b"[]".to_vec());
    /// medium.fail_writes(true);
    /// assert!(medium.replace(b"[1]").is_err());
    /// assert_eq!(medium.contents(), b"[]");
    /// ```
    #[derive(Debug, Default)]
    pub struct FlakyMedium {
        bytes: Mutex<Vec<u8>>,
        failing: AtomicBool,
    }

    impl FlakyMedium {
        /// Medium holding the given bytes with writes enabled.
        #[must_use]
        pub fn with_contents(contents: Vec<u8>) -> Self {
            Self {
                bytes: Mutex::new(contents),
                failing: AtomicBool::new(false),
            }
        }

        /// Make every later `replace` fail (`true`) or succeed (`false`).
        pub fn fail_writes(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Current stored bytes.
        #[must_use]
        pub fn contents(&self) -> Vec<u8> {
            self.bytes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl CollectionMedium for FlakyMedium {
        fn read(&self) -> Result<Vec<u8>, CollectionMediumError> {
            Ok(self.contents())
        }

        fn replace(&self, contents: &[u8]) -> Result<(), CollectionMediumError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(CollectionMediumError::io(LOCATION, "disk full"));
            }
            *self.bytes.lock().unwrap_or_else(PoisonError::into_inner) = contents.to_vec();
            Ok(())
        }

        fn location(&self) -> String {
            LOCATION.to_owned()
        }
    }
}
