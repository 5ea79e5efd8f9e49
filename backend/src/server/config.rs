//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use twitter_api::settings::AppSettings;

/// Where the record collections live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    /// One JSON file per collection inside this directory.
    Directory(PathBuf),
    /// In-memory collections discarded at exit.
    Ephemeral,
}

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Storage,
}

impl ServerConfig {
    /// Construct a server configuration from explicit values.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, storage: Storage) -> Self {
        Self { bind_addr, storage }
    }

    /// Derive the configuration from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        let storage = if settings.ephemeral {
            Storage::Ephemeral
        } else {
            Storage::Directory(settings.data_dir().to_path_buf())
        };
        Self::new(settings.bind_addr(), storage)
    }
}
