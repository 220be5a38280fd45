//! Persistence contract for the configuration.
//!
//! The controller never touches the file system itself.  It loads and saves
//! through a [`ConfigStore`]; production code uses
//! `infrastructure::storage::config::FileConfigStore`, tests use
//! `infrastructure::storage::memory::MemoryConfigStore`.

use std::path::PathBuf;

use mixer_core::Configuration;
use thiserror::Error;

/// Error type for configuration persistence.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// There is no configuration to load.
    #[error("configuration file not found at {}", path.display())]
    NotFound { path: PathBuf },

    /// The stored document is not a valid configuration.
    #[error("failed to parse configuration at {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be encoded in the store's format.
    #[error("failed to serialize configuration: {0}")]
    Serialize(String),
}

/// Loads and saves the whole configuration document.
pub trait ConfigStore {
    /// Reads the stored configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] when nothing is stored yet and
    /// [`ConfigError::Parse`] when the stored document is malformed.  There
    /// is no fallback to defaults.
    fn load(&self) -> Result<Configuration, ConfigError>;

    /// Replaces the stored configuration.
    ///
    /// Implementations must not leave a half-written document behind.
    fn save(&self, config: &Configuration) -> Result<(), ConfigError>;
}
