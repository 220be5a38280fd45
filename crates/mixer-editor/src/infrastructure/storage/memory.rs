//! In-memory configuration store for unit testing.
//!
//! Clones share the same storage, so a test can hand one clone to the
//! controller and keep another to inspect what was saved or to inject
//! failures.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use mixer_core::Configuration;

use crate::application::config_store::{ConfigError, ConfigStore};

const MEMORY_PATH: &str = "<memory>";

#[derive(Default)]
struct State {
    stored: Option<Configuration>,
    malformed: Option<String>,
    fail_saves: bool,
    save_count: usize,
}

/// A [`ConfigStore`] that keeps the document in memory.
#[derive(Clone, Default)]
pub struct MemoryConfigStore {
    state: Arc<Mutex<State>>,
}

impl MemoryConfigStore {
    /// A store with nothing saved yet; `load` reports `NotFound`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store pre-populated with `config`.
    pub fn with(config: Configuration) -> Self {
        let store = Self::default();
        store.replace(config);
        store
    }

    /// A store whose document cannot be parsed; `load` reports `Parse`.
    pub fn malformed(raw: &str) -> Self {
        let store = Self::default();
        store.state.lock().expect("lock poisoned").malformed = Some(raw.to_string());
        store
    }

    /// Overwrites the stored document, as an external editor would.
    pub fn replace(&self, config: Configuration) {
        let mut state = self.state.lock().expect("lock poisoned");
        state.stored = Some(config);
        state.malformed = None;
    }

    /// Makes every following `save` fail with a permission error.
    pub fn fail_saves(&self, fail: bool) {
        self.state.lock().expect("lock poisoned").fail_saves = fail;
    }

    /// The document as last saved.
    pub fn stored(&self) -> Option<Configuration> {
        self.state.lock().expect("lock poisoned").stored.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.state.lock().expect("lock poisoned").save_count
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<Configuration, ConfigError> {
        let state = self.state.lock().expect("lock poisoned");
        if let Some(raw) = &state.malformed {
            return Err(ConfigError::Parse {
                path: PathBuf::from(MEMORY_PATH),
                message: format!("unparseable document: {raw}"),
            });
        }
        state.stored.clone().ok_or_else(|| ConfigError::NotFound {
            path: PathBuf::from(MEMORY_PATH),
        })
    }

    fn save(&self, config: &Configuration) -> Result<(), ConfigError> {
        let mut state = self.state.lock().expect("lock poisoned");
        if state.fail_saves {
            return Err(ConfigError::Io {
                path: PathBuf::from(MEMORY_PATH),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "saves disabled"),
            });
        }
        state.stored = Some(config.clone());
        state.save_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_load_is_not_found() {
        let store = MemoryConfigStore::empty();
        assert!(matches!(store.load(), Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_clones_share_storage() {
        // Arrange
        let store = MemoryConfigStore::empty();
        let handle = store.clone();
        let mut cfg = Configuration::default();
        cfg.baud_rate = 38400;

        // Act
        store.save(&cfg).unwrap();

        // Assert
        assert_eq!(handle.stored().unwrap().baud_rate, 38400);
        assert_eq!(handle.save_count(), 1);
    }

    #[test]
    fn test_failing_saves_keep_previous_document() {
        let store = MemoryConfigStore::with(Configuration::default());
        store.fail_saves(true);
        let mut cfg = Configuration::default();
        cfg.invert_sliders = true;

        assert!(matches!(store.save(&cfg), Err(ConfigError::Io { .. })));
        assert!(!store.stored().unwrap().invert_sliders);
    }
}
