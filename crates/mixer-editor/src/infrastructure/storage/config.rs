//! File-based configuration persistence.
//!
//! The helper program reads its settings from a file next to its executable,
//! by default `config.yaml`.  This editor edits that same file in place:
//!
//! ```yaml
//! slider_mapping:
//!   '1': master
//!   '2': chrome.exe
//! com_port: COM4
//! baud_rate: 9600
//! invert_sliders: false
//! noise_reduction: high
//! ```
//!
//! # Formats
//!
//! The format follows the file extension: `.toml` is read and written as TOML,
//! every other extension as YAML.
//!
//! # Atomic writes
//!
//! A save never truncates the live file.  The new document is written to a
//! uniquely named temporary file in the same directory, flushed, and then
//! renamed over the target.  A crash mid-save leaves either the old document
//! or the new one, plus at worst a stray `.config.yaml.<uuid>.tmp`.
//!
//! The rename happens next to the resolved file, so a `config.yaml` that is
//! a symlink stays a symlink and its target receives the new document.  The
//! existing file's permissions are copied onto the replacement.

use std::fs::{self, File, Permissions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use mixer_core::Configuration;
use tracing::debug;
use uuid::Uuid;

use crate::application::config_store::{ConfigError, ConfigStore};

/// Relative path used when no other location is configured.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// On-disk encoding of the configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Picks the format from `path`'s extension; anything but `.toml` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    fn parse(self, text: &str) -> Result<Configuration, String> {
        match self {
            Self::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        }
    }

    fn render(self, config: &Configuration) -> Result<String, ConfigError> {
        match self {
            Self::Yaml => {
                serde_yaml::to_string(config).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            Self::Toml => {
                toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
        }
    }
}

/// [`ConfigStore`] backed by a single file.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
    format: ConfigFormat,
}

impl FileConfigStore {
    /// Creates a store for `path`, choosing the format from its extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = ConfigFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Configuration, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound {
                    path: self.path.clone(),
                })
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let config = self
            .format
            .parse(&content)
            .map_err(|message| ConfigError::Parse {
                path: self.path.clone(),
                message,
            })?;
        debug!(path = %self.path.display(), "configuration read");
        Ok(config)
    }

    fn save(&self, config: &Configuration) -> Result<(), ConfigError> {
        let content = self.format.render(config)?;
        write_atomically(&self.path, content.as_bytes())?;
        debug!(path = %self.path.display(), bytes = content.len(), "configuration written");
        Ok(())
    }
}

/// Replaces `path` with `contents` via a temp file and a rename.
fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), ConfigError> {
    let (target, permissions) = match fs::canonicalize(path) {
        Ok(resolved) => {
            let permissions = fs::metadata(&resolved).ok().map(|meta| meta.permissions());
            (resolved, permissions)
        }
        // Not there yet: created with default permissions.
        Err(_) => (path.to_path_buf(), None),
    };

    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
        path: dir.clone(),
        source,
    })?;

    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let tmp = dir.join(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()));

    if let Err(source) = write_then_rename(&tmp, &target, contents, permissions) {
        let _ = fs::remove_file(&tmp);
        return Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

fn write_then_rename(
    tmp: &Path,
    target: &Path,
    contents: &[u8],
    permissions: Option<Permissions>,
) -> io::Result<()> {
    let mut file = File::create(tmp)?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions)?;
    }
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, target)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mixer_core::{NoiseReduction, SliderIndex, SliderTarget};

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mixer_test_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    // ── Format selection ──────────────────────────────────────────────────────

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("config.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("config.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("mixer.TOML")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Yaml);
    }

    // ── load ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = temp_dir();
        let store = FileConfigStore::new(dir.join("config.yaml"));

        let result = store.load();

        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("config.yaml");
        fs::write(&path, "slider_mapping: [not, a, map").unwrap();

        // Act
        let result = FileConfigStore::new(&path).load();

        // Assert
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_helper_style_yaml() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("config.yaml");
        fs::write(
            &path,
            "slider_mapping:\n  1: chrome.exe\ncom_port: COM4\nbaud_rate: 9600\nnoise_reduction: low\n",
        )
        .unwrap();

        // Act
        let cfg = FileConfigStore::new(&path).load().expect("load");

        // Assert
        assert_eq!(cfg.target(SliderIndex::new(1)), Some(&SliderTarget::from("chrome.exe")));
        assert_eq!(cfg.com_port.as_deref(), Some("COM4"));
        assert_eq!(cfg.noise_reduction, NoiseReduction::Low);
        fs::remove_dir_all(&dir).ok();
    }

    // ── save ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_save_and_load_round_trip_yaml() {
        // Arrange
        let dir = temp_dir();
        let store = FileConfigStore::new(dir.join("config.yaml"));
        let mut cfg = Configuration::default();
        cfg.assign_slider(SliderIndex::new(1), "master").unwrap();
        cfg.baud_rate = 115200;
        cfg.extra
            .insert("process_refresh_frequency".to_string(), serde_json::json!(5));

        // Act
        store.save(&cfg).expect("save");
        let loaded = store.load().expect("load");

        // Assert
        assert_eq!(loaded, cfg);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_and_load_round_trip_toml() {
        let dir = temp_dir();
        let store = FileConfigStore::new(dir.join("mixer.toml"));
        let mut cfg = Configuration::default();
        cfg.assign_slider(SliderIndex::new(1), "spotify.exe").unwrap();
        cfg.com_port = Some("/dev/ttyACM0".to_string());

        store.save(&cfg).expect("save");
        let text = fs::read_to_string(store.path()).unwrap();
        let loaded = store.load().expect("load");

        assert!(text.contains("baud_rate = 9600"), "TOML expected, got {text}");
        assert_eq!(loaded, cfg);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_overwrites_and_leaves_no_temp_files() {
        // Arrange
        let dir = temp_dir();
        let store = FileConfigStore::new(dir.join("config.yaml"));
        let mut cfg = Configuration::default();
        store.save(&cfg).unwrap();

        // Act
        cfg.invert_sliders = true;
        store.save(&cfg).unwrap();

        // Assert
        let names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["config.yaml".to_string()]);
        assert!(store.load().unwrap().invert_sliders);
        fs::remove_dir_all(&dir).ok();
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        // Arrange
        let dir = temp_dir();
        let path = dir.join("config.yaml");
        fs::write(&path, "invert_sliders: false\n").unwrap();
        fs::set_permissions(&path, Permissions::from_mode(0o600)).unwrap();
        let store = FileConfigStore::new(&path);

        // Act
        store.save(&Configuration::default()).expect("save");

        // Assert
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        fs::remove_dir_all(&dir).ok();
    }

    #[cfg(unix)]
    #[test]
    fn test_save_through_symlink_updates_link_target() {
        // Arrange: config.yaml -> real/config.yaml
        let dir = temp_dir();
        let real_dir = dir.join("real");
        fs::create_dir_all(&real_dir).unwrap();
        let real = real_dir.join("config.yaml");
        fs::write(&real, "invert_sliders: false\n").unwrap();
        let link = dir.join("config.yaml");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        let store = FileConfigStore::new(&link);
        let mut cfg = Configuration::default();
        cfg.invert_sliders = true;

        // Act
        store.save(&cfg).expect("save");

        // Assert
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert!(fs::read_to_string(&real).unwrap().contains("invert_sliders: true"));
        let stray: Vec<_> = fs::read_dir(&real_dir).unwrap().collect();
        assert_eq!(stray.len(), 1, "temp file left next to the target");
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_into_unwritable_location_is_io_error() {
        // Arrange: the parent "directory" is a regular file
        let dir = temp_dir();
        let blocker = dir.join("not_a_dir");
        fs::write(&blocker, "x").unwrap();
        let store = FileConfigStore::new(blocker.join("config.yaml"));

        // Act
        let result = store.save(&Configuration::default());

        // Assert
        assert!(matches!(result, Err(ConfigError::Io { .. })));
        fs::remove_dir_all(&dir).ok();
    }
}
