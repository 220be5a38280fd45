//! Integration tests for the settings controller over a real configuration
//! file.
//!
//! Each test works in its own temporary directory, writes a config the way
//! the helper program ships it, drives the controller through the public API
//! and then inspects what ended up on disk.

use std::fs;
use std::path::{Path, PathBuf};

use mixer_core::{NoiseReduction, SliderIndex, SliderTarget};
use mixer_editor::application::settings_controller::{ErrorKind, SettingsController};
use mixer_editor::infrastructure::storage::config::FileConfigStore;
use mixer_editor::infrastructure::system::mock::MockSystem;
use uuid::Uuid;

const HELPER_CONFIG: &str = "\
slider_mapping:
  0: master
  1: chrome.exe
  2: spotify.exe
invert_sliders: false
com_port: COM4
baud_rate: 9600
noise_reduction: default
process_refresh_frequency: 5
";

/// The file as the helper ships it, with one slider driving two games.
const STOCK_CONFIG: &str = "\
slider_mapping:
  0: master
  1: chrome.exe
  2: spotify.exe
  3:
    - pathofexile_x64.exe
    - rocketleague.exe
  4: discord.exe
invert_sliders: false
com_port: COM4
baud_rate: 9600
noise_reduction: default
";

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mixer_integration_{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn open(path: &Path) -> SettingsController {
    let system = MockSystem::new();
    SettingsController::open(
        Box::new(FileConfigStore::new(path)),
        Box::new(system.clone()),
        Box::new(system),
    )
    .expect("open controller")
}

#[test]
fn test_set_master_slider_is_visible_to_a_fresh_controller() {
    // Arrange: {1: chrome.exe}, com_port null
    let dir = temp_dir();
    let path = dir.join("config.yaml");
    fs::write(&path, "slider_mapping:\n  1: chrome.exe\ncom_port: null\n").unwrap();
    let mut ctl = open(&path);

    // Act
    ctl.set_master_slider(SliderIndex::new(1)).expect("set master");

    // Assert
    let reopened = open(&path);
    let cfg = reopened.configuration();
    assert_eq!(cfg.target(SliderIndex::new(1)), Some(&SliderTarget::from("master")));
    assert_eq!(cfg.slider_mapping.len(), 1);
    assert_eq!(cfg.com_port, None);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_helper_config_keeps_unknown_keys_through_a_mutation() {
    // Arrange
    let dir = temp_dir();
    let path = dir.join("config.yaml");
    fs::write(&path, HELPER_CONFIG).unwrap();
    let mut ctl = open(&path);
    assert_eq!(ctl.configuration().noise_reduction, NoiseReduction::Medium);

    // Act
    ctl.set_baud_rate("115200").expect("valid rate");

    // Assert
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("process_refresh_frequency: 5"), "got:\n{text}");
    assert!(text.contains("baud_rate: 115200"), "got:\n{text}");
    let reopened = open(&path);
    assert_eq!(
        reopened.configuration().target(SliderIndex::new(0)),
        Some(&SliderTarget::from("master"))
    );
    assert_eq!(reopened.configuration().com_port.as_deref(), Some("COM4"));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_assign_then_load_returns_target() {
    let dir = temp_dir();
    let path = dir.join("config.yaml");
    fs::write(&path, HELPER_CONFIG).unwrap();
    let mut ctl = open(&path);

    ctl.assign_slider(SliderIndex::new(3), "discord.exe").expect("assign");
    let loaded = ctl.load().expect("load").clone();

    assert_eq!(
        loaded.target(SliderIndex::new(3)),
        Some(&SliderTarget::from("discord.exe"))
    );
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_stock_config_with_list_slider_survives_save_and_reassign() {
    // Arrange
    let dir = temp_dir();
    let path = dir.join("config.yaml");
    fs::write(&path, STOCK_CONFIG).unwrap();
    let mut ctl = open(&path);
    let group = SliderTarget::Many(vec![
        "pathofexile_x64.exe".to_string(),
        "rocketleague.exe".to_string(),
    ]);
    assert_eq!(ctl.configuration().target(SliderIndex::new(3)), Some(&group));

    // Act: an unrelated save keeps the list, a reassignment replaces it
    ctl.set_baud_rate("115200").expect("valid rate");
    let after_save = open(&path).configuration().clone();
    ctl.assign_slider(SliderIndex::new(3), "csgo.exe").expect("assign");
    let after_assign = open(&path).configuration().clone();

    // Assert
    assert_eq!(after_save.target(SliderIndex::new(3)), Some(&group));
    assert_eq!(after_save.slider_mapping.len(), 5);
    assert_eq!(
        after_assign.target(SliderIndex::new(3)),
        Some(&SliderTarget::from("csgo.exe"))
    );
    assert_eq!(
        after_assign.target(SliderIndex::new(4)),
        Some(&SliderTarget::from("discord.exe"))
    );
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_toml_config_round_trip() {
    // Arrange
    let dir = temp_dir();
    let path = dir.join("mixer.toml");
    fs::write(
        &path,
        "baud_rate = 9600\ninvert_sliders = false\n\n[slider_mapping]\n1 = \"chrome.exe\"\n",
    )
    .unwrap();
    let mut ctl = open(&path);

    // Act
    ctl.set_com_port("/dev/ttyUSB0").expect("set port");
    ctl.set_noise_reduction(NoiseReduction::Low).expect("set noise");

    // Assert
    let cfg = open(&path).configuration().clone();
    assert_eq!(cfg.com_port.as_deref(), Some("/dev/ttyUSB0"));
    assert_eq!(cfg.noise_reduction, NoiseReduction::Low);
    assert_eq!(cfg.target(SliderIndex::new(1)), Some(&SliderTarget::from("chrome.exe")));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_and_malformed_files_fail_to_open() {
    let dir = temp_dir();
    let system = MockSystem::new();

    let missing = SettingsController::open(
        Box::new(FileConfigStore::new(dir.join("config.yaml"))),
        Box::new(system.clone()),
        Box::new(system.clone()),
    );
    fs::write(dir.join("broken.yaml"), "slider_mapping: [1, 2").unwrap();
    let malformed = SettingsController::open(
        Box::new(FileConfigStore::new(dir.join("broken.yaml"))),
        Box::new(system.clone()),
        Box::new(system),
    );

    assert_eq!(missing.err().map(|e| e.kind()), Some(ErrorKind::ConfigNotFound));
    assert_eq!(malformed.err().map(|e| e.kind()), Some(ErrorKind::ConfigParseError));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_failed_save_leaves_memory_unchanged() {
    // Arrange: the config directory is replaced by a plain file after opening,
    // so the next save cannot create its temp file.
    let dir = temp_dir();
    let sub = dir.join("deej");
    fs::create_dir_all(&sub).unwrap();
    let path = sub.join("config.yaml");
    fs::write(&path, HELPER_CONFIG).unwrap();
    let mut ctl = open(&path);
    fs::remove_dir_all(&sub).unwrap();
    fs::write(&sub, "not a directory").unwrap();

    // Act
    let err = ctl.set_invert_sliders(true).unwrap_err();

    // Assert
    assert_eq!(err.kind(), ErrorKind::IoError);
    assert!(!ctl.configuration().invert_sliders);
    fs::remove_dir_all(&dir).ok();
}
