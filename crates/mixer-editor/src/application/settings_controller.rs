//! SettingsController: the single owner of the editor's configuration.
//!
//! The presentation layer creates one controller at startup and calls its
//! methods in response to user actions.  Nothing is global; a second window or
//! a test simply builds a second controller.
//!
//! # Commit rule
//!
//! Every mutation follows the same three steps:
//!
//! ```text
//! clone current config ──► apply + validate ──► save to store ──► commit in memory ──► publish events
//!                              │ ValidationError       │ ConfigError
//!                              ▼                       ▼
//!                        nothing changed         nothing changed
//! ```
//!
//! Because the in-memory copy is only replaced after the store accepted the
//! new document, a failed save never leaves memory and disk disagreeing.
//!
//! # Threading
//!
//! The controller is used from one thread (the UI dispatch thread).
//! [`SettingsController::stop_helper_process`] blocks that thread until the
//! helper has exited, with no timeout and no way to cancel.

use std::path::Path;
use std::sync::mpsc::Receiver;

use mixer_core::{
    parse_baud_rate, validate_com_port, Configuration, NoiseReduction, SliderIndex,
    ValidationError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::change_events::{diff, EventHub, SettingsEvent};
use super::config_store::{ConfigError, ConfigStore};
use super::helper_lifecycle::{HelperError, HelperLifecycle, ProcessSupervisor};
use super::inventory::{normalize_application_names, SystemInventory};

/// Coarse error categories a view can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No configuration file; fatal at startup.
    ConfigNotFound,
    /// Malformed configuration file; fatal at startup.
    ConfigParseError,
    /// User input rejected; nothing changed.
    ValidationError,
    /// Helper executable or process missing; reported, not fatal.
    NotFound,
    /// Persistence or OS failure; reported, not fatal.
    IoError,
}

/// Error type for every controller operation.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Helper(#[from] HelperError),
}

impl SettingsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(ConfigError::NotFound { .. }) => ErrorKind::ConfigNotFound,
            Self::Config(ConfigError::Parse { .. }) => ErrorKind::ConfigParseError,
            Self::Config(ConfigError::Io { .. } | ConfigError::Serialize(_)) => ErrorKind::IoError,
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::Helper(
                HelperError::ExecutableNotFound { .. } | HelperError::ProcessNotFound { .. },
            ) => ErrorKind::NotFound,
            Self::Helper(HelperError::Launch { .. } | HelperError::TerminationRefused { .. }) => {
                ErrorKind::IoError
            }
        }
    }
}

/// Owns the configuration and performs every user-facing operation on it.
pub struct SettingsController {
    store: Box<dyn ConfigStore>,
    inventory: Box<dyn SystemInventory>,
    helper: HelperLifecycle,
    config: Configuration,
    observed_ports: Vec<String>,
    events: EventHub,
}

impl SettingsController {
    /// Loads the configuration and builds a controller around it.
    ///
    /// # Errors
    ///
    /// Fails with `ConfigNotFound` / `ConfigParseError` (see
    /// [`SettingsError::kind`]); there is no fallback to defaults, the caller
    /// is expected to report the problem and abort startup.
    pub fn open(
        store: Box<dyn ConfigStore>,
        inventory: Box<dyn SystemInventory>,
        supervisor: Box<dyn ProcessSupervisor>,
    ) -> Result<Self, SettingsError> {
        let config = store.load()?;
        info!(
            sliders = config.slider_mapping.len(),
            "configuration loaded"
        );
        Ok(Self {
            store,
            inventory,
            helper: HelperLifecycle::new(supervisor),
            config,
            observed_ports: Vec::new(),
            events: EventHub::new(),
        })
    }

    /// The configuration as last committed.
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Returns a receiver of every change committed from now on.
    pub fn subscribe(&mut self) -> Receiver<SettingsEvent> {
        self.events.subscribe()
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Re-reads the store, replacing the in-memory configuration.
    ///
    /// # Errors
    ///
    /// `ConfigNotFound` / `ConfigParseError`; the current configuration is kept.
    pub fn load(&mut self) -> Result<&Configuration, SettingsError> {
        let loaded = self.store.load()?;
        let events = diff(&self.config, &loaded);
        self.config = loaded;
        debug!(changes = events.len(), "configuration reloaded");
        self.publish(events);
        Ok(&self.config)
    }

    /// Persists `config` as a whole and makes it current.
    ///
    /// # Errors
    ///
    /// `IoError` when the store rejects the write; memory is left unchanged.
    pub fn save(&mut self, config: Configuration) -> Result<&Configuration, SettingsError> {
        self.commit(config)
    }

    // ── System snapshots ──────────────────────────────────────────────────────

    /// Sorted, de-duplicated names of the processes running right now.
    pub fn list_running_applications(&self) -> Vec<String> {
        let names = normalize_application_names(self.inventory.process_names());
        debug!(count = names.len(), "running applications listed");
        names
    }

    /// Serial ports available right now.
    ///
    /// The result is remembered for [`is_observed_port`](Self::is_observed_port).
    pub fn list_serial_ports(&mut self) -> Vec<String> {
        let ports = self.inventory.serial_ports();
        debug!(?ports, "serial ports listed");
        self.observed_ports = ports.clone();
        ports
    }

    /// `true` if `port` appeared in the most recent port listing.
    pub fn is_observed_port(&self, port: &str) -> bool {
        self.observed_ports.iter().any(|p| p == port.trim())
    }

    /// Sliders currently bound to the master volume.
    pub fn master_sliders(&self) -> Vec<SliderIndex> {
        self.config.master_sliders()
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Binds `index` to `target` and persists the change.
    ///
    /// `index` must exist or be the next free index.
    ///
    /// # Errors
    ///
    /// `ValidationError` for a blank target or an index gap, `IoError` when
    /// the save fails.
    pub fn assign_slider(
        &mut self,
        index: SliderIndex,
        target: &str,
    ) -> Result<&Configuration, SettingsError> {
        let mut next = self.config.clone();
        next.assign_slider(index, target)?;
        self.commit(next)?;
        self.warn_on_shared_master();
        Ok(&self.config)
    }

    /// Binds `index` to the master volume.
    ///
    /// Other sliders already bound to master keep their binding.
    pub fn set_master_slider(&mut self, index: SliderIndex) -> Result<&Configuration, SettingsError> {
        self.assign_slider(index, mixer_core::MASTER_TARGET)
    }

    /// Selects the serial port the controller board is attached to.
    ///
    /// A port missing from the last listing is accepted with a warning.
    ///
    /// # Errors
    ///
    /// `ValidationError` for a blank port; nothing is persisted.
    pub fn set_com_port(&mut self, raw: &str) -> Result<&Configuration, SettingsError> {
        let port = validate_com_port(raw)?;
        if !self.is_observed_port(&port) {
            warn!(port = %port, "COM port was not seen by the last port scan");
        }
        let mut next = self.config.clone();
        next.com_port = Some(port);
        self.commit(next)
    }

    /// Parses and stores the baud rate.
    ///
    /// # Errors
    ///
    /// `ValidationError` for anything but a positive integer; the previous
    /// rate stays in effect.
    pub fn set_baud_rate(&mut self, raw: &str) -> Result<&Configuration, SettingsError> {
        let rate = parse_baud_rate(raw)?;
        let mut next = self.config.clone();
        next.baud_rate = rate;
        self.commit(next)
    }

    pub fn set_invert_sliders(&mut self, invert: bool) -> Result<&Configuration, SettingsError> {
        let mut next = self.config.clone();
        next.invert_sliders = invert;
        self.commit(next)
    }

    pub fn set_noise_reduction(
        &mut self,
        level: NoiseReduction,
    ) -> Result<&Configuration, SettingsError> {
        let mut next = self.config.clone();
        next.noise_reduction = level;
        self.commit(next)
    }

    // ── Helper lifecycle ──────────────────────────────────────────────────────

    /// Launches the helper at `path` and returns its pid immediately.
    ///
    /// # Errors
    ///
    /// `NotFound` when no executable exists at `path`.
    pub fn start_helper_process(&mut self, path: &Path) -> Result<u32, SettingsError> {
        let pid = self.helper.start(path)?;
        self.events.publish(SettingsEvent::HelperStarted { pid });
        Ok(pid)
    }

    /// Terminates the helper called `name` and returns once it has exited.
    ///
    /// Blocks without a timeout.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such process is running.
    pub fn stop_helper_process(&mut self, name: &str) -> Result<Vec<u32>, SettingsError> {
        let pids = self.helper.stop(name)?;
        self.events.publish(SettingsEvent::HelperStopped { pids: pids.clone() });
        Ok(pids)
    }

    /// Pid of the helper this controller launched, while it is running.
    pub fn running_helper_pid(&mut self) -> Option<u32> {
        self.helper.owned_pid()
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn commit(&mut self, next: Configuration) -> Result<&Configuration, SettingsError> {
        self.store.save(&next)?;
        let events = diff(&self.config, &next);
        self.config = next;
        info!(changes = events.len(), "configuration saved");
        self.publish(events);
        Ok(&self.config)
    }

    fn publish(&mut self, events: Vec<SettingsEvent>) {
        for event in events {
            self.events.publish(event);
        }
    }

    fn warn_on_shared_master(&self) {
        let masters = self.config.master_sliders();
        if masters.len() > 1 {
            warn!(?masters, "more than one slider is bound to master volume");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
