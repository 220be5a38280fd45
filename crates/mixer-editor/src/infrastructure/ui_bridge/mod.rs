//! Presentation bridge: turns controller results into localized notifications.
//!
//! Any front-end (the bundled CLI, a future GUI) talks to the configuration
//! through [`UiBridge`].  Each command method calls the matching
//! [`SettingsController`] operation and returns a [`Notification`], so the
//! front-end never has to look at an error type: it shows the message and,
//! for an [`Severity::Error`], keeps its widgets on the previous value.
//!
//! This is the only place where errors become text.  The controller and the
//! domain crate stay language-neutral.
//!
//! | Bridge command         | Controller operation        | Success text            |
//! |------------------------|-----------------------------|-------------------------|
//! | `assign_slider`        | `assign_slider`             | Slider N set to X!      |
//! | `set_master_slider`    | `set_master_slider`         | Slider N now controls…  |
//! | `save_com_port`        | `set_com_port`              | COM Port set to X!      |
//! | `save_baud_rate`       | `set_baud_rate`             | Baud rate updated…      |
//! | `save_invert_sliders`  | `set_invert_sliders`        | Invert sliders setting… |
//! | `save_noise_reduction` | `set_noise_reduction`       | Noise reduction setting…|
//! | `run_helper`           | `start_helper_process`      | Deej app started        |
//! | `close_helper`         | `stop_helper_process`       | Deej app is closed      |

use std::path::Path;

use mixer_core::{Configuration, NoiseReduction, SliderIndex, ValidationError};
use serde::Serialize;

use crate::application::change_events::SettingsEvent;
use crate::application::config_store::ConfigError;
use crate::application::helper_lifecycle::HelperError;
use crate::application::settings_controller::{SettingsController, SettingsError};

pub mod strings;

pub use strings::{Locale, Message, UnknownLocale};

// ── Notifications ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// What a front-end shows after a command: a message box, a status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ── Error mapping ─────────────────────────────────────────────────────────────

/// The user-facing message for a failed operation.
pub fn error_message(err: &SettingsError) -> Message {
    match err {
        SettingsError::Validation(e) => match e {
            ValidationError::BlankComPort => Message::ComPortNotSpecified,
            ValidationError::InvalidBaudRate(_) => Message::InvalidBaudRate,
            ValidationError::BlankTarget => Message::TargetNotSpecified,
            ValidationError::SliderIndexGap { index, next } => Message::SliderIndexGap {
                index: *index,
                next: *next,
            },
            ValidationError::UnknownNoiseReduction(value) => Message::UnknownNoiseReduction {
                value: value.clone(),
            },
        },
        SettingsError::Config(e) => match e {
            ConfigError::NotFound { path } => Message::ConfigNotFound { path: path.clone() },
            ConfigError::Parse { path, message } => Message::ConfigInvalid {
                path: path.clone(),
                reason: message.clone(),
            },
            ConfigError::Io { .. } | ConfigError::Serialize(_) => Message::SaveFailed {
                reason: e.to_string(),
            },
        },
        SettingsError::Helper(e) => match e {
            HelperError::ExecutableNotFound { path } => {
                Message::HelperNotFound { path: path.clone() }
            }
            HelperError::Launch { path, source } => Message::HelperLaunchFailed {
                path: path.clone(),
                reason: source.to_string(),
            },
            HelperError::ProcessNotFound { .. } => Message::NoRunningHelper,
            HelperError::TerminationRefused { name } => {
                Message::HelperTerminationRefused { name: name.clone() }
            }
        },
    }
}

// ── Events and views ──────────────────────────────────────────────────────────

/// One line describing a committed change, for status bars and the shell.
pub fn describe_event(event: &SettingsEvent, locale: Locale) -> String {
    let message = match event {
        SettingsEvent::SliderAssigned { index, target, .. } => Message::SliderAssigned {
            index: *index,
            target: target.to_string(),
        },
        SettingsEvent::SliderRemoved { index, .. } => Message::SliderRemoved { index: *index },
        SettingsEvent::ComPortChanged(port) => Message::ComPortChanged { port: port.clone() },
        SettingsEvent::BaudRateChanged(rate) => Message::BaudRateChanged { rate: *rate },
        SettingsEvent::InvertSlidersChanged(invert) => {
            Message::InvertSlidersChanged { invert: *invert }
        }
        SettingsEvent::NoiseReductionChanged(level) => {
            Message::NoiseReductionChanged { level: *level }
        }
        SettingsEvent::HelperStarted { pid } => Message::HelperStarted { pid: *pid },
        SettingsEvent::HelperStopped { pids } => Message::HelperStopped { pids: pids.clone() },
    };
    message.render(locale)
}

/// The settings form as text, one labelled field per line.
pub fn render_configuration(config: &Configuration, locale: Locale) -> String {
    let mut lines = vec![Message::WindowTitle.render(locale)];
    for (index, target) in config.sliders() {
        lines.push(format!(
            "  {} {target}",
            Message::SliderLabel { index }.render(locale)
        ));
    }
    let port = config
        .com_port
        .clone()
        .unwrap_or_else(|| Message::NotSet.render(locale));
    lines.push(format!("  {} {port}", Message::ComPortLabel.render(locale)));
    lines.push(format!(
        "  {} {}",
        Message::BaudRateLabel.render(locale),
        config.baud_rate
    ));
    lines.push(format!(
        "  {} {}",
        Message::InvertSlidersLabel.render(locale),
        config.invert_sliders
    ));
    lines.push(format!(
        "  {} {}",
        Message::NoiseReductionLabel.render(locale),
        config.noise_reduction
    ));
    lines.join("\n")
}

// ── Bridge ────────────────────────────────────────────────────────────────────

/// A controller paired with the language its notifications are written in.
pub struct UiBridge {
    controller: SettingsController,
    locale: Locale,
}

impl UiBridge {
    pub fn new(controller: SettingsController, locale: Locale) -> Self {
        Self { controller, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn controller(&self) -> &SettingsController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SettingsController {
        &mut self.controller
    }

    pub fn assign_slider(&mut self, index: SliderIndex, target: &str) -> Notification {
        match self.controller.assign_slider(index, target) {
            Ok(config) => {
                let target = config
                    .target(index)
                    .map_or_else(|| target.to_string(), ToString::to_string);
                self.info(Message::SliderAssigned { index, target })
            }
            Err(e) => self.failure(&e),
        }
    }

    /// Binds `index` to master; warns when master is now shared.
    pub fn set_master_slider(&mut self, index: SliderIndex) -> Notification {
        match self.controller.set_master_slider(index) {
            Ok(config) if config.master_sliders().len() > 1 => self.warning(&[
                Message::MasterSliderSet { index },
                Message::SharedMaster,
            ]),
            Ok(_) => self.info(Message::MasterSliderSet { index }),
            Err(e) => self.failure(&e),
        }
    }

    /// Stores the port after a fresh scan; an undetected port is saved with a
    /// warning.
    pub fn save_com_port(&mut self, raw: &str) -> Notification {
        self.controller.list_serial_ports();
        match self.controller.set_com_port(raw) {
            Ok(config) => {
                let port = config.com_port.clone().unwrap_or_default();
                if self.controller.is_observed_port(&port) {
                    self.info(Message::ComPortSet { port })
                } else {
                    self.warning(&[
                        Message::ComPortSet { port: port.clone() },
                        Message::ComPortNotDetected { port },
                    ])
                }
            }
            Err(e) => self.failure(&e),
        }
    }

    pub fn save_baud_rate(&mut self, raw: &str) -> Notification {
        match self.controller.set_baud_rate(raw) {
            Ok(_) => self.info(Message::BaudRateUpdated),
            Err(e) => self.failure(&e),
        }
    }

    pub fn save_invert_sliders(&mut self, invert: bool) -> Notification {
        match self.controller.set_invert_sliders(invert) {
            Ok(_) => self.info(Message::InvertSlidersUpdated),
            Err(e) => self.failure(&e),
        }
    }

    /// Accepts `low`, `medium` (or `default`) and `high`, case-insensitive.
    pub fn save_noise_reduction(&mut self, raw: &str) -> Notification {
        let result = raw
            .parse::<NoiseReduction>()
            .map_err(SettingsError::from)
            .and_then(|level| self.controller.set_noise_reduction(level).map(|_| ()));
        match result {
            Ok(()) => self.info(Message::NoiseReductionUpdated),
            Err(e) => self.failure(&e),
        }
    }

    pub fn run_helper(&mut self, path: &Path) -> Notification {
        match self.controller.start_helper_process(path) {
            Ok(pid) => self.info(Message::HelperStarted { pid }),
            Err(e) => self.failure(&e),
        }
    }

    /// Blocks until every helper called `name` has exited.
    pub fn close_helper(&mut self, name: &str) -> Notification {
        match self.controller.stop_helper_process(name) {
            Ok(_) => self.info(Message::HelperClosed),
            Err(e) => self.failure(&e),
        }
    }

    pub fn describe_event(&self, event: &SettingsEvent) -> String {
        describe_event(event, self.locale)
    }

    pub fn render_configuration(&self) -> String {
        render_configuration(self.controller.configuration(), self.locale)
    }

    fn info(&self, message: Message) -> Notification {
        Notification::info(message.render(self.locale))
    }

    fn warning(&self, messages: &[Message]) -> Notification {
        let text: Vec<String> = messages.iter().map(|m| m.render(self.locale)).collect();
        Notification::warning(text.join(" "))
    }

    fn failure(&self, err: &SettingsError) -> Notification {
        Notification::error(error_message(err).render(self.locale))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
