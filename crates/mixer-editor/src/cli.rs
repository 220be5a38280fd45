//! Command-line front-end.
//!
//! ```text
//! mixer-editor [--config PATH] [--helper PATH] [--helper-name NAME]
//!              [--locale en|tr] [--json] <COMMAND>
//! ```
//!
//! One-shot commands open the configuration, run a single bridge command and
//! exit.  `shell` keeps one controller alive, reads commands from stdin and
//! prints every change event as it is committed, which is what a windowed
//! front-end would do with its widgets.
//!
//! | Variable            | Default                          |
//! |---------------------|----------------------------------|
//! | `MIXER_CONFIG`      | `config.yaml`                    |
//! | `MIXER_HELPER`      | `deej.exe` (Windows), `deej`     |
//! | `MIXER_HELPER_NAME` | file name of the helper path     |
//! | `MIXER_LOCALE`      | from `LANG`, else `en`           |
//!
//! Command-line flags win over the environment.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use mixer_core::SliderIndex;
use serde::Serialize;
use tracing::debug;

use crate::application::helper_lifecycle::executable_name;
use crate::application::settings_controller::SettingsController;
use crate::infrastructure::storage::config::{FileConfigStore, DEFAULT_CONFIG_FILE};
use crate::infrastructure::system::processes::NativeSupervisor;
use crate::infrastructure::system::NativeInventory;
use crate::infrastructure::ui_bridge::{error_message, Locale, Notification, Severity, UiBridge};

/// Helper executable expected next to the configuration file.
pub const DEFAULT_HELPER: &str = if cfg!(windows) { "deej.exe" } else { "deej" };

const PROMPT: &str = "> ";

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Edits the slider mixer's configuration and starts or stops its helper.
#[derive(Debug, Parser)]
#[command(name = "mixer-editor", version)]
pub struct Cli {
    /// Configuration file; `.toml` is read as TOML, anything else as YAML.
    #[arg(long, env = "MIXER_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Helper executable started by `start`.
    #[arg(long, env = "MIXER_HELPER", default_value = DEFAULT_HELPER)]
    pub helper: PathBuf,

    /// Process name terminated by `stop` [default: file name of --helper].
    #[arg(long, env = "MIXER_HELPER_NAME")]
    pub helper_name: Option<String>,

    /// Message language: en or tr.
    #[arg(long, env = "MIXER_LOCALE")]
    pub locale: Option<Locale>,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Action {
    /// Print the current configuration.
    Show,
    /// List running applications.
    Apps,
    /// List serial ports.
    Ports,
    /// Map a slider to an application.
    Assign {
        index: SliderIndex,
        /// Process name; several words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        target: Vec<String>,
    },
    /// Map a slider to the master volume.
    Master { index: SliderIndex },
    /// Select the serial port of the controller board.
    ComPort { port: String },
    /// Set the baud rate.
    Baud {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Toggle slider inversion.
    Invert {
        #[arg(action = ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        value: bool,
    },
    /// Set noise reduction: low, medium or high.
    Noise { level: String },
    /// Launch the helper.
    Start,
    /// Terminate the helper and wait for it to exit.
    Stop,
    /// Read commands from stdin until `quit` or end of input.
    Shell,
}

/// One line typed into the shell.
#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    action: Action,
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Opens the configuration and runs `cli.command` against the real system.
///
/// # Errors
///
/// Only when writing to stdout or reading stdin fails.  Configuration and
/// helper problems are reported as notifications and turn into a failure
/// exit code.
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let locale = cli
        .locale
        .unwrap_or_else(|| Locale::from_system(std::env::var("LANG").ok().as_deref()));
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let store = FileConfigStore::new(&cli.config);
    debug!(path = %store.path().display(), format = ?store.format(), "opening configuration");
    let controller = match SettingsController::open(
        Box::new(store),
        Box::new(NativeInventory::new()),
        Box::new(NativeSupervisor::new()),
    ) {
        Ok(controller) => controller,
        Err(e) => {
            let note = Notification::error(error_message(&e).render(locale));
            write_notification(&mut out, &note, cli.json)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let helper_name = cli
        .helper_name
        .clone()
        .unwrap_or_else(|| executable_name(&cli.helper));
    let mut session = Session::new(
        UiBridge::new(controller, locale),
        cli.helper.clone(),
        helper_name,
        cli.json,
    );

    let ok = match cli.command {
        Action::Shell => {
            let stdin = std::io::stdin();
            session.shell(stdin.lock(), &mut out)?
        }
        action => session.execute(action, &mut out)?,
    };
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ── Session ───────────────────────────────────────────────────────────────────

/// A bridge plus the helper settings the commands need.
pub struct Session {
    bridge: UiBridge,
    helper_path: PathBuf,
    helper_name: String,
    json: bool,
}

impl Session {
    pub fn new(bridge: UiBridge, helper_path: PathBuf, helper_name: String, json: bool) -> Self {
        Self {
            bridge,
            helper_path,
            helper_name,
            json,
        }
    }

    /// Runs one command and writes its result.
    ///
    /// Returns `false` when the command produced an error notification.
    pub fn execute(&mut self, action: Action, out: &mut impl Write) -> anyhow::Result<bool> {
        let note = match action {
            Action::Show => {
                if self.json {
                    write_json(out, self.bridge.controller().configuration())?;
                } else {
                    writeln!(out, "{}", self.bridge.render_configuration())?;
                }
                return Ok(true);
            }
            Action::Apps => {
                let apps = self.bridge.controller().list_running_applications();
                self.write_list(out, &apps)?;
                return Ok(true);
            }
            Action::Ports => {
                let ports = self.bridge.controller_mut().list_serial_ports();
                self.write_list(out, &ports)?;
                return Ok(true);
            }
            Action::Assign { index, target } => self.bridge.assign_slider(index, &target.join(" ")),
            Action::Master { index } => self.bridge.set_master_slider(index),
            Action::ComPort { port } => self.bridge.save_com_port(&port),
            Action::Baud { value } => self.bridge.save_baud_rate(&value),
            Action::Invert { value } => self.bridge.save_invert_sliders(value),
            Action::Noise { level } => self.bridge.save_noise_reduction(&level),
            Action::Start => self.bridge.run_helper(&self.helper_path),
            Action::Stop => self.bridge.close_helper(&self.helper_name),
            // Nested shells are ignored.
            Action::Shell => return Ok(true),
        };
        write_notification(out, &note, self.json)?;
        Ok(!note.is_error())
    }

    /// Executes one command per input line, printing change events after each.
    ///
    /// Returns whether the last command succeeded.
    pub fn shell(&mut self, input: impl BufRead, out: &mut impl Write) -> anyhow::Result<bool> {
        let events = self.bridge.controller_mut().subscribe();
        let mut last_ok = true;

        write!(out, "{PROMPT}")?;
        out.flush()?;
        for line in input.lines() {
            let line = line.context("failed to read command from stdin")?;
            let line = line.trim();
            if matches!(line, "quit" | "exit") {
                break;
            }
            if !line.is_empty() {
                match ShellLine::try_parse_from(line.split_whitespace()) {
                    Ok(parsed) => last_ok = self.execute(parsed.action, out)?,
                    Err(e) => {
                        write!(out, "{e}")?;
                        last_ok = !e.use_stderr();
                    }
                }
                for event in events.try_iter() {
                    writeln!(out, "* {}", self.bridge.describe_event(&event))?;
                }
            }
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }
        writeln!(out)?;
        Ok(last_ok)
    }

    fn write_list(&self, out: &mut impl Write, items: &[String]) -> anyhow::Result<()> {
        if self.json {
            return write_json(out, items);
        }
        for item in items {
            writeln!(out, "{item}")?;
        }
        Ok(())
    }
}

fn write_notification(
    out: &mut impl Write,
    note: &Notification,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        return write_json(out, note);
    }
    match note.severity {
        Severity::Info => writeln!(out, "{}", note.message)?,
        Severity::Warning => writeln!(out, "warning: {}", note.message)?,
        Severity::Error => writeln!(out, "error: {}", note.message)?,
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode JSON output")?;
    writeln!(out, "{text}")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use mixer_core::{Configuration, SliderTarget};

    use crate::infrastructure::storage::memory::MemoryConfigStore;
    use crate::infrastructure::system::mock::MockSystem;

    fn session_with(system: &MockSystem, json: bool) -> (Session, MemoryConfigStore) {
        let mut cfg = Configuration::default();
        cfg.slider_mapping
            .insert(SliderIndex::new(1), "chrome.exe".to_string().into());
        let store = MemoryConfigStore::with(cfg);
        let controller = SettingsController::open(
            Box::new(store.clone()),
            Box::new(system.clone()),
            Box::new(system.clone()),
        )
        .expect("open controller");
        let session = Session::new(
            UiBridge::new(controller, Locale::English),
            PathBuf::from("deej.exe"),
            "deej.exe".to_string(),
            json,
        );
        (session, store)
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).expect("utf-8 output")
    }

    // ── Argument parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["mixer-editor", "show"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
        assert_eq!(cli.helper, PathBuf::from(DEFAULT_HELPER));
        assert_eq!(cli.command, Action::Show);
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_assign_collects_target_words() {
        let cli =
            Cli::try_parse_from(["mixer-editor", "assign", "2", "Google", "Chrome"]).unwrap();
        assert_eq!(
            cli.command,
            Action::Assign {
                index: SliderIndex::new(2),
                target: vec!["Google".to_string(), "Chrome".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_invert_accepts_boolish_values() {
        let cli = Cli::try_parse_from(["mixer-editor", "invert", "yes"]).unwrap();
        assert_eq!(cli.command, Action::Invert { value: true });
        let cli = Cli::try_parse_from(["mixer-editor", "invert", "false"]).unwrap();
        assert_eq!(cli.command, Action::Invert { value: false });
    }

    #[test]
    fn test_parse_locale_and_global_flags() {
        let cli = Cli::try_parse_from([
            "mixer-editor",
            "--locale",
            "tr",
            "--config",
            "mixer.toml",
            "--json",
            "ports",
        ])
        .unwrap();
        assert_eq!(cli.locale, Some(Locale::Turkish));
        assert_eq!(cli.config, PathBuf::from("mixer.toml"));
        assert!(cli.json);
    }

    #[test]
    fn test_parse_rejects_non_numeric_slider_index() {
        assert!(Cli::try_parse_from(["mixer-editor", "master", "one"]).is_err());
    }

    // ── One-shot commands ─────────────────────────────────────────────────────

    #[test]
    fn test_execute_baud_reports_success_and_failure() {
        // Arrange
        let system = MockSystem::new();
        let (mut session, store) = session_with(&system, false);
        let mut out = Vec::new();

        // Act
        let bad = session
            .execute(Action::Baud { value: "abc".into() }, &mut out)
            .unwrap();
        let good = session
            .execute(Action::Baud { value: "19200".into() }, &mut out)
            .unwrap();

        // Assert
        assert!(!bad);
        assert!(good);
        assert_eq!(
            output(out),
            "error: Invalid baud rate value!\nBaud rate updated successfully!\n"
        );
        assert_eq!(store.stored().unwrap().baud_rate, 19200);
    }

    #[test]
    fn test_execute_assign_joins_target_words() {
        let system = MockSystem::new();
        let (mut session, store) = session_with(&system, false);
        let mut out = Vec::new();

        let ok = session
            .execute(
                Action::Assign {
                    index: SliderIndex::new(2),
                    target: vec!["Google".into(), "Chrome".into()],
                },
                &mut out,
            )
            .unwrap();

        assert!(ok);
        assert_eq!(
            store.stored().unwrap().target(SliderIndex::new(2)),
            Some(&SliderTarget::from("Google Chrome"))
        );
    }

    #[test]
    fn test_execute_apps_as_json() {
        let system = MockSystem::new()
            .with_process("spotify.exe")
            .with_process("chrome.exe");
        let (mut session, _store) = session_with(&system, true);
        let mut out = Vec::new();

        session.execute(Action::Apps, &mut out).unwrap();

        let apps: Vec<String> = serde_json::from_slice(&out).unwrap();
        assert_eq!(apps, vec!["chrome.exe", "spotify.exe"]);
    }

    #[test]
    fn test_execute_stop_without_helper_fails() {
        let system = MockSystem::new();
        let (mut session, _store) = session_with(&system, false);
        let mut out = Vec::new();

        let ok = session.execute(Action::Stop, &mut out).unwrap();

        assert!(!ok);
        assert_eq!(output(out), "error: No running Deej apps found!\n");
    }

    // ── Shell ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_shell_prints_notifications_and_events() {
        // Arrange
        let system = MockSystem::new();
        let (mut session, _store) = session_with(&system, false);
        let input = Cursor::new("master 1\ninvert true\nquit\nbaud abc\n");
        let mut out = Vec::new();

        // Act
        let ok = session.shell(input, &mut out).unwrap();

        // Assert
        let text = output(out);
        assert!(ok, "commands after quit must not run");
        assert!(text.contains("Slider 1 now controls the master volume!"));
        assert!(text.contains("* Slider 1 set to master!"));
        assert!(text.contains("* Sliders are inverted"));
        assert!(!text.contains("Invalid baud rate"));
    }

    #[test]
    fn test_shell_reports_unknown_commands_and_continues() {
        let system = MockSystem::new();
        let (mut session, store) = session_with(&system, false);
        let input = Cursor::new("frobnicate\nbaud 38400\n");
        let mut out = Vec::new();

        let ok = session.shell(input, &mut out).unwrap();

        assert!(ok);
        assert!(output(out).contains("frobnicate"));
        assert_eq!(store.stored().unwrap().baud_rate, 38400);
    }
}
