//! Starting and stopping the external helper program.
//!
//! # Handle ownership
//!
//! Finding "the helper" by process name is ambiguous: a renamed binary is
//! missed and an unrelated copy with the same name is hit.  When this editor
//! launched the helper itself it keeps the child handle it got back and stops
//! the helper through that handle first.  The name scan still runs afterwards
//! so helpers started outside this session (at login, from an earlier editor
//! run) can be stopped too.
//!
//! ```text
//! start(path) ──► executable exists? ──no──► ExecutableNotFound
//!                        │yes
//!                        ▼
//!                 launch detached, keep handle, return pid
//!
//! stop(name)  ──► owned handle named `name` still running? ──yes──► terminate + wait
//!                        │
//!                        ▼
//!                 terminate + wait every live process named exactly `name`
//!                        │
//!             nothing stopped ──► ProcessNotFound / TerminationRefused
//! ```
//!
//! Both waits block the calling thread without a timeout.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

/// A helper process this editor launched.
pub trait HelperHandle {
    /// OS process id.
    fn pid(&self) -> u32;
    /// Returns `true` once the process is gone.
    fn has_exited(&mut self) -> bool;
    /// Requests termination and blocks until the process has exited.
    fn terminate_and_wait(&mut self) -> io::Result<()>;
}

/// Outcome of a by-name termination sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminationReport {
    /// Processes that were signalled and have exited.
    pub stopped: Vec<u32>,
    /// Matching processes that could not be signalled (e.g. permissions).
    pub refused: Vec<u32>,
}

/// OS-facing process control used by [`HelperLifecycle`].
pub trait ProcessSupervisor {
    /// Returns `true` if an executable file exists at `path`.
    fn executable_exists(&self, path: &Path) -> bool;

    /// Spawns `path` with no arguments, detached from this process.
    ///
    /// # Errors
    ///
    /// Whatever the OS reports when the spawn fails.
    fn launch_detached(&self, path: &Path) -> io::Result<Box<dyn HelperHandle>>;

    /// Terminates every live process whose name equals `name` exactly and
    /// waits for each to exit.
    fn terminate_by_name(&self, name: &str) -> TerminationReport;
}

/// Error type for helper start/stop.
#[derive(Debug, Error)]
pub enum HelperError {
    /// There is no executable at the configured path.
    #[error("{} not found", path.display())]
    ExecutableNotFound { path: PathBuf },

    /// The executable exists but the OS refused to start it.
    #[error("failed to launch {}: {source}", path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No running process carries the helper's name.
    #[error("no running process named {name}")]
    ProcessNotFound { name: String },

    /// Matching processes exist but none could be terminated.
    #[error("found {name} but could not terminate it")]
    TerminationRefused { name: String },
}

/// The file name part of `path`, used as the process name of a launched helper.
pub fn executable_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

struct OwnedHelper {
    name: String,
    handle: Box<dyn HelperHandle>,
}

/// Launches and stops the helper, keeping the handle of the last launch.
pub struct HelperLifecycle {
    supervisor: Box<dyn ProcessSupervisor>,
    owned: Option<OwnedHelper>,
}

impl HelperLifecycle {
    pub fn new(supervisor: Box<dyn ProcessSupervisor>) -> Self {
        Self {
            supervisor,
            owned: None,
        }
    }

    /// Launches the helper at `path` and returns its pid without waiting.
    ///
    /// # Errors
    ///
    /// [`HelperError::ExecutableNotFound`] when `path` does not exist,
    /// [`HelperError::Launch`] when the spawn itself fails.
    pub fn start(&mut self, path: &Path) -> Result<u32, HelperError> {
        if !self.supervisor.executable_exists(path) {
            return Err(HelperError::ExecutableNotFound {
                path: path.to_path_buf(),
            });
        }

        let handle = self
            .supervisor
            .launch_detached(path)
            .map_err(|source| HelperError::Launch {
                path: path.to_path_buf(),
                source,
            })?;
        let pid = handle.pid();
        info!(pid, path = %path.display(), "helper launched");

        self.owned = Some(OwnedHelper {
            name: executable_name(path),
            handle,
        });
        Ok(pid)
    }

    /// Stops every running helper called `name` and returns their pids once
    /// all of them have exited.
    ///
    /// # Errors
    ///
    /// [`HelperError::ProcessNotFound`] if nothing was running,
    /// [`HelperError::TerminationRefused`] if matches could not be signalled.
    pub fn stop(&mut self, name: &str) -> Result<Vec<u32>, HelperError> {
        let mut stopped = Vec::new();

        if let Some(mut owned) = self.owned.take() {
            if owned.name != name {
                self.owned = Some(owned);
            } else if !owned.handle.has_exited() {
                let pid = owned.handle.pid();
                match owned.handle.terminate_and_wait() {
                    Ok(()) => {
                        info!(pid, "owned helper stopped");
                        stopped.push(pid);
                    }
                    Err(e) => warn!(pid, "failed to stop owned helper: {e}"),
                }
            }
        }

        let report = self.supervisor.terminate_by_name(name);
        for pid in &report.refused {
            warn!(pid, name, "helper process refused termination");
        }
        for pid in report.stopped {
            if !stopped.contains(&pid) {
                stopped.push(pid);
            }
        }

        if !stopped.is_empty() {
            return Ok(stopped);
        }
        if report.refused.is_empty() {
            Err(HelperError::ProcessNotFound {
                name: name.to_string(),
            })
        } else {
            Err(HelperError::TerminationRefused {
                name: name.to_string(),
            })
        }
    }

    /// Pid of the helper launched by this session, if it is still running.
    pub fn owned_pid(&mut self) -> Option<u32> {
        let owned = self.owned.as_mut()?;
        if owned.handle.has_exited() {
            self.owned = None;
            return None;
        }
        Some(owned.handle.pid())
    }
}
