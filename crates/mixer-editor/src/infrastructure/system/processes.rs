//! Process enumeration and helper process control.
//!
//! Snapshots come from `sysinfo`, which reads `/proc` on Linux, the process
//! list API on Windows and `libproc` on macOS.  Processes whose name cannot
//! be read (typically other users' processes without sufficient privileges)
//! show up with an empty name and are skipped.  On Linux the snapshot also
//! lists every thread as its own task; those are filtered out so a thread
//! name never passes for an application or matches a helper name.
//!
//! # Detached launch
//!
//! The helper must outlive the editor and must not receive the editor's
//! Ctrl-C.  It is started with null stdio in its own process group on Unix,
//! and as a detached process in a new process group on Windows.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use sysinfo::{Signal, System};
use tracing::{debug, info, warn};

use crate::application::helper_lifecycle::{HelperHandle, ProcessSupervisor, TerminationReport};

#[cfg(target_os = "windows")]
const DETACHED_PROCESS: u32 = 0x0000_0008;
#[cfg(target_os = "windows")]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Names of all processes visible to this user, unsorted.
pub fn running_process_names() -> Vec<String> {
    let mut system = System::new();
    system.refresh_processes();
    let names: Vec<String> = system
        .processes()
        .values()
        .filter(|process| process.thread_kind().is_none())
        .map(|process| process.name().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    debug!(count = names.len(), "process snapshot taken");
    names
}

/// A helper launched by [`NativeSupervisor`].
pub struct ChildHandle {
    child: Child,
}

impl ChildHandle {
    pub fn new(child: Child) -> Self {
        Self { child }
    }
}

impl HelperHandle for ChildHandle {
    fn pid(&self) -> u32 {
        self.child.id()
    }

    fn has_exited(&mut self) -> bool {
        !matches!(self.child.try_wait(), Ok(None))
    }

    fn terminate_and_wait(&mut self) -> io::Result<()> {
        match self.child.kill() {
            Ok(()) => {}
            // Already exited; wait() below still reaps it.
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => {}
            Err(e) => return Err(e),
        }
        let status = self.child.wait()?;
        debug!(pid = self.child.id(), %status, "helper exited");
        Ok(())
    }
}

/// Production [`ProcessSupervisor`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSupervisor;

impl NativeSupervisor {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessSupervisor for NativeSupervisor {
    fn executable_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn launch_detached(&self, path: &Path) -> io::Result<Box<dyn HelperHandle>> {
        let mut command = Command::new(program_path(path));
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        detach(&mut command);

        let child = command.spawn()?;
        Ok(Box::new(ChildHandle::new(child)))
    }

    fn terminate_by_name(&self, name: &str) -> TerminationReport {
        let mut system = System::new();
        system.refresh_processes();

        let mut report = TerminationReport::default();
        let processes = system
            .processes_by_exact_name(name)
            .filter(|process| process.thread_kind().is_none());
        for process in processes {
            let pid = process.pid().as_u32();
            // Signal::Term is not available everywhere (e.g. Windows).
            let signalled = process
                .kill_with(Signal::Term)
                .unwrap_or_else(|| process.kill());
            if !signalled {
                warn!(pid, name, "termination request rejected");
                report.refused.push(pid);
                continue;
            }
            process.wait();
            info!(pid, name, "process terminated");
            report.stopped.push(pid);
        }
        report
    }
}

/// Makes a bare file name run from the working directory instead of `PATH`.
fn program_path(path: &Path) -> PathBuf {
    let bare = path
        .parent()
        .map_or(true, |parent| parent.as_os_str().is_empty());
    if path.is_relative() && bare {
        Path::new(".").join(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(unix)]
fn detach(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(target_os = "windows")]
fn detach(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    command.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, target_os = "windows")))]
fn detach(_command: &mut Command) {}
