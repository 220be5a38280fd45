//! Mock system for unit testing.
//!
//! Simulates a process table, a set of serial ports and a file system with
//! helper executables, so the controller can be exercised without spawning
//! or killing anything real.  Clones share state.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::helper_lifecycle::{
    executable_name, HelperHandle, ProcessSupervisor, TerminationReport,
};
use crate::application::inventory::SystemInventory;

const FIRST_PID: u32 = 1000;

#[derive(Debug, Clone)]
struct FakeProcess {
    pid: u32,
    name: String,
    running: bool,
    protected: bool,
}

#[derive(Debug)]
struct State {
    processes: Vec<FakeProcess>,
    ports: Vec<String>,
    executables: Vec<PathBuf>,
    launched: Vec<PathBuf>,
    next_pid: u32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            processes: Vec::new(),
            ports: Vec::new(),
            executables: Vec::new(),
            launched: Vec::new(),
            next_pid: FIRST_PID,
        }
    }
}

impl State {
    fn spawn(&mut self, name: &str, protected: bool) -> u32 {
        let pid = self.next_pid;
        self.next_pid += 1;
        self.processes.push(FakeProcess {
            pid,
            name: name.to_string(),
            running: true,
            protected,
        });
        pid
    }
}

/// In-memory [`SystemInventory`] and [`ProcessSupervisor`].
#[derive(Debug, Clone, Default)]
pub struct MockSystem {
    state: Arc<Mutex<State>>,
}

impl MockSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds serial ports to the listing.
    pub fn with_ports(self, ports: &[&str]) -> Self {
        self.state
            .lock()
            .expect("lock poisoned")
            .ports
            .extend(ports.iter().map(|p| p.to_string()));
        self
    }

    /// Adds a running process named `name`.
    pub fn with_process(self, name: &str) -> Self {
        self.state.lock().expect("lock poisoned").spawn(name, false);
        self
    }

    /// Adds a running process named `name` that refuses termination.
    pub fn with_protected_process(self, name: &str) -> Self {
        self.state.lock().expect("lock poisoned").spawn(name, true);
        self
    }

    /// Makes `path` an existing executable.
    pub fn with_executable(self, path: impl Into<PathBuf>) -> Self {
        self.state
            .lock()
            .expect("lock poisoned")
            .executables
            .push(path.into());
        self
    }

    /// Paths passed to `launch_detached`, in call order.
    pub fn launched(&self) -> Vec<PathBuf> {
        self.state.lock().expect("lock poisoned").launched.clone()
    }

    /// `true` while the process with `pid` has not been terminated.
    pub fn is_running(&self, pid: u32) -> bool {
        self.state
            .lock()
            .expect("lock poisoned")
            .processes
            .iter()
            .any(|p| p.pid == pid && p.running)
    }

    /// Simulates the process exiting on its own.
    pub fn exit(&self, pid: u32) {
        let mut state = self.state.lock().expect("lock poisoned");
        if let Some(process) = state.processes.iter_mut().find(|p| p.pid == pid) {
            process.running = false;
        }
    }
}

impl SystemInventory for MockSystem {
    fn process_names(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("lock poisoned")
            .processes
            .iter()
            .filter(|p| p.running)
            .map(|p| p.name.clone())
            .collect()
    }

    fn serial_ports(&self) -> Vec<String> {
        self.state.lock().expect("lock poisoned").ports.clone()
    }
}

/// Handle to a process launched through [`MockSystem`].
struct MockHandle {
    pid: u32,
    system: MockSystem,
}

impl HelperHandle for MockHandle {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn has_exited(&mut self) -> bool {
        !self.system.is_running(self.pid)
    }

    fn terminate_and_wait(&mut self) -> io::Result<()> {
        self.system.exit(self.pid);
        Ok(())
    }
}

impl ProcessSupervisor for MockSystem {
    fn executable_exists(&self, path: &Path) -> bool {
        self.state
            .lock()
            .expect("lock poisoned")
            .executables
            .iter()
            .any(|p| p == path)
    }

    fn launch_detached(&self, path: &Path) -> io::Result<Box<dyn HelperHandle>> {
        let pid = {
            let mut state = self.state.lock().expect("lock poisoned");
            state.launched.push(path.to_path_buf());
            state.spawn(&executable_name(path), false)
        };
        Ok(Box::new(MockHandle {
            pid,
            system: self.clone(),
        }))
    }

    fn terminate_by_name(&self, name: &str) -> TerminationReport {
        let mut state = self.state.lock().expect("lock poisoned");
        let mut report = TerminationReport::default();
        for process in state
            .processes
            .iter_mut()
            .filter(|p| p.running && p.name == name)
        {
            if process.protected {
                report.refused.push(process.pid);
            } else {
                process.running = false;
                report.stopped.push(process.pid);
            }
        }
        report
    }
}
