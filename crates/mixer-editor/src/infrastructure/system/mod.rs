//! OS-facing system access: process snapshots, serial ports, helper control.
//!
//! | Module      | Provides                                            | Backed by            |
//! |-------------|-----------------------------------------------------|----------------------|
//! | `processes` | running process names, [`processes::NativeSupervisor`] | `sysinfo`, `std::process` |
//! | `serial`    | serial port names                                   | `serialport`         |
//! | `mock`      | [`mock::MockSystem`] test double for both traits    | in-memory state      |
//!
//! [`NativeInventory`] bundles the two snapshot sources behind the
//! application's `SystemInventory` trait.  `MockSystem` is always compiled
//! (not guarded by `#[cfg(test)]`) so integration tests can use it too.

use crate::application::inventory::SystemInventory;

pub mod mock;
pub mod processes;
pub mod serial;

/// Production [`SystemInventory`] reading live OS state on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeInventory;

impl NativeInventory {
    pub fn new() -> Self {
        Self
    }
}

impl SystemInventory for NativeInventory {
    fn process_names(&self) -> Vec<String> {
        processes::running_process_names()
    }

    fn serial_ports(&self) -> Vec<String> {
        serial::available_port_names()
    }
}
