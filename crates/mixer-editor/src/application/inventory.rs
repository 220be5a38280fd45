//! Snapshots of the live system: running applications and serial ports.
//!
//! Both lists are fresh on every call and may already be stale when the user
//! looks at them.  Nothing is cached here; the controller remembers the last
//! port snapshot for its soft COM port check.

/// Read-only view of the processes and serial devices present right now.
///
/// The production implementation is
/// `infrastructure::system::NativeInventory`; tests use
/// `infrastructure::system::mock::MockSystem`.
pub trait SystemInventory {
    /// Names of running processes, in any order, duplicates allowed.
    ///
    /// Processes whose name cannot be read are left out.
    fn process_names(&self) -> Vec<String>;

    /// Identifiers of the serial ports currently available (`COM3`,
    /// `/dev/ttyUSB0`, ...).  An enumeration failure yields an empty list.
    fn serial_ports(&self) -> Vec<String>;
}

/// Sorts `names`, drops duplicates and blank entries.
pub fn normalize_application_names(mut names: Vec<String>) -> Vec<String> {
    names.retain(|name| !name.trim().is_empty());
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_sorts_and_dedups() {
        let names = owned(&["spotify.exe", "chrome.exe", "spotify.exe", "Discord.exe"]);
        assert_eq!(
            normalize_application_names(names),
            owned(&["Discord.exe", "chrome.exe", "spotify.exe"])
        );
    }

    #[test]
    fn test_normalize_drops_blank_names() {
        let names = owned(&["", "  ", "deej.exe"]);
        assert_eq!(normalize_application_names(names), owned(&["deej.exe"]));
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(normalize_application_names(Vec::new()).is_empty());
    }
}
