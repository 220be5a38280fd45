//! Serial port enumeration.
//!
//! The controller board shows up as a USB serial device: `COM3` on Windows,
//! `/dev/ttyUSB0` or `/dev/ttyACM0` on Linux, `/dev/cu.usbserial-*` on macOS.
//! Only the names are needed; no port is ever opened here.

use tracing::{debug, warn};

/// Names of the serial ports currently present.
///
/// Enumeration failures are logged and reported as "no ports".
pub fn available_port_names() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => {
            let names: Vec<String> = ports.into_iter().map(|p| p.port_name).collect();
            debug!(?names, "serial ports enumerated");
            names
        }
        Err(e) => {
            warn!("serial port enumeration failed: {e}");
            Vec::new()
        }
    }
}
