//! # mixer-core
//!
//! Domain model for the slider mixer settings editor.
//!
//! The editor configures an external helper program that reads raw slider
//! positions from a serial port and routes them to application volumes.  This
//! crate holds everything about that configuration that does not touch the
//! operating system:
//!
//! - **`domain::settings`** – the persisted [`Configuration`], slider indices
//!   and targets, the `"master"` sentinel and the noise-reduction level.
//! - **`domain::validation`** – the rules user input must pass before it is
//!   allowed into a configuration (baud rate parsing, COM port, targets,
//!   slider index contiguity).
//!
//! It has zero dependencies on OS APIs, UI frameworks, or file formats, so it
//! compiles and tests the same way on every platform.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `mixer_core::Configuration` instead of `mixer_core::domain::settings::Configuration`.
pub use domain::settings::{
    Configuration, NoiseReduction, SliderIndex, SliderTarget, DEFAULT_BAUD_RATE, MASTER_TARGET,
};
pub use domain::validation::{parse_baud_rate, validate_com_port, validate_target, ValidationError};
