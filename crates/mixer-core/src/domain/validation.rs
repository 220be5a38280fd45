//! Validation of raw user input.
//!
//! Every presentation layer hands the controller strings exactly as the user
//! typed them; the functions here decide whether such a value may enter a
//! [`Configuration`](super::settings::Configuration).  A rejected value never
//! changes any state.

use thiserror::Error;

use super::settings::SliderIndex;

/// User input rejected before it reached the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The COM port was empty or whitespace.
    #[error("COM port not specified")]
    BlankComPort,

    /// The baud rate was not a positive integer.
    #[error("invalid baud rate {0:?}: expected a positive integer")]
    InvalidBaudRate(String),

    /// A slider target was empty or whitespace.
    #[error("slider target must not be blank")]
    BlankTarget,

    /// Creating `index` would leave a hole in the slider numbering.
    #[error("slider {index} does not exist and is not the next slider ({next})")]
    SliderIndexGap { index: SliderIndex, next: SliderIndex },

    /// The noise reduction level is not one of low, medium, high.
    #[error("unknown noise reduction level {0:?}: expected low, medium or high")]
    UnknownNoiseReduction(String),
}

/// Parses a baud rate typed by the user.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// [`ValidationError::InvalidBaudRate`] for non-numeric, zero or negative input.
pub fn parse_baud_rate(raw: &str) -> Result<u32, ValidationError> {
    match raw.trim().parse::<u32>() {
        Ok(rate) if rate > 0 => Ok(rate),
        _ => Err(ValidationError::InvalidBaudRate(raw.to_string())),
    }
}

/// Returns the trimmed port name.
///
/// # Errors
///
/// [`ValidationError::BlankComPort`] when nothing but whitespace was given.
pub fn validate_com_port(raw: &str) -> Result<String, ValidationError> {
    let port = raw.trim();
    if port.is_empty() {
        return Err(ValidationError::BlankComPort);
    }
    Ok(port.to_string())
}

/// Returns the trimmed slider target.
///
/// # Errors
///
/// [`ValidationError::BlankTarget`] when nothing but whitespace was given.
pub fn validate_target(raw: &str) -> Result<String, ValidationError> {
    let target = raw.trim();
    if target.is_empty() {
        return Err(ValidationError::BlankTarget);
    }
    Ok(target.to_string())
}
