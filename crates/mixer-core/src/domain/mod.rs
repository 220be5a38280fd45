//! Domain entities for the settings editor.
//!
//! Pure business rules only: no file access, no process or port enumeration.
//! Outer layers (the controller, storage adapters, the CLI) depend on this
//! module, never the other way around.

/// The persisted configuration and its value types.
///
/// See [`settings::Configuration`] for the main type.
pub mod settings;

/// Input validation shared by every presentation layer.
pub mod validation;
