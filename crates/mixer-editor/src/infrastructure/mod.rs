//! Infrastructure layer of the settings editor.
//!
//! Contains OS-facing adapters: the configuration file store, process and
//! serial port enumeration, helper launch/termination, and the presentation
//! bridge that turns controller results into localized notifications.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `mixer_core`, but MUST NOT be imported by the `application` or domain
//! layers (test modules excepted).

pub mod storage;
pub mod system;
pub mod ui_bridge;
