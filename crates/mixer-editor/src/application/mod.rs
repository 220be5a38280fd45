//! Application layer of the settings editor.
//!
//! The use cases here orchestrate the domain model from `mixer_core` and
//! talk to the outside world only through traits:
//!
//! - **`settings_controller`** – the single owner of the in-memory
//!   configuration.  Every user action (assign a slider, pick a port, start
//!   the helper...) is a method on [`settings_controller::SettingsController`].
//!
//! - **`config_store`** – the [`config_store::ConfigStore`] persistence
//!   contract and its error type.
//!
//! - **`inventory`** – the [`inventory::SystemInventory`] contract for
//!   running-process and serial-port snapshots.
//!
//! - **`helper_lifecycle`** – launching and stopping the external helper
//!   through a [`helper_lifecycle::ProcessSupervisor`].
//!
//! - **`change_events`** – per-field change notifications a view can observe
//!   instead of re-rendering everything after each mutation.
//!
//! No OS calls, file access or process spawning happen in this layer; those
//! live in `crate::infrastructure`.

pub mod change_events;
pub mod config_store;
pub mod helper_lifecycle;
pub mod inventory;
pub mod settings_controller;
