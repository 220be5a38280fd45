//! Storage infrastructure: configuration file persistence.
//!
//! - `config` – the production [`config::FileConfigStore`], reading and
//!   atomically rewriting a YAML or TOML file.
//! - `memory` – an in-memory store with failure injection for tests.

pub mod config;
pub mod memory;
