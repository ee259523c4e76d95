//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the monitor's TOML configuration from the
//! platform-appropriate directory, writes it back, and falls back to
//! defaults when the file does not exist yet.

pub mod config;
