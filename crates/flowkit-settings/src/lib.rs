//! Flowkit Settings Crate
//!
//! Handles editor configuration: the option sections consumed by the
//! designer, their validation, and persistence to JSON or TOML files.

pub mod config;
pub mod error;

pub use config::{Config, CONFIG_FILE_NAME};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
