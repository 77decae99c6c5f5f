//! Error types for the settings crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while locating, reading or writing a configuration file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The platform reports no configuration directory.
    #[error("no configuration directory on this platform")]
    NoConfigDir,

    #[error("malformed JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed TOML configuration: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("cannot encode configuration as TOML: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// A configuration that parsed but cannot be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Only `.json` and `.toml` files are understood.
    #[error("unsupported configuration format '{0}'")]
    UnsupportedFormat(String),

    #[error("'{key}' is out of range: {value}")]
    ValueOutOfRange { key: String, value: String },

    /// Two related values contradict each other.
    #[error("inconsistent configuration: {0}")]
    Inconsistent(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

pub type ConfigResult<T> = Result<T, ConfigError>;
