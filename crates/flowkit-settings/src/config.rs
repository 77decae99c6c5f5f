//! Configuration and settings management for Flowkit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Diagram behaviour (undo history, spatial index, link policy)
//! - Routing (orthogonal margin, corner radius)
//! - Interaction (handles, hit tolerance, zoom)
//! - Rendering (stroke width, selection margin)

use std::path::{Path, PathBuf};

use flowkit_core::{DiagramOptions, InteractionOptions, RenderOptions, RoutingOptions};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// File name used inside the platform configuration directory.
pub const CONFIG_FILE_NAME: &str = "flowkit.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Complete editor configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Diagram model behaviour
    pub diagram: DiagramOptions,
    /// Link routing
    pub routing: RoutingOptions,
    /// Pointer interaction
    pub interaction: InteractionOptions,
    /// Rendering hand-off
    pub rendering: RenderOptions,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform default location of the configuration file.
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("flowkit").join(CONFIG_FILE_NAME))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Load config from file (JSON or TOML, chosen by extension)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|source| SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load config from `path`, falling back to defaults when the file is
    /// missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring invalid configuration");
                Self::default()
            }
        }
    }

    /// Save config to file (JSON or TOML, chosen by extension)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = Format::from_path(path)?;

        let content = match format {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content)
            .map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Validate all sections
    pub fn validate(&self) -> ConfigResult<()> {
        let d = &self.diagram;
        positive("diagram.default_node_width", d.default_node_width)?;
        positive("diagram.default_node_height", d.default_node_height)?;

        non_negative("routing.orthogonal_margin", self.routing.orthogonal_margin)?;
        non_negative("routing.corner_radius", self.routing.corner_radius)?;

        let i = &self.interaction;
        positive("interaction.handle_size", i.handle_size)?;
        non_negative("interaction.hit_tolerance", i.hit_tolerance)?;
        positive("interaction.min_node_size", i.min_node_size)?;
        positive("interaction.min_zoom", i.min_zoom)?;
        positive("interaction.max_zoom", i.max_zoom)?;
        if i.min_zoom >= i.max_zoom {
            return Err(ConfigError::Inconsistent(format!(
                "min_zoom ({}) must be below max_zoom ({})",
                i.min_zoom, i.max_zoom
            )));
        }
        if i.zoom_step.is_nan() || i.zoom_step <= 1.0 {
            return Err(out_of_range("interaction.zoom_step", i.zoom_step));
        }

        non_negative("rendering.stroke_width", self.rendering.stroke_width)?;
        non_negative("rendering.selection_margin", self.rendering.selection_margin)?;

        Ok(())
    }
}

fn out_of_range(key: &str, value: f64) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn positive(key: &str, value: f64) -> ConfigResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}

fn non_negative(key: &str, value: f64) -> ConfigResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}
