//! # Flowkit
//!
//! Interactive diagram editing engine for flowchart-style editors:
//! nodes and links on an infinite surface, edited with a pointer, with
//! grouped undo/redo, orthogonal link routing and minimal repaint regions.
//!
//! ## Architecture
//!
//! Flowkit is organized as a workspace with multiple crates:
//!
//! 1. **flowkit-core** - Geometry, option structures, shared errors
//! 2. **flowkit-designer** - Diagram model, spatial index, router, undo
//!    history, pointer interaction and render hand-off
//! 3. **flowkit-settings** - Configuration files and validation
//! 4. **flowkit** - Logging setup and the headless demo binary

use std::path::Path;

use anyhow::Context;
use tracing::info;

pub use flowkit_core;
pub use flowkit_designer as designer;
pub use flowkit_settings as settings;

pub use flowkit_core::{DiagramError, Error, ItemId, Point, Rect, Result};
pub use flowkit_designer::{
    ActionCode, Diagram, InteractionController, LineStyle, Modifiers, RenderSurface, Tool,
    Viewport,
};
pub use flowkit_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("installing the tracing subscriber")?;
    Ok(())
}

/// Loads the configuration from `path`, or from the platform default
/// location when `path` is `None`. A missing default file yields defaults;
/// an explicit path must exist and be valid.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => {
            let path = Config::default_path().context("locating the configuration directory")?;
            Ok(Config::load_or_default(&path))
        }
    }
}

/// Builds an empty diagram and a controller configured from `config`.
pub fn editor_from_config(
    config: &Config,
    canvas_width: f64,
    canvas_height: f64,
) -> (Diagram, InteractionController) {
    let diagram = Diagram::with_options(
        config.diagram.clone(),
        config.routing.clone(),
        config.rendering.clone(),
    );
    let viewport = Viewport::with_options(canvas_width, canvas_height, &config.interaction);
    let controller = InteractionController::new(viewport, config.interaction.clone());
    info!(
        undo_limit = config.diagram.undo_limit,
        margin = config.routing.orthogonal_margin,
        "Editor configured"
    );
    (diagram, controller)
}
