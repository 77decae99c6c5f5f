//! # Flowkit Core
//!
//! Core types and utilities for Flowkit.
//! Provides the geometry kernel used for rendering and hit-testing, the
//! option structures shared by the designer and settings crates, and the
//! error types used across the workspace.

pub mod constants;
pub mod error;
pub mod geometry;
pub mod options;
pub mod types;

pub use error::{DiagramError, Error, Result};

pub use geometry::{Point, Rect};

pub use options::{DiagramOptions, InteractionOptions, RenderOptions, RoutingOptions};

// Re-export type aliases for convenience
pub use types::{InvalidateCallback, ItemId};
