//! Option structures consumed by the designer.
//!
//! These are plain data: the settings crate persists and validates them,
//! the designer reads them. Defaults match a freshly installed editor.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ORTHOGONAL_MARGIN, MAX_ZOOM, MIN_ZOOM};

/// Diagram model behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramOptions {
    /// Maximum number of undo groups kept (0 = unbounded)
    pub undo_limit: usize,
    /// Whether undo recording is enabled at all
    pub undo_enabled: bool,
    /// Use the quadtree for hit-testing (linear scan otherwise)
    pub spatial_index: bool,
    /// Allow links whose origin and destination are the same node
    pub allow_reflexive_links: bool,
    /// Allow more than one link between the same ordered pair of nodes
    pub allow_multiple_links: bool,
    /// Size of nodes created by the node tool with a simple click
    pub default_node_width: f64,
    pub default_node_height: f64,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            undo_limit: 100,
            undo_enabled: true,
            spatial_index: true,
            allow_reflexive_links: true,
            allow_multiple_links: true,
            default_node_width: 100.0,
            default_node_height: 60.0,
        }
    }
}

/// Link routing behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingOptions {
    /// Stand-off distance kept between orthogonal links and node outlines
    pub orthogonal_margin: f64,
    /// Corner radius used when drawing orthogonal links (0 = sharp)
    pub corner_radius: f64,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            orthogonal_margin: DEFAULT_ORTHOGONAL_MARGIN,
            corner_radius: 0.0,
        }
    }
}

/// Pointer interaction behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionOptions {
    /// Side length of selection/resize handles, in world units
    pub handle_size: f64,
    /// Distance within which a pointer hits a link
    pub hit_tolerance: f64,
    /// Nodes cannot be resized below this width/height
    pub min_node_size: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplicative zoom step
    pub zoom_step: f64,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            handle_size: 8.0,
            hit_tolerance: 4.0,
            min_node_size: 10.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: 1.2,
        }
    }
}

/// Values used when computing invalidated regions and draw calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub stroke_width: f64,
    /// Extra margin around selected items covering their handles
    pub selection_margin: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            selection_margin: 6.0,
        }
    }
}
