//! Numeric constants shared across the workspace.

/// Tolerance used for floating point comparisons of coordinates.
pub const EPSILON: f64 = 1e-9;

/// Tolerance for parallel/axis-aligned cases in line intersection tests.
pub const INTERSECTION_TOLERANCE: f64 = 1e-4;

/// Number of evenly spaced samples taken along a cubic bezier segment
/// (the end point is appended after them).
pub const BEZIER_SAMPLES: usize = 11;

/// Number of samples generated per spline segment.
pub const SPLINE_SAMPLES: usize = 10;

/// Cardinal spline tension (0.5 gives Catmull-Rom).
pub const SPLINE_TENSION: f64 = 0.5;

/// Minimum horizontal control offset of a database S-curve.
pub const DATABASE_CURVE_MIN_OFFSET: f64 = 20.0;

/// Default stand-off distance used by the orthogonal router.
pub const DEFAULT_ORTHOGONAL_MARGIN: f64 = 20.0;

/// Per-edge padding (as a fraction of the viewport) used when fitting content.
pub const VIEW_PADDING: f64 = 0.05;

/// Zoom limits of the viewport.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 50.0;
