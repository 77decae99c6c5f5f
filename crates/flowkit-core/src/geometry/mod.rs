//! Geometry kernel.
//!
//! Rectangle/point primitives plus the distance, intersection and curve
//! sampling routines that back both rendering and pointer interaction.
//! Everything here is a pure function over [`Point`]s and [`Rect`]s.
//!
//! Coordinates use a top-left origin: x grows to the right, y grows downward.

mod curves;
mod distance;
mod intersect;
mod point;
mod rect;

pub use curves::{
    cubic_bezier_point, database_curve, flatten_bezier, flatten_bezier_chain, rounded_corners,
    spline_points, RoundedCorner,
};
pub use distance::{hits_polyline, point_in_polygon, polyline_distance, segment_distance};
pub use intersect::{
    ellipse_intersection, line_intersection, polygon_intersection, rotate_point,
};
pub use point::Point;
pub use rect::Rect;
