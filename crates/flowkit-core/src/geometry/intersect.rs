//! Nearest boundary intersections used to attach links to node outlines.
//!
//! Both routines cast a ray from an arbitrary point through the shape centre
//! and return the boundary crossing on the near side. Degenerate input
//! (zero-size shapes, the point sitting on the centre) falls back to the
//! centre instead of propagating NaN.

use super::{Point, Rect};
use crate::constants::{EPSILON, INTERSECTION_TOLERANCE};

/// Rotates `p` around `center` by `degrees` (clockwise on a y-down surface).
pub fn rotate_point(p: Point, center: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return p;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Intersection of the infinite lines `a1`-`a2` and `b1`-`b2`.
///
/// Returns `None` for parallel (or numerically near-parallel) lines.
pub fn line_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let d1x = a2.x - a1.x;
    let d1y = a2.y - a1.y;
    let d2x = b2.x - b1.x;
    let d2y = b2.y - b1.y;

    let det = d1x * d2y - d1y * d2x;
    if det.abs() < INTERSECTION_TOLERANCE {
        return None;
    }

    let t = ((b1.x - a1.x) * d2y - (b1.y - a1.y) * d2x) / det;
    Some(Point::new(a1.x + t * d1x, a1.y + t * d1y))
}

/// Boundary point of the ellipse inscribed in `frame` (rotated by
/// `rotation` degrees around its centre) on the ray from `from` through the
/// centre, on the side facing `from`.
pub fn ellipse_intersection(frame: &Rect, rotation: f64, from: Point) -> Point {
    let center = frame.center();
    let a = frame.width.abs() / 2.0;
    let b = frame.height.abs() / 2.0;
    if a < EPSILON || b < EPSILON {
        return center;
    }

    // Work in the ellipse's own frame, then rotate the hit back.
    let local = rotate_point(from, center, -rotation);
    let dx = local.x - center.x;
    let dy = local.y - center.y;
    if dx.abs() < EPSILON && dy.abs() < EPSILON {
        return center;
    }

    let scale = 1.0 / ((dx * dx) / (a * a) + (dy * dy) / (b * b)).sqrt();
    let hit = Point::new(center.x + dx * scale, center.y + dy * scale);
    rotate_point(hit, center, rotation)
}

/// Boundary point of `polygon` on the line from `from` through `center`,
/// closest to `from`.
///
/// Each edge is intersected as an infinite line; the hit is accepted only
/// when it lies inside the edge's bounding box widened by the intersection
/// tolerance, which keeps axis-aligned edges (zero-width boxes) usable.
pub fn polygon_intersection(polygon: &[Point], from: Point, center: Point) -> Point {
    if polygon.len() < 2 || from.approx_eq(&center, EPSILON) {
        return center;
    }

    let mut best: Option<(f64, Point)> = None;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        let Some(hit) = line_intersection(from, center, a, b) else {
            continue;
        };
        let edge_box =
            Rect::from_points(a, b).inflate(INTERSECTION_TOLERANCE, INTERSECTION_TOLERANCE);
        if !edge_box.contains_point(&hit) {
            continue;
        }
        let d = from.distance_to(&hit);
        if best.is_none_or(|(best_d, _)| d < best_d) {
            best = Some((d, hit));
        }
    }

    best.map(|(_, p)| p).unwrap_or(center)
}
