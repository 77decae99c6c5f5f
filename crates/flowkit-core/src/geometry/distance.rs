//! Point-to-segment and point-to-polyline distances.

use super::Point;
use crate::constants::EPSILON;

/// Distance from `p` to the segment `a`-`b`.
///
/// Returns the perpendicular distance when the projection of `p` falls within
/// the segment, otherwise the distance to the nearest endpoint.
pub fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < EPSILON {
        return p.distance_to(&a);
    }

    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq;
    if (0.0..=1.0).contains(&t) {
        ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() / len_sq.sqrt()
    } else {
        p.distance_to(&a).min(p.distance_to(&b))
    }
}

/// Minimum distance from `p` to a polyline, used for link hit-testing.
///
/// Segments whose bounding box, grown by `half_width`, does not contain `p`
/// are skipped: they cannot be within `half_width` of the point. Because of
/// that short-circuit a result greater than `half_width` is only meaningful
/// as "miss" and may be `f64::INFINITY`.
pub fn polyline_distance(p: Point, points: &[Point], half_width: f64) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => p.distance_to(only),
        _ => points
            .windows(2)
            .filter(|seg| {
                let (a, b) = (seg[0], seg[1]);
                p.x >= a.x.min(b.x) - half_width
                    && p.x <= a.x.max(b.x) + half_width
                    && p.y >= a.y.min(b.y) - half_width
                    && p.y <= a.y.max(b.y) + half_width
            })
            .map(|seg| segment_distance(p, seg[0], seg[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// True when `p` lies within `half_width` of the polyline.
pub fn hits_polyline(p: Point, points: &[Point], half_width: f64) -> bool {
    polyline_distance(p, points, half_width) <= half_width
}

/// Even-odd point-in-polygon test.
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pj.x + (p.y - pj.y) / (pi.y - pj.y) * (pi.x - pj.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
