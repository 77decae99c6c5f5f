//! Curve sampling for the bezier, spline and database line styles, plus the
//! corner geometry of rounded polylines.

use lyon::geom::{point, CubicBezierSegment};

use super::Point;
use crate::constants::{
    BEZIER_SAMPLES, DATABASE_CURVE_MIN_OFFSET, SPLINE_SAMPLES, SPLINE_TENSION,
};

/// Evaluates the cubic bezier `p0, p1, p2, p3` at `t` in `[0, 1]`.
pub fn cubic_bezier_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let segment = CubicBezierSegment {
        from: point(p0.x, p0.y),
        ctrl1: point(p1.x, p1.y),
        ctrl2: point(p2.x, p2.y),
        to: point(p3.x, p3.y),
    };
    let s = segment.sample(t);
    Point::new(s.x, s.y)
}

/// Flattens a cubic bezier into `BEZIER_SAMPLES` evenly spaced samples
/// followed by the end point.
pub fn flatten_bezier(p0: Point, p1: Point, p2: Point, p3: Point) -> Vec<Point> {
    let mut out = Vec::with_capacity(BEZIER_SAMPLES + 1);
    for i in 0..BEZIER_SAMPLES {
        let t = i as f64 / BEZIER_SAMPLES as f64;
        out.push(cubic_bezier_point(p0, p1, p2, p3, t));
    }
    out.push(p3);
    out
}

/// Flattens a chain of cubic segments stored as `anchor, ctrl, ctrl, anchor, ...`.
///
/// Points left over when the list is not `3k + 1` long are appended as
/// straight segments.
pub fn flatten_bezier_chain(points: &[Point]) -> Vec<Point> {
    if points.len() < 4 {
        return points.to_vec();
    }

    let mut out = Vec::new();
    let mut i = 0;
    while i + 3 < points.len() {
        let samples = flatten_bezier(points[i], points[i + 1], points[i + 2], points[i + 3]);
        let skip = usize::from(!out.is_empty());
        out.extend(samples.into_iter().skip(skip));
        i += 3;
    }
    out.extend_from_slice(&points[i + 1..]);
    out
}

/// Cardinal (Catmull-Rom) spline through `points`.
///
/// Generates `SPLINE_SAMPLES` points per segment and finishes with the last
/// control point. Lists shorter than three points are returned unchanged.
pub fn spline_points(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity((n - 1) * SPLINE_SAMPLES + 1);
    for i in 0..n - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];

        let m1 = Point::new((p2.x - p0.x) * SPLINE_TENSION, (p2.y - p0.y) * SPLINE_TENSION);
        let m2 = Point::new((p3.x - p1.x) * SPLINE_TENSION, (p3.y - p1.y) * SPLINE_TENSION);

        for s in 0..SPLINE_SAMPLES {
            let t = s as f64 / SPLINE_SAMPLES as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + t;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;
            out.push(Point::new(
                h00 * p1.x + h10 * m1.x + h01 * p2.x + h11 * m2.x,
                h00 * p1.y + h10 * m1.y + h01 * p2.y + h11 * m2.y,
            ));
        }
    }
    out.push(points[n - 1]);
    out
}

/// Control polygon of the fixed S-curve used by database links.
///
/// The curve leaves `from` and enters `to` horizontally.
pub fn database_curve(from: Point, to: Point) -> [Point; 4] {
    let dx = to.x - from.x;
    let offset = (dx.abs() / 2.0).max(DATABASE_CURVE_MIN_OFFSET);
    let sign = if dx >= 0.0 { 1.0 } else { -1.0 };
    [
        from,
        Point::new(from.x + offset * sign, from.y),
        Point::new(to.x - offset * sign, to.y),
        to,
    ]
}

/// Geometry of one rounded polyline corner.
///
/// The renderer draws a straight line to `start`, then a quadratic curve
/// controlled by `corner` ending at `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedCorner {
    pub start: Point,
    pub corner: Point,
    pub end: Point,
}

/// Computes the rounded corners of a polyline.
///
/// The radius is clamped to half of each adjacent segment so neighbouring
/// corners never overlap. Zero-length segments produce no corner.
pub fn rounded_corners(points: &[Point], radius: f64) -> Vec<RoundedCorner> {
    if points.len() < 3 || radius <= 0.0 {
        return Vec::new();
    }

    let mut corners = Vec::with_capacity(points.len() - 2);
    for w in points.windows(3) {
        let (prev, corner, next) = (w[0], w[1], w[2]);
        let len_in = prev.distance_to(&corner);
        let len_out = corner.distance_to(&next);
        if len_in <= 0.0 || len_out <= 0.0 {
            continue;
        }
        let r = radius.min(len_in / 2.0).min(len_out / 2.0);
        corners.push(RoundedCorner {
            start: Point::new(
                corner.x + (prev.x - corner.x) * r / len_in,
                corner.y + (prev.y - corner.y) * r / len_in,
            ),
            corner,
            end: Point::new(
                corner.x + (next.x - corner.x) * r / len_out,
                corner.y + (next.y - corner.y) * r / len_out,
            ),
        });
    }
    corners
}
