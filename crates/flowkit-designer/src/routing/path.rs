//! Orthogonal path helpers: obstruction tests and point list cleanup.

use flowkit_core::{Point, Rect};

/// Coordinate tolerance of the router.
pub(crate) const ROUTE_EPS: f64 = 1e-6;

fn same(a: f64, b: f64) -> bool {
    (a - b).abs() <= ROUTE_EPS
}

/// True when the axis-aligned segment `a`-`b` passes through the strict
/// interior of `rect`. Running along an edge does not count.
pub fn segment_blocked(a: Point, b: Point, rect: &Rect) -> bool {
    let left = rect.left + ROUTE_EPS;
    let right = rect.right() - ROUTE_EPS;
    let top = rect.top + ROUTE_EPS;
    let bottom = rect.bottom() - ROUTE_EPS;
    if left >= right || top >= bottom {
        return false;
    }

    let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
    let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
    let overlaps_x = min_x.max(left) < max_x.min(right);
    let overlaps_y = min_y.max(top) < max_y.min(bottom);

    if same(a.y, b.y) {
        a.y > top && a.y < bottom && (overlaps_x || (min_x > left && min_x < right))
    } else if same(a.x, b.x) {
        a.x > left && a.x < right && (overlaps_y || (min_y > top && min_y < bottom))
    } else {
        overlaps_x && overlaps_y
    }
}

pub(crate) fn path_clear(a: Point, b: Point, obstacles: &[Rect]) -> bool {
    !obstacles.iter().any(|r| segment_blocked(a, b, r))
}

/// Straight or single-bend connection from `from` to `to`, returning the
/// points after `from`. The bend that keeps the first leg on `first_axis_x`
/// (horizontal when true) is tried first.
pub(crate) fn direct_route(
    from: Point,
    to: Point,
    obstacles: &[Rect],
    first_axis_x: bool,
) -> Option<Vec<Point>> {
    if same(from.x, to.x) || same(from.y, to.y) {
        return path_clear(from, to, obstacles).then(|| vec![to]);
    }
    let horizontal_first = Point::new(to.x, from.y);
    let vertical_first = Point::new(from.x, to.y);
    let corners = if first_axis_x {
        [horizontal_first, vertical_first]
    } else {
        [vertical_first, horizontal_first]
    };
    corners
        .into_iter()
        .find(|&c| path_clear(from, c, obstacles) && path_clear(c, to, obstacles))
        .map(|c| vec![c, to])
}

fn collinear(a: Point, b: Point, c: Point) -> bool {
    (same(a.x, b.x) && same(b.x, c.x)) || (same(a.y, b.y) && same(b.y, c.y))
}

/// Removes duplicate consecutive points and collinear interior points until
/// nothing changes.
pub fn normalize_points(points: &mut Vec<Point>) {
    loop {
        let before = points.len();
        points.dedup_by(|b, a| a.approx_eq(b, ROUTE_EPS));

        let mut i = 1;
        while i + 1 < points.len() {
            if collinear(points[i - 1], points[i], points[i + 1]) {
                points.remove(i);
            } else {
                i += 1;
            }
        }

        if points.len() == before {
            break;
        }
    }
}

/// Collapses two-bend detours `p0 p1 p2 p3` into a single bend whenever
/// the shortcut is unobstructed. Repeats until no detour can be removed.
pub fn optimize_line_points(points: &mut Vec<Point>, obstacles: &[Rect]) {
    normalize_points(points);
    let mut changed = true;
    while changed {
        changed = false;
        let mut i = 0;
        while i + 3 < points.len() {
            let (p0, p1, p3) = (points[i], points[i + 1], points[i + 3]);
            let corner = if same(p0.y, p1.y) {
                Point::new(p3.x, p0.y)
            } else {
                Point::new(p0.x, p3.y)
            };
            if path_clear(p0, corner, obstacles) && path_clear(corner, p3, obstacles) {
                points.splice(i + 1..i + 3, [corner]);
                normalize_points(points);
                changed = true;
            } else {
                i += 1;
            }
        }
    }
}
