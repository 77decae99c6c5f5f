//! Opposite-corner chain used when the greedy corner walk strands.
//!
//! The chain runs along the origin's inflated outline to one of its corners,
//! bridges to a corner of the destination's inflated outline and follows
//! that outline to the end point. Outlines never cross their own rectangle,
//! so for disjoint obstacles the chain is always legal. It is not the
//! shortest route.

use flowkit_core::{Point, Rect};

use super::path::{direct_route, ROUTE_EPS};

/// Position of `p` along the clockwise outline of `rect`, measured from the
/// top-left corner.
fn perimeter_position(rect: &Rect, p: Point) -> f64 {
    let x = p.x.clamp(rect.left, rect.right());
    let y = p.y.clamp(rect.top, rect.bottom());
    let (w, h) = (rect.width, rect.height);

    let top = (y - rect.top).abs();
    let right = (x - rect.right()).abs();
    let bottom = (y - rect.bottom()).abs();
    let left = (x - rect.left).abs();
    let nearest = top.min(right).min(bottom).min(left);

    if nearest == top {
        x - rect.left
    } else if nearest == right {
        w + (y - rect.top)
    } else if nearest == bottom {
        w + h + (rect.right() - x)
    } else {
        2.0 * w + h + (rect.bottom() - y)
    }
}

/// Walks the outline of `rect` from `from` to `to` the shorter way round.
/// Returns the points after `from` (passed corners, then `to`) and the walked
/// length.
pub(crate) fn perimeter_walk(rect: &Rect, from: Point, to: Point) -> (Vec<Point>, f64) {
    let total = 2.0 * (rect.width + rect.height);
    if total <= ROUTE_EPS {
        return (vec![to], from.manhattan_distance(&to));
    }

    let a = perimeter_position(rect, from);
    let b = perimeter_position(rect, to);
    let clockwise = (b - a).rem_euclid(total);
    let counter = total - clockwise;
    let forward = clockwise <= counter;
    let span = clockwise.min(counter);

    let (w, h) = (rect.width, rect.height);
    let positions = [0.0, w, w + h, 2.0 * w + h];
    let mut passed: Vec<(f64, Point)> = positions
        .into_iter()
        .zip(rect.corners())
        .filter_map(|(pos, corner)| {
            let offset = if forward {
                (pos - a).rem_euclid(total)
            } else {
                (a - pos).rem_euclid(total)
            };
            (offset > ROUTE_EPS && offset < span - ROUTE_EPS).then_some((offset, corner))
        })
        .collect();
    passed.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut points: Vec<Point> = passed.into_iter().map(|(_, c)| c).collect();
    points.push(to);
    (points, span)
}

/// Chain from `s` on the first obstacle's outline to `t` on the last one's,
/// returning the points after `s`. Prefers corner pairs whose bridge is
/// unobstructed, then the shortest total length.
pub(crate) fn corner_chain(s: Point, t: Point, obstacles: &[Rect]) -> Vec<Point> {
    let (Some(origin), Some(destination)) = (obstacles.first(), obstacles.last()) else {
        return vec![Point::new(t.x, s.y), t];
    };

    let mut best: Option<(bool, f64, Vec<Point>)> = None;
    for from_corner in origin.corners() {
        let (lead, lead_len) = perimeter_walk(origin, s, from_corner);
        for to_corner in destination.corners() {
            let (tail, tail_len) = perimeter_walk(destination, to_corner, t);
            let bridge = direct_route(from_corner, to_corner, obstacles, true);
            let clear = bridge.is_some();
            let cost = lead_len + from_corner.manhattan_distance(&to_corner) + tail_len;

            let better = match &best {
                None => true,
                Some((best_clear, best_cost, _)) => {
                    (clear && !best_clear) || (clear == *best_clear && cost < *best_cost)
                }
            };
            if better {
                let mut chain = lead.clone();
                chain.extend(bridge.unwrap_or_else(|| {
                    vec![Point::new(to_corner.x, from_corner.y), to_corner]
                }));
                chain.extend(tail);
                best = Some((clear, cost, chain));
            }
        }
    }
    best.map_or_else(|| vec![t], |(_, _, chain)| chain)
}
