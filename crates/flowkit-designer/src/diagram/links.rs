//! Link point layout: initial points, following moved nodes and converting
//! between line styles.

use flowkit_core::{Point, Rect};

use crate::model::{LineStyle, Link, Node};
use crate::routing::OrthogonalRouter;

/// One attached end of a link.
#[derive(Clone, Copy)]
pub(crate) struct End<'a> {
    pub node: &'a Node,
    pub pin: Option<usize>,
}

impl<'a> End<'a> {
    pub fn new(node: &'a Node, pin: Option<usize>) -> Self {
        Self { node, pin }
    }

    fn frame(&self) -> Rect {
        self.node.visual_bounds()
    }

    fn pin_position(&self) -> Option<Point> {
        self.pin.and_then(|i| self.node.pin_position(i))
    }

    fn anchor(&self, toward: Point) -> Point {
        self.node.anchor_toward(toward, self.pin)
    }
}

fn route(router: &OrthogonalRouter, origin: End<'_>, destination: End<'_>) -> Vec<Point> {
    router.route(
        &origin.frame(),
        &destination.frame(),
        origin.pin_position(),
        destination.pin_position(),
    )
}

/// Points of a freshly created (or reset) link.
///
/// Reflexive links of any style start from the router output so that they
/// leave and re-enter the node instead of collapsing onto its centre.
pub(crate) fn initial_points(
    router: &OrthogonalRouter,
    style: LineStyle,
    origin: End<'_>,
    destination: End<'_>,
    reflexive: bool,
) -> Vec<Point> {
    if style == LineStyle::Orthogonal {
        return route(router, origin, destination);
    }
    if reflexive {
        let routed = route(router, origin, destination);
        return convert_points(&routed, LineStyle::Polyline, style);
    }

    let a = origin.anchor(destination.node.center());
    let b = destination.anchor(origin.node.center());
    match style {
        LineStyle::Bezier => bezier_segment(a, b).to_vec(),
        _ => vec![a, b],
    }
}

/// Points of `link` after one of its nodes moved or changed shape.
pub(crate) fn follow(
    router: &OrthogonalRouter,
    link: &Link,
    origin: End<'_>,
    destination: End<'_>,
) -> Vec<Point> {
    let n = link.points.len();
    match link.style {
        LineStyle::Orthogonal => route(router, origin, destination),
        _ if n < 2 || (n == 2 && link.is_reflexive()) => {
            initial_points(router, link.style, origin, destination, link.is_reflexive())
        }
        LineStyle::Database => vec![
            origin.anchor(destination.node.center()),
            destination.anchor(origin.node.center()),
        ],
        _ => {
            let mut points = link.points.clone();
            let (first_toward, last_toward) = if n > 2 {
                (points[1], points[n - 2])
            } else {
                (destination.node.center(), origin.node.center())
            };
            points[0] = origin.anchor(first_toward);
            points[n - 1] = destination.anchor(last_toward);
            points
        }
    }
}

/// Reinterprets `points` drawn as `from` for drawing as `to`.
///
/// Orthogonal targets are not handled here; they always come from the
/// router.
pub(crate) fn convert_points(points: &[Point], from: LineStyle, to: LineStyle) -> Vec<Point> {
    if from == to || points.len() < 2 {
        return points.to_vec();
    }
    let vertices: Vec<Point> = if from == LineStyle::Bezier {
        bezier_anchors(points)
    } else {
        points.to_vec()
    };

    match to {
        LineStyle::Database => vec![vertices[0], vertices[vertices.len() - 1]],
        LineStyle::Bezier => {
            let mut out = Vec::with_capacity(vertices.len() * 3);
            for w in vertices.windows(2) {
                out.extend_from_slice(&bezier_segment(w[0], w[1])[..3]);
            }
            out.push(vertices[vertices.len() - 1]);
            out
        }
        _ => vertices,
    }
}

/// Anchor points of a bezier chain, always ending on the last point.
fn bezier_anchors(points: &[Point]) -> Vec<Point> {
    let mut anchors: Vec<Point> = points.iter().step_by(3).copied().collect();
    if (points.len() - 1) % 3 != 0 {
        anchors.push(points[points.len() - 1]);
    }
    anchors
}

/// Straight cubic segment with controls at one and two thirds.
fn bezier_segment(a: Point, b: Point) -> [Point; 4] {
    let dx = (b.x - a.x) / 3.0;
    let dy = (b.y - a.y) / 3.0;
    [a, a.offset(dx, dy), a.offset(2.0 * dx, 2.0 * dy), b]
}
