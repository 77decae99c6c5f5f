//! Orthogonal link routing.
//!
//! Computes Manhattan paths between two rectangles that keep `margin` away
//! from both of them. The search is best effort:
//!
//! 1. straight, facing-sides Z or single L connection between the stand-off
//!    points;
//! 2. greedy walk over the corners of the inflated rectangles;
//! 3. the opposite-corner chain along both inflated outlines when the walk
//!    strands.
//!
//! The result always starts and ends on the attachment points, is
//! axis-aligned and has at least two points. A straight two-point result is
//! widened to four points, but a route may still come back as a single L of
//! three points, e.g. between pins on perpendicular sides.

mod chain;
mod path;

pub use path::{normalize_points, optimize_line_points, segment_blocked};

use smallvec::SmallVec;
use tracing::{debug, trace};

use flowkit_core::constants::EPSILON;
use flowkit_core::{Point, Rect};

use chain::corner_chain;
use path::{direct_route, path_clear, ROUTE_EPS};

/// Side of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    /// True for sides whose outward normal is horizontal.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    /// Midpoint of this side of `rect`.
    pub fn midpoint(self, rect: &Rect) -> Point {
        let c = rect.center();
        match self {
            Side::Left => Point::new(rect.left, c.y),
            Side::Right => Point::new(rect.right(), c.y),
            Side::Top => Point::new(c.x, rect.top),
            Side::Bottom => Point::new(c.x, rect.bottom()),
        }
    }

    /// Projection of `p` onto this side's line of `rect`.
    pub fn project(self, rect: &Rect, p: Point) -> Point {
        match self {
            Side::Left => Point::new(rect.left, p.y),
            Side::Right => Point::new(rect.right(), p.y),
            Side::Top => Point::new(p.x, rect.top),
            Side::Bottom => Point::new(p.x, rect.bottom()),
        }
    }

    /// Side of `rect` closest to `p`.
    pub fn nearest(rect: &Rect, p: Point) -> Side {
        let candidates = [
            (Side::Left, (p.x - rect.left).abs()),
            (Side::Top, (p.y - rect.top).abs()),
            (Side::Right, (p.x - rect.right()).abs()),
            (Side::Bottom, (p.y - rect.bottom()).abs()),
        ];
        candidates
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(Side::Right, |(side, _)| side)
    }

    /// Side of `from` facing `toward` by dominant axis.
    pub fn facing(from: &Rect, toward: &Rect) -> Side {
        let a = from.center();
        let b = toward.center();
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if dx.abs() >= dy.abs() {
            if dx >= 0.0 {
                Side::Right
            } else {
                Side::Left
            }
        } else if dy >= 0.0 {
            Side::Bottom
        } else {
            Side::Top
        }
    }
}

/// One end of a route: the node frame and an optional fixed attachment point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEndpoint {
    pub frame: Rect,
    pub pin: Option<Point>,
}

impl RouteEndpoint {
    pub fn new(frame: Rect, pin: Option<Point>) -> Self {
        Self { frame, pin }
    }
}

/// Resolved attachment of one route end.
#[derive(Debug, Clone, Copy)]
struct Attachment {
    point: Point,
    side: Side,
    stand_off: Point,
}

/// Computes orthogonal link paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthogonalRouter {
    margin: f64,
}

impl Default for OrthogonalRouter {
    fn default() -> Self {
        Self::new(flowkit_core::constants::DEFAULT_ORTHOGONAL_MARGIN)
    }
}

impl OrthogonalRouter {
    pub fn new(margin: f64) -> Self {
        Self {
            margin: margin.max(0.0),
        }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Routes between two frames with optional pin positions.
    pub fn route(
        &self,
        origin: &Rect,
        destination: &Rect,
        origin_pin: Option<Point>,
        destination_pin: Option<Point>,
    ) -> Vec<Point> {
        self.route_endpoints(
            &RouteEndpoint::new(*origin, origin_pin),
            &RouteEndpoint::new(*destination, destination_pin),
        )
    }

    pub fn route_endpoints(&self, from: &RouteEndpoint, to: &RouteEndpoint) -> Vec<Point> {
        let from_frame = from.frame.normalized();
        let to_frame = to.frame.normalized();
        let reflexive = from_frame.approx_eq(&to_frame, EPSILON);

        let (from_side, to_side) = if reflexive && from.pin.is_none() && to.pin.is_none() {
            (Side::Top, Side::Right)
        } else {
            (
                Side::facing(&from_frame, &to_frame),
                Side::facing(&to_frame, &from_frame),
            )
        };

        let start = self.attach(&from_frame, from.pin, from_side);
        let end = self.attach(&to_frame, to.pin, to_side);

        let mut obstacles: SmallVec<[Rect; 2]> = SmallVec::new();
        obstacles.push(from_frame.inflate(self.margin, self.margin));
        if !reflexive {
            obstacles.push(to_frame.inflate(self.margin, self.margin));
        }

        let mut middle = self.connect(&start, &end, &obstacles);
        optimize_line_points(&mut middle, &obstacles);

        let mut points = Vec::with_capacity(middle.len() + 2);
        points.push(start.point);
        points.extend(middle);
        points.push(end.point);
        normalize_points(&mut points);

        if points.len() < 2 {
            points = vec![start.point, end.point];
        }
        if points.len() == 2 {
            points = expand_straight(points[0], points[1]);
        }
        trace!(points = points.len(), "Routed orthogonal link");
        points
    }

    fn attach(&self, frame: &Rect, pin: Option<Point>, facing: Side) -> Attachment {
        let (point, side) = match pin {
            Some(p) => (p, Side::nearest(frame, p)),
            None => (facing.midpoint(frame), facing),
        };
        let inflated = frame.inflate(self.margin, self.margin);
        Attachment {
            point,
            side,
            stand_off: side.project(&inflated, point),
        }
    }

    /// Path between the two stand-off points, both included.
    fn connect(&self, start: &Attachment, end: &Attachment, obstacles: &[Rect]) -> Vec<Point> {
        let s = start.stand_off;
        let t = end.stand_off;
        let mut path = vec![s];

        if let Some(rest) = self.simple_connection(start, end, obstacles) {
            path.extend(rest);
            return path;
        }

        if let Some(rest) = self.corner_walk(s, t, start.side.is_horizontal(), obstacles) {
            debug!("Orthogonal route found by corner walk");
            path.extend(rest);
            return path;
        }

        debug!("Corner walk stranded, following the opposite-corner chain");
        path.extend(corner_chain(s, t, obstacles));
        path
    }

    /// Straight, facing Z or single L connection (points after `s`).
    fn simple_connection(
        &self,
        start: &Attachment,
        end: &Attachment,
        obstacles: &[Rect],
    ) -> Option<Vec<Point>> {
        let s = start.stand_off;
        let t = end.stand_off;

        if start.side == end.side.opposite() {
            let facing = match start.side {
                Side::Right => s.x <= t.x,
                Side::Left => s.x >= t.x,
                Side::Bottom => s.y <= t.y,
                Side::Top => s.y >= t.y,
            };
            if facing {
                let z = if start.side.is_horizontal() {
                    let mx = (s.x + t.x) / 2.0;
                    [Point::new(mx, s.y), Point::new(mx, t.y), t]
                } else {
                    let my = (s.y + t.y) / 2.0;
                    [Point::new(s.x, my), Point::new(t.x, my), t]
                };
                let mut prev = s;
                let clear = z.iter().all(|&p| {
                    let ok = path_clear(prev, p, obstacles);
                    prev = p;
                    ok
                });
                if clear {
                    return Some(z.to_vec());
                }
            }
        }

        direct_route(s, t, obstacles, start.side.is_horizontal())
    }

    /// Greedy walk over the inflated corners (points after `s`).
    fn corner_walk(
        &self,
        s: Point,
        t: Point,
        horizontal_first: bool,
        obstacles: &[Rect],
    ) -> Option<Vec<Point>> {
        let corners: SmallVec<[Point; 8]> =
            obstacles.iter().flat_map(|r| r.corners()).collect();
        let mut visited: SmallVec<[bool; 8]> = SmallVec::from_elem(false, corners.len());
        let mut current = s;
        let mut path = Vec::new();

        for _ in 0..corners.len() + 1 {
            if let Some(rest) = direct_route(current, t, obstacles, horizontal_first) {
                path.extend(rest);
                return Some(path);
            }

            let next = corners
                .iter()
                .enumerate()
                .filter(|(i, c)| !visited[*i] && !c.approx_eq(&current, ROUTE_EPS))
                .filter_map(|(i, &c)| {
                    direct_route(current, c, obstacles, horizontal_first).map(|legs| (i, c, legs))
                })
                .min_by(|a, b| {
                    a.1.manhattan_distance(&t)
                        .total_cmp(&b.1.manhattan_distance(&t))
                });

            let (i, corner, legs) = next?;
            visited[i] = true;
            path.extend(legs);
            current = corner;
        }
        None
    }
}

/// Expands a straight two-point route into four points with the two
/// interior points on the mid coordinate.
fn expand_straight(a: Point, b: Point) -> Vec<Point> {
    if (a.x - b.x).abs() >= (a.y - b.y).abs() {
        let mx = (a.x + b.x) / 2.0;
        vec![a, Point::new(mx, a.y), Point::new(mx, b.y), b]
    } else {
        let my = (a.y + b.y) / 2.0;
        vec![a, Point::new(a.x, my), Point::new(b.x, my), b]
    }
}
