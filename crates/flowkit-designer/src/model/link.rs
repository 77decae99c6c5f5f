use std::fmt;

use lyon::math::point;
use lyon::path::Path;
use serde::{Deserialize, Serialize};

use flowkit_core::geometry::{
    database_curve, flatten_bezier, flatten_bezier_chain, hits_polyline, rounded_corners,
    spline_points,
};
use flowkit_core::{ItemId, Point, Rect};

/// How a link's points are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LineStyle {
    /// Points are the polyline vertices
    #[default]
    Polyline,
    /// `3k + 1` points: anchor, control, control, anchor, ...
    Bezier,
    /// Catmull-Rom control points
    Spline,
    /// Two end points joined by a horizontal S-curve
    Database,
    /// Axis-aligned vertices computed by the router
    Orthogonal,
}

impl LineStyle {
    /// Styles whose interior points the user may add or remove.
    pub fn allows_point_editing(self) -> bool {
        matches!(self, LineStyle::Polyline | LineStyle::Spline)
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineStyle::Polyline => "polyline",
            LineStyle::Bezier => "bezier",
            LineStyle::Spline => "spline",
            LineStyle::Database => "database",
            LineStyle::Orthogonal => "orthogonal",
        };
        f.write_str(name)
    }
}

/// Which end of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkEnd {
    Origin,
    Destination,
}

/// A connector between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub origin: ItemId,
    pub destination: ItemId,
    pub origin_pin: Option<usize>,
    pub destination_pin: Option<usize>,
    pub style: LineStyle,
    /// Never fewer than two points
    pub points: Vec<Point>,
    pub text: String,
}

impl Link {
    pub fn new(origin: ItemId, destination: ItemId, points: Vec<Point>) -> Self {
        Self {
            origin,
            destination,
            origin_pin: None,
            destination_pin: None,
            style: LineStyle::Polyline,
            points,
            text: String::new(),
        }
    }

    pub fn is_reflexive(&self) -> bool {
        self.origin == self.destination
    }

    pub fn connects(&self, node: ItemId) -> bool {
        self.origin == node || self.destination == node
    }

    pub fn end(&self, end: LinkEnd) -> (ItemId, Option<usize>) {
        match end {
            LinkEnd::Origin => (self.origin, self.origin_pin),
            LinkEnd::Destination => (self.destination, self.destination_pin),
        }
    }

    pub fn set_end(&mut self, end: LinkEnd, node: ItemId, pin: Option<usize>) {
        match end {
            LinkEnd::Origin => {
                self.origin = node;
                self.origin_pin = pin;
            }
            LinkEnd::Destination => {
                self.destination = node;
                self.destination_pin = pin;
            }
        }
    }

    pub fn first_point(&self) -> Point {
        self.points.first().copied().unwrap_or_default()
    }

    pub fn last_point(&self) -> Point {
        self.points.last().copied().unwrap_or_default()
    }

    /// The drawn curve, flattened to a polyline.
    pub fn geometry(&self) -> Vec<Point> {
        match self.style {
            LineStyle::Polyline | LineStyle::Orthogonal => self.points.clone(),
            LineStyle::Bezier => flatten_bezier_chain(&self.points),
            LineStyle::Spline => spline_points(&self.points),
            LineStyle::Database => {
                let [p0, p1, p2, p3] = database_curve(self.first_point(), self.last_point());
                flatten_bezier(p0, p1, p2, p3)
            }
        }
    }

    /// Bounds of the drawn curve together with its editable points.
    pub fn bounds(&self) -> Rect {
        let mut all = self.geometry();
        all.extend_from_slice(&self.points);
        Rect::bounding(&all).unwrap_or_default()
    }

    pub fn hit(&self, p: Point, tolerance: f64) -> bool {
        hits_polyline(p, &self.geometry(), tolerance)
    }

    /// Index of the editable point within `tolerance` of `p`.
    pub fn point_at(&self, p: Point, tolerance: f64) -> Option<usize> {
        self.points
            .iter()
            .position(|q| q.distance_to(&p) <= tolerance)
    }

    /// Stroke path for the renderer. Orthogonal corners are rounded by
    /// `corner_radius` when it is positive.
    pub fn render(&self, corner_radius: f64) -> Path {
        let mut builder = Path::builder();
        let to_lyon = |p: Point| point(p.x as f32, p.y as f32);
        let Some(&first) = self.points.first() else {
            return builder.build();
        };

        match self.style {
            LineStyle::Orthogonal if corner_radius > 0.0 => {
                builder.begin(to_lyon(first));
                for c in rounded_corners(&self.points, corner_radius) {
                    builder.line_to(to_lyon(c.start));
                    builder.quadratic_bezier_to(to_lyon(c.corner), to_lyon(c.end));
                }
                builder.line_to(to_lyon(self.last_point()));
            }
            LineStyle::Bezier => {
                builder.begin(to_lyon(first));
                let mut rest = self.points[1..].chunks_exact(3);
                for seg in rest.by_ref() {
                    builder.cubic_bezier_to(to_lyon(seg[0]), to_lyon(seg[1]), to_lyon(seg[2]));
                }
                for p in rest.remainder() {
                    builder.line_to(to_lyon(*p));
                }
            }
            LineStyle::Database => {
                let [p0, p1, p2, p3] = database_curve(first, self.last_point());
                builder.begin(to_lyon(p0));
                builder.cubic_bezier_to(to_lyon(p1), to_lyon(p2), to_lyon(p3));
            }
            _ => {
                let pts = self.geometry();
                builder.begin(to_lyon(first));
                for p in pts.iter().skip(1) {
                    builder.line_to(to_lyon(*p));
                }
            }
        }
        builder.end(false);
        builder.build()
    }
}
