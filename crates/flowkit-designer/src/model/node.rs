use lyon::math::point;
use lyon::path::Path;
use serde::{Deserialize, Serialize};

use flowkit_core::geometry::{
    ellipse_intersection, point_in_polygon, polygon_intersection, rotate_point, segment_distance,
};
use flowkit_core::{Point, Rect};

/// Cubic approximation constant for quarter ellipse arcs.
const KAPPA: f64 = 0.552_284_749_8;

/// Named attachment point of a node.
///
/// `x` and `y` are percentages of the node frame (0 = left/top, 100 =
/// right/bottom) so pins follow resizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Pin {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }

    /// Position of the pin inside `frame`, before rotation.
    pub fn position(&self, frame: &Rect) -> Point {
        Point::new(
            frame.left + frame.width * self.x / 100.0,
            frame.top + frame.height * self.y / 100.0,
        )
    }
}

/// Outline of a node.
///
/// Polygon and custom outlines are given in percent-of-frame coordinates,
/// like [`Pin`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum NodeShape {
    #[default]
    Rectangle,
    Ellipse,
    Polygon(Vec<Point>),
    Custom { name: String, outline: Vec<Point> },
}

impl NodeShape {
    /// A diamond touching the middle of each frame side.
    pub fn diamond() -> Self {
        NodeShape::Polygon(vec![
            Point::new(50.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(50.0, 100.0),
            Point::new(0.0, 50.0),
        ])
    }

    fn percent_outline(&self) -> Option<&[Point]> {
        match self {
            NodeShape::Polygon(pts) => Some(pts),
            NodeShape::Custom { outline, .. } => Some(outline),
            NodeShape::Rectangle | NodeShape::Ellipse => None,
        }
    }
}

/// A shape on the diagram surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unrotated frame
    pub bounds: Rect,
    pub shape: NodeShape,
    /// Degrees, clockwise, around the frame centre
    pub rotation: f64,
    pub text: String,
    /// `None` attaches links geometrically to the outline
    pub pins: Option<Vec<Pin>>,
}

impl Node {
    pub fn new(bounds: Rect, text: impl Into<String>) -> Self {
        Self {
            bounds: bounds.normalized(),
            shape: NodeShape::Rectangle,
            rotation: 0.0,
            text: text.into(),
            pins: None,
        }
    }

    pub fn with_shape(mut self, shape: NodeShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_pins(mut self, pins: Vec<Pin>) -> Self {
        self.pins = Some(pins);
        self
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    pub fn pin_count(&self) -> usize {
        self.pins.as_ref().map_or(0, Vec::len)
    }

    /// World position of pin `index`, rotation applied.
    pub fn pin_position(&self, index: usize) -> Option<Point> {
        let pin = self.pins.as_ref()?.get(index)?;
        Some(rotate_point(
            pin.position(&self.bounds),
            self.center(),
            self.rotation,
        ))
    }

    /// World-space polygon of rectangle, polygon and custom outlines.
    ///
    /// Ellipses have no polygon outline and return `None`.
    pub fn outline(&self) -> Option<Vec<Point>> {
        let center = self.center();
        let local: Vec<Point> = match &self.shape {
            NodeShape::Ellipse => return None,
            NodeShape::Rectangle => self.bounds.corners().to_vec(),
            shape => shape
                .percent_outline()
                .unwrap_or_default()
                .iter()
                .map(|p| {
                    Point::new(
                        self.bounds.left + self.bounds.width * p.x / 100.0,
                        self.bounds.top + self.bounds.height * p.y / 100.0,
                    )
                })
                .collect(),
        };
        Some(
            local
                .into_iter()
                .map(|p| rotate_point(p, center, self.rotation))
                .collect(),
        )
    }

    /// Axis-aligned bounds of the rotated outline.
    pub fn visual_bounds(&self) -> Rect {
        if self.rotation == 0.0 {
            return self.bounds;
        }
        let corners: Vec<Point> = self
            .bounds
            .corners()
            .iter()
            .map(|&p| rotate_point(p, self.center(), self.rotation))
            .collect();
        Rect::bounding(&corners).unwrap_or(self.bounds)
    }

    /// Precise hit test with `tolerance` around the outline.
    pub fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        match self.outline() {
            Some(outline) => {
                point_in_polygon(p, &outline)
                    || outline
                        .iter()
                        .zip(outline.iter().cycle().skip(1))
                        .any(|(&a, &b)| segment_distance(p, a, b) <= tolerance)
            }
            None => {
                let local = rotate_point(p, self.center(), -self.rotation);
                let a = self.bounds.width / 2.0 + tolerance;
                let b = self.bounds.height / 2.0 + tolerance;
                if a <= 0.0 || b <= 0.0 {
                    return false;
                }
                let c = self.center();
                let dx = (local.x - c.x) / a;
                let dy = (local.y - c.y) / b;
                dx * dx + dy * dy <= 1.0
            }
        }
    }

    /// Point where a link coming from `toward` attaches to this node.
    ///
    /// A valid pin wins; otherwise the outline is intersected with the line
    /// from `toward` to the centre.
    pub fn anchor_toward(&self, toward: Point, pin: Option<usize>) -> Point {
        if let Some(p) = pin.and_then(|i| self.pin_position(i)) {
            return p;
        }
        match self.outline() {
            Some(outline) => polygon_intersection(&outline, toward, self.center()),
            None => ellipse_intersection(&self.bounds, self.rotation, toward),
        }
    }

    /// Outline as a closed lyon path.
    pub fn render(&self) -> Path {
        let mut builder = Path::builder();
        let to_lyon = |p: Point| point(p.x as f32, p.y as f32);

        match self.outline() {
            Some(outline) => {
                if let Some((first, rest)) = outline.split_first() {
                    builder.begin(to_lyon(*first));
                    for p in rest {
                        builder.line_to(to_lyon(*p));
                    }
                    builder.end(true);
                }
            }
            None => {
                let c = self.center();
                let rx = self.bounds.width / 2.0;
                let ry = self.bounds.height / 2.0;
                let kx = rx * KAPPA;
                let ky = ry * KAPPA;
                let r = |x: f64, y: f64| to_lyon(rotate_point(Point::new(x, y), c, self.rotation));

                builder.begin(r(c.x + rx, c.y));
                builder.cubic_bezier_to(r(c.x + rx, c.y + ky), r(c.x + kx, c.y + ry), r(c.x, c.y + ry));
                builder.cubic_bezier_to(r(c.x - kx, c.y + ry), r(c.x - rx, c.y + ky), r(c.x - rx, c.y));
                builder.cubic_bezier_to(r(c.x - rx, c.y - ky), r(c.x - kx, c.y - ry), r(c.x, c.y - ry));
                builder.cubic_bezier_to(r(c.x + kx, c.y - ry), r(c.x + rx, c.y - ky), r(c.x + rx, c.y));
                builder.end(true);
            }
        }
        builder.build()
    }
}
