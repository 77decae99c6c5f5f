use serde::{Deserialize, Serialize};

use super::Point;

/// An axis-aligned rectangle (top-left origin).
///
/// Valid items have non-negative width and height; negative extents appear
/// transiently while a drag crosses over its anchor and are fixed up with
/// [`Rect::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Creates a rectangle from its left/top/right/bottom edges.
    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Smallest rectangle containing both points.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::from_ltrb(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Bounding rectangle of a point list, `None` when empty.
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut r = Self::new(first.x, first.y, 0.0, 0.0);
        for p in &points[1..] {
            r = r.union(&Self::new(p.x, p.y, 0.0, 0.0));
        }
        Some(r)
    }

    /// Union of a sequence of rectangles, `None` when the sequence is empty.
    pub fn union_all<I: IntoIterator<Item = Rect>>(rects: I) -> Option<Self> {
        rects.into_iter().reduce(|acc, r| acc.union(&r))
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// True when the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Returns an equivalent rectangle with non-negative width and height.
    pub fn normalized(&self) -> Self {
        let (left, width) = if self.width < 0.0 {
            (self.left + self.width, -self.width)
        } else {
            (self.left, self.width)
        };
        let (top, height) = if self.height < 0.0 {
            (self.top + self.height, -self.height)
        } else {
            (self.top, self.height)
        };
        Self::new(left, top, width, height)
    }

    /// Point containment, edges inclusive.
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// True when `other` lies entirely within this rectangle (edges inclusive).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right() <= self.right()
            && other.top >= self.top
            && other.bottom() <= self.bottom()
    }

    /// Overlap test, edges inclusive so zero-size rectangles still intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right()
            && other.left <= self.right()
            && self.top <= other.bottom()
            && other.top <= self.bottom()
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        Some(Rect::from_ltrb(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        ))
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_ltrb(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Grows the rectangle by `dx` on the left and right and `dy` on the top and bottom.
    pub fn inflate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.left - dx,
            self.top - dy,
            self.width + 2.0 * dx,
            self.height + 2.0 * dy,
        )
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right(), self.top),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left, self.bottom()),
        ]
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Rect, eps: f64) -> bool {
        (self.left - other.left).abs() <= eps
            && (self.top - other.top).abs() <= eps
            && (self.width - other.width).abs() <= eps
            && (self.height - other.height).abs() <= eps
    }
}
