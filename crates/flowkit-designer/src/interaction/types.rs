use flowkit_core::{ItemId, Point, Rect};

use crate::model::LinkEnd;

/// Active pointer tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Zoom,
    Pan,
    CreateNode,
    CreateLink,
}

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ctrl: false,
        }
    }
}

/// Resize handle of a node frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    /// Centre of the handle on `rect`.
    pub fn position(self, rect: &Rect) -> Point {
        let c = rect.center();
        let (l, t, r, b) = (rect.left, rect.top, rect.right(), rect.bottom());
        match self {
            Handle::TopLeft => Point::new(l, t),
            Handle::Top => Point::new(c.x, t),
            Handle::TopRight => Point::new(r, t),
            Handle::Right => Point::new(r, c.y),
            Handle::BottomRight => Point::new(r, b),
            Handle::Bottom => Point::new(c.x, b),
            Handle::BottomLeft => Point::new(l, b),
            Handle::Left => Point::new(l, c.y),
        }
    }

    /// Handle within `tolerance` of `p`, if any.
    pub fn at(rect: &Rect, p: Point, tolerance: f64) -> Option<Handle> {
        Handle::ALL.into_iter().find(|h| {
            let q = h.position(rect);
            (q.x - p.x).abs() <= tolerance && (q.y - p.y).abs() <= tolerance
        })
    }

    /// `rect` with the edges this handle controls moved to `p`, never
    /// smaller than `min_size` on either axis.
    pub fn drag(self, rect: &Rect, p: Point, min_size: f64) -> Rect {
        let (mut l, mut t, mut r, mut b) = (rect.left, rect.top, rect.right(), rect.bottom());
        match self {
            Handle::TopLeft => (l, t) = (p.x, p.y),
            Handle::Top => t = p.y,
            Handle::TopRight => (r, t) = (p.x, p.y),
            Handle::Right => r = p.x,
            Handle::BottomRight => (r, b) = (p.x, p.y),
            Handle::Bottom => b = p.y,
            Handle::BottomLeft => (l, b) = (p.x, p.y),
            Handle::Left => l = p.x,
        }
        let mut out = Rect::from_ltrb(l, t, r, b).normalized();
        out.width = out.width.max(min_size);
        out.height = out.height.max(min_size);
        out
    }
}

/// What the current drag is doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// Dragging the selection; `last` is the previous world position
    Moving { last: Point },
    Resizing { id: ItemId, handle: Handle },
    /// Dragging an interior link point
    Stretching { link: ItemId, index: usize },
    /// Dragging a link end point toward a new node
    Relinking {
        link: ItemId,
        end: LinkEnd,
        index: usize,
    },
    /// Rubber-band selection
    Selecting { start: Point, current: Point },
    Zooming { start: Point, current: Point },
    /// Pixel position of the previous pan event
    Panning { last_x: f64, last_y: f64 },
    CreatingNode { start: Point, current: Point },
    CreatingLink { origin: ItemId, current: Point },
}
