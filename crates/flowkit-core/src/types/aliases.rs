//! Type aliases for commonly used types.
//!
//! Items reference each other (link → node, item → quadrant) by plain
//! identifiers into tables owned by the diagram, never by pointer. The
//! aliases here give those identifiers and the renderer hand-off callback
//! a name.

use crate::geometry::Rect;

/// Identifier of a diagram item (node or link).
///
/// Identifiers are allocated monotonically by the owning diagram and never
/// reused within its lifetime, so a stale id simply fails to resolve.
pub type ItemId = u64;

/// Callback receiving invalidated regions.
///
/// `None` means "the whole visible area".
///
/// # Example
/// ```rust,ignore
/// let cb: InvalidateCallback = Box::new(|region| renderer.invalidate(region));
/// ```
pub type InvalidateCallback = Box<dyn FnMut(Option<Rect>)>;
