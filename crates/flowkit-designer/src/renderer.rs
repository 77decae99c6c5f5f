//! Render hand-off.
//!
//! The engine does not rasterize anything. It walks the items intersecting
//! an invalidated region in z-order and emits draw calls with lyon paths to
//! a [`RenderSurface`] supplied by the host.

use lyon::math::point;
use lyon::path::Path;

/// Path type handed to [`RenderSurface::draw_path`].
pub use lyon::path::Path as RenderPath;

use flowkit_core::{ItemId, Point, Rect};

use crate::diagram::Diagram;
use crate::interaction::Handle;
use crate::model::ItemKind;

/// What a path represents, so the surface can pick a paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    NodeOutline,
    Link,
    SelectionHandle,
}

/// Drawing backend.
pub trait RenderSurface {
    fn draw_path(&mut self, id: ItemId, path: &Path, role: PathRole);

    /// Text centred on `anchor`. Empty texts are never passed.
    fn draw_text(&mut self, id: ItemId, anchor: Point, text: &str);
}

/// Emits draw calls for every item intersecting `region`, back to front.
/// Selection handles are drawn last so they stay on top.
///
/// Returns the number of items drawn.
pub fn render_region(diagram: &Diagram, region: &Rect, surface: &mut dyn RenderSurface) -> usize {
    let corner_radius = diagram.routing_options().corner_radius;
    let handle_half = diagram.render_options().selection_margin / 2.0;
    let mut selected = Vec::new();
    let ids = diagram.items_in(region);

    for &id in &ids {
        let Some(item) = diagram.item(id) else {
            continue;
        };
        match &item.kind {
            ItemKind::Node(node) => {
                surface.draw_path(id, &node.render(), PathRole::NodeOutline);
                if !node.text.is_empty() {
                    surface.draw_text(id, node.center(), &node.text);
                }
            }
            ItemKind::Link(link) => {
                surface.draw_path(id, &link.render(corner_radius), PathRole::Link);
                if !link.text.is_empty() {
                    let geometry = link.geometry();
                    if let Some(anchor) = geometry.get(geometry.len() / 2) {
                        surface.draw_text(id, *anchor, &link.text);
                    }
                }
            }
        }
        if item.selected {
            selected.push(id);
        }
    }

    for id in selected {
        let Some(item) = diagram.item(id) else {
            continue;
        };
        let centres: Vec<Point> = match &item.kind {
            ItemKind::Node(node) => Handle::ALL.iter().map(|h| h.position(&node.bounds)).collect(),
            ItemKind::Link(link) => link.points.clone(),
        };
        surface.draw_path(id, &handles_path(&centres, handle_half), PathRole::SelectionHandle);
    }

    ids.len()
}

/// Renders the whole diagram.
pub fn render_all(diagram: &Diagram, surface: &mut dyn RenderSurface) -> usize {
    match diagram.extent() {
        Some(extent) => render_region(diagram, &extent, surface),
        None => 0,
    }
}

fn handles_path(centres: &[Point], half: f64) -> Path {
    let mut builder = Path::builder();
    for c in centres {
        let (l, t) = ((c.x - half) as f32, (c.y - half) as f32);
        let (r, b) = ((c.x + half) as f32, (c.y + half) as f32);
        builder.begin(point(l, t));
        builder.line_to(point(r, t));
        builder.line_to(point(r, b));
        builder.line_to(point(l, b));
        builder.end(true);
    }
    builder.build()
}
