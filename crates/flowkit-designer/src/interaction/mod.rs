//! Pointer interaction: turns pixel-space pointer events into diagram edits.
//!
//! Drags run as diagram previews: every intermediate position is applied
//! without touching the undo history and the release records the net change
//! as one undo group (or cancels it).

mod types;

pub use types::{Handle, Mode, Modifiers, Tool};

use tracing::trace;

use flowkit_core::{InteractionOptions, ItemId, Point, Rect};

use crate::diagram::Diagram;
use crate::history::ActionCode;
use crate::model::LinkEnd;
use crate::selection_manager::SelectionManager;
use crate::viewport::Viewport;

/// Drags shorter than this many pixels count as clicks.
const CLICK_SLOP: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct InteractionController {
    tool: Tool,
    mode: Mode,
    viewport: Viewport,
    selection: SelectionManager,
    options: InteractionOptions,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(Viewport::default(), InteractionOptions::default())
    }
}

impl InteractionController {
    pub fn new(viewport: Viewport, options: InteractionOptions) -> Self {
        Self {
            tool: Tool::default(),
            mode: Mode::Idle,
            viewport,
            selection: SelectionManager::new(),
            options,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn options(&self) -> &InteractionOptions {
        &self.options
    }

    /// Rectangle being dragged out by the select, zoom or node tools, for
    /// the host to draw as an overlay.
    pub fn rubber_band(&self) -> Option<Rect> {
        match self.mode {
            Mode::Selecting { start, current }
            | Mode::Zooming { start, current }
            | Mode::CreatingNode { start, current } => Some(Rect::from_points(start, current)),
            _ => None,
        }
    }

    /// World-space tolerance for hitting outlines.
    fn hit_tolerance(&self) -> f64 {
        self.options.hit_tolerance / self.viewport.zoom()
    }

    /// World-space half size of a handle.
    fn handle_tolerance(&self) -> f64 {
        self.options.handle_size / 2.0 / self.viewport.zoom()
    }

    pub fn pointer_down(&mut self, diagram: &mut Diagram, px: f64, py: f64, modifiers: Modifiers) {
        if self.mode != Mode::Idle {
            self.cancel(diagram);
        }
        let p = self.viewport.pixel_to_world(px, py);
        diagram.set_hit_tolerance(self.hit_tolerance());

        self.mode = match self.tool {
            Tool::Select => self.begin_select(diagram, p, modifiers),
            Tool::Zoom => Mode::Zooming {
                start: p,
                current: p,
            },
            Tool::Pan => Mode::Panning {
                last_x: px,
                last_y: py,
            },
            Tool::CreateNode => Mode::CreatingNode {
                start: p,
                current: p,
            },
            Tool::CreateLink => match diagram.node_at(p) {
                Some(origin) => Mode::CreatingLink { origin, current: p },
                None => Mode::Idle,
            },
        };
        trace!(mode = ?self.mode, x = p.x, y = p.y, "Pointer down");
    }

    fn begin_select(&mut self, diagram: &mut Diagram, p: Point, modifiers: Modifiers) -> Mode {
        let handle_tol = self.handle_tolerance();
        self.selection.sync(diagram);

        // Handles of a single selected item win over everything under them.
        if let [id] = diagram.selected_items()[..] {
            if let Some(node) = diagram.node(id) {
                if let Some(handle) = Handle::at(&node.bounds, p, handle_tol) {
                    diagram.begin_preview();
                    return Mode::Resizing { id, handle };
                }
            }
            if let Some(link) = diagram.link(id) {
                if let Some(index) = link.point_at(p, handle_tol) {
                    let last = link.points.len() - 1;
                    let end = match index {
                        0 => Some(LinkEnd::Origin),
                        i if i == last => Some(LinkEnd::Destination),
                        _ => None,
                    };
                    let style = link.style;
                    diagram.begin_preview();
                    return match end {
                        Some(end) => Mode::Relinking {
                            link: id,
                            end,
                            index,
                        },
                        None if style.allows_point_editing() => Mode::Stretching { link: id, index },
                        None => Mode::Moving { last: p },
                    };
                }
            }
        }

        match diagram.hit_test(p) {
            Some(id) => {
                if !diagram.is_selected(id) || modifiers.shift {
                    self.selection.select_at(diagram, p, modifiers.shift);
                }
                if diagram.is_selected(id) {
                    diagram.begin_preview();
                    Mode::Moving { last: p }
                } else {
                    Mode::Idle
                }
            }
            None => {
                if !modifiers.shift {
                    self.selection.deselect_all(diagram);
                }
                Mode::Selecting {
                    start: p,
                    current: p,
                }
            }
        }
    }

    pub fn pointer_move(&mut self, diagram: &mut Diagram, px: f64, py: f64, _modifiers: Modifiers) {
        let p = self.viewport.pixel_to_world(px, py);
        match &mut self.mode {
            Mode::Idle => {}
            Mode::Moving { last } => {
                let (dx, dy) = (p.x - last.x, p.y - last.y);
                *last = p;
                diagram.move_selection(dx, dy);
            }
            Mode::Resizing { id, handle } => {
                if let Some(node) = diagram.node(*id) {
                    let bounds = handle.drag(&node.bounds, p, self.options.min_node_size);
                    diagram.set_bounds(*id, bounds);
                }
            }
            Mode::Stretching { link, index } | Mode::Relinking { link, index, .. } => {
                diagram.move_point(*link, *index, p);
            }
            Mode::Selecting { current, .. }
            | Mode::Zooming { current, .. }
            | Mode::CreatingNode { current, .. }
            | Mode::CreatingLink { current, .. } => *current = p,
            Mode::Panning { last_x, last_y } => {
                let (dx, dy) = (px - *last_x, py - *last_y);
                (*last_x, *last_y) = (px, py);
                self.viewport.pan_by(dx, dy);
            }
        }
    }

    /// Finishes the current drag. Returns the item created or relinked, if
    /// any.
    pub fn pointer_up(
        &mut self,
        diagram: &mut Diagram,
        px: f64,
        py: f64,
        modifiers: Modifiers,
    ) -> Option<ItemId> {
        self.pointer_move(diagram, px, py, modifiers);
        let p = self.viewport.pixel_to_world(px, py);
        let mode = std::mem::take(&mut self.mode);
        trace!(mode = ?mode, x = p.x, y = p.y, "Pointer up");

        match mode {
            Mode::Idle | Mode::Panning { .. } => None,
            Mode::Moving { .. } => {
                diagram.commit_preview(ActionCode::Move);
                None
            }
            Mode::Resizing { .. } => {
                diagram.commit_preview(ActionCode::Resize);
                None
            }
            Mode::Stretching { .. } => {
                diagram.commit_preview(ActionCode::Stretch);
                None
            }
            Mode::Relinking { link, end, .. } => self.finish_relink(diagram, link, end, p),
            Mode::Selecting { start, current } => {
                self.selection
                    .select_in_rect(diagram, &Rect::from_points(start, current), modifiers.shift);
                None
            }
            Mode::Zooming { start, current } => {
                let (sx, sy) = self.viewport.world_point_to_pixel(&start);
                if (px - sx).abs() < CLICK_SLOP && (py - sy).abs() < CLICK_SLOP {
                    if modifiers.shift {
                        self.viewport.zoom_out_at(&current);
                    } else {
                        self.viewport.zoom_in_at(&current);
                    }
                } else {
                    self.viewport.zoom_to_rect(&Rect::from_points(start, current));
                }
                None
            }
            Mode::CreatingNode { start, current } => {
                let mut rect = Rect::from_points(start, current);
                let min = self.options.min_node_size;
                if rect.width < min || rect.height < min {
                    let options = diagram.options();
                    rect = Rect::new(
                        start.x,
                        start.y,
                        options.default_node_width,
                        options.default_node_height,
                    );
                }
                let id = diagram.add_node(rect.left, rect.top, rect.width, rect.height, "");
                self.selection.deselect_all(diagram);
                diagram.select(id, false);
                self.selection.set_selected_id(Some(id));
                Some(id)
            }
            Mode::CreatingLink { origin, current } => {
                let destination = diagram.node_at(current)?;
                let id = diagram.add_link(origin, destination, "", None, None)?;
                self.selection.deselect_all(diagram);
                diagram.select(id, false);
                self.selection.set_selected_id(Some(id));
                Some(id)
            }
        }
    }

    /// Dropping a link end on a node reattaches it; dropping it anywhere
    /// else snaps it back.
    fn finish_relink(
        &mut self,
        diagram: &mut Diagram,
        link: ItemId,
        end: LinkEnd,
        p: Point,
    ) -> Option<ItemId> {
        let handle_tol = self.handle_tolerance();
        match diagram.node_at(p) {
            Some(node) => {
                diagram.cancel_preview();
                let pin = diagram.node(node).and_then(|n| {
                    (0..n.pin_count()).find(|&i| {
                        n.pin_position(i)
                            .is_some_and(|q| q.distance_to(&p) <= handle_tol)
                    })
                });
                let done = match end {
                    LinkEnd::Origin => diagram.set_origin(link, node, pin),
                    LinkEnd::Destination => diagram.set_destination(link, node, pin),
                };
                done.then_some(link)
            }
            None => {
                if diagram.commit_preview(ActionCode::Relink) > 0 {
                    diagram.remove_last_task();
                }
                None
            }
        }
    }

    /// Abandons the current drag, restoring anything it changed.
    pub fn cancel(&mut self, diagram: &mut Diagram) {
        diagram.cancel_preview();
        self.mode = Mode::Idle;
    }

    /// Zooms in (positive `delta`) or out around the pointer.
    pub fn wheel(&mut self, px: f64, py: f64, delta: f64) {
        let p = self.viewport.pixel_to_world(px, py);
        if delta > 0.0 {
            self.viewport.zoom_in_at(&p);
        } else if delta < 0.0 {
            self.viewport.zoom_out_at(&p);
        }
    }

    /// Fits every item into view.
    pub fn zoom_to_fit(&mut self, diagram: &Diagram) {
        self.viewport.fit_to_items(diagram.extent());
    }

    pub fn delete_selection(&mut self, diagram: &mut Diagram) -> usize {
        let removed = diagram.delete_selected();
        self.selection.set_selected_id(None);
        removed
    }
}
