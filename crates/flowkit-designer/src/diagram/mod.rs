//! The diagram: items, selection, undo history and invalidation reporting.

mod links;
mod model;
mod operations;
mod preview;

pub use model::{DiagramModel, Invalidation};

use tracing::debug;

use flowkit_core::{
    DiagramError, DiagramOptions, InvalidateCallback, ItemId, Point, Rect, RenderOptions,
    RoutingOptions,
};

use crate::commands::DiagramCommand;
use crate::history::{ActionCode, Command, TaskManager};
use crate::model::{Item, LineStyle, Link, Node};
use crate::routing::OrthogonalRouter;
use crate::spatial_index::SpatialIndexStats;

pub(crate) type OpResult<T> = Result<T, DiagramError>;

/// An editable diagram.
///
/// Every mutator records its inverse in the undo history, keeps the spatial
/// index current and reports the repainted area to the invalidation
/// callback. Operations that are not allowed (missing items, link policy,
/// point edits the line style forbids) are declined: they return `None` or
/// `false` and leave the diagram untouched.
pub struct Diagram {
    pub(crate) model: DiagramModel,
    pub(crate) history: TaskManager<DiagramCommand>,
    router: OrthogonalRouter,
    routing: RoutingOptions,
    invalidate: Option<InvalidateCallback>,
    default_line_style: LineStyle,
    hit_tolerance: f64,
    skip_undo: bool,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Diagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagram")
            .field("items", &self.model.len())
            .field("undo_depth", &self.history.undo_depth())
            .field("redo_depth", &self.history.redo_depth())
            .field("default_line_style", &self.default_line_style)
            .finish_non_exhaustive()
    }
}

impl Diagram {
    pub fn new() -> Self {
        Self::with_options(
            DiagramOptions::default(),
            RoutingOptions::default(),
            RenderOptions::default(),
        )
    }

    pub fn with_options(
        options: DiagramOptions,
        routing: RoutingOptions,
        render: RenderOptions,
    ) -> Self {
        let mut history = TaskManager::new(options.undo_limit);
        history.set_enabled(options.undo_enabled);
        Self {
            router: OrthogonalRouter::new(routing.orthogonal_margin),
            routing,
            model: DiagramModel::new(options, render),
            history,
            invalidate: None,
            default_line_style: LineStyle::default(),
            hit_tolerance: 4.0,
            skip_undo: false,
        }
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.model.options
    }

    pub fn routing_options(&self) -> &RoutingOptions {
        &self.routing
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.model.render
    }

    /// Changes the routing margin used for links routed from now on.
    pub fn set_routing_options(&mut self, routing: RoutingOptions) {
        self.router = OrthogonalRouter::new(routing.orthogonal_margin);
        self.routing = routing;
    }

    pub fn router(&self) -> &OrthogonalRouter {
        &self.router
    }

    pub fn set_link_policy(&mut self, allow_reflexive: bool, allow_multiple: bool) {
        self.model.options.allow_reflexive_links = allow_reflexive;
        self.model.options.allow_multiple_links = allow_multiple;
    }

    /// Switches hit-testing between the quadtree and linear scans.
    pub fn set_spatial_index(&mut self, enabled: bool) {
        self.model.set_spatial_index(enabled);
    }

    pub fn spatial_stats(&self) -> SpatialIndexStats {
        self.model.spatial_stats()
    }

    pub fn default_line_style(&self) -> LineStyle {
        self.default_line_style
    }

    /// Line style given to links created by `add_link`.
    pub fn set_default_line_style(&mut self, style: LineStyle) {
        self.default_line_style = style;
    }

    pub fn hit_tolerance(&self) -> f64 {
        self.hit_tolerance
    }

    pub fn set_hit_tolerance(&mut self, tolerance: f64) {
        self.hit_tolerance = tolerance.max(0.0);
    }

    /// Registers the callback receiving repaint areas; `None` means the
    /// whole visible area.
    pub fn set_invalidate_callback(&mut self, callback: InvalidateCallback) {
        self.invalidate = Some(callback);
    }

    pub fn clear_invalidate_callback(&mut self) {
        self.invalidate = None;
    }

    pub fn model(&self) -> &DiagramModel {
        &self.model
    }

    pub fn history(&self) -> &TaskManager<DiagramCommand> {
        &self.history
    }

    // --- internal plumbing -------------------------------------------------

    /// Applies a command and records it.
    pub(crate) fn exec(&mut self, mut command: DiagramCommand) {
        command.apply(&mut self.model);
        self.history.submit(command);
    }

    /// Runs `f` inside an implicit undo group.
    pub(crate) fn grouped<T>(
        &mut self,
        code: ActionCode,
        f: impl FnOnce(&mut Self) -> OpResult<T>,
    ) -> OpResult<T> {
        let opened = self.history.begin_implicit(code);
        let result = f(self);
        self.history.end_implicit(opened);
        result
    }

    /// Reports pending invalidation and logs a declined operation.
    pub(crate) fn finish<T>(&mut self, op: &str, result: OpResult<T>) -> Option<T> {
        self.flush();
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(op, %err, "Diagram operation declined");
                None
            }
        }
    }

    pub(crate) fn flush(&mut self) {
        let region = match self.model.take_invalidation() {
            Invalidation::Clean => return,
            Invalidation::Region(r) => Some(r),
            Invalidation::All => None,
        };
        if let Some(callback) = self.invalidate.as_mut() {
            callback(region);
        }
    }

    pub(crate) fn require_item(&self, id: ItemId) -> OpResult<&Item> {
        self.model.get(id).ok_or(DiagramError::MissingItem { id })
    }

    pub(crate) fn require_node(&self, id: ItemId) -> OpResult<&Node> {
        self.require_item(id)?
            .as_node()
            .ok_or(DiagramError::NotANode { id })
    }

    pub(crate) fn require_link(&self, id: ItemId) -> OpResult<&Link> {
        self.require_item(id)?
            .as_link()
            .ok_or(DiagramError::NotALink { id })
    }

    // --- queries -----------------------------------------------------------

    /// Items back to front.
    pub fn items(&self) -> impl DoubleEndedIterator<Item = &Item> {
        self.model.store().iter()
    }

    pub fn len(&self) -> usize {
        self.model.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.model.get(id)
    }

    pub fn node(&self, id: ItemId) -> Option<&Node> {
        self.model.get(id)?.as_node()
    }

    pub fn link(&self, id: ItemId) -> Option<&Link> {
        self.model.get(id)?.as_link()
    }

    /// Links attached to `node`, back to front.
    pub fn links_of(&self, node: ItemId) -> Vec<ItemId> {
        self.items()
            .filter(|item| item.as_link().is_some_and(|l| l.connects(node)))
            .map(|item| item.id)
            .collect()
    }

    /// Topmost item under `p`.
    pub fn hit_test(&self, p: Point) -> Option<ItemId> {
        self.hit_test_where(p, |_| true)
    }

    /// Topmost node under `p`.
    pub fn node_at(&self, p: Point) -> Option<ItemId> {
        self.hit_test_where(p, Item::is_node)
    }

    fn hit_test_where(&self, p: Point, accept: impl Fn(&Item) -> bool) -> Option<ItemId> {
        let tolerance = self.hit_tolerance;
        self.model
            .query_point(p, tolerance)
            .into_iter()
            .rev()
            .filter_map(|id| self.model.get(id))
            .find(|item| accept(item) && item.contains_point(p, tolerance))
            .map(|item| item.id)
    }

    /// Items whose bounds intersect `region`, back to front.
    pub fn items_in(&self, region: &Rect) -> Vec<ItemId> {
        self.model.query(region)
    }

    /// Union of all item bounds.
    pub fn extent(&self) -> Option<Rect> {
        Rect::union_all(self.items().map(|item| item.bounds))
    }

    // --- selection ---------------------------------------------------------

    pub fn selected_items(&self) -> Vec<ItemId> {
        self.items()
            .filter(|item| item.selected)
            .map(|item| item.id)
            .collect()
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.model.get(id).is_some_and(|item| item.selected)
    }

    /// Selects `id`, dropping the rest of the selection unless `additive`.
    pub fn select(&mut self, id: ItemId, additive: bool) -> bool {
        if !self.model.store().contains(id) {
            return false;
        }
        if !additive {
            for other in self.selected_items() {
                if other != id {
                    self.model.set_selected(other, false);
                }
            }
        }
        self.model.set_selected(id, true);
        self.flush();
        true
    }

    pub fn deselect(&mut self, id: ItemId) -> bool {
        let changed = self.model.set_selected(id, false);
        self.flush();
        changed
    }

    pub fn deselect_all(&mut self) {
        for id in self.selected_items() {
            self.model.set_selected(id, false);
        }
        self.flush();
    }

    pub fn select_all(&mut self) {
        for id in self.model.store().ids() {
            self.model.set_selected(id, true);
        }
        self.flush();
    }

    /// Selects the items lying entirely inside `region`. Returns how many
    /// items matched.
    pub fn select_in_rect(&mut self, region: &Rect, additive: bool) -> usize {
        let region = region.normalized();
        if !additive {
            for id in self.selected_items() {
                self.model.set_selected(id, false);
            }
        }
        let hits: Vec<ItemId> = self
            .model
            .query(&region)
            .into_iter()
            .filter(|id| {
                self.model
                    .get(*id)
                    .is_some_and(|item| region.contains_rect(&item.bounds))
            })
            .collect();
        for id in &hits {
            self.model.set_selected(*id, true);
        }
        self.flush();
        hits.len()
    }

    // --- bulk update -------------------------------------------------------

    /// Defers index maintenance and invalidation until the matching
    /// `end_update`. Calls nest.
    pub fn begin_update(&mut self) {
        self.model.begin_update();
    }

    pub fn end_update(&mut self) {
        self.model.end_update();
        self.flush();
    }

    pub fn is_updating(&self) -> bool {
        self.model.is_updating()
    }

    // --- undo --------------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Reverts the last action. A running preview is cancelled first.
    pub fn undo(&mut self) -> bool {
        self.cancel_preview();
        let done = self.history.undo(&mut self.model);
        self.flush();
        done
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_preview();
        let done = self.history.redo(&mut self.model);
        self.flush();
        done
    }

    /// Opens an external undo group; every change until the matching
    /// `end_action` is undone in one step.
    pub fn begin_action(&mut self, code: ActionCode) -> bool {
        let result = self.history.begin_action(code);
        self.finish("begin_action", result).is_some()
    }

    pub fn end_action(&mut self) {
        self.history.end_action();
    }

    pub fn set_undo_limit(&mut self, limit: usize) {
        self.model.options.undo_limit = limit;
        self.history.set_undo_limit(limit);
    }

    /// While set, changes are applied without being recorded.
    pub fn set_skip_undo(&mut self, skip: bool) {
        self.skip_undo = skip;
        if !self.model.is_capturing() {
            self.history.set_skip(skip);
        }
    }

    /// Disabling undo also drops the recorded history.
    pub fn set_undo_enabled(&mut self, enabled: bool) {
        self.model.options.undo_enabled = enabled;
        self.history.set_enabled(enabled);
    }

    /// Reverts and forgets the most recent task on its own.
    pub fn remove_last_task(&mut self) -> bool {
        let done = self.history.remove_last_task(&mut self.model);
        self.flush();
        done
    }
}
