//! Item storage with index maintenance and dirty-region tracking.
//!
//! `DiagramModel` is the target undo commands replay against. It knows
//! nothing about link policy or routing; it only keeps the store, the
//! spatial index and the cached bounds consistent and accumulates the area
//! that needs repainting.

use std::collections::HashMap;

use tracing::trace;

use flowkit_core::{DiagramOptions, ItemId, Point, Rect, RenderOptions};

use crate::item_store::ItemStore;
use crate::model::{Item, ItemKind};
use crate::spatial_index::SpatialIndexStats;
use crate::spatial_manager::SpatialManager;

/// Area waiting to be reported to the invalidation callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Invalidation {
    #[default]
    Clean,
    Region(Rect),
    /// Everything visible
    All,
}

impl Invalidation {
    fn add(&mut self, rect: Rect) {
        *self = match *self {
            Invalidation::Clean => Invalidation::Region(rect),
            Invalidation::Region(r) => Invalidation::Region(r.union(&rect)),
            Invalidation::All => Invalidation::All,
        };
    }
}

/// Original item contents recorded while a preview is running.
#[derive(Debug, Clone, Default)]
pub(crate) struct Capture {
    pub(crate) order: Vec<ItemId>,
    pub(crate) originals: HashMap<ItemId, ItemKind>,
}

impl Capture {
    fn record(&mut self, id: ItemId, kind: &ItemKind) {
        if !self.originals.contains_key(&id) {
            self.order.push(id);
            self.originals.insert(id, kind.clone());
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiagramModel {
    store: ItemStore,
    spatial: SpatialManager,
    pub(crate) options: DiagramOptions,
    pub(crate) render: RenderOptions,
    update_depth: usize,
    dirty: Invalidation,
    capture: Option<Capture>,
}

impl Default for DiagramModel {
    fn default() -> Self {
        Self::new(DiagramOptions::default(), RenderOptions::default())
    }
}

impl DiagramModel {
    pub fn new(options: DiagramOptions, render: RenderOptions) -> Self {
        let mut spatial = SpatialManager::new();
        let mut store = ItemStore::new();
        spatial.set_enabled(options.spatial_index, &mut store);
        Self {
            store,
            spatial,
            options,
            render,
            update_depth: 0,
            dirty: Invalidation::Clean,
            capture: None,
        }
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.store.get(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn is_updating(&self) -> bool {
        self.update_depth > 0
    }

    pub fn spatial_stats(&self) -> SpatialIndexStats {
        self.spatial.stats()
    }

    pub(crate) fn generate_id(&mut self) -> ItemId {
        self.store.generate_id()
    }

    /// Repaint area of an item: bounds plus stroke, plus handles if selected.
    pub fn paint_bounds(&self, item: &Item) -> Rect {
        let mut margin = self.render.stroke_width;
        if item.selected {
            margin += self.render.selection_margin;
        }
        item.bounds.inflate(margin, margin)
    }

    pub(crate) fn mark(&mut self, rect: Rect) {
        self.dirty.add(rect);
    }

    pub(crate) fn mark_all(&mut self) {
        self.dirty = Invalidation::All;
    }

    /// Hands out the accumulated area unless a bulk update is running.
    pub(crate) fn take_invalidation(&mut self) -> Invalidation {
        if self.is_updating() {
            return Invalidation::Clean;
        }
        std::mem::take(&mut self.dirty)
    }

    /// Inserts `item` at z-position `pos` and indexes it.
    pub(crate) fn insert_item(&mut self, mut item: Item, pos: usize) -> usize {
        item.bounds = item.compute_bounds();
        item.quadrant = None;
        let id = item.id;
        let bounds = item.bounds;
        let paint = self.paint_bounds(&item);
        let pos = self.store.insert_at(pos, item);
        if !self.is_updating() {
            let quadrant = self.spatial.insert(id, bounds);
            if let Some(item) = self.store.get_mut(id) {
                item.quadrant = quadrant;
            }
        }
        self.mark(paint);
        trace!(id, pos, "Inserted item");
        pos
    }

    /// Removes an item, returning it with the position it occupied.
    pub(crate) fn take_item(&mut self, id: ItemId) -> Option<(usize, Item)> {
        let quadrant = self.store.get(id)?.quadrant;
        self.spatial.remove(id, quadrant);
        let (pos, mut item) = self.store.remove(id)?;
        let paint = self.paint_bounds(&item);
        self.mark(paint);
        item.quadrant = None;
        trace!(id, pos, "Removed item");
        Some((pos, item))
    }

    /// Mutates an item's contents and refreshes its bounds and index entry.
    pub(crate) fn update_item(&mut self, id: ItemId, f: impl FnOnce(&mut ItemKind)) -> bool {
        let Some(item) = self.store.get(id) else {
            return false;
        };
        let before = self.paint_bounds(item);
        let updating = self.is_updating();

        let Some(item) = self.store.get_mut(id) else {
            return false;
        };
        if let Some(capture) = self.capture.as_mut() {
            capture.record(id, &item.kind);
        }
        f(&mut item.kind);
        if !updating {
            item.bounds = item.compute_bounds();
            item.quadrant = self.spatial.update(id, item.quadrant, item.bounds);
        }

        self.mark(before);
        if let Some(item) = self.store.get(id) {
            let after = self.paint_bounds(item);
            self.mark(after);
        }
        true
    }

    /// Moves an item in the z-order, returning its previous position.
    pub(crate) fn reorder(&mut self, id: ItemId, to: usize) -> Option<usize> {
        let from = self.store.move_to(id, to)?;
        if let Some(item) = self.store.get(id) {
            let paint = self.paint_bounds(item);
            self.mark(paint);
        }
        Some(from)
    }

    pub(crate) fn set_selected(&mut self, id: ItemId, selected: bool) -> bool {
        let Some(item) = self.store.get_mut(id) else {
            return false;
        };
        if item.selected == selected {
            return false;
        }
        let before = item.bounds;
        item.selected = selected;
        let margin = self.render.stroke_width + self.render.selection_margin;
        self.mark(before.inflate(margin, margin));
        true
    }

    pub(crate) fn begin_update(&mut self) {
        self.update_depth += 1;
    }

    /// Closes one update level. The outermost close refreshes every cached
    /// bound, rebuilds the index and marks the union of all items.
    pub(crate) fn end_update(&mut self) {
        match self.update_depth {
            0 => {}
            1 => {
                self.update_depth = 0;
                let mut area: Option<Rect> = None;
                for item in self.store.iter_mut() {
                    item.bounds = item.compute_bounds();
                }
                for item in self.store.iter() {
                    let paint = self.paint_bounds(item);
                    area = Some(area.map_or(paint, |a| a.union(&paint)));
                }
                self.spatial.rebuild(&mut self.store);
                if let Some(area) = area {
                    self.mark(area);
                }
            }
            _ => self.update_depth -= 1,
        }
    }

    pub(crate) fn set_spatial_index(&mut self, enabled: bool) {
        self.options.spatial_index = enabled;
        self.spatial.set_enabled(enabled, &mut self.store);
    }

    /// Ids of items whose cached bounds intersect `region`, back to front.
    pub fn query(&self, region: &Rect) -> Vec<ItemId> {
        let mut ids = self.spatial.query(region, &self.store, self.is_updating());
        ids.sort_by_key(|id| self.store.position(*id).unwrap_or(usize::MAX));
        ids
    }

    pub fn query_point(&self, p: Point, tolerance: f64) -> Vec<ItemId> {
        let region = Rect::new(p.x - tolerance, p.y - tolerance, tolerance * 2.0, tolerance * 2.0);
        self.query(&region)
    }

    pub(crate) fn start_capture(&mut self) {
        self.capture = Some(Capture::default());
    }

    pub(crate) fn take_capture(&mut self) -> Option<Capture> {
        self.capture.take()
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }
}
