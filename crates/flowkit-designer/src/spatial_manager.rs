use flowkit_core::{ItemId, Rect};

use crate::item_store::ItemStore;
use crate::spatial_index::{QuadrantId, SpatialIndex, SpatialIndexStats};

/// Owns the optional spatial index and keeps item back-references in sync.
///
/// When disabled every query is a linear scan over the store.
#[derive(Debug, Clone)]
pub struct SpatialManager {
    index: SpatialIndex,
    enabled: bool,
}

impl Default for SpatialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialManager {
    pub fn new() -> Self {
        Self {
            index: SpatialIndex::default(),
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Switches between the quadtree and linear scans, rebuilding as needed.
    pub fn set_enabled(&mut self, enabled: bool, store: &mut ItemStore) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.rebuild(store);
        } else {
            self.index.clear();
            for item in store.iter_mut() {
                item.quadrant = None;
            }
        }
    }

    pub fn insert(&mut self, id: ItemId, bounds: Rect) -> Option<QuadrantId> {
        self.enabled.then(|| self.index.insert(id, bounds))
    }

    pub fn remove(&mut self, id: ItemId, quadrant: Option<QuadrantId>) -> bool {
        match quadrant {
            Some(q) if self.enabled => self.index.remove(id, q),
            _ => false,
        }
    }

    /// Re-indexes an item after its bounds changed.
    pub fn update(
        &mut self,
        id: ItemId,
        quadrant: Option<QuadrantId>,
        bounds: Rect,
    ) -> Option<QuadrantId> {
        self.remove(id, quadrant);
        self.insert(id, bounds)
    }

    /// Rebuilds the index from the store and refreshes every back-reference.
    pub fn rebuild(&mut self, store: &mut ItemStore) {
        if !self.enabled {
            return;
        }
        let entries: Vec<(ItemId, Rect)> = store.iter().map(|i| (i.id, i.bounds)).collect();
        let quadrants = self.index.rebuild(&entries);
        for (item, quadrant) in store.iter_mut().zip(quadrants) {
            item.quadrant = Some(quadrant);
        }
    }

    /// Items whose bounds intersect `region`, in no particular order.
    ///
    /// `linear` forces a scan, used while a bulk update has the index stale.
    pub fn query(&self, region: &Rect, store: &ItemStore, linear: bool) -> Vec<ItemId> {
        if self.enabled && !linear {
            let mut out = Vec::new();
            self.index.query(region, &mut out);
            return out;
        }
        let region = region.normalized();
        store
            .iter()
            .filter(|item| item.bounds.intersects(&region))
            .map(|item| item.id)
            .collect()
    }

    pub fn stats(&self) -> SpatialIndexStats {
        self.index.stats()
    }
}
