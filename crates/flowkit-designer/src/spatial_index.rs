//! Quadtree spatial index for hit-testing.
//!
//! Quadrants live in an arena and are addressed by [`QuadrantId`]. Each
//! quadrant owns a bucket of `(id, bounds)` entries for the items that fit in
//! none of its children. Children are only created when an item needs them.
//!
//! Items lying outside the root cell stay in the root bucket, which every
//! query scans, so the index never loses an item; it only gets slower for
//! content far outside the world it was built for.

use smallvec::SmallVec;

use flowkit_core::{ItemId, Point, Rect};

/// Arena index of a quadrant.
pub type QuadrantId = usize;

/// Quadrants narrower or shorter than this are never subdivided.
pub const MIN_QUADRANT_SIZE: f64 = 4.0;

/// Hard cap on tree depth.
pub const MAX_DEPTH: usize = 16;

const ROOT: QuadrantId = 0;

fn default_world() -> Rect {
    Rect::new(-5000.0, -5000.0, 10000.0, 10000.0)
}

#[derive(Debug, Clone)]
struct Quadrant {
    cell: Rect,
    depth: usize,
    children: [Option<QuadrantId>; 4],
    items: SmallVec<[(ItemId, Rect); 4]>,
}

impl Quadrant {
    fn new(cell: Rect, depth: usize) -> Self {
        Self {
            cell,
            depth,
            children: [None; 4],
            items: SmallVec::new(),
        }
    }

    fn can_subdivide(&self) -> bool {
        self.depth < MAX_DEPTH
            && self.cell.width / 2.0 >= MIN_QUADRANT_SIZE
            && self.cell.height / 2.0 >= MIN_QUADRANT_SIZE
    }

    /// Cell of child `slot` (0 = top-left, clockwise).
    fn child_cell(&self, slot: usize) -> Rect {
        let w = self.cell.width / 2.0;
        let h = self.cell.height / 2.0;
        let (dx, dy) = match slot {
            0 => (0.0, 0.0),
            1 => (w, 0.0),
            2 => (w, h),
            _ => (0.0, h),
        };
        Rect::new(self.cell.left + dx, self.cell.top + dy, w, h)
    }

    fn fitting_child(&self, bounds: &Rect) -> Option<usize> {
        (0..4).find(|&slot| self.child_cell(slot).contains_rect(bounds))
    }
}

/// Summary of the tree shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpatialIndexStats {
    pub total_quadrants: usize,
    pub total_items: usize,
    pub root_items: usize,
    pub max_depth: usize,
}

/// Region quadtree over item bounds.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    quadrants: Vec<Quadrant>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(default_world())
    }
}

impl SpatialIndex {
    /// Creates an empty index covering `world`.
    pub fn new(world: Rect) -> Self {
        Self {
            quadrants: vec![Quadrant::new(world.normalized(), 0)],
        }
    }

    /// Cell of the root quadrant.
    pub fn world(&self) -> Rect {
        self.quadrants[ROOT].cell
    }

    /// Stores `id` in the deepest quadrant able to hold `bounds`.
    pub fn insert(&mut self, id: ItemId, bounds: Rect) -> QuadrantId {
        let bounds = bounds.normalized();
        let mut current = ROOT;
        loop {
            let quadrant = &self.quadrants[current];
            let slot = if quadrant.can_subdivide() {
                quadrant.fitting_child(&bounds)
            } else {
                None
            };
            let Some(slot) = slot else {
                self.quadrants[current].items.push((id, bounds));
                return current;
            };
            current = match quadrant.children[slot] {
                Some(child) => child,
                None => {
                    let child = self.quadrants.len();
                    let cell = quadrant.child_cell(slot);
                    let depth = quadrant.depth + 1;
                    self.quadrants.push(Quadrant::new(cell, depth));
                    self.quadrants[current].children[slot] = Some(child);
                    child
                }
            };
        }
    }

    /// Removes `id` from `quadrant`. A stale reference is a no-op.
    pub fn remove(&mut self, id: ItemId, quadrant: QuadrantId) -> bool {
        let Some(q) = self.quadrants.get_mut(quadrant) else {
            return false;
        };
        match q.items.iter().position(|(item, _)| *item == id) {
            Some(pos) => {
                q.items.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Appends every item whose bounds intersect `region`.
    pub fn query(&self, region: &Rect, out: &mut Vec<ItemId>) {
        let region = region.normalized();
        let mut stack: SmallVec<[QuadrantId; 32]> = SmallVec::new();
        stack.push(ROOT);

        while let Some(current) = stack.pop() {
            let q = &self.quadrants[current];
            out.extend(
                q.items
                    .iter()
                    .filter(|(_, bounds)| bounds.intersects(&region))
                    .map(|(id, _)| *id),
            );
            for child in q.children.iter().flatten() {
                if self.quadrants[*child].cell.intersects(&region) {
                    stack.push(*child);
                }
            }
        }
    }

    /// Appends every item whose bounds contain `p`.
    pub fn query_point(&self, p: Point, out: &mut Vec<ItemId>) {
        self.query(&Rect::new(p.x, p.y, 0.0, 0.0), out);
    }

    /// Drops every entry and quadrant, keeping the world.
    pub fn clear(&mut self) {
        let world = self.world();
        self.quadrants.clear();
        self.quadrants.push(Quadrant::new(world, 0));
    }

    /// Rebuilds the tree for `entries`, sizing the world to fit them.
    ///
    /// Returns the quadrant of each entry, in input order.
    pub fn rebuild(&mut self, entries: &[(ItemId, Rect)]) -> Vec<QuadrantId> {
        let world = Rect::union_all(entries.iter().map(|(_, b)| b.normalized()))
            .map(|extent| extent.union(&default_world()))
            .unwrap_or_else(default_world);
        self.quadrants.clear();
        self.quadrants.push(Quadrant::new(world, 0));
        entries
            .iter()
            .map(|&(id, bounds)| self.insert(id, bounds))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.quadrants.iter().map(|q| q.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> SpatialIndexStats {
        SpatialIndexStats {
            total_quadrants: self.quadrants.len(),
            total_items: self.len(),
            root_items: self.quadrants[ROOT].items.len(),
            max_depth: self.quadrants.iter().map(|q| q.depth).max().unwrap_or(0),
        }
    }
}
