use std::collections::HashMap;

use flowkit_core::ItemId;

use crate::model::Item;

/// Z-ordered item storage with id lookup.
///
/// Items are kept in drawing order (back to front). After every structural
/// change the store renumbers `Item::index` so that it always equals the
/// item's position.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<Item>,
    positions: HashMap<ItemId, usize>,
    next_id: ItemId,
}

impl ItemStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
            next_id: 1,
        }
    }

    /// Allocates a fresh id. Ids are never reused.
    pub fn generate_id(&mut self) -> ItemId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.position(id).map(|pos| &self.items[pos])
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        let pos = self.position(id)?;
        self.items.get_mut(pos)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Item> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.items.iter_mut()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Appends on top of the z-order.
    pub fn push(&mut self, item: Item) -> usize {
        let pos = self.items.len();
        self.insert_at(pos, item)
    }

    /// Inserts at `pos` (clamped to the end) and returns the final position.
    pub fn insert_at(&mut self, pos: usize, item: Item) -> usize {
        let pos = pos.min(self.items.len());
        self.next_id = self.next_id.max(item.id + 1);
        self.items.insert(pos, item);
        self.renumber_from(pos);
        pos
    }

    /// Removes an item, returning it with the position it occupied.
    pub fn remove(&mut self, id: ItemId) -> Option<(usize, Item)> {
        let pos = self.positions.remove(&id)?;
        let item = self.items.remove(pos);
        self.renumber_from(pos);
        Some((pos, item))
    }

    /// Moves an item to `to` (clamped), returning its previous position.
    pub fn move_to(&mut self, id: ItemId, to: usize) -> Option<usize> {
        let from = self.position(id)?;
        let to = to.min(self.items.len() - 1);
        if from != to {
            let item = self.items.remove(from);
            self.items.insert(to, item);
            self.renumber_from(from.min(to));
        }
        Some(from)
    }

    fn renumber_from(&mut self, start: usize) {
        for (pos, item) in self.items.iter_mut().enumerate().skip(start) {
            item.index = pos;
            self.positions.insert(item.id, pos);
        }
    }
}
