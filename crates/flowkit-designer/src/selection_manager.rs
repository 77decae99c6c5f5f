use flowkit_core::{ItemId, Point, Rect};

use crate::diagram::Diagram;

/// Tracks the primary selection on top of the diagram's selection flags.
///
/// `SelectionManager` is responsible for:
/// - Remembering which item is the "primary" selection (the one handles
///   and property panels refer to)
/// - Point-based selection (clicking on items)
/// - Rectangle-based selection (rubber band)
/// - Multi-select (Shift+click toggles)
///
/// # Selection Model
///
/// - **Primary Selection**: One item is designated as the primary selection
///   (stored in `selected_id`)
/// - **Multiple Selection**: Any number of items can carry the `selected`
///   flag inside the diagram
/// - **Multi-select**: With `multi` set, clicking toggles an item without
///   touching the rest of the selection
///
/// Selection is not recorded in the undo history.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    /// The ID of the primary selected item, if any
    selected_id: Option<ItemId>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowkit_designer::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new();
    /// assert_eq!(manager.selected_id(), None);
    /// ```
    pub fn new() -> Self {
        Self { selected_id: None }
    }

    /// Returns the ID of the primary selected item.
    pub fn selected_id(&self) -> Option<ItemId> {
        self.selected_id
    }

    /// Sets the primary selected item ID.
    ///
    /// This does NOT change the `selected` flag of any item.
    pub fn set_selected_id(&mut self, id: Option<ItemId>) {
        self.selected_id = id;
    }

    /// Deselects all items and clears the primary selection.
    pub fn deselect_all(&mut self, diagram: &mut Diagram) {
        diagram.deselect_all();
        self.selected_id = None;
    }

    /// Selects every item; the topmost one becomes primary.
    pub fn select_all(&mut self, diagram: &mut Diagram) {
        diagram.select_all();
        self.selected_id = diagram.items().next_back().map(|item| item.id);
    }

    /// Selects the topmost item at `point`.
    ///
    /// # Multi-select Behavior
    ///
    /// - If `multi` is `false`: deselects everything else first
    /// - If `multi` is `true`: toggles the clicked item only
    ///
    /// # Returns
    ///
    /// The ID of the clicked item, or `None` if nothing was hit.
    pub fn select_at(&mut self, diagram: &mut Diagram, point: Point, multi: bool) -> Option<ItemId> {
        let found = diagram.hit_test(point);

        match (found, multi) {
            (Some(id), true) if diagram.is_selected(id) => {
                diagram.deselect(id);
                if self.selected_id == Some(id) {
                    self.selected_id = diagram.selected_items().last().copied();
                }
            }
            (Some(id), _) => {
                diagram.select(id, multi);
                self.selected_id = Some(id);
            }
            (None, false) => self.deselect_all(diagram),
            (None, true) => {}
        }
        found
    }

    /// Selects the items lying entirely inside `rect`.
    ///
    /// Without `multi` the previous selection is replaced. The topmost hit
    /// becomes primary.
    pub fn select_in_rect(&mut self, diagram: &mut Diagram, rect: &Rect, multi: bool) -> usize {
        let count = diagram.select_in_rect(rect, multi);
        self.selected_id = diagram.selected_items().last().copied();
        count
    }

    /// Number of selected items.
    pub fn selected_count(&self, diagram: &Diagram) -> usize {
        diagram.items().filter(|item| item.selected).count()
    }

    /// Union of the bounds of every selected item.
    pub fn selection_bounds(&self, diagram: &Diagram) -> Option<Rect> {
        Rect::union_all(diagram.items().filter(|i| i.selected).map(|i| i.bounds))
    }

    /// Whether `point` hits a selected item.
    pub fn is_point_in_selected(&self, diagram: &Diagram, point: Point) -> bool {
        let tolerance = diagram.hit_tolerance();
        diagram
            .items()
            .filter(|item| item.selected)
            .any(|item| item.contains_point(point, tolerance))
    }

    /// Drops the primary selection if its item is gone or no longer
    /// selected.
    pub fn sync(&mut self, diagram: &Diagram) {
        if let Some(id) = self.selected_id {
            if !diagram.is_selected(id) {
                self.selected_id = diagram.selected_items().last().copied();
            }
        }
    }
}
