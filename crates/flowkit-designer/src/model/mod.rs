//! Diagram items.
//!
//! Every item is a [`Node`] or a [`Link`] wrapped in an [`Item`] that carries
//! the bookkeeping shared by both: identity, z-order, cached bounds and the
//! spatial index back-reference.

mod link;
mod node;

pub use link::{LineStyle, Link, LinkEnd};
pub use node::{Node, NodeShape, Pin};

use serde::{Deserialize, Serialize};

use flowkit_core::{ItemId, Point, Rect};

use crate::spatial_index::QuadrantId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Node(Node),
    Link(Link),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Z-order; equals the item's position in the diagram
    pub index: usize,
    /// Cached bounds, refreshed on every change outside a bulk update
    pub bounds: Rect,
    /// Quadrant currently holding this item, if indexed
    #[serde(skip)]
    pub quadrant: Option<QuadrantId>,
    pub selected: bool,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(id: ItemId, kind: ItemKind) -> Self {
        let mut item = Self {
            id,
            index: 0,
            bounds: Rect::default(),
            quadrant: None,
            selected: false,
            kind,
        };
        item.bounds = item.compute_bounds();
        item
    }

    pub fn compute_bounds(&self) -> Rect {
        match &self.kind {
            ItemKind::Node(node) => node.visual_bounds(),
            ItemKind::Link(link) => link.bounds(),
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self.kind, ItemKind::Node(_))
    }

    pub fn is_link(&self) -> bool {
        matches!(self.kind, ItemKind::Link(_))
    }

    pub fn as_node(&self) -> Option<&Node> {
        match &self.kind {
            ItemKind::Node(node) => Some(node),
            ItemKind::Link(_) => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match &mut self.kind {
            ItemKind::Node(node) => Some(node),
            ItemKind::Link(_) => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match &self.kind {
            ItemKind::Link(link) => Some(link),
            ItemKind::Node(_) => None,
        }
    }

    pub fn as_link_mut(&mut self) -> Option<&mut Link> {
        match &mut self.kind {
            ItemKind::Link(link) => Some(link),
            ItemKind::Node(_) => None,
        }
    }

    pub fn text(&self) -> &str {
        match &self.kind {
            ItemKind::Node(node) => &node.text,
            ItemKind::Link(link) => &link.text,
        }
    }

    pub fn set_text(&mut self, text: String) -> String {
        match &mut self.kind {
            ItemKind::Node(node) => std::mem::replace(&mut node.text, text),
            ItemKind::Link(link) => std::mem::replace(&mut link.text, text),
        }
    }

    /// Precise hit test.
    pub fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        match &self.kind {
            ItemKind::Node(node) => node.contains_point(p, tolerance),
            ItemKind::Link(link) => link.hit(p, tolerance),
        }
    }
}
