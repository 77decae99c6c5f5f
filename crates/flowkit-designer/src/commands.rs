use flowkit_core::{ItemId, Point, Rect};
use tracing::warn;

use crate::diagram::DiagramModel;
use crate::history::Command;
use crate::model::{Item, ItemKind, LineStyle, Link, LinkEnd, Node};

/// Undoable change to a diagram.
///
/// Every variant stores absolute before/after state so that apply and undo
/// are plain assignments and replay never depends on the current geometry.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum DiagramCommand {
    AddItem {
        item: Item,
        position: usize,
    },
    RemoveItem {
        item: Item,
        position: usize,
    },
    SetBounds {
        id: ItemId,
        before: Rect,
        after: Rect,
    },
    SetRotation {
        id: ItemId,
        before: f64,
        after: f64,
    },
    SetLinkPoints {
        id: ItemId,
        before: Vec<Point>,
        after: Vec<Point>,
    },
    SetLineStyle {
        id: ItemId,
        before: LineStyle,
        after: LineStyle,
    },
    SetEndpoint {
        id: ItemId,
        end: LinkEnd,
        before: (ItemId, Option<usize>),
        after: (ItemId, Option<usize>),
    },
    SetText {
        id: ItemId,
        before: String,
        after: String,
    },
    Reorder {
        id: ItemId,
        from: usize,
        to: usize,
    },
}

impl DiagramCommand {
    /// Id of the item this command touches.
    pub fn item_id(&self) -> ItemId {
        match self {
            DiagramCommand::AddItem { item, .. } | DiagramCommand::RemoveItem { item, .. } => {
                item.id
            }
            DiagramCommand::SetBounds { id, .. }
            | DiagramCommand::SetRotation { id, .. }
            | DiagramCommand::SetLinkPoints { id, .. }
            | DiagramCommand::SetLineStyle { id, .. }
            | DiagramCommand::SetEndpoint { id, .. }
            | DiagramCommand::SetText { id, .. }
            | DiagramCommand::Reorder { id, .. } => *id,
        }
    }

    /// Commands turning `before` into `after` for item `id`.
    ///
    /// Used to record a change that was already applied without history.
    pub fn diff(id: ItemId, before: &ItemKind, after: &ItemKind) -> Vec<DiagramCommand> {
        let mut out = Vec::new();
        match (before, after) {
            (ItemKind::Node(a), ItemKind::Node(b)) => {
                if a.bounds != b.bounds {
                    out.push(DiagramCommand::SetBounds {
                        id,
                        before: a.bounds,
                        after: b.bounds,
                    });
                }
                if a.rotation != b.rotation {
                    out.push(DiagramCommand::SetRotation {
                        id,
                        before: a.rotation,
                        after: b.rotation,
                    });
                }
                if a.text != b.text {
                    out.push(DiagramCommand::SetText {
                        id,
                        before: a.text.clone(),
                        after: b.text.clone(),
                    });
                }
            }
            (ItemKind::Link(a), ItemKind::Link(b)) => {
                for end in [LinkEnd::Origin, LinkEnd::Destination] {
                    if a.end(end) != b.end(end) {
                        out.push(DiagramCommand::SetEndpoint {
                            id,
                            end,
                            before: a.end(end),
                            after: b.end(end),
                        });
                    }
                }
                if a.style != b.style {
                    out.push(DiagramCommand::SetLineStyle {
                        id,
                        before: a.style,
                        after: b.style,
                    });
                }
                if a.points != b.points {
                    out.push(DiagramCommand::SetLinkPoints {
                        id,
                        before: a.points.clone(),
                        after: b.points.clone(),
                    });
                }
                if a.text != b.text {
                    out.push(DiagramCommand::SetText {
                        id,
                        before: a.text.clone(),
                        after: b.text.clone(),
                    });
                }
            }
            _ => warn!(id, "Item changed kind, no command recorded"),
        }
        out
    }

    fn run(&self, model: &mut DiagramModel, forward: bool) {
        let name = self.name();
        match self {
            DiagramCommand::AddItem { item, position } => {
                if forward {
                    model.insert_item(item.clone(), *position);
                } else if model.take_item(item.id).is_none() {
                    warn!(id = item.id, name, "Item to remove is missing");
                }
            }
            DiagramCommand::RemoveItem { item, position } => {
                if forward {
                    if model.take_item(item.id).is_none() {
                        warn!(id = item.id, name, "Item to remove is missing");
                    }
                } else {
                    model.insert_item(item.clone(), *position);
                }
            }
            DiagramCommand::SetBounds { id, before, after } => {
                let bounds = *pick(forward, before, after);
                with_node(model, *id, name, |node| node.bounds = bounds);
            }
            DiagramCommand::SetRotation { id, before, after } => {
                let rotation = *pick(forward, before, after);
                with_node(model, *id, name, |node| node.rotation = rotation);
            }
            DiagramCommand::SetLinkPoints { id, before, after } => {
                let points = pick(forward, before, after).clone();
                with_link(model, *id, name, |link| link.points = points);
            }
            DiagramCommand::SetLineStyle { id, before, after } => {
                let style = *pick(forward, before, after);
                with_link(model, *id, name, |link| link.style = style);
            }
            DiagramCommand::SetEndpoint {
                id,
                end,
                before,
                after,
            } => {
                let (node, pin) = *pick(forward, before, after);
                with_link(model, *id, name, |link| link.set_end(*end, node, pin));
            }
            DiagramCommand::SetText { id, before, after } => {
                let text = pick(forward, before, after).clone();
                let found = model.update_item(*id, |kind| match kind {
                    ItemKind::Node(node) => node.text = text,
                    ItemKind::Link(link) => link.text = text,
                });
                if !found {
                    warn!(id, name, "Command target is missing");
                }
            }
            DiagramCommand::Reorder { id, from, to } => {
                let target = *pick(forward, from, to);
                if model.reorder(*id, target).is_none() {
                    warn!(id, name, "Command target is missing");
                }
            }
        }
    }
}

fn pick<T>(forward: bool, before: T, after: T) -> T {
    if forward {
        after
    } else {
        before
    }
}

fn with_node(model: &mut DiagramModel, id: ItemId, name: &str, f: impl FnOnce(&mut Node)) {
    let mut matched = false;
    let found = model.update_item(id, |kind| {
        if let ItemKind::Node(node) = kind {
            f(node);
            matched = true;
        }
    });
    if !found || !matched {
        warn!(id, name, "Command target is missing or not a node");
    }
}

fn with_link(model: &mut DiagramModel, id: ItemId, name: &str, f: impl FnOnce(&mut Link)) {
    let mut matched = false;
    let found = model.update_item(id, |kind| {
        if let ItemKind::Link(link) = kind {
            f(link);
            matched = true;
        }
    });
    if !found || !matched {
        warn!(id, name, "Command target is missing or not a link");
    }
}

impl Command<DiagramModel> for DiagramCommand {
    fn apply(&mut self, target: &mut DiagramModel) {
        self.run(target, true);
    }

    fn undo(&mut self, target: &mut DiagramModel) {
        self.run(target, false);
    }

    fn name(&self) -> &str {
        match self {
            DiagramCommand::AddItem { .. } => "Add Item",
            DiagramCommand::RemoveItem { .. } => "Remove Item",
            DiagramCommand::SetBounds { .. } => "Set Bounds",
            DiagramCommand::SetRotation { .. } => "Set Rotation",
            DiagramCommand::SetLinkPoints { .. } => "Set Link Points",
            DiagramCommand::SetLineStyle { .. } => "Set Line Style",
            DiagramCommand::SetEndpoint { .. } => "Set Endpoint",
            DiagramCommand::SetText { .. } => "Set Text",
            DiagramCommand::Reorder { .. } => "Reorder",
        }
    }
}
