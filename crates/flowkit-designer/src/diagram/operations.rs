//! Undoable mutators.

use std::collections::HashSet;

use flowkit_core::{DiagramError, ItemId, Point, Rect};

use super::links::{self, End};
use super::{Diagram, OpResult};
use crate::commands::DiagramCommand;
use crate::history::ActionCode;
use crate::model::{Item, ItemKind, LineStyle, Link, LinkEnd, Node};

impl Diagram {
    /// Adds a rectangular node and returns its id.
    pub fn add_node(&mut self, x: f64, y: f64, width: f64, height: f64, text: &str) -> ItemId {
        self.add_node_with(Node::new(Rect::new(x, y, width, height), text))
    }

    pub fn add_node_with(&mut self, node: Node) -> ItemId {
        let id = self.model.generate_id();
        let item = Item::new(id, ItemKind::Node(node));
        let position = self.model.len();
        let result = self.grouped(ActionCode::Create, |d| {
            d.exec(DiagramCommand::AddItem { item, position });
            Ok(id)
        });
        self.finish("add_node", result).unwrap_or(id)
    }

    /// Adds a link in the default line style.
    ///
    /// Returns `None` when an endpoint is missing or not a node, a pin index
    /// is out of range, or the link policy forbids the connection.
    pub fn add_link(
        &mut self,
        origin: ItemId,
        destination: ItemId,
        text: &str,
        origin_pin: Option<usize>,
        destination_pin: Option<usize>,
    ) -> Option<ItemId> {
        let style = self.default_line_style;
        self.add_link_styled(origin, destination, text, origin_pin, destination_pin, style)
    }

    pub fn add_link_styled(
        &mut self,
        origin: ItemId,
        destination: ItemId,
        text: &str,
        origin_pin: Option<usize>,
        destination_pin: Option<usize>,
        style: LineStyle,
    ) -> Option<ItemId> {
        let result = self.try_add_link(origin, destination, text, origin_pin, destination_pin, style);
        self.finish("add_link", result)
    }

    fn try_add_link(
        &mut self,
        origin: ItemId,
        destination: ItemId,
        text: &str,
        origin_pin: Option<usize>,
        destination_pin: Option<usize>,
        style: LineStyle,
    ) -> OpResult<ItemId> {
        self.check_link_ends(None, origin, origin_pin, destination, destination_pin)?;
        let points = self.initial_points(style, origin, origin_pin, destination, destination_pin)?;

        let mut link = Link::new(origin, destination, points);
        link.origin_pin = origin_pin;
        link.destination_pin = destination_pin;
        link.style = style;
        link.text = text.to_string();

        let id = self.model.generate_id();
        let item = Item::new(id, ItemKind::Link(link));
        let position = self.model.len();
        self.grouped(ActionCode::Create, |d| {
            d.exec(DiagramCommand::AddItem { item, position });
            Ok(id)
        })
    }

    /// Validates a prospective link. `exclude` is the link being relinked.
    fn check_link_ends(
        &self,
        exclude: Option<ItemId>,
        origin: ItemId,
        origin_pin: Option<usize>,
        destination: ItemId,
        destination_pin: Option<usize>,
    ) -> OpResult<()> {
        for (node, pin) in [(origin, origin_pin), (destination, destination_pin)] {
            let count = self.require_node(node)?.pin_count();
            if let Some(pin) = pin {
                if pin >= count {
                    return Err(DiagramError::PinOutOfRange { node, pin });
                }
            }
        }

        let options = self.options();
        if origin == destination && !options.allow_reflexive_links {
            return Err(DiagramError::ReflexiveLink { node: origin });
        }
        if !options.allow_multiple_links {
            let duplicate = self.items().any(|item| {
                Some(item.id) != exclude
                    && item
                        .as_link()
                        .is_some_and(|l| l.origin == origin && l.destination == destination)
            });
            if duplicate {
                return Err(DiagramError::DuplicateLink {
                    origin,
                    destination,
                });
            }
        }
        Ok(())
    }

    fn initial_points(
        &self,
        style: LineStyle,
        origin: ItemId,
        origin_pin: Option<usize>,
        destination: ItemId,
        destination_pin: Option<usize>,
    ) -> OpResult<Vec<Point>> {
        let from = End::new(self.require_node(origin)?, origin_pin);
        let to = End::new(self.require_node(destination)?, destination_pin);
        Ok(links::initial_points(
            self.router(),
            style,
            from,
            to,
            origin == destination,
        ))
    }

    fn remove_item(&mut self, id: ItemId) -> OpResult<()> {
        let item = self.require_item(id)?.clone();
        let position = item.index;
        self.exec(DiagramCommand::RemoveItem { item, position });
        Ok(())
    }

    fn try_remove_node(&mut self, id: ItemId) -> OpResult<()> {
        self.require_node(id)?;
        self.grouped(ActionCode::Delete, |d| {
            for link in d.links_of(id) {
                d.remove_item(link)?;
            }
            d.remove_item(id)
        })
    }

    /// Removes a node together with its links as one undo step.
    pub fn remove_node(&mut self, id: ItemId) -> bool {
        let result = self.try_remove_node(id);
        self.finish("remove_node", result).is_some()
    }

    pub fn remove_link(&mut self, id: ItemId) -> bool {
        let result = self.try_remove_link(id);
        self.finish("remove_link", result).is_some()
    }

    fn try_remove_link(&mut self, id: ItemId) -> OpResult<()> {
        self.require_link(id)?;
        self.grouped(ActionCode::Delete, |d| d.remove_item(id))
    }

    /// Removes every selected item and returns how many were selected and
    /// removed. Links of removed nodes go too.
    pub fn delete_selected(&mut self) -> usize {
        let selected = self.selected_items();
        if selected.is_empty() {
            return 0;
        }
        self.begin_update();
        let result = self.grouped(ActionCode::Delete, |d| {
            let mut removed = 0;
            for id in selected {
                let Some(item) = d.item(id) else {
                    continue;
                };
                if item.is_node() {
                    d.try_remove_node(id)?;
                } else {
                    d.remove_item(id)?;
                }
                removed += 1;
            }
            Ok(removed)
        });
        self.end_update();
        self.finish("delete_selected", result).unwrap_or(0)
    }

    /// Removes everything as one undo step and invalidates the whole view.
    pub fn clear(&mut self) {
        let ids = self.model.store().ids();
        self.begin_update();
        let result = self.grouped(ActionCode::Clear, |d| {
            for id in ids.into_iter().rev() {
                d.remove_item(id)?;
            }
            Ok(())
        });
        self.model.mark_all();
        self.end_update();
        self.finish("clear", result);
    }

    /// Moves or resizes a node. Attached links follow.
    pub fn set_bounds(&mut self, id: ItemId, bounds: Rect) -> bool {
        let result = self.try_set_bounds(id, bounds);
        self.finish("set_bounds", result).is_some()
    }

    fn try_set_bounds(&mut self, id: ItemId, bounds: Rect) -> OpResult<()> {
        let before = self.require_node(id)?.bounds;
        let after = bounds.normalized();
        if before == after {
            return Ok(());
        }
        self.grouped(ActionCode::Resize, |d| {
            d.exec(DiagramCommand::SetBounds { id, before, after });
            d.follow_links(id)
        })
    }

    /// Rotates a node's outline (degrees). Attached links follow.
    pub fn set_rotation(&mut self, id: ItemId, degrees: f64) -> bool {
        let result = self.try_set_rotation(id, degrees);
        self.finish("set_rotation", result).is_some()
    }

    fn try_set_rotation(&mut self, id: ItemId, degrees: f64) -> OpResult<()> {
        let before = self.require_node(id)?.rotation;
        if before == degrees {
            return Ok(());
        }
        self.grouped(ActionCode::Resize, |d| {
            d.exec(DiagramCommand::SetRotation {
                id,
                before,
                after: degrees,
            });
            d.follow_links(id)
        })
    }

    /// Recomputes the points of every link attached to `node`.
    fn follow_links(&mut self, node: ItemId) -> OpResult<()> {
        for link in self.links_of(node) {
            self.relayout_link(link, None)?;
        }
        Ok(())
    }

    /// Re-anchors (or reroutes) a link after its nodes changed. `translate`
    /// moves the interior points first.
    fn relayout_link(&mut self, id: ItemId, translate: Option<(f64, f64)>) -> OpResult<()> {
        let (before, after) = {
            let link = self.require_link(id)?;
            let mut moved = link.clone();
            if let Some((dx, dy)) = translate {
                let n = moved.points.len();
                for p in moved.points.iter_mut().take(n.saturating_sub(1)).skip(1) {
                    *p = p.offset(dx, dy);
                }
            }
            let origin = End::new(self.require_node(link.origin)?, link.origin_pin);
            let destination = End::new(self.require_node(link.destination)?, link.destination_pin);
            let after = links::follow(self.router(), &moved, origin, destination);
            (link.points.clone(), after)
        };
        if before != after {
            self.exec(DiagramCommand::SetLinkPoints { id, before, after });
        }
        Ok(())
    }

    fn set_points(&mut self, id: ItemId, after: Vec<Point>) -> OpResult<()> {
        let before = self.require_link(id)?.points.clone();
        if before != after {
            self.grouped(ActionCode::Stretch, |d| {
                d.exec(DiagramCommand::SetLinkPoints { id, before, after });
                Ok(())
            })?;
        }
        Ok(())
    }

    fn editable_link(&self, id: ItemId) -> OpResult<&Link> {
        let link = self.require_link(id)?;
        if !link.style.allows_point_editing() {
            return Err(DiagramError::UnsupportedForStyle {
                style: link.style.to_string(),
            });
        }
        Ok(link)
    }

    /// Inserts an interior point before `index` (1 ..= len - 1).
    pub fn add_point(&mut self, id: ItemId, index: usize, p: Point) -> bool {
        let result = self.editable_link(id).and_then(|link| {
            let len = link.points.len();
            if index == 0 || index >= len {
                return Err(DiagramError::PointOutOfRange { index, len });
            }
            let mut points = link.points.clone();
            points.insert(index, p);
            Ok(points)
        });
        let result = result.and_then(|points| self.set_points(id, points));
        self.finish("add_point", result).is_some()
    }

    /// Removes an interior point. End points cannot be removed.
    pub fn remove_point(&mut self, id: ItemId, index: usize) -> bool {
        let result = self.editable_link(id).and_then(|link| {
            let len = link.points.len();
            if len <= 2 {
                return Err(DiagramError::TooFewPoints);
            }
            if index == 0 || index >= len - 1 {
                return Err(DiagramError::PointOutOfRange { index, len });
            }
            let mut points = link.points.clone();
            points.remove(index);
            Ok(points)
        });
        let result = result.and_then(|points| self.set_points(id, points));
        self.finish("remove_point", result).is_some()
    }

    /// Moves one point. Interior points of orthogonal and database links
    /// belong to the router and cannot be moved.
    pub fn move_point(&mut self, id: ItemId, index: usize, p: Point) -> bool {
        let result = self.require_link(id).and_then(|link| {
            let len = link.points.len();
            if index >= len {
                return Err(DiagramError::PointOutOfRange { index, len });
            }
            let interior = index != 0 && index != len - 1;
            if interior && matches!(link.style, LineStyle::Orthogonal | LineStyle::Database) {
                return Err(DiagramError::UnsupportedForStyle {
                    style: link.style.to_string(),
                });
            }
            let mut points = link.points.clone();
            points[index] = p;
            Ok(points)
        });
        let result = result.and_then(|points| self.set_points(id, points));
        self.finish("move_point", result).is_some()
    }

    /// Drops every interior point, resetting the link to its initial shape.
    pub fn clear_points(&mut self, id: ItemId) -> bool {
        let result = self.try_clear_points(id);
        self.finish("clear_points", result).is_some()
    }

    fn try_clear_points(&mut self, id: ItemId) -> OpResult<()> {
        let link = self.require_link(id)?;
        let points = self.initial_points(
            link.style,
            link.origin,
            link.origin_pin,
            link.destination,
            link.destination_pin,
        )?;
        self.set_points(id, points)
    }

    /// Changes how a link's points are drawn, converting them to the new
    /// style.
    pub fn set_line_style(&mut self, id: ItemId, style: LineStyle) -> bool {
        let result = self.try_set_line_style(id, style);
        self.finish("set_line_style", result).is_some()
    }

    fn try_set_line_style(&mut self, id: ItemId, style: LineStyle) -> OpResult<()> {
        let link = self.require_link(id)?.clone();
        if link.style == style {
            return Ok(());
        }
        let after = if style == LineStyle::Orthogonal {
            self.initial_points(
                style,
                link.origin,
                link.origin_pin,
                link.destination,
                link.destination_pin,
            )?
        } else {
            let mut converted = link.clone();
            converted.style = style;
            converted.points = links::convert_points(&link.points, link.style, style);
            let origin = End::new(self.require_node(link.origin)?, link.origin_pin);
            let destination = End::new(self.require_node(link.destination)?, link.destination_pin);
            links::follow(self.router(), &converted, origin, destination)
        };

        self.grouped(ActionCode::Restyle, |d| {
            d.exec(DiagramCommand::SetLineStyle {
                id,
                before: link.style,
                after: style,
            });
            if after != link.points {
                d.exec(DiagramCommand::SetLinkPoints {
                    id,
                    before: link.points,
                    after,
                });
            }
            Ok(())
        })
    }

    /// Reattaches the origin of a link and reroutes it.
    pub fn set_origin(&mut self, id: ItemId, node: ItemId, pin: Option<usize>) -> bool {
        let result = self.try_set_end(id, LinkEnd::Origin, node, pin);
        self.finish("set_origin", result).is_some()
    }

    /// Reattaches the destination of a link and reroutes it.
    pub fn set_destination(&mut self, id: ItemId, node: ItemId, pin: Option<usize>) -> bool {
        let result = self.try_set_end(id, LinkEnd::Destination, node, pin);
        self.finish("set_destination", result).is_some()
    }

    fn try_set_end(
        &mut self,
        id: ItemId,
        end: LinkEnd,
        node: ItemId,
        pin: Option<usize>,
    ) -> OpResult<()> {
        let link = self.require_link(id)?.clone();
        let before = link.end(end);
        let ((origin, origin_pin), (destination, destination_pin)) = match end {
            LinkEnd::Origin => ((node, pin), link.end(LinkEnd::Destination)),
            LinkEnd::Destination => (link.end(LinkEnd::Origin), (node, pin)),
        };
        self.check_link_ends(Some(id), origin, origin_pin, destination, destination_pin)?;
        let points =
            self.initial_points(link.style, origin, origin_pin, destination, destination_pin)?;

        self.grouped(ActionCode::Relink, |d| {
            if before != (node, pin) {
                d.exec(DiagramCommand::SetEndpoint {
                    id,
                    end,
                    before,
                    after: (node, pin),
                });
            }
            if points != link.points {
                d.exec(DiagramCommand::SetLinkPoints {
                    id,
                    before: link.points,
                    after: points,
                });
            }
            Ok(())
        })
    }

    pub fn set_text(&mut self, id: ItemId, text: &str) -> bool {
        let result = self.try_set_text(id, text);
        self.finish("set_text", result).is_some()
    }

    fn try_set_text(&mut self, id: ItemId, text: &str) -> OpResult<()> {
        let before = self.require_item(id)?.text().to_string();
        if before == text {
            return Ok(());
        }
        self.grouped(ActionCode::EditText, |d| {
            d.exec(DiagramCommand::SetText {
                id,
                before,
                after: text.to_string(),
            });
            Ok(())
        })
    }

    /// Moves an item to the top of the z-order.
    pub fn bring_to_front(&mut self, id: ItemId) -> bool {
        let top = self.len().saturating_sub(1);
        let result = self.reorder(id, top);
        self.finish("bring_to_front", result).is_some()
    }

    /// Moves an item to the bottom of the z-order.
    pub fn send_to_back(&mut self, id: ItemId) -> bool {
        let result = self.reorder(id, 0);
        self.finish("send_to_back", result).is_some()
    }

    fn reorder(&mut self, id: ItemId, to: usize) -> OpResult<()> {
        let from = self.require_item(id)?.index;
        if from == to {
            return Ok(());
        }
        self.grouped(ActionCode::Reorder, |d| {
            d.exec(DiagramCommand::Reorder { id, from, to });
            Ok(())
        })
    }

    /// Moves the selection by `(dx, dy)` as one undo step.
    ///
    /// Links between two moved nodes are translated whole, links with one
    /// moved end follow it, and selected links between unmoved nodes have
    /// their interior points shifted.
    pub fn move_selection(&mut self, dx: f64, dy: f64) -> bool {
        let selected = self.selected_items();
        if selected.is_empty() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        let nodes: Vec<ItemId> = selected
            .iter()
            .copied()
            .filter(|id| self.node(*id).is_some())
            .collect();
        let moved: HashSet<ItemId> = nodes.iter().copied().collect();

        self.begin_update();
        let result = self.grouped(ActionCode::Move, |d| {
            for &id in &nodes {
                let before = d.require_node(id)?.bounds;
                d.exec(DiagramCommand::SetBounds {
                    id,
                    before,
                    after: before.offset(dx, dy),
                });
            }

            let link_ids: Vec<ItemId> = d
                .items()
                .filter(|item| item.is_link())
                .map(|item| item.id)
                .collect();
            for id in link_ids {
                let link = d.require_link(id)?;
                let origin_moved = moved.contains(&link.origin);
                let destination_moved = moved.contains(&link.destination);
                let style = link.style;
                if origin_moved && destination_moved {
                    let before = link.points.clone();
                    let after = before.iter().map(|p| p.offset(dx, dy)).collect();
                    d.exec(DiagramCommand::SetLinkPoints { id, before, after });
                } else if origin_moved || destination_moved {
                    d.relayout_link(id, None)?;
                } else if d.is_selected(id)
                    && !matches!(style, LineStyle::Orthogonal | LineStyle::Database)
                {
                    d.relayout_link(id, Some((dx, dy)))?;
                }
            }
            Ok(())
        });
        self.end_update();
        self.finish("move_selection", result).is_some()
    }
}
