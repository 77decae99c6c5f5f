use std::cell::RefCell;
use std::rc::Rc;

use flowkit_designer::{
    ActionCode, Diagram, ItemKind, LineStyle, Node, Pin, Point, Rect,
};

fn two_nodes() -> (Diagram, u64, u64) {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(0.0, 0.0, 100.0, 60.0, "a");
    let b = diagram.add_node(300.0, 150.0, 100.0, 60.0, "b");
    (diagram, a, b)
}

fn snapshot(diagram: &Diagram) -> Vec<(u64, usize, Rect, ItemKind)> {
    diagram
        .items()
        .map(|i| (i.id, i.index, i.bounds, i.kind.clone()))
        .collect()
}

fn record_invalidations(diagram: &mut Diagram) -> Rc<RefCell<Vec<Option<Rect>>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    diagram.set_invalidate_callback(Box::new(move |region| sink.borrow_mut().push(region)));
    log
}

#[test]
fn test_add_node_and_undo_redo() {
    let mut diagram = Diagram::new();
    let id = diagram.add_node(10.0, 20.0, 100.0, 60.0, "start");
    assert_eq!(diagram.len(), 1);
    assert_eq!(diagram.item(id).unwrap().bounds, Rect::new(10.0, 20.0, 100.0, 60.0));

    assert!(diagram.undo());
    assert!(diagram.is_empty());
    assert!(diagram.redo());
    assert_eq!(diagram.node(id).unwrap().text, "start");
}

#[test]
fn test_add_link_anchors_on_node_outlines() {
    let (mut diagram, a, b) = two_nodes();
    let link = diagram.add_link(a, b, "flow", None, None).unwrap();
    let link = diagram.link(link).unwrap();

    assert_eq!(link.style, LineStyle::Polyline);
    assert_eq!(link.points.len(), 2);
    let node_a = diagram.node(a).unwrap();
    assert!(node_a.contains_point(link.first_point(), 0.01));
    assert!(!node_a.contains_point(link.first_point().offset(1.0, 1.0), 0.0));
}

#[test]
fn test_link_policy_declines_reflexive_and_duplicates() {
    let (mut diagram, a, b) = two_nodes();
    diagram.set_link_policy(false, false);

    assert!(diagram.add_link(a, a, "", None, None).is_none());
    assert!(diagram.add_link(a, b, "", None, None).is_some());
    assert!(diagram.add_link(a, b, "", None, None).is_none());
    // The reverse direction is a different pair.
    assert!(diagram.add_link(b, a, "", None, None).is_some());
    assert_eq!(diagram.len(), 4);
}

#[test]
fn test_link_to_missing_node_or_bad_pin_is_declined() {
    let (mut diagram, a, b) = two_nodes();
    assert!(diagram.add_link(a, 999, "", None, None).is_none());
    assert!(diagram.add_link(a, b, "", Some(0), None).is_none());

    let pinned = diagram.add_node_with(
        Node::new(Rect::new(0.0, 300.0, 100.0, 60.0), "pins")
            .with_pins(vec![Pin::new("out", 100.0, 50.0)]),
    );
    let link = diagram.add_link(pinned, b, "", Some(0), None).unwrap();
    assert_eq!(
        diagram.link(link).unwrap().first_point(),
        Point::new(100.0, 330.0)
    );
    assert!(diagram.add_link(pinned, b, "", Some(1), None).is_none());
}

#[test]
fn test_link_to_a_link_is_declined() {
    let (mut diagram, a, b) = two_nodes();
    let link = diagram.add_link(a, b, "", None, None).unwrap();
    assert!(diagram.add_link(a, link, "", None, None).is_none());
}

#[test]
fn test_remove_node_removes_links_in_one_group() {
    let (mut diagram, a, b) = two_nodes();
    let c = diagram.add_node(0.0, 300.0, 100.0, 60.0, "c");
    diagram.add_link(a, b, "", None, None).unwrap();
    diagram.add_link(c, a, "", None, None).unwrap();
    diagram.add_link(b, c, "", None, None).unwrap();
    let before = snapshot(&diagram);
    let depth = diagram.undo_depth();

    assert!(diagram.remove_node(a));
    assert_eq!(diagram.len(), 3);
    assert_eq!(diagram.undo_depth(), depth + 1);

    let last_group = diagram.history().tasks().last().unwrap().group;
    let group_size = diagram
        .history()
        .tasks()
        .iter()
        .filter(|t| t.group == last_group)
        .count();
    assert_eq!(group_size, 3);

    assert!(diagram.undo());
    assert_eq!(snapshot(&diagram), before);
}

#[test]
fn test_set_bounds_moves_attached_links() {
    let (mut diagram, a, b) = two_nodes();
    let link = diagram.add_link(a, b, "", None, None).unwrap();
    let before = diagram.link(link).unwrap().points.clone();

    assert!(diagram.set_bounds(b, Rect::new(300.0, 400.0, 100.0, 60.0)));
    let after = diagram.link(link).unwrap().points.clone();
    assert_ne!(before, after);
    assert!(diagram.node(b).unwrap().contains_point(*after.last().unwrap(), 0.01));

    assert!(diagram.undo());
    assert_eq!(diagram.link(link).unwrap().points, before);
}

#[test]
fn test_orthogonal_link_reroutes_with_node() {
    let (mut diagram, a, b) = two_nodes();
    let link = diagram
        .add_link_styled(a, b, "", None, None, LineStyle::Orthogonal)
        .unwrap();
    diagram.set_bounds(b, Rect::new(500.0, -200.0, 100.0, 60.0));

    let points = &diagram.link(link).unwrap().points;
    for pair in points.windows(2) {
        let axis_aligned = (pair[0].x - pair[1].x).abs() < 1e-6 || (pair[0].y - pair[1].y).abs() < 1e-6;
        assert!(axis_aligned, "{pair:?}");
    }
}

#[test]
fn test_point_edits_follow_line_style() {
    let (mut diagram, a, b) = two_nodes();
    let poly = diagram.add_link(a, b, "", None, None).unwrap();

    assert!(!diagram.remove_point(poly, 1), "two-point link has nothing to remove");
    assert!(diagram.add_point(poly, 1, Point::new(200.0, 0.0)));
    assert!(!diagram.add_point(poly, 0, Point::new(0.0, 0.0)));
    assert_eq!(diagram.link(poly).unwrap().points.len(), 3);
    assert!(diagram.move_point(poly, 1, Point::new(220.0, 10.0)));
    assert_eq!(diagram.link(poly).unwrap().points[1], Point::new(220.0, 10.0));
    assert!(diagram.remove_point(poly, 1));
    assert_eq!(diagram.link(poly).unwrap().points.len(), 2);

    let ortho = diagram
        .add_link_styled(b, a, "", None, None, LineStyle::Orthogonal)
        .unwrap();
    assert!(!diagram.add_point(ortho, 1, Point::new(0.0, 0.0)));
    assert!(!diagram.move_point(ortho, 1, Point::new(0.0, 0.0)));

    let bezier = diagram
        .add_link_styled(a, b, "", None, None, LineStyle::Bezier)
        .unwrap();
    assert_eq!(diagram.link(bezier).unwrap().points.len(), 4);
    assert!(!diagram.add_point(bezier, 1, Point::new(0.0, 0.0)));
    assert!(diagram.move_point(bezier, 1, Point::new(50.0, 200.0)));
}

#[test]
fn test_clear_points_resets_shape() {
    let (mut diagram, a, b) = two_nodes();
    let link = diagram.add_link(a, b, "", None, None).unwrap();
    let initial = diagram.link(link).unwrap().points.clone();
    diagram.add_point(link, 1, Point::new(10.0, 400.0));
    diagram.add_point(link, 1, Point::new(10.0, 300.0));

    assert!(diagram.clear_points(link));
    assert_eq!(diagram.link(link).unwrap().points, initial);
}

#[test]
fn test_set_line_style_converts_points() {
    let (mut diagram, a, b) = two_nodes();
    let link = diagram.add_link(a, b, "", None, None).unwrap();

    assert!(diagram.set_line_style(link, LineStyle::Bezier));
    assert_eq!(diagram.link(link).unwrap().points.len(), 4);
    assert!(diagram.set_line_style(link, LineStyle::Database));
    assert_eq!(diagram.link(link).unwrap().points.len(), 2);
    assert!(diagram.set_line_style(link, LineStyle::Orthogonal));
    assert!(diagram.link(link).unwrap().points.len() >= 4);

    assert!(diagram.undo());
    assert_eq!(diagram.link(link).unwrap().style, LineStyle::Database);
}

#[test]
fn test_relink_destination() {
    let (mut diagram, a, b) = two_nodes();
    let c = diagram.add_node(0.0, 300.0, 100.0, 60.0, "c");
    let link = diagram.add_link(a, b, "", None, None).unwrap();

    assert!(diagram.set_destination(link, c, None));
    assert_eq!(diagram.link(link).unwrap().destination, c);
    assert!(diagram.links_of(b).is_empty());

    assert!(diagram.undo());
    assert_eq!(diagram.link(link).unwrap().destination, b);
}

#[test]
fn test_relink_respects_policy() {
    let (mut diagram, a, b) = two_nodes();
    diagram.set_link_policy(false, false);
    let c = diagram.add_node(0.0, 300.0, 100.0, 60.0, "c");
    let first = diagram.add_link(a, b, "", None, None).unwrap();
    let second = diagram.add_link(a, c, "", None, None).unwrap();

    assert!(!diagram.set_destination(second, b, None));
    assert!(!diagram.set_origin(first, b, None));
    // Relinking a link onto its own current ends is not a duplicate.
    assert!(diagram.set_destination(first, b, None));
}

#[test]
fn test_text_edit_is_undoable() {
    let (mut diagram, a, _) = two_nodes();
    assert!(diagram.set_text(a, "renamed"));
    assert_eq!(diagram.node(a).unwrap().text, "renamed");
    diagram.undo();
    assert_eq!(diagram.node(a).unwrap().text, "a");
}

#[test]
fn test_z_order() {
    let (mut diagram, a, b) = two_nodes();
    let c = diagram.add_node(50.0, 30.0, 100.0, 60.0, "c");
    assert_eq!(diagram.hit_test(Point::new(60.0, 40.0)), Some(c));

    assert!(diagram.bring_to_front(a));
    assert_eq!(diagram.item(a).unwrap().index, 2);
    assert_eq!(diagram.hit_test(Point::new(60.0, 40.0)), Some(a));

    assert!(diagram.send_to_back(a));
    assert_eq!(diagram.item(a).unwrap().index, 0);
    for (i, item) in diagram.items().enumerate() {
        assert_eq!(item.index, i);
    }

    diagram.undo();
    diagram.undo();
    let order: Vec<_> = diagram.items().map(|i| i.id).collect();
    assert_eq!(order, vec![a, b, c]);
}

#[test]
fn test_move_selection_translates_links_between_moved_nodes() {
    let (mut diagram, a, b) = two_nodes();
    let c = diagram.add_node(0.0, 300.0, 100.0, 60.0, "c");
    let inner = diagram.add_link(a, b, "", None, None).unwrap();
    let outer = diagram.add_link(b, c, "", None, None).unwrap();
    let inner_before = diagram.link(inner).unwrap().points.clone();
    let outer_before = diagram.link(outer).unwrap().points.clone();

    diagram.select(a, false);
    diagram.select(b, true);
    assert!(diagram.move_selection(10.0, 5.0));

    let shifted: Vec<Point> = inner_before.iter().map(|p| p.offset(10.0, 5.0)).collect();
    assert_eq!(diagram.link(inner).unwrap().points, shifted);
    assert_ne!(diagram.link(outer).unwrap().points[0], outer_before[0]);
    assert_eq!(diagram.node(a).unwrap().bounds, Rect::new(10.0, 5.0, 100.0, 60.0));

    diagram.undo();
    assert_eq!(diagram.link(inner).unwrap().points, inner_before);
    assert_eq!(diagram.link(outer).unwrap().points, outer_before);
}

#[test]
fn test_move_with_empty_selection_is_declined() {
    let (mut diagram, _, _) = two_nodes();
    let depth = diagram.undo_depth();
    assert!(!diagram.move_selection(5.0, 5.0));
    assert_eq!(diagram.undo_depth(), depth);
}

#[test]
fn test_delete_selected() {
    let (mut diagram, a, b) = two_nodes();
    diagram.add_link(a, b, "", None, None).unwrap();
    diagram.select(a, false);

    assert_eq!(diagram.delete_selected(), 1);
    assert_eq!(diagram.len(), 1);
    assert!(diagram.node(b).is_some());
    diagram.undo();
    assert_eq!(diagram.len(), 3);
}

#[test]
fn test_delete_selected_invalidates_once_and_reindexes() {
    let (mut diagram, a, b) = two_nodes();
    let c = diagram.add_node(0.0, 300.0, 100.0, 60.0, "c");
    let d = diagram.add_node(300.0, 400.0, 100.0, 60.0, "d");
    diagram.add_link(a, b, "", None, None).unwrap();
    diagram.add_link(b, c, "", None, None).unwrap();
    let keep = diagram.add_link(c, d, "", None, None).unwrap();
    diagram.select(a, false);
    diagram.select(b, true);
    let log = record_invalidations(&mut diagram);

    assert_eq!(diagram.delete_selected(), 2);
    assert_eq!(log.borrow().len(), 1);
    assert!(!diagram.is_updating());

    let region = log.borrow()[0].unwrap();
    assert!(region.contains_rect(&Rect::new(0.0, 0.0, 100.0, 60.0)));
    let extent = diagram.extent().unwrap();
    let mut found = diagram.items_in(&extent);
    found.sort_unstable();
    assert_eq!(found, vec![c, d, keep]);
    for item in diagram.items() {
        assert_eq!(item.bounds, item.compute_bounds());
    }
}

#[test]
fn test_delete_with_empty_selection_is_quiet() {
    let (mut diagram, _, _) = two_nodes();
    let log = record_invalidations(&mut diagram);
    assert_eq!(diagram.delete_selected(), 0);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_move_selection_invalidates_once_and_reindexes() {
    let (mut diagram, a, b) = two_nodes();
    let c = diagram.add_node(0.0, 300.0, 100.0, 60.0, "c");
    diagram.add_link(a, b, "", None, None).unwrap();
    diagram.add_link(b, c, "", None, None).unwrap();
    diagram.select(a, false);
    diagram.select(b, true);
    let log = record_invalidations(&mut diagram);

    assert!(diagram.move_selection(30.0, 30.0));
    assert_eq!(log.borrow().len(), 1);

    let region = log.borrow()[0].unwrap();
    assert!(region.contains_rect(&Rect::new(0.0, 0.0, 100.0, 60.0)));
    assert!(region.contains_rect(&Rect::new(330.0, 180.0, 100.0, 60.0)));
    assert!(diagram.items_in(&Rect::new(60.0, 60.0, 1.0, 1.0)).contains(&a));
    assert!(!diagram.items_in(&Rect::new(5.0, 5.0, 1.0, 1.0)).contains(&a));
    for item in diagram.items() {
        assert_eq!(item.bounds, item.compute_bounds());
    }
}

#[test]
fn test_selection_is_not_undoable() {
    let (mut diagram, a, _) = two_nodes();
    let depth = diagram.undo_depth();
    diagram.select(a, false);
    diagram.select_all();
    diagram.deselect_all();
    assert_eq!(diagram.undo_depth(), depth);
}

#[test]
fn test_select_in_rect_needs_full_containment() {
    let (mut diagram, a, _) = two_nodes();
    let count = diagram.select_in_rect(&Rect::new(-10.0, -10.0, 350.0, 200.0), false);
    assert_eq!(count, 1);
    assert_eq!(diagram.selected_items(), vec![a]);
}

#[test]
fn test_explicit_action_groups_operations() {
    let (mut diagram, a, b) = two_nodes();
    let depth = diagram.undo_depth();

    assert!(diagram.begin_action(ActionCode::Custom(7)));
    diagram.set_text(a, "x");
    diagram.set_text(b, "y");
    diagram.add_link(a, b, "", None, None);
    diagram.end_action();

    assert_eq!(diagram.undo_depth(), depth + 1);
    assert!(diagram.undo());
    assert_eq!(diagram.undo_depth(), depth);
    assert_eq!(diagram.node(a).unwrap().text, "a");
    assert_eq!(diagram.len(), 2);
}

#[test]
fn test_reserved_action_code_is_rejected() {
    let mut diagram = Diagram::new();
    assert!(!diagram.begin_action(ActionCode::None));
}

#[test]
fn test_skip_undo_applies_without_recording() {
    let (mut diagram, a, _) = two_nodes();
    let depth = diagram.undo_depth();
    diagram.set_skip_undo(true);
    diagram.set_text(a, "quiet");
    diagram.set_skip_undo(false);

    assert_eq!(diagram.node(a).unwrap().text, "quiet");
    assert_eq!(diagram.undo_depth(), depth);
}

#[test]
fn test_disabling_undo_clears_history() {
    let (mut diagram, _, _) = two_nodes();
    diagram.set_undo_enabled(false);
    assert!(!diagram.can_undo());
    diagram.add_node(0.0, 0.0, 10.0, 10.0, "");
    assert!(!diagram.can_undo());
}

#[test]
fn test_undo_limit_drops_oldest() {
    let mut diagram = Diagram::new();
    diagram.set_undo_limit(3);
    for i in 0..5 {
        diagram.add_node(i as f64 * 20.0, 0.0, 10.0, 10.0, "");
    }
    assert_eq!(diagram.undo_depth(), 3);
    while diagram.undo() {}
    assert_eq!(diagram.len(), 2);
}

#[test]
fn test_clear_is_one_step_and_invalidates_everything() {
    let (mut diagram, a, b) = two_nodes();
    diagram.add_link(a, b, "", None, None);
    let log = record_invalidations(&mut diagram);

    diagram.clear();
    assert!(diagram.is_empty());
    assert_eq!(log.borrow().last(), Some(&None));

    diagram.undo();
    assert_eq!(diagram.len(), 3);
    let order: Vec<_> = diagram.items().map(|i| i.index).collect();
    assert_eq!(order, vec![0, 1, 2]);
}

#[test]
fn test_invalidation_covers_old_and_new_bounds() {
    let (mut diagram, a, _) = two_nodes();
    let log = record_invalidations(&mut diagram);

    diagram.set_bounds(a, Rect::new(500.0, 500.0, 100.0, 60.0));
    let calls = log.borrow();
    assert_eq!(calls.len(), 1);
    let region = calls[0].unwrap();
    assert!(region.contains_rect(&Rect::new(0.0, 0.0, 100.0, 60.0)));
    assert!(region.contains_rect(&Rect::new(500.0, 500.0, 100.0, 60.0)));
}

#[test]
fn test_selected_items_invalidate_with_margin() {
    let (mut diagram, a, _) = two_nodes();
    let log = record_invalidations(&mut diagram);
    diagram.select(a, false);

    let region = log.borrow()[0].unwrap();
    let margin = diagram.render_options().selection_margin;
    assert!(region.contains_rect(&Rect::new(0.0, 0.0, 100.0, 60.0).inflate(margin, margin)));
}

#[test]
fn test_declined_operation_does_not_invalidate() {
    let (mut diagram, a, _) = two_nodes();
    let log = record_invalidations(&mut diagram);
    assert!(!diagram.set_bounds(999, Rect::new(0.0, 0.0, 1.0, 1.0)));
    assert!(!diagram.add_point(a, 1, Point::new(0.0, 0.0)));
    assert!(log.borrow().is_empty());
}

#[test]
fn test_bulk_update_defers_bounds_and_invalidation() {
    let mut diagram = Diagram::new();
    let log = record_invalidations(&mut diagram);

    diagram.begin_update();
    let mut ids = Vec::new();
    for i in 0..20 {
        ids.push(diagram.add_node(i as f64 * 50.0, (i % 4) as f64 * 80.0, 40.0, 30.0, ""));
    }
    assert!(diagram.is_updating());
    assert!(log.borrow().is_empty());
    diagram.end_update();

    assert_eq!(log.borrow().len(), 1);
    let extent = diagram.extent().unwrap();
    assert_eq!(diagram.items_in(&extent).len(), 20);
    for id in ids {
        let item = diagram.item(id).unwrap();
        assert_eq!(item.bounds, item.compute_bounds());
    }
}

#[test]
fn test_preview_commit_records_one_group() {
    let (mut diagram, a, b) = two_nodes();
    let link = diagram.add_link(a, b, "", None, None).unwrap();
    let depth = diagram.undo_depth();
    diagram.select(a, false);

    diagram.begin_preview();
    for _ in 0..5 {
        diagram.move_selection(4.0, 2.0);
    }
    assert_eq!(diagram.undo_depth(), depth);
    let recorded = diagram.commit_preview(ActionCode::Move);

    assert_eq!(recorded, 2, "one task for the node, one for the link");
    assert_eq!(diagram.undo_depth(), depth + 1);
    assert_eq!(diagram.node(a).unwrap().bounds, Rect::new(20.0, 10.0, 100.0, 60.0));

    diagram.undo();
    assert_eq!(diagram.node(a).unwrap().bounds, Rect::new(0.0, 0.0, 100.0, 60.0));
    assert!(matches!(diagram.item(link).unwrap().kind, ItemKind::Link(_)));
}

#[test]
fn test_preview_drag_takes_one_group_id() {
    let (mut diagram, a, b) = two_nodes();
    diagram.add_link(a, b, "", None, None).unwrap();
    let before = diagram.history().tasks().last().unwrap().group;
    diagram.select(a, false);

    diagram.begin_preview();
    for _ in 0..12 {
        diagram.move_selection(1.0, 1.0);
        diagram.set_bounds(b, Rect::new(300.0, 150.0, 110.0, 60.0));
    }
    diagram.commit_preview(ActionCode::Move);

    let groups: Vec<u64> = diagram
        .history()
        .tasks()
        .iter()
        .map(|t| t.group)
        .filter(|g| *g > before)
        .collect();
    assert!(!groups.is_empty());
    assert!(groups.iter().all(|g| *g == before + 1), "{groups:?}");
}

#[test]
fn test_preview_cancel_restores() {
    let (mut diagram, a, _) = two_nodes();
    let depth = diagram.undo_depth();
    diagram.select(a, false);

    diagram.begin_preview();
    diagram.move_selection(40.0, 40.0);
    assert!(diagram.is_previewing());
    assert!(diagram.cancel_preview());

    assert!(!diagram.is_previewing());
    assert_eq!(diagram.node(a).unwrap().bounds, Rect::new(0.0, 0.0, 100.0, 60.0));
    assert_eq!(diagram.undo_depth(), depth);
    assert!(!diagram.cancel_preview());
}

#[test]
fn test_remove_last_task_forgets_change() {
    let (mut diagram, a, _) = two_nodes();
    diagram.set_text(a, "temp");
    assert!(diagram.remove_last_task());
    assert_eq!(diagram.node(a).unwrap().text, "a");
    assert!(!diagram.can_redo());
}

#[test]
fn test_linear_scan_matches_index() {
    let (mut diagram, a, b) = two_nodes();
    diagram.add_link(a, b, "", None, None);
    let region = Rect::new(50.0, 20.0, 300.0, 150.0);
    let indexed = diagram.items_in(&region);

    diagram.set_spatial_index(false);
    assert_eq!(diagram.items_in(&region), indexed);
    assert_eq!(diagram.hit_test(Point::new(350.0, 180.0)), Some(b));
}

#[test]
fn test_hit_test_link_with_tolerance() {
    let (mut diagram, a, b) = two_nodes();
    diagram.set_bounds(b, Rect::new(300.0, 0.0, 100.0, 60.0));
    let link = diagram.add_link(a, b, "", None, None).unwrap();

    assert_eq!(diagram.hit_test(Point::new(200.0, 33.0)), Some(link));
    assert_eq!(diagram.hit_test(Point::new(200.0, 50.0)), None);
}
