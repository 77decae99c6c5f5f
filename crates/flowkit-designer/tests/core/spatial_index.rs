use flowkit_designer::spatial_index::MIN_QUADRANT_SIZE;
use flowkit_designer::{Point, Rect, SpatialIndex};

fn sorted(mut ids: Vec<u64>) -> Vec<u64> {
    ids.sort_unstable();
    ids
}

#[test]
fn test_insert_query_remove() {
    let mut index = SpatialIndex::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
    let q1 = index.insert(1, Rect::new(10.0, 10.0, 20.0, 20.0));
    index.insert(2, Rect::new(600.0, 600.0, 20.0, 20.0));
    index.insert(3, Rect::new(490.0, 490.0, 20.0, 20.0));

    let mut out = Vec::new();
    index.query(&Rect::new(0.0, 0.0, 100.0, 100.0), &mut out);
    assert_eq!(out, vec![1]);

    out.clear();
    index.query(&Rect::new(0.0, 0.0, 1000.0, 1000.0), &mut out);
    assert_eq!(sorted(out), vec![1, 2, 3]);

    assert!(index.remove(1, q1));
    assert!(!index.remove(1, q1));
    assert_eq!(index.len(), 2);
}

#[test]
fn test_straddling_item_stays_high() {
    let mut index = SpatialIndex::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
    let q = index.insert(1, Rect::new(490.0, 490.0, 20.0, 20.0));
    assert_eq!(q, 0, "item across the centre lines belongs to the root");
    assert_eq!(index.stats().root_items, 1);
}

#[test]
fn test_items_outside_world_are_kept() {
    let mut index = SpatialIndex::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    index.insert(7, Rect::new(5000.0, 5000.0, 10.0, 10.0));
    let mut out = Vec::new();
    index.query_point(Point::new(5005.0, 5005.0), &mut out);
    assert_eq!(out, vec![7]);
}

#[test]
fn test_subdivision_stops_at_min_size() {
    let mut index = SpatialIndex::new(Rect::new(0.0, 0.0, 64.0, 64.0));
    index.insert(1, Rect::new(0.5, 0.5, 0.1, 0.1));
    let stats = index.stats();
    // 64 -> 32 -> 16 -> 8 -> 4, the 4-wide cell cannot split again.
    assert_eq!(stats.max_depth, 4);
    assert!(64.0 / 2f64.powi(stats.max_depth as i32) >= MIN_QUADRANT_SIZE);
}

#[test]
fn test_rebuild_grows_world_to_fit() {
    let mut index = SpatialIndex::default();
    let entries = vec![
        (1, Rect::new(-20000.0, 0.0, 10.0, 10.0)),
        (2, Rect::new(20000.0, 0.0, 10.0, 10.0)),
    ];
    let quadrants = index.rebuild(&entries);
    assert_eq!(quadrants.len(), 2);
    assert!(index.world().contains_rect(&entries[0].1));
    assert!(index.world().contains_rect(&entries[1].1));
}

#[test]
fn test_clear_keeps_world() {
    let mut index = SpatialIndex::new(Rect::new(0.0, 0.0, 500.0, 500.0));
    index.insert(1, Rect::new(1.0, 1.0, 2.0, 2.0));
    index.clear();
    assert!(index.is_empty());
    assert_eq!(index.world(), Rect::new(0.0, 0.0, 500.0, 500.0));
    assert_eq!(index.stats().total_quadrants, 1);
}
