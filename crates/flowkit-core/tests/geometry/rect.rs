use flowkit_core::{Point, Rect};

#[test]
fn test_rect_edges() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.right(), 40.0);
    assert_eq!(r.bottom(), 60.0);
    assert_eq!(r.center(), Point::new(25.0, 40.0));
}

#[test]
fn test_normalized_negative_extent() {
    let r = Rect::new(50.0, 50.0, -20.0, -10.0).normalized();
    assert_eq!(r, Rect::new(30.0, 40.0, 20.0, 10.0));
}

#[test]
fn test_union_and_intersection() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(5.0, 5.0, 10.0, 10.0);
    assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 15.0, 15.0));
    assert_eq!(a.intersection(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));

    let far = Rect::new(100.0, 100.0, 1.0, 1.0);
    assert!(a.intersection(&far).is_none());
}

#[test]
fn test_zero_size_rect_intersects() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let dot = Rect::new(10.0, 10.0, 0.0, 0.0);
    assert!(a.intersects(&dot));
    assert!(a.contains_rect(&dot));
}

#[test]
fn test_contains_point_edges_inclusive() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contains_point(&Point::new(0.0, 0.0)));
    assert!(r.contains_point(&Point::new(10.0, 10.0)));
    assert!(!r.contains_point(&Point::new(10.1, 5.0)));
}

#[test]
fn test_inflate_and_offset() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0).inflate(2.0, 3.0);
    assert_eq!(r, Rect::new(-2.0, -3.0, 14.0, 16.0));
    assert_eq!(r.offset(2.0, 3.0), Rect::new(0.0, 0.0, 14.0, 16.0));
}

#[test]
fn test_bounding_of_points() {
    assert!(Rect::bounding(&[]).is_none());
    let r = Rect::bounding(&[
        Point::new(5.0, 1.0),
        Point::new(-5.0, 3.0),
        Point::new(2.0, 9.0),
    ]);
    assert_eq!(r, Some(Rect::new(-5.0, 1.0, 10.0, 8.0)));
}

#[test]
fn test_corners_clockwise() {
    let c = Rect::new(0.0, 0.0, 2.0, 1.0).corners();
    assert_eq!(c[0], Point::new(0.0, 0.0));
    assert_eq!(c[1], Point::new(2.0, 0.0));
    assert_eq!(c[2], Point::new(2.0, 1.0));
    assert_eq!(c[3], Point::new(0.0, 1.0));
}
