use flowkit_core::geometry::{
    cubic_bezier_point, database_curve, flatten_bezier, flatten_bezier_chain, rounded_corners,
    spline_points,
};
use flowkit_core::Point;

#[test]
fn test_flatten_bezier_has_twelve_points() {
    let p0 = Point::new(0.0, 0.0);
    let p3 = Point::new(90.0, 0.0);
    let pts = flatten_bezier(p0, Point::new(30.0, 60.0), Point::new(60.0, 60.0), p3);
    assert_eq!(pts.len(), 12);
    assert_eq!(pts[0], p0);
    assert_eq!(pts[11], p3);
}

#[test]
fn test_bezier_midpoint() {
    let p = cubic_bezier_point(
        Point::new(0.0, 0.0),
        Point::new(0.0, 100.0),
        Point::new(100.0, 100.0),
        Point::new(100.0, 0.0),
        0.5,
    );
    assert!(p.approx_eq(&Point::new(50.0, 75.0), 1e-9));
}

#[test]
fn test_bezier_chain_shares_anchor() {
    let pts: Vec<Point> = (0..7).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect();
    let flat = flatten_bezier_chain(&pts);
    // Two segments of 12 samples sharing their middle anchor.
    assert_eq!(flat.len(), 23);
    assert_eq!(flat.last(), Some(&Point::new(60.0, 0.0)));
}

#[test]
fn test_spline_passes_through_control_points() {
    let ctrl = [
        Point::new(0.0, 0.0),
        Point::new(50.0, 40.0),
        Point::new(100.0, 0.0),
    ];
    let pts = spline_points(&ctrl);
    assert_eq!(pts.len(), 21);
    assert_eq!(pts[0], ctrl[0]);
    assert!(pts[10].approx_eq(&ctrl[1], 1e-9));
    assert_eq!(pts[20], ctrl[2]);
}

#[test]
fn test_spline_short_input_unchanged() {
    let ctrl = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
    assert_eq!(spline_points(&ctrl), ctrl.to_vec());
}

#[test]
fn test_database_curve_is_horizontal_at_ends() {
    let from = Point::new(0.0, 0.0);
    let to = Point::new(200.0, 80.0);
    let c = database_curve(from, to);
    assert_eq!(c[0], from);
    assert_eq!(c[1].y, from.y);
    assert_eq!(c[2].y, to.y);
    assert_eq!(c[3], to);
    assert_eq!(c[1].x, 100.0);
}

#[test]
fn test_rounded_corners_clamped_radius() {
    let pts = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 100.0),
    ];
    let corners = rounded_corners(&pts, 20.0);
    assert_eq!(corners.len(), 1);
    // Radius clamped to half of the 10-unit incoming segment.
    assert!(corners[0].start.approx_eq(&Point::new(5.0, 0.0), 1e-9));
    assert!(corners[0].end.approx_eq(&Point::new(10.0, 5.0), 1e-9));
    assert_eq!(corners[0].corner, Point::new(10.0, 0.0));
}

#[test]
fn test_rounded_corners_zero_radius() {
    let pts = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
    ];
    assert!(rounded_corners(&pts, 0.0).is_empty());
}
