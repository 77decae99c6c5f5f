use flowkit_core::InteractionOptions;
use flowkit_designer::{Point, Rect, Viewport};

#[test]
fn test_viewport_creation() {
    let viewport = Viewport::new(800.0, 600.0);
    assert_eq!(viewport.zoom(), 1.0);
    assert_eq!(viewport.pan_x(), 0.0);
    assert_eq!(viewport.pan_y(), 0.0);
    assert_eq!(viewport.canvas_width(), 800.0);
}

#[test]
fn test_pixel_world_round_trip() {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.set_zoom(2.5);
    viewport.set_pan(-120.0, 40.0);

    let world = viewport.pixel_to_world(310.0, 275.0);
    let (px, py) = viewport.world_to_pixel(world.x, world.y);
    assert!((px - 310.0).abs() < 1e-9);
    assert!((py - 275.0).abs() < 1e-9);
    // No axis flip: larger pixel y is larger world y.
    assert!(viewport.pixel_to_world(0.0, 100.0).y > viewport.pixel_to_world(0.0, 0.0).y);
}

#[test]
fn test_zoom_is_clamped() {
    let options = InteractionOptions {
        min_zoom: 0.5,
        max_zoom: 4.0,
        ..InteractionOptions::default()
    };
    let mut viewport = Viewport::with_options(800.0, 600.0, &options);
    viewport.set_zoom(100.0);
    assert_eq!(viewport.zoom(), 4.0);
    viewport.set_zoom(0.01);
    assert_eq!(viewport.zoom(), 0.5);
    viewport.set_zoom(f64::NAN);
    assert_eq!(viewport.zoom(), 0.5);
}

#[test]
fn test_zoom_to_point_keeps_screen_position() {
    let mut viewport = Viewport::new(800.0, 600.0);
    let anchor = Point::new(250.0, 125.0);
    let before = viewport.world_point_to_pixel(&anchor);
    viewport.zoom_to_point(&anchor, 3.0);
    let after = viewport.world_point_to_pixel(&anchor);

    assert_eq!(viewport.zoom(), 3.0);
    assert!((before.0 - after.0).abs() < 1e-9);
    assert!((before.1 - after.1).abs() < 1e-9);
}

#[test]
fn test_fit_to_bounds_centres_content() {
    let mut viewport = Viewport::new(800.0, 600.0);
    let content = Rect::new(1000.0, 1000.0, 400.0, 100.0);
    viewport.fit_to_bounds(&content, 0.05);

    assert!((viewport.zoom() - 1.8).abs() < 1e-9);
    let (cx, cy) = viewport.world_point_to_pixel(&content.center());
    assert!((cx - 400.0).abs() < 1e-9);
    assert!((cy - 300.0).abs() < 1e-9);
    assert!(viewport.visible_world().contains_rect(&content));
}

#[test]
fn test_fit_to_nothing_resets() {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.set_zoom(3.0);
    viewport.pan_by(50.0, 50.0);
    viewport.fit_to_items(None);
    assert_eq!(viewport.zoom(), 1.0);
    assert_eq!(viewport.pan_x(), 0.0);
}

#[test]
fn test_zoom_in_out_steps() {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.zoom_in();
    assert!((viewport.zoom() - 1.2).abs() < 1e-9);
    viewport.zoom_out();
    assert!((viewport.zoom() - 1.0).abs() < 1e-9);
}

#[test]
fn test_visible_world_follows_pan() {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.pan_by(100.0, 50.0);
    assert_eq!(viewport.visible_world(), Rect::new(-100.0, -50.0, 800.0, 600.0));
}
