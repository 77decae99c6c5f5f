use lyon::path::Path;

use flowkit_designer::{render_all, render_region, Diagram, PathRole, Point, RenderSurface, Rect};

#[derive(Default)]
struct Recorder {
    paths: Vec<(u64, PathRole)>,
    texts: Vec<(u64, String)>,
}

impl RenderSurface for Recorder {
    fn draw_path(&mut self, id: u64, _path: &Path, role: PathRole) {
        self.paths.push((id, role));
    }

    fn draw_text(&mut self, id: u64, _anchor: Point, text: &str) {
        self.texts.push((id, text.to_string()));
    }
}

#[test]
fn test_render_all_in_z_order() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(0.0, 0.0, 100.0, 60.0, "a");
    let b = diagram.add_node(300.0, 0.0, 100.0, 60.0, "");
    let link = diagram.add_link(a, b, "flows", None, None).unwrap();
    diagram.send_to_back(link);

    let mut surface = Recorder::default();
    assert_eq!(render_all(&diagram, &mut surface), 3);
    assert_eq!(
        surface.paths,
        vec![(link, PathRole::Link), (a, PathRole::NodeOutline), (b, PathRole::NodeOutline)]
    );
    assert_eq!(
        surface.texts,
        vec![(link, "flows".to_string()), (a, "a".to_string())]
    );
}

#[test]
fn test_render_region_skips_distant_items() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(0.0, 0.0, 100.0, 60.0, "");
    diagram.add_node(500.0, 500.0, 100.0, 60.0, "");

    let mut surface = Recorder::default();
    let drawn = render_region(&diagram, &Rect::new(-10.0, -10.0, 50.0, 50.0), &mut surface);
    assert_eq!(drawn, 1);
    assert_eq!(surface.paths, vec![(a, PathRole::NodeOutline)]);
}

#[test]
fn test_selection_handles_drawn_last() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(0.0, 0.0, 100.0, 60.0, "");
    let b = diagram.add_node(50.0, 20.0, 100.0, 60.0, "");
    diagram.select(a, false);

    let mut surface = Recorder::default();
    render_all(&diagram, &mut surface);
    assert_eq!(
        surface.paths,
        vec![
            (a, PathRole::NodeOutline),
            (b, PathRole::NodeOutline),
            (a, PathRole::SelectionHandle),
        ]
    );
}

#[test]
fn test_empty_diagram_draws_nothing() {
    let diagram = Diagram::new();
    let mut surface = Recorder::default();
    assert_eq!(render_all(&diagram, &mut surface), 0);
    assert!(surface.paths.is_empty());
}
