//! Headless walkthrough of the editing engine: builds a small flowchart,
//! edits it the way a pointer would, and logs what the host would see.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use tracing::info;

use flowkit::designer::renderer::{render_all, PathRole, RenderPath};
use flowkit::{
    editor_from_config, init_logging, load_config, ActionCode, ItemId, LineStyle, Modifiers,
    Point, RenderSurface, BUILD_DATE, VERSION,
};

#[derive(Default)]
struct DrawCounter {
    outlines: usize,
    links: usize,
    handles: usize,
    texts: usize,
}

impl RenderSurface for DrawCounter {
    fn draw_path(&mut self, _id: ItemId, _path: &RenderPath, role: PathRole) {
        match role {
            PathRole::NodeOutline => self.outlines += 1,
            PathRole::Link => self.links += 1,
            PathRole::SelectionHandle => self.handles += 1,
        }
    }

    fn draw_text(&mut self, _id: ItemId, _anchor: Point, _text: &str) {
        self.texts += 1;
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!(version = VERSION, built = BUILD_DATE, "Flowkit demo");

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;
    let (mut diagram, mut controller) = editor_from_config(&config, 1024.0, 768.0);

    let repaints = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&repaints);
    diagram.set_invalidate_callback(Box::new(move |_| *counter.borrow_mut() += 1));

    diagram.begin_action(ActionCode::Create);
    let start = diagram.add_node(40.0, 40.0, 120.0, 60.0, "Start");
    let check = diagram.add_node(300.0, 40.0, 120.0, 80.0, "Check input");
    let done = diagram.add_node(300.0, 260.0, 120.0, 60.0, "Done");
    diagram.end_action();

    diagram.set_default_line_style(LineStyle::Orthogonal);
    let first = diagram
        .add_link(start, check, "", None, None)
        .context("linking start to check")?;
    let second = diagram
        .add_link(check, done, "ok", None, None)
        .context("linking check to done")?;
    info!(
        first_points = diagram.link(first).map_or(0, |l| l.points.len()),
        second_points = diagram.link(second).map_or(0, |l| l.points.len()),
        "Links routed"
    );

    // Drag "Done" to the left; the routed link follows.
    controller.pointer_down(&mut diagram, 360.0, 290.0, Modifiers::NONE);
    controller.pointer_move(&mut diagram, 250.0, 320.0, Modifiers::NONE);
    controller.pointer_up(&mut diagram, 140.0, 350.0, Modifiers::NONE);
    info!(
        bounds = ?diagram.node(done).map(|n| n.bounds),
        undo_depth = diagram.undo_depth(),
        "Node dragged"
    );

    controller.zoom_to_fit(&diagram);
    info!(viewport = %controller.viewport(), "Zoomed to fit");

    let mut surface = DrawCounter::default();
    let drawn = render_all(&diagram, &mut surface);
    info!(
        drawn,
        outlines = surface.outlines,
        links = surface.links,
        handles = surface.handles,
        texts = surface.texts,
        "Rendered"
    );

    while diagram.undo() {}
    info!(
        items = diagram.len(),
        redo_depth = diagram.redo_depth(),
        repaints = *repaints.borrow(),
        "Undid everything"
    );
    Ok(())
}
