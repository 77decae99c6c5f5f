use std::io::Write;

use flowkit_designer::{Diagram, InteractionController, LineStyle, Modifiers, Viewport};
use flowkit_settings::{Config, SettingsError};

fn editor(config: &Config) -> (Diagram, InteractionController) {
    let diagram = Diagram::with_options(
        config.diagram.clone(),
        config.routing.clone(),
        config.rendering.clone(),
    );
    let viewport = Viewport::with_options(800.0, 600.0, &config.interaction);
    let controller = InteractionController::new(viewport, config.interaction.clone());
    (diagram, controller)
}

#[test]
fn test_config_file_drives_editor() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[diagram]\nundo_limit = 2\nallow_reflexive_links = false\n\n[routing]\northogonal_margin = 35.0\n\n[interaction]\nmax_zoom = 3.0"
    )
    .unwrap();

    let config = Config::load_from_file(file.path()).unwrap();
    let (mut diagram, mut controller) = editor(&config);

    assert_eq!(diagram.router().margin(), 35.0);
    let a = diagram.add_node(0.0, 0.0, 100.0, 60.0, "a");
    assert!(diagram.add_link(a, a, "", None, None).is_none());

    for i in 0..4 {
        diagram.add_node(200.0 + i as f64 * 150.0, 0.0, 100.0, 60.0, "");
    }
    assert_eq!(diagram.undo_depth(), 2);

    for _ in 0..20 {
        controller.wheel(400.0, 300.0, 1.0);
    }
    assert_eq!(controller.viewport().zoom(), 3.0);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::Read { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_pointer_session_round_trip() {
    let (mut diagram, mut controller) = editor(&Config::default());
    diagram.set_default_line_style(LineStyle::Orthogonal);
    let a = diagram.add_node(0.0, 0.0, 100.0, 60.0, "a");
    let b = diagram.add_node(400.0, 200.0, 100.0, 60.0, "b");
    let link = diagram.add_link(a, b, "", None, None).unwrap();
    let routed = diagram.link(link).unwrap().points.clone();

    controller.pointer_down(&mut diagram, 450.0, 230.0, Modifiers::NONE);
    controller.pointer_up(&mut diagram, 450.0, 330.0, Modifiers::NONE);
    assert_ne!(diagram.link(link).unwrap().points, routed);

    assert!(diagram.undo());
    assert_eq!(diagram.link(link).unwrap().points, routed);
}
