//! End-to-end tests: layout and config files, script replay, painting

use std::fs;

use dockyard_core::config::DockConfig;
use dockyard_core::drag::DragPhase;
use dockyard_core::drop_target::DropTarget;
use dockyard_core::geometry::{Point, Rect};
use dockyard_core::host::{DockingHost, DragOutcome, PointerEvent};
use dockyard_core::render::{DrawCommand, RecordingSink, paint_indicators};
use dockyard_core::script::{Script, ScriptStep, replay};
use dockyard_core::tree::{LayoutSpec, Orientation, create_tree};
use tempfile::TempDir;

const LAYOUT: &str = r#"
orientation = "horizontal"

[[slots]]
weight = 1
[slots.node]
type = "tab_group"
tabs = [{ title = "Explorer" }, { title = "Search" }]

[[slots]]
weight = 3
[slots.node]
type = "tab_group"
tabs = [{ title = "main.rs" }, { title = "lib.rs", closable = false }]
"#;

fn host_from_files(dir: &TempDir, config: &str) -> DockingHost {
    let layout_path = dir.path().join("layout.toml");
    let config_path = dir.path().join("dockyard.toml");
    fs::write(&layout_path, LAYOUT).unwrap();
    fs::write(&config_path, config).unwrap();

    let spec = LayoutSpec::load(&layout_path).unwrap();
    let config = DockConfig::load(&config_path).unwrap();
    let tree = create_tree(&spec).unwrap();
    DockingHost::new(tree, config, Rect::new(0.0, 0.0, 800.0, 600.0))
}

#[test]
fn test_layout_and_config_files_drive_geometry() {
    let dir = TempDir::new().unwrap();
    let host = host_from_files(&dir, "tab_bar_height = 24\n");

    let tree = host.tree();
    let root = tree.split(tree.root()).unwrap();
    assert_eq!(root.orientation, Orientation::Horizontal);
    let explorer = tree.group(root.children[0]).unwrap();
    assert_eq!(tree.node(root.children[0]).unwrap().bounds.width, 200.0);
    assert_eq!(explorer.tab_bar.height, 24.0);
    assert_eq!(explorer.tabs[1].header, Rect::new(100.0, 0.0, 100.0, 24.0));
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dockyard.toml");
    fs::write(&path, "placeholder_opacity = 2.0\n").unwrap();
    assert!(DockConfig::load(&path).is_err());
}

#[test]
fn test_script_moves_explorer_tab_into_editor() {
    let dir = TempDir::new().unwrap();
    let mut host = host_from_files(&dir, "");
    let script = Script::from_json(
        r#"{ "steps": [
            { "down": { "x": 50, "y": 10 } },
            { "move": { "x": 50, "y": 200 } },
            { "move": { "x": 450, "y": 10 } },
            { "up": { "x": 450, "y": 10 } }
        ] }"#,
    )
    .unwrap();

    let records = replay(&mut host, &script);

    assert_eq!(records.len(), 4);
    assert_eq!(records[1].phase, DragPhase::Floating);
    assert!(records[1].events.contains(&"tab_detached_to_floating"));
    let Ok(Some(DragOutcome::Committed { group, target, .. })) = records[3].result else {
        panic!("expected a committed drop, got {:?}", records[3].result);
    };
    // the editor headers start at x 200: main.rs, lib.rs, then the strip
    assert_eq!(target, DropTarget::TabBar(2));
    let titles: Vec<_> = host
        .tree()
        .group(group)
        .unwrap()
        .tabs
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, ["main.rs", "lib.rs", "Explorer"]);
    assert!(records.iter().all(|r| !r.is_consistency_failure()));
    assert!(host.hooks_mut().is_empty());
}

#[test]
fn test_script_steps_without_a_session_report_idle() {
    let dir = TempDir::new().unwrap();
    let mut host = host_from_files(&dir, "");
    let script = Script {
        steps: vec![
            ScriptStep::Up(Point::new(10.0, 10.0)),
            ScriptStep::CaptureLost,
            ScriptStep::CloseFloating,
        ],
    };

    let records = replay(&mut host, &script);
    assert!(
        records
            .iter()
            .all(|r| matches!(r.result, Ok(Some(DragOutcome::Idle))))
    );
}

#[test]
fn test_painting_follows_the_floating_tab() {
    let dir = TempDir::new().unwrap();
    let mut host = host_from_files(&dir, "");
    let mut sink = RecordingSink::new();

    paint_indicators(&host, &mut sink);
    assert!(sink.commands.is_empty());

    host.on_pointer_down(PointerEvent::new(250.0, 10.0)).unwrap();
    host.on_pointer_move(PointerEvent::new(250.0, 200.0)).unwrap();
    // editor group: x 200..800, its grid centered on (500, 300)
    host.on_pointer_move(PointerEvent::new(500.0, 300.0)).unwrap();
    assert_eq!(host.drag().hover().target, DropTarget::Fill);

    paint_indicators(&host, &mut sink);
    let editor = Rect::new(200.0, 0.0, 600.0, 600.0);
    assert!(matches!(
        sink.commands.first(),
        Some(DrawCommand::Stroke { rect, .. }) if *rect == editor
    ));
    let style = &host.config().indicator;
    let hovered: Vec<_> = sink
        .fills()
        .filter(|c| matches!(c, DrawCommand::Fill { color, .. } if *color == style.hovered_fill))
        .collect();
    assert_eq!(hovered.len(), 1);
    assert_eq!(hovered[0].rect(), Rect::new(480.0, 280.0, 40.0, 40.0));
    // the preview covers the whole group for a fill drop
    assert_eq!(sink.commands.last().map(DrawCommand::rect), Some(editor));
}
