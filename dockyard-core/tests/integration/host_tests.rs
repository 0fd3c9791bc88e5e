//! Integration tests for pointer-driven docking through `DockingHost`
//!
//! All scenarios use the default configuration: a 28px tab bar, 100px
//! headers and a 40px indicator grid with 10px spacing.

use std::cell::RefCell;
use std::rc::Rc;

use dockyard_core::config::DockConfig;
use dockyard_core::drag::DragPhase;
use dockyard_core::drop_target::DropTarget;
use dockyard_core::error::{ConsistencyError, DockError, StructuralError};
use dockyard_core::geometry::Rect;
use dockyard_core::host::{DockingHost, DragOutcome, PointerButton, PointerEvent};
use dockyard_core::tree::{Direction, DockTree, NodeId, Orientation, Tab, TabId};

// ============================================================================
// Fixtures
// ============================================================================

const AREA: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

/// One group holding `a`, `b` and `c`, headers at x 0, 100 and 200.
fn single_group() -> (DockingHost, NodeId) {
    let mut tree = DockTree::new();
    let group = tree.fallback_group().unwrap();
    for (i, title) in ["a", "b", "c"].into_iter().enumerate() {
        tree.merge_into_tab_group(group, Tab::new(title), i).unwrap();
    }
    (DockingHost::new(tree, DockConfig::default(), AREA), group)
}

/// Root horizontal split: `left` (x 0..400) and `right` (x 400..800).
fn two_columns(left_tabs: &[&str], right_tabs: &[&str]) -> (DockingHost, NodeId, NodeId) {
    let mut tree = DockTree::new();
    let left = tree.fallback_group().unwrap();
    for (i, title) in left_tabs.iter().enumerate() {
        tree.merge_into_tab_group(left, Tab::new(*title), i).unwrap();
    }
    let tabs = right_tabs.iter().map(|t| Tab::new(*t)).collect();
    let right = tree.insert_split(left, Direction::Right, tabs, 0.5).unwrap();
    (DockingHost::new(tree, DockConfig::default(), AREA), left, right)
}

fn titles(host: &DockingHost, group: NodeId) -> Vec<String> {
    host.tree()
        .group(group)
        .unwrap()
        .tabs
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

fn tab_id(host: &DockingHost, title: &str) -> TabId {
    host.tree()
        .groups()
        .into_iter()
        .flat_map(|g| host.tree().group(g).unwrap().tabs.clone())
        .find(|t| t.title == title)
        .map(|t| t.id)
        .unwrap()
}

fn record_events(host: &mut DockingHost) -> Rc<RefCell<Vec<&'static str>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    host.subscribe(move |event| sink.borrow_mut().push(event.name()));
    events
}

/// Presses on a header and drags straight down out of the bar.
fn detach(host: &mut DockingHost, x: f64, y: f64) {
    host.on_pointer_down(PointerEvent::new(x, y)).unwrap();
    host.on_pointer_move(PointerEvent::new(x, 100.0)).unwrap();
    assert_eq!(host.phase(), DragPhase::Floating);
}

// ============================================================================
// Click and rearrange
// ============================================================================

#[test]
fn test_press_and_release_is_a_click() {
    let (mut host, group) = single_group();
    let b = tab_id(&host, "b");

    host.on_pointer_down(PointerEvent::new(150.0, 10.0)).unwrap();
    assert_eq!(host.phase(), DragPhase::Armed);
    assert_eq!(host.tree().group(group).unwrap().selected, 1);

    let outcome = host.on_pointer_up(PointerEvent::new(150.0, 10.0)).unwrap();
    assert_eq!(outcome, DragOutcome::Clicked(b));
    assert_eq!(host.phase(), DragPhase::Idle);
}

#[test]
fn test_secondary_button_does_not_arm() {
    let (mut host, _) = single_group();
    host.on_pointer_down(PointerEvent::new(150.0, 10.0).with_button(PointerButton::Secondary))
        .unwrap();
    assert_eq!(host.phase(), DragPhase::Idle);
}

#[test]
fn test_drag_within_bar_reorders() {
    let (mut host, group) = single_group();
    let a = tab_id(&host, "a");

    host.on_pointer_down(PointerEvent::new(50.0, 10.0)).unwrap();
    host.on_pointer_move(PointerEvent::new(150.0, 10.0)).unwrap();
    assert_eq!(host.phase(), DragPhase::RearrangingInBar);
    assert_eq!(titles(&host, group), ["b", "a", "c"]);

    // "b" slid under the pointer; hovering it again does nothing
    host.on_pointer_move(PointerEvent::new(60.0, 10.0)).unwrap();
    assert_eq!(titles(&host, group), ["a", "b", "c"]);

    let outcome = host.on_pointer_up(PointerEvent::new(60.0, 10.0)).unwrap();
    assert_eq!(outcome, DragOutcome::Rearranged(a));
}

// ============================================================================
// Floating drops
// ============================================================================

#[test]
fn test_detach_emits_floating_surface() {
    let (mut host, group) = single_group();
    let events = record_events(&mut host);

    detach(&mut host, 150.0, 10.0);

    let carrier = host.drag().carrier().unwrap();
    assert_eq!(carrier.tab.title, "b");
    assert_eq!(carrier.origin.index, 1);
    assert_eq!(carrier.surface_size().height, 600.0 - 28.0);
    assert_eq!(titles(&host, group), ["a", "c"]);
    let events = events.borrow();
    let position = |name: &str| events.iter().position(|e| *e == name).unwrap();
    assert!(position("tab_detached_to_floating") < position("floating_moved"));
    assert!(position("floating_moved") < position("foreign_tab_hover"));
}

#[test]
fn test_drop_on_header_inserts_at_its_index() {
    let (mut host, left, right) = two_columns(&["a", "b"], &["c"]);
    let a = tab_id(&host, "a");

    detach(&mut host, 10.0, 10.0);
    host.on_pointer_move(PointerEvent::new(450.0, 10.0)).unwrap();
    assert_eq!(host.drag().hover().target, DropTarget::TabBar(0));
    let placeholder = host.tree().group(right).unwrap().placeholder.unwrap();
    assert_eq!(placeholder.rect, Rect::new(400.0, 0.0, 100.0, 28.0));

    let outcome = host.on_pointer_up(PointerEvent::new(450.0, 10.0)).unwrap();
    assert_eq!(
        outcome,
        DragOutcome::Committed {
            tab: a,
            group: right,
            target: DropTarget::TabBar(0),
        }
    );
    assert_eq!(titles(&host, right), ["a", "c"]);
    assert_eq!(titles(&host, left), ["b"]);
    assert!(host.tree().group(right).unwrap().placeholder.is_none());
}

#[test]
fn test_drop_on_empty_bar_strip_appends() {
    let (mut host, _, right) = two_columns(&["a", "b"], &["c"]);

    detach(&mut host, 10.0, 10.0);
    host.on_pointer_move(PointerEvent::new(700.0, 10.0)).unwrap();
    host.on_pointer_up(PointerEvent::new(700.0, 10.0)).unwrap();

    assert_eq!(titles(&host, right), ["c", "a"]);
}

#[test]
fn test_split_dock_right_puts_new_group_after() {
    let (mut host, group) = single_group();

    detach(&mut host, 250.0, 10.0);
    host.on_pointer_move(PointerEvent::new(450.0, 300.0)).unwrap();
    assert_eq!(host.drag().hover().target, DropTarget::SplitDock(Direction::Right));
    let outcome = host.on_pointer_up(PointerEvent::new(450.0, 300.0)).unwrap();

    let DragOutcome::Committed { group: docked, .. } = outcome else {
        panic!("expected a committed drop, got {outcome:?}");
    };
    let root = host.tree().split(host.tree().root()).unwrap();
    assert_eq!(root.orientation, Orientation::Horizontal);
    assert_eq!(root.children, vec![group, docked]);
    assert_eq!(titles(&host, docked), ["c"]);
    assert_eq!(host.tree().node(docked).unwrap().bounds.width, 400.0);
}

#[test]
fn test_split_dock_left_puts_new_group_before() {
    let (mut host, group) = single_group();

    detach(&mut host, 250.0, 10.0);
    let outcome = host.on_pointer_up(PointerEvent::new(350.0, 300.0)).unwrap();

    let DragOutcome::Committed { group: docked, target, .. } = outcome else {
        panic!("expected a committed drop, got {outcome:?}");
    };
    assert_eq!(target, DropTarget::SplitDock(Direction::Left));
    let root = host.tree().split(host.tree().root()).unwrap();
    assert_eq!(root.children, vec![docked, group]);
}

#[test]
fn test_neighbor_dock_inserts_into_ancestor_split() {
    // root H [left, V [top, bottom]]
    let (mut host, left, top) = two_columns(&["a1", "a2"], &["b"]);
    let bottom = host
        .mutate(|tree| tree.insert_split(top, Direction::Bottom, vec![Tab::new("c")], 0.5))
        .unwrap();
    let column = host.tree().parent(top).unwrap();

    detach(&mut host, 10.0, 10.0);
    // the top neighbor cell of `top`, one step above its top split cell
    host.on_pointer_move(PointerEvent::new(600.0, 50.0)).unwrap();
    let hover = *host.drag().hover();
    assert_eq!(hover.target, DropTarget::NeighborDock(Direction::Top));
    assert_eq!(hover.plan.map(|p| p.split), Some(column));

    let outcome = host.on_pointer_up(PointerEvent::new(600.0, 50.0)).unwrap();
    let DragOutcome::Committed { group: docked, .. } = outcome else {
        panic!("expected a committed drop, got {outcome:?}");
    };
    let column_split = host.tree().split(column).unwrap();
    assert_eq!(column_split.children, vec![docked, top, bottom]);
    assert_eq!(titles(&host, left), ["a2"]);
    assert!(host.tree().invariant_violations().is_empty());
}

// ============================================================================
// Cancel and failure
// ============================================================================

#[test]
fn test_drop_on_nothing_restores_original_index() {
    let (mut host, group) = single_group();
    let b = tab_id(&host, "b");
    let events = record_events(&mut host);

    detach(&mut host, 150.0, 10.0);
    let outcome = host.on_pointer_up(PointerEvent::new(10.0, 590.0)).unwrap();

    assert_eq!(outcome, DragOutcome::Cancelled { tab: b, group });
    assert_eq!(titles(&host, group), ["a", "b", "c"]);
    assert_eq!(host.phase(), DragPhase::Idle);
    assert!(events.borrow().contains(&"drop_cancelled"));
}

#[test]
fn test_cancel_recreates_removed_source_group() {
    let (mut host, left, right) = two_columns(&["a"], &["b"]);

    detach(&mut host, 10.0, 10.0);
    assert!(!host.tree().contains(left));
    assert_eq!(host.tree().node(right).unwrap().bounds, AREA);

    let outcome = host.on_pointer_up(PointerEvent::new(10.0, 590.0)).unwrap();
    let DragOutcome::Cancelled { group: restored, .. } = outcome else {
        panic!("expected a cancelled drop, got {outcome:?}");
    };
    let root = host.tree().split(host.tree().root()).unwrap();
    assert_eq!(root.children, vec![restored, right]);
    assert_eq!(titles(&host, restored), ["a"]);
}

#[test]
fn test_cancel_falls_back_to_first_group_when_source_is_gone() {
    let (mut host, left, right) = two_columns(&["a"], &["b"]);
    let bottom = host
        .mutate(|tree| tree.insert_split(right, Direction::Bottom, vec![Tab::new("c")], 0.5))
        .unwrap();
    let b = tab_id(&host, "b");

    detach(&mut host, 410.0, 10.0);
    // source slot, parent split and former sibling all disappear
    host.mutate(|tree| tree.remove_node(bottom)).unwrap();

    let outcome = host.on_pointer_up(PointerEvent::new(10.0, 590.0)).unwrap();
    assert_eq!(outcome, DragOutcome::Cancelled { tab: b, group: left });
    assert_eq!(titles(&host, left), ["a", "b"]);
    assert_eq!(host.tree().tab_count(), 2);
}

#[test]
fn test_cancel_refused_everywhere_keeps_tab_in_tree() {
    let (mut host, group) = single_group();
    let a = tab_id(&host, "a");
    let mut twin = Tab::new("a again");
    twin.id = a;

    detach(&mut host, 10.0, 10.0);
    host.mutate(|tree| tree.merge_into_tab_group(group, twin, 0)).unwrap();

    let result = host.on_pointer_up(PointerEvent::new(10.0, 590.0));
    assert!(matches!(
        result,
        Err(DockError::Structural(StructuralError::DuplicateTab(id))) if id == a
    ));
    assert_eq!(host.phase(), DragPhase::Idle);
    assert_eq!(host.tree().tab_count(), 3);
    assert!(host.tree().find_tab(a).is_some());
}

#[test]
fn test_stale_neighbor_plan_fails_and_restores() {
    let (mut host, left, top) = two_columns(&["a1", "a2"], &["b"]);
    let bottom = host
        .mutate(|tree| tree.insert_split(top, Direction::Bottom, vec![Tab::new("c")], 0.5))
        .unwrap();
    let events = record_events(&mut host);

    detach(&mut host, 10.0, 10.0);
    host.on_pointer_move(PointerEvent::new(600.0, 50.0)).unwrap();
    // the column split collapses while the tab is in the air
    host.mutate(|tree| tree.remove_node(bottom)).unwrap();

    let result = host.on_pointer_up(PointerEvent::new(600.0, 50.0));
    assert!(matches!(
        result,
        Err(DockError::Consistency(ConsistencyError::NeighborPositionVanished { .. }))
    ));
    assert_eq!(titles(&host, left), ["a1", "a2"]);
    assert_eq!(host.phase(), DragPhase::Idle);
    let events = events.borrow();
    let closed = events.iter().position(|e| *e == "floating_closed").unwrap();
    let failed = events.iter().position(|e| *e == "drop_failed").unwrap();
    assert!(closed < failed);
}

#[test]
fn test_capture_lost_while_floating_uses_last_hover() {
    let (mut host, _) = single_group();

    detach(&mut host, 250.0, 10.0);
    host.on_pointer_move(PointerEvent::new(450.0, 300.0)).unwrap();
    let outcome = host.on_capture_lost().unwrap();

    assert!(matches!(
        outcome,
        DragOutcome::Committed {
            target: DropTarget::SplitDock(Direction::Right),
            ..
        }
    ));
    assert_eq!(host.tree().groups().len(), 2);
}

#[test]
fn test_closing_floating_surface_cancels() {
    let (mut host, group) = single_group();

    detach(&mut host, 250.0, 10.0);
    host.on_pointer_move(PointerEvent::new(450.0, 300.0)).unwrap();
    let outcome = host.close_floating().unwrap();

    assert!(matches!(outcome, DragOutcome::Cancelled { .. }));
    assert_eq!(titles(&host, group), ["a", "b", "c"]);
}

#[test]
fn test_commit_event_order() {
    let (mut host, _, _) = two_columns(&["a", "b"], &["c"]);
    let events = record_events(&mut host);

    detach(&mut host, 10.0, 10.0);
    host.on_pointer_move(PointerEvent::new(450.0, 10.0)).unwrap();
    events.borrow_mut().clear();
    host.on_pointer_up(PointerEvent::new(450.0, 10.0)).unwrap();

    assert_eq!(
        *events.borrow(),
        vec!["floating_closed", "drop_committed", "tree_changed"]
    );
}

// ============================================================================
// Divider resize
// ============================================================================

#[test]
fn test_divider_drag_resizes_columns() {
    let (mut host, left, right) = two_columns(&["a"], &["b"]);
    let root = host.tree().root();

    host.on_pointer_down(PointerEvent::new(400.0, 300.0)).unwrap();
    assert_eq!(host.resize_session().map(|s| s.split), Some(root));
    host.on_pointer_move(PointerEvent::new(500.0, 300.0)).unwrap();
    let outcome = host.on_pointer_up(PointerEvent::new(500.0, 300.0)).unwrap();

    assert_eq!(outcome, DragOutcome::Resized(root));
    assert_eq!(host.tree().node(left).unwrap().bounds.width, 500.0);
    assert_eq!(host.tree().node(right).unwrap().bounds.width, 300.0);
    assert!(host.resize_session().is_none());
}

#[test]
fn test_divider_drag_stops_at_min_slot() {
    let (mut host, _, right) = two_columns(&["a"], &["b"]);

    host.on_pointer_down(PointerEvent::new(400.0, 300.0)).unwrap();
    host.on_pointer_move(PointerEvent::new(795.0, 300.0)).unwrap();
    host.on_capture_lost().unwrap();

    assert_eq!(host.tree().node(right).unwrap().bounds.width, 20.0);
}
