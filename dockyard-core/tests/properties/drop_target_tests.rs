//! Property-based tests for drop-target resolution and applying drops

use dockyard_core::config::DockConfig;
use dockyard_core::drop_target::{DropTarget, compute_drop_target, compute_outer_drop_target, resolve_hover};
use dockyard_core::geometry::{Point, Rect};
use dockyard_core::host::{DockingHost, DragOutcome, PointerEvent};
use dockyard_core::tree::{Direction, DockTree, Orientation, Tab};
use proptest::prelude::*;

const AREA: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Left),
        Just(Direction::Top),
        Just(Direction::Right),
        Just(Direction::Bottom),
    ]
}

/// root H [left, right], each 400px wide; `right` holds `count` tabs
fn host_with_right_tabs(count: usize) -> DockingHost {
    let mut tree = DockTree::new();
    let left = tree.fallback_group().unwrap();
    tree.merge_into_tab_group(left, Tab::new("carried"), 0).unwrap();
    tree.merge_into_tab_group(left, Tab::new("stays"), 1).unwrap();
    let tabs = (0..count).map(|i| Tab::new(format!("right {i}"))).collect();
    tree.insert_split(left, Direction::Right, tabs, 0.5).unwrap();
    DockingHost::new(tree, DockConfig::default(), AREA)
}

/// Center of the split cell for `direction` on an 800x600 group
fn split_cell_center(direction: Direction) -> Point {
    match direction {
        Direction::Left => Point::new(350.0, 300.0),
        Direction::Top => Point::new(400.0, 250.0),
        Direction::Right => Point::new(450.0, 300.0),
        Direction::Bottom => Point::new(400.0, 350.0),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Resolution is total: any pointer, any bounds, no panic, and nothing
    /// is hit on a node without area
    #[test]
    fn prop_resolution_is_total(
        x in -100.0f64..1000.0,
        y in -100.0f64..800.0,
        width in 0.0f64..900.0,
        height in 0.0f64..700.0,
    ) {
        let config = DockConfig::default();
        let mut tree = DockTree::new();
        let group = tree.fallback_group().unwrap();
        tree.merge_into_tab_group(group, Tab::new("a"), 0).unwrap();
        tree.arrange(Rect::new(0.0, 0.0, width, height), &config);
        let pointer = Point::new(x, y);

        let target = compute_drop_target(&tree, group, pointer, &config);
        let _ = compute_outer_drop_target(&tree, pointer, &config);
        let _ = resolve_hover(&tree, pointer, &config);
        if width == 0.0 || height == 0.0 {
            prop_assert_eq!(target, DropTarget::None);
        }
    }

    /// Dropping onto header `i` of an `n`-tab group yields `n + 1` tabs with
    /// the dropped one at `i`
    #[test]
    fn prop_tab_bar_drop_inserts_at_index(count in 1usize..=3, index_seed in any::<usize>()) {
        let index = index_seed % (count + 1);
        let mut host = host_with_right_tabs(count);
        let pointer = Point::new(400.0 + index as f64 * 100.0 + 10.0, 10.0);

        host.on_pointer_down(PointerEvent::new(10.0, 10.0)).unwrap();
        host.on_pointer_move(PointerEvent::new(10.0, 100.0)).unwrap();
        host.on_pointer_move(PointerEvent::new(pointer.x, pointer.y)).unwrap();
        let outcome = host.on_pointer_up(PointerEvent::new(pointer.x, pointer.y)).unwrap();

        let DragOutcome::Committed { tab, group, target } = outcome else {
            return Err(TestCaseError::fail(format!("drop not committed: {outcome:?}")));
        };
        prop_assert_eq!(target, DropTarget::TabBar(index));
        let owner = host.tree().group(group).unwrap();
        prop_assert_eq!(owner.len(), count + 1);
        prop_assert_eq!(owner.position(tab), Some(index));
    }

    /// A split dock puts the new group on the requested side of the old one
    #[test]
    fn prop_split_dock_orders_by_direction(direction in direction_strategy()) {
        let mut tree = DockTree::new();
        let group = tree.fallback_group().unwrap();
        tree.merge_into_tab_group(group, Tab::new("a"), 0).unwrap();
        tree.merge_into_tab_group(group, Tab::new("b"), 1).unwrap();
        let mut host = DockingHost::new(tree, DockConfig::default(), AREA);
        let pointer = split_cell_center(direction);

        host.on_pointer_down(PointerEvent::new(150.0, 10.0)).unwrap();
        host.on_pointer_move(PointerEvent::new(150.0, 100.0)).unwrap();
        let outcome = host.on_pointer_up(PointerEvent::new(pointer.x, pointer.y)).unwrap();

        let DragOutcome::Committed { group: docked, target, .. } = outcome else {
            return Err(TestCaseError::fail(format!("drop not committed: {outcome:?}")));
        };
        prop_assert_eq!(target, DropTarget::SplitDock(direction));
        let root = host.tree().split(host.tree().root()).unwrap();
        let expected_orientation = match direction {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Top | Direction::Bottom => Orientation::Vertical,
        };
        prop_assert_eq!(root.orientation, expected_orientation);
        let expected = if direction.is_leading() {
            vec![docked, group]
        } else {
            vec![group, docked]
        };
        prop_assert_eq!(&root.children, &expected);
    }
}
