//! Property-based tests for docking tree mutations

use dockyard_core::config::DockConfig;
use dockyard_core::geometry::Rect;
use dockyard_core::tree::{Direction, DockTree, NodeId, Tab, TabId};
use proptest::prelude::*;

// ============================================================================
// Test Strategies
// ============================================================================

/// Strategy for generating docking directions
fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Left),
        Just(Direction::Top),
        Just(Direction::Right),
        Just(Direction::Bottom),
    ]
}

/// Represents an operation that can be performed on a DockTree. Node and
/// tab positions index into the tree's current groups and tabs.
#[derive(Debug, Clone)]
enum TreeOperation {
    SplitGroup {
        group: usize,
        direction: Direction,
        fraction: f64,
    },
    DockOuter {
        direction: Direction,
        fraction: f64,
    },
    InsertSlot {
        split: usize,
        index: usize,
        fraction: f64,
    },
    AddTab {
        group: usize,
        index: usize,
    },
    RemoveTab {
        tab: usize,
    },
    MoveTab {
        tab: usize,
        group: usize,
        index: usize,
    },
    RemoveNode {
        node: usize,
    },
    Resize {
        split: usize,
        index: usize,
        delta: i64,
    },
}

fn operation_strategy() -> impl Strategy<Value = TreeOperation> {
    prop_oneof![
        (0usize..8, direction_strategy(), 0.05f64..0.95).prop_map(|(group, direction, fraction)| {
            TreeOperation::SplitGroup {
                group,
                direction,
                fraction,
            }
        }),
        (direction_strategy(), 0.05f64..0.95)
            .prop_map(|(direction, fraction)| TreeOperation::DockOuter { direction, fraction }),
        (0usize..8, 0usize..6, 0.05f64..0.95).prop_map(|(split, index, fraction)| {
            TreeOperation::InsertSlot {
                split,
                index,
                fraction,
            }
        }),
        (0usize..8, 0usize..6).prop_map(|(group, index)| TreeOperation::AddTab { group, index }),
        (0usize..16).prop_map(|tab| TreeOperation::RemoveTab { tab }),
        (0usize..16, 0usize..8, 0usize..6)
            .prop_map(|(tab, group, index)| TreeOperation::MoveTab { tab, group, index }),
        (0usize..16).prop_map(|node| TreeOperation::RemoveNode { node }),
        (0usize..8, 0usize..6, -300i64..300)
            .prop_map(|(split, index, delta)| TreeOperation::Resize { split, index, delta }),
    ]
}

fn operations_strategy(max_ops: usize) -> impl Strategy<Value = Vec<TreeOperation>> {
    proptest::collection::vec(operation_strategy(), 1..=max_ops)
}

fn pick<T: Copy>(items: &[T], seed: usize) -> Option<T> {
    (!items.is_empty()).then(|| items[seed % items.len()])
}

fn all_tabs(tree: &DockTree) -> Vec<TabId> {
    tree.groups()
        .into_iter()
        .filter_map(|g| tree.group(g).ok())
        .flat_map(|g| g.tabs.iter().map(|t| t.id))
        .collect()
}

/// Applies an operation, ignoring rejected ones. Returns the change in the
/// number of tabs the tree owns.
fn apply_operation(tree: &mut DockTree, op: &TreeOperation, counter: &mut usize) -> i64 {
    let mut fresh = || {
        *counter += 1;
        Tab::new(format!("tab {counter}"))
    };
    let groups = tree.groups();
    let splits = tree.splits();
    let nodes: Vec<NodeId> = tree.nodes_depth_first();
    let tabs = all_tabs(tree);

    match *op {
        TreeOperation::SplitGroup {
            group,
            direction,
            fraction,
        } => pick(&groups, group)
            .and_then(|g| tree.insert_split(g, direction, vec![fresh()], fraction).ok())
            .map_or(0, |_| 1),
        TreeOperation::DockOuter {
            direction,
            fraction,
        } => tree
            .dock_outer(direction, vec![fresh()], fraction)
            .map_or(0, |_| 1),
        TreeOperation::InsertSlot {
            split,
            index,
            fraction,
        } => pick(&splits, split)
            .and_then(|s| tree.insert_slot(s, index, vec![fresh()], fraction).ok())
            .map_or(0, |_| 1),
        TreeOperation::AddTab { group, index } => pick(&groups, group)
            .and_then(|g| tree.merge_into_tab_group(g, fresh(), index).ok())
            .map_or(0, |_| 1),
        TreeOperation::RemoveTab { tab } => pick(&tabs, tab)
            .and_then(|t| tree.remove_tab(t).ok())
            .map_or(0, |_| -1),
        TreeOperation::MoveTab { tab, group, index } => {
            let (Some(tab), Some(target)) = (pick(&tabs, tab), pick(&groups, group)) else {
                return 0;
            };
            let Ok(removed) = tree.remove_tab(tab) else {
                return 0;
            };
            // the target may have been the group the tab just emptied
            let target = if tree.group(target).is_ok() {
                target
            } else {
                tree.groups()[0]
            };
            tree.merge_into_tab_group(target, removed, index).map_or(-1, |_| 0)
        }
        TreeOperation::RemoveNode { node } => pick(&nodes, node)
            .and_then(|n| tree.remove_node(n).ok())
            .map_or(0, |released| -(released.len() as i64)),
        TreeOperation::Resize {
            split,
            index,
            delta,
        } => {
            if let Some(s) = pick(&splits, split) {
                let _ = tree.adjust_divider(s, index, delta, 20);
            }
            0
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every mutation leaves a well-formed tree: alternating orientations,
    /// no single-slot inner splits, no empty groups besides the fallback
    #[test]
    fn prop_random_operations_keep_invariants(ops in operations_strategy(30)) {
        let config = DockConfig::default();
        let mut tree = DockTree::new();
        let mut counter = 0;
        let mut expected_tabs: i64 = 0;

        for op in &ops {
            expected_tabs += apply_operation(&mut tree, op, &mut counter);
            tree.arrange(Rect::new(0.0, 0.0, 1600.0, 1200.0), &config);
            let violations = tree.invariant_violations();
            prop_assert!(violations.is_empty(), "after {:?}: {:?}", op, violations);
            prop_assert_eq!(tree.tab_count() as i64, expected_tabs);
        }
    }

    /// Removing the last tab of a group that is not the fallback removes the
    /// group and collapses a parent left with one slot
    #[test]
    fn prop_last_tab_removal_collapses_parent(
        outer in direction_strategy(),
        inner in direction_strategy(),
    ) {
        prop_assume!(outer.orientation() != inner.orientation());
        let mut tree = DockTree::new();
        let a = tree.fallback_group().unwrap();
        tree.merge_into_tab_group(a, Tab::new("a"), 0).unwrap();
        let b = tree.insert_split(a, outer, vec![Tab::new("b")], 0.5).unwrap();
        let c = tree.insert_split(b, inner, vec![Tab::new("c")], 0.5).unwrap();
        let column = tree.parent(c).unwrap();
        prop_assert_ne!(column, tree.root());

        let c_tab = tree.group(c).unwrap().tabs[0].id;
        tree.remove_tab(c_tab).unwrap();

        prop_assert!(!tree.contains(c));
        prop_assert!(!tree.contains(column));
        prop_assert_eq!(tree.parent(b), Some(tree.root()));
        prop_assert!(tree.invariant_violations().is_empty());
    }

    /// Layout covers the host area: slot extents along each split sum to the
    /// split's extent
    #[test]
    fn prop_arrange_tiles_splits(
        ops in operations_strategy(20),
        width in 200.0f64..2000.0,
        height in 200.0f64..2000.0,
    ) {
        let config = DockConfig::default();
        let mut tree = DockTree::new();
        let mut counter = 0;
        for op in &ops {
            apply_operation(&mut tree, op, &mut counter);
        }
        tree.arrange(Rect::new(0.0, 0.0, width.round(), height.round()), &config);

        for id in tree.splits() {
            let split = tree.split(id).unwrap();
            let bounds = tree.node(id).unwrap().bounds;
            let extent = split.orientation.extent(bounds.size());
            if split.fractions.sizes_for(extent as i64).iter().any(|&size| size < 0) {
                continue;
            }
            let sum: f64 = split
                .children
                .iter()
                .map(|&child| split.orientation.extent(tree.node(child).unwrap().bounds.size()))
                .sum();
            prop_assert!((sum - extent).abs() < 1e-6, "split {} covers {} of {}", id, sum, extent);
        }
    }
}
