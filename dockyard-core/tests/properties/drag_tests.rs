//! Property-based tests for in-bar tab reordering

use dockyard_core::drag::{DeflickerLatch, GhostSlot, rearrange_step};
use dockyard_core::geometry::{Point, Rect};
use dockyard_core::tree::{Tab, TabGroup};
use proptest::prelude::*;

const HEADER_WIDTH: f64 = 60.0;

fn bar(count: usize) -> TabGroup {
    let mut group = TabGroup::with_tabs((0..count).map(|i| Tab::new(format!("tab {i}"))).collect());
    relayout(&mut group);
    group
}

fn relayout(group: &mut TabGroup) {
    for (i, tab) in group.tabs.iter_mut().enumerate() {
        tab.header = Rect::new(i as f64 * HEADER_WIDTH, 0.0, HEADER_WIDTH, 24.0);
    }
}

fn header_center(index: usize) -> Point {
    Point::new((index as f64 + 0.5) * HEADER_WIDTH, 12.0)
}

/// How the latch looks when the pointer comes back to the ghost slot
#[derive(Debug, Clone, Copy)]
enum LatchState {
    Clear,
    Pending,
    Holding(usize),
}

fn latch_strategy() -> impl Strategy<Value = LatchState> {
    prop_oneof![
        Just(LatchState::Clear),
        Just(LatchState::Pending),
        (0usize..16).prop_map(LatchState::Holding),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A reorder lands the dragged tab on the hovered tab's index
    #[test]
    fn prop_reorder_lands_on_hovered_index(
        count in 2usize..10,
        from_seed in any::<usize>(),
        hovered_seed in any::<usize>(),
    ) {
        let mut group = bar(count);
        let from = from_seed % count;
        let hovered = hovered_seed % count;
        prop_assume!(from != hovered);
        let dragged = group.tabs[from].id;
        let mut latch = DeflickerLatch::default();
        let mut ghost = None;

        let step = rearrange_step(&group, dragged, header_center(hovered), &mut latch, &mut ghost);
        prop_assert_eq!(step.map(|s| (s.from, s.to, s.returning)), Some((from, hovered, false)));
        prop_assert_eq!(ghost.map(|g| g.index), Some(from));
        prop_assert!(latch.is_latched());

        let tab = group.tabs.remove(from);
        group.tabs.insert(hovered, tab);
        relayout(&mut group);
        prop_assert_eq!(group.position(dragged), Some(hovered));
    }

    /// Hovering the ghost slot returns the tab to the index it left,
    /// whatever the latch holds
    #[test]
    fn prop_ghost_slot_return_ignores_latch(
        count in 2usize..10,
        from_seed in any::<usize>(),
        hovered_seed in any::<usize>(),
        state in latch_strategy(),
    ) {
        let mut group = bar(count);
        let from = from_seed % count;
        let hovered = hovered_seed % count;
        prop_assume!(from != hovered);
        let dragged = group.tabs[from].id;
        let mut latch = DeflickerLatch::default();
        let mut ghost = Some(GhostSlot {
            bounds: group.tabs[from].header,
            index: from,
        });

        let tab = group.tabs.remove(from);
        group.tabs.insert(hovered, tab);
        relayout(&mut group);

        match state {
            LatchState::Clear => latch.reset(),
            LatchState::Pending => latch.set_rearranged(),
            LatchState::Holding(seed) => {
                latch.set_rearranged();
                latch.evaluate(group.tabs[seed % count].id);
            }
        }

        let step = rearrange_step(&group, dragged, header_center(from), &mut latch, &mut ghost);
        prop_assert_eq!(step.map(|s| (s.from, s.to, s.returning)), Some((hovered, from, true)));
    }

    /// Right after a reorder the tab that slid under the pointer does not
    /// trigger another one
    #[test]
    fn prop_swapped_tab_is_ignored_once(count in 3usize..10, from_seed in any::<usize>()) {
        let from = from_seed % (count - 1);
        let mut group = bar(count);
        let dragged = group.tabs[from].id;
        let mut latch = DeflickerLatch::default();
        let mut ghost = None;

        let step = rearrange_step(&group, dragged, header_center(from + 1), &mut latch, &mut ghost).unwrap();
        let tab = group.tabs.remove(step.from);
        group.tabs.insert(step.to, tab);
        relayout(&mut group);
        // drop the ghost so only the latch decides
        ghost = None;

        // the neighbor now sits at `from`, under a pointer drifting back
        let slid = rearrange_step(&group, dragged, header_center(from), &mut latch, &mut ghost);
        prop_assert!(slid.is_none());
        prop_assert!(latch.is_latched());
    }
}
