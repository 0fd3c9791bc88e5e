//! Reordering a dragged tab inside its own tab bar

use crate::geometry::{Point, Rect};
use crate::tree::{HeaderHit, TabGroup, TabId};

/// Suppresses the reorder that would otherwise fire right after a swap.
///
/// After a reorder the tab that slid into the dragged tab's old place sits
/// under the pointer. That first hovered tab is remembered and ignored until
/// a different tab is hovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeflickerLatch {
    hovered_after_swap: Option<TabId>,
    pending: bool,
}

impl DeflickerLatch {
    /// Arms the latch after a reorder.
    pub const fn set_rearranged(&mut self) {
        self.hovered_after_swap = None;
        self.pending = true;
    }

    /// Feeds the currently hovered tab and returns whether hovering it may
    /// trigger a reorder.
    pub fn evaluate(&mut self, hovered: TabId) -> bool {
        if self.pending {
            self.hovered_after_swap = Some(hovered);
            self.pending = false;
            return false;
        }
        if self.hovered_after_swap == Some(hovered) {
            return false;
        }
        self.hovered_after_swap = None;
        true
    }

    /// Clears the latch.
    pub const fn reset(&mut self) {
        self.hovered_after_swap = None;
        self.pending = false;
    }

    /// Returns true while some tab is being ignored.
    #[must_use]
    pub const fn is_latched(&self) -> bool {
        self.pending || self.hovered_after_swap.is_some()
    }
}

/// Header rectangle and index the dragged tab last vacated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostSlot {
    /// Header rectangle at the time of the move.
    pub bounds: Rect,
    /// Index before the move.
    pub index: usize,
}

/// A reorder decided by [`rearrange_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reorder {
    /// Current index of the dragged tab.
    pub from: usize,
    /// Index to move it to.
    pub to: usize,
    /// Whether this is a return into the ghost slot.
    pub returning: bool,
}

/// Decides whether a pointer position over the tab bar reorders the dragged
/// tab.
///
/// Moving toward lower indices places the tab before the hovered one,
/// moving toward higher indices places it after; either way it lands on the
/// hovered tab's index. Hovering the ghost slot always returns the tab to
/// the index it left, even while the latch is set. A decided move updates
/// the ghost slot and arms the latch; a return leaves both as they are.
pub fn rearrange_step(
    group: &TabGroup,
    dragged: TabId,
    pointer: Point,
    latch: &mut DeflickerLatch,
    ghost: &mut Option<GhostSlot>,
) -> Option<Reorder> {
    let Some(HeaderHit::Tab(hovered_index)) = group.header_at(pointer) else {
        return None;
    };
    let hovered = group.tabs.get(hovered_index)?;
    let valid = latch.evaluate(hovered.id);
    if hovered.id == dragged {
        return None;
    }
    let from = group.position(dragged)?;

    if let Some(slot) = ghost.as_ref().filter(|slot| slot.bounds.contains(pointer)) {
        let to = slot.index.min(group.len().saturating_sub(1));
        return Some(Reorder {
            from,
            to,
            returning: true,
        });
    }
    if !valid {
        return None;
    }

    *ghost = Some(GhostSlot {
        bounds: group.tabs[from].header,
        index: from,
    });
    latch.set_rearranged();
    Some(Reorder {
        from,
        to: hovered_index,
        returning: false,
    })
}
