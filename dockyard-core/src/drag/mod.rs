//! Tab drag session state
//!
//! A drag moves through `Idle → Armed → {RearrangingInBar | Floating} →
//! Idle`. The session only records state; the [`DockingHost`] drives the
//! transitions and applies the tree mutations.
//!
//! [`DockingHost`]: crate::host::DockingHost

mod rearrange;

pub use rearrange::{DeflickerLatch, GhostSlot, Reorder, rearrange_step};

use std::fmt;

use crate::drop_target::{CarriedSizes, Hover};
use crate::geometry::{Point, Size};
use crate::tree::{Direction, DockTree, NodeId, Tab, TabId};

/// Phase of the drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    /// No drag.
    #[default]
    Idle,
    /// Pointer pressed on a header, not moved yet.
    Armed,
    /// Dragging inside the source tab bar.
    RearrangingInBar,
    /// The tab is detached and follows the pointer.
    Floating,
}

impl fmt::Display for DragPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Armed => write!(f, "armed"),
            Self::RearrangingInBar => write!(f, "rearranging"),
            Self::Floating => write!(f, "floating"),
        }
    }
}

/// Where a detached tab came from, for restoring it on cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabOrigin {
    /// Source group.
    pub group: NodeId,
    /// Index of the tab in the source group.
    pub index: usize,
    /// Split holding the source group.
    pub parent: Option<NodeId>,
    /// Slot index of the source group in `parent`.
    pub slot: usize,
    /// Share of `parent`'s extent the source group had.
    pub share: f64,
    /// An adjacent sibling and the side of it the source group was on.
    pub sibling: Option<(NodeId, Direction)>,
}

impl TabOrigin {
    /// Captures the position of `tab` before it is detached.
    #[must_use]
    pub fn capture(tree: &DockTree, tab: TabId) -> Option<Self> {
        let (group, index) = tree.find_tab(tab)?;
        let parent = tree.parent(group);
        let mut origin = Self {
            group,
            index,
            parent,
            slot: 0,
            share: 0.5,
            sibling: None,
        };
        if let Some(split) = parent.and_then(|p| tree.split(p).ok()) {
            let slot = split.index_of(group)?;
            origin.slot = slot;
            origin.share = split.fractions.share(slot);
            origin.sibling = if let Some(&next) = split.children.get(slot + 1) {
                Some((next, Direction::from_orientation(split.orientation, true)))
            } else {
                slot.checked_sub(1)
                    .and_then(|prev| split.children.get(prev))
                    .map(|&prev| (prev, Direction::from_orientation(split.orientation, false)))
            };
        }
        Some(origin)
    }
}

/// The detached tab following the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingCarrier {
    /// The carried tab; owned by the carrier, not by any group.
    pub tab: Tab,
    /// Where to put it back on cancel.
    pub origin: TabOrigin,
    /// Top-left of the floating surface.
    pub position: Point,
    /// Measured sizes of the tab.
    pub sizes: CarriedSizes,
}

impl FloatingCarrier {
    /// Size of the floating surface.
    #[must_use]
    pub const fn surface_size(&self) -> Size {
        self.sizes.content
    }
}

/// A tab drag in progress.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    phase: DragPhase,
    tab: Option<TabId>,
    source: Option<NodeId>,
    grab_offset: Point,
    latch: DeflickerLatch,
    ghost: Option<GhostSlot>,
    carrier: Option<FloatingCarrier>,
    hover: Hover,
    last_pointer: Option<Point>,
}

impl DragSession {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Returns true outside [`DragPhase::Idle`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    /// The dragged tab.
    #[must_use]
    pub const fn tab(&self) -> Option<TabId> {
        self.tab
    }

    /// Group the tab was pressed in.
    #[must_use]
    pub const fn source(&self) -> Option<NodeId> {
        self.source
    }

    /// Offset from the pointer to the pressed header's top-left.
    #[must_use]
    pub const fn grab_offset(&self) -> Point {
        self.grab_offset
    }

    /// The floating carrier while floating.
    #[must_use]
    pub const fn carrier(&self) -> Option<&FloatingCarrier> {
        self.carrier.as_ref()
    }

    /// Hover resolved at the last floating move.
    #[must_use]
    pub const fn hover(&self) -> &Hover {
        &self.hover
    }

    /// Last pointer position seen by the session.
    #[must_use]
    pub const fn last_pointer(&self) -> Option<Point> {
        self.last_pointer
    }

    /// The ghost slot of the last reorder.
    #[must_use]
    pub const fn ghost(&self) -> Option<GhostSlot> {
        self.ghost
    }

    pub(crate) fn arm(&mut self, tab: TabId, source: NodeId, grab_offset: Point, pointer: Point) {
        *self = Self {
            phase: DragPhase::Armed,
            tab: Some(tab),
            source: Some(source),
            grab_offset,
            last_pointer: Some(pointer),
            ..Self::default()
        };
    }

    pub(crate) const fn set_phase(&mut self, phase: DragPhase) {
        self.phase = phase;
    }

    pub(crate) const fn record_pointer(&mut self, pointer: Point) {
        self.last_pointer = Some(pointer);
    }

    pub(crate) const fn rearrange_state(&mut self) -> (&mut DeflickerLatch, &mut Option<GhostSlot>) {
        (&mut self.latch, &mut self.ghost)
    }

    pub(crate) fn start_floating(&mut self, carrier: FloatingCarrier) {
        self.phase = DragPhase::Floating;
        self.latch.reset();
        self.ghost = None;
        self.carrier = Some(carrier);
    }

    pub(crate) const fn carrier_mut(&mut self) -> Option<&mut FloatingCarrier> {
        self.carrier.as_mut()
    }

    pub(crate) const fn set_hover(&mut self, hover: Hover) {
        self.hover = hover;
    }

    /// Ends the session, handing back the carrier if one was floating.
    pub(crate) fn finish(&mut self) -> Option<FloatingCarrier> {
        let carrier = self.carrier.take();
        *self = Self::default();
        carrier
    }
}
