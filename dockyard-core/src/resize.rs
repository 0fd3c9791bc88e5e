//! Divider drag sessions

use tracing::debug;

use crate::error::StructuralError;
use crate::geometry::Point;
use crate::trace_operation_debug;
use crate::tracing::span_names;
use crate::tree::{DockTree, NodeId};

/// A divider being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    /// The split owning the divider.
    pub split: NodeId,
    /// The divider sits between slot `index` and `index + 1`.
    pub index: usize,
    anchor: f64,
}

impl ResizeSession {
    /// Starts a session when `pointer` is on a divider. Nested splits are
    /// checked before their ancestors.
    #[must_use]
    pub fn begin(tree: &DockTree, pointer: Point) -> Option<Self> {
        tree.nodes_depth_first().into_iter().rev().find_map(|id| {
            let split = tree.split(id).ok()?;
            let index = split.dividers.iter().position(|d| d.contains(pointer))?;
            Some(Self {
                split: id,
                index,
                anchor: split.orientation.coordinate(pointer),
            })
        })
    }

    /// Applies the pointer movement since the last applied position.
    ///
    /// Only the applied part of the movement advances the recorded position,
    /// so dragging back past a clamp picks up where the divider stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the split or its divider no longer exists.
    pub fn drag_to(
        &mut self,
        tree: &mut DockTree,
        pointer: Point,
        min_slot_pixels: i64,
    ) -> Result<i64, StructuralError> {
        let span = trace_operation_debug!(span_names::RESIZE, split = %self.split, index = self.index);
        let _guard = span.enter();

        let orientation = tree.split(self.split)?.orientation;
        let delta = (orientation.coordinate(pointer) - self.anchor).round() as i64;
        if delta == 0 {
            return Ok(0);
        }
        let applied = tree.adjust_divider(self.split, self.index, delta, min_slot_pixels)?;
        self.anchor += applied as f64;
        debug!(split = %self.split, index = self.index, delta, applied, "divider moved");
        Ok(applied)
    }
}
