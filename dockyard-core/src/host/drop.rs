//! Committing and cancelling a floating drop

use tracing::{error, info, warn};

use crate::drag::FloatingCarrier;
use crate::drop_target::{DropTarget, Hover, neighbor_fraction, split_fraction};
use crate::error::{ConsistencyError, DockError, DockResult};
use crate::hooks::DockEvent;
use crate::trace_operation;
use crate::tracing::span_names;
use crate::tree::{Direction, NodeId};

use super::{DockingHost, DragOutcome};

impl DockingHost {
    /// Ends the floating phase with the hover captured at the last move.
    ///
    /// The tree mutation and its repair finish before any event is emitted.
    pub(super) fn drop_floating(&mut self) -> DockResult<DragOutcome> {
        let hover = *self.drag.hover();
        let Some(carrier) = self.drag.finish() else {
            return Err(ConsistencyError::NoDragInProgress.into());
        };
        let tab = carrier.tab.id;
        let span = trace_operation!(span_names::DROP, tab = %tab, target = ?hover.target);
        let _guard = span.enter();

        self.clear_foreign_hover();

        let result = if hover.target.is_none() {
            self.restore(carrier).map(|group| {
                info!(tab = %tab, %group, "drop cancelled, tab restored");
                DragOutcome::Cancelled { tab, group }
            })
        } else {
            match self.apply_drop(&carrier, &hover) {
                Ok(group) => {
                    info!(tab = %tab, %group, target = ?hover.target, "drop committed");
                    Ok(DragOutcome::Committed {
                        tab,
                        group,
                        target: hover.target,
                    })
                }
                Err(DockError::Consistency(failure)) => {
                    error!(tab = %tab, error = %failure, "drop failed, restoring tab");
                    self.restore(carrier)
                        .and(Err(DockError::Consistency(failure)))
                }
                Err(other) => {
                    warn!(tab = %tab, error = %other, "drop rejected, restoring tab");
                    self.restore(carrier).and(Err(other))
                }
            }
        };

        self.arrange();
        self.emit(&DockEvent::FloatingClosed { tab });
        match &result {
            Ok(DragOutcome::Committed { group, target, .. }) => {
                self.emit(&DockEvent::DropCommitted {
                    tab,
                    group: *group,
                    target: *target,
                });
            }
            Ok(DragOutcome::Cancelled { group, .. }) => {
                self.emit(&DockEvent::DropCancelled { tab, group: *group });
            }
            Err(DockError::Consistency(failure)) => {
                self.emit(&DockEvent::DropFailed {
                    tab,
                    error: failure.clone(),
                });
            }
            _ => {}
        }
        self.emit_tree_changed();
        result
    }

    /// Applies `hover` to the tree, returning the group that received the
    /// tab. The carrier keeps its copy of the tab in case this fails.
    fn apply_drop(&mut self, carrier: &FloatingCarrier, hover: &Hover) -> DockResult<NodeId> {
        if let Some(node) = hover.node
            && !self.tree.contains(node)
        {
            return Err(ConsistencyError::TargetVanished(node).into());
        }
        let tab = carrier.tab.clone();
        let sizes = &carrier.sizes;
        let fallback = self.config.default_split_fraction;

        let group = match (hover.target, hover.node) {
            (DropTarget::TabBar(index), Some(group)) => {
                self.tree.merge_into_tab_group(group, tab, index)?;
                group
            }
            (DropTarget::Fill, Some(group)) => {
                let len = self.tree.group(group)?.len();
                self.tree.merge_into_tab_group(group, tab, len)?;
                group
            }
            (DropTarget::SplitDock(direction), Some(node)) => {
                let bounds = self.tree.node(node)?.bounds;
                let fraction = split_fraction(bounds, sizes, direction).unwrap_or(fallback);
                self.tree.insert_split(node, direction, vec![tab], fraction)?
            }
            (DropTarget::NeighborDock(direction), _) => {
                if let Some(plan) = hover.plan {
                    let index = plan.validate(&self.tree)?;
                    let bounds = self.tree.node(plan.split)?.bounds;
                    let fraction = neighbor_fraction(bounds, sizes, direction).unwrap_or(fallback);
                    self.tree.insert_slot(plan.split, index, vec![tab], fraction)?
                } else {
                    let bounds = self.tree.node(self.tree.root())?.bounds;
                    let fraction = neighbor_fraction(bounds, sizes, direction).unwrap_or(fallback);
                    self.tree.dock_outer(direction, vec![tab], fraction)?
                }
            }
            (DropTarget::None, _) | (_, None) => {
                return Err(ConsistencyError::NoDragInProgress.into());
            }
        };
        Ok(group)
    }

    /// Puts the carried tab back as close to where it came from as the
    /// current tree allows.
    ///
    /// Tries, in order: the source group at the original index; a new group
    /// in the source's former split slot; a new group beside the source's
    /// former sibling; the end of the first remaining group; a new group on
    /// the outer right edge. A failed step falls through to the next one
    /// with the tab still in hand.
    fn restore(&mut self, carrier: FloatingCarrier) -> DockResult<NodeId> {
        let FloatingCarrier { tab, origin, .. } = carrier;
        let tab_id = tab.id;

        if self.tree.group(origin.group).is_ok() {
            match self
                .tree
                .merge_into_tab_group(origin.group, tab.clone(), origin.index)
            {
                Ok(_) => return Ok(origin.group),
                Err(err) => warn!(tab = %tab_id, error = %err, "source group refused tab"),
            }
        }

        if let Some(parent) = origin.parent
            && let Ok(split) = self.tree.split(parent)
        {
            let slot = origin.slot.min(split.len());
            match self
                .tree
                .insert_slot(parent, slot, vec![tab.clone()], origin.share)
            {
                Ok(group) => {
                    info!(tab = %tab_id, %group, %parent, slot, "source group recreated in former slot");
                    return Ok(group);
                }
                Err(err) => warn!(tab = %tab_id, error = %err, "former slot refused tab"),
            }
        }

        if let Some((sibling, direction)) = origin.sibling
            && sibling != self.tree.root()
            && self.tree.contains(sibling)
        {
            match self
                .tree
                .insert_split(sibling, direction, vec![tab.clone()], origin.share)
            {
                Ok(group) => {
                    info!(tab = %tab_id, %group, %sibling, "source group recreated beside former sibling");
                    return Ok(group);
                }
                Err(err) => warn!(tab = %tab_id, error = %err, "former sibling refused tab"),
            }
        }

        if let Some(group) = self.tree.groups().first().copied() {
            let len = self.tree.group(group)?.len();
            match self.tree.merge_into_tab_group(group, tab.clone(), len) {
                Ok(_) => {
                    warn!(tab = %tab_id, %group, "source position gone, tab appended to first group");
                    return Ok(group);
                }
                Err(err) => warn!(tab = %tab_id, error = %err, "first group refused tab"),
            }
        }

        let fraction = self.config.default_split_fraction;
        let group = self.tree.dock_outer(Direction::Right, vec![tab], fraction)?;
        warn!(tab = %tab_id, %group, "no group took the tab, docked on the outer edge");
        Ok(group)
    }

    /// Removes every placeholder and hover highlight.
    fn clear_foreign_hover(&mut self) {
        for group in self.tree.groups() {
            let Ok(owner) = self.tree.group_mut(group) else {
                continue;
            };
            owner.hover = None;
            if owner.placeholder.take().is_some() {
                self.tree.relayout_headers(group, &self.config);
            }
        }
    }
}
