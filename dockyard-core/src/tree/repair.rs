//! Transactional structural repair
//!
//! Every mutation of a split's slot list or a group's tab list runs inside a
//! [`Transaction`]. The mutation marks the nodes it touched as dirty; on
//! commit the transaction restores the structural rules before handing the
//! tree back:
//!
//! - a non-root split left with one slot is replaced in its parent by that
//!   child (splice-out);
//! - a split left with no slot is removed from its parent;
//! - a group left without tabs is removed, unless it is the sole child of
//!   the root (the fallback fill leaf).
//!
//! Nodes being torn down are kept in a suppress set. Dirty marks raised
//! for them while their children are moved out are skipped, so a teardown
//! never cascades into itself.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::trace_operation_debug;
use crate::tracing::span_names;

use super::dock_tree::DockTree;
use super::node::{NodeKind, SplitNode};
use super::types::NodeId;

/// One step performed by repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairAction {
    /// A one-slot split was replaced by its child.
    SplicedOut {
        /// The removed split.
        split: NodeId,
        /// The child that took its place.
        promoted: NodeId,
    },
    /// A split was merged into a parent of the same orientation.
    Flattened {
        /// The merged split.
        split: NodeId,
        /// The parent that received its slots.
        into: NodeId,
    },
    /// A split without slots was removed.
    RemovedSplit(NodeId),
    /// A group without tabs was removed.
    RemovedGroup(NodeId),
    /// The root took over the slots of its only child split.
    HoistedIntoRoot(NodeId),
    /// The root lost every slot and received a new empty group.
    RecreatedFallback(NodeId),
}

/// A batch of tree mutations followed by repair.
pub(crate) struct Transaction<'a> {
    pub(crate) tree: &'a mut DockTree,
    dirty: Vec<NodeId>,
    suppressed: HashSet<NodeId>,
    actions: Vec<RepairAction>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn begin(tree: &'a mut DockTree) -> Self {
        Self {
            tree,
            dirty: Vec::new(),
            suppressed: HashSet::new(),
            actions: Vec::new(),
        }
    }

    /// Queues `id` for a repair check on commit.
    pub(crate) fn mark(&mut self, id: NodeId) {
        if !self.dirty.contains(&id) {
            self.dirty.push(id);
        }
    }

    /// Excludes `id` from repair until released.
    pub(crate) fn suppress(&mut self, id: NodeId) {
        self.suppressed.insert(id);
    }

    pub(crate) fn release(&mut self, id: NodeId) {
        self.suppressed.remove(&id);
    }

    /// Runs repair, bumps the revision and reports what was changed.
    pub(crate) fn commit(mut self) -> Vec<RepairAction> {
        let span = trace_operation_debug!(
            span_names::TREE_REPAIR,
            dirty = self.dirty.len()
        );
        let _guard = span.enter();

        while let Some(id) = self.dirty.pop() {
            if self.suppressed.contains(&id) {
                debug!(node = %id, "skipping node being torn down");
                continue;
            }
            self.check(id);
        }

        self.tree.bump_revision();
        if !self.actions.is_empty() {
            debug!(
                actions = self.actions.len(),
                revision = self.tree.revision,
                "tree repaired"
            );
        }
        self.actions
    }

    fn check(&mut self, id: NodeId) {
        let root = self.tree.root;
        let Some(node) = self.tree.nodes.get(&id) else {
            return;
        };

        let step = match &node.kind {
            NodeKind::TabGroup(group) if group.is_empty() && !self.tree.is_fallback(id) => {
                Step::RemoveGroup
            }
            NodeKind::TabGroup(_) => Step::Keep,
            NodeKind::Split(_) if id == root => Step::NormalizeRoot,
            NodeKind::Split(split) if split.is_empty() => Step::RemoveSplit,
            NodeKind::Split(split) if split.len() == 1 => Step::SpliceOut,
            NodeKind::Split(_) => Step::Keep,
        };

        match step {
            Step::RemoveGroup => {
                self.remove_child(id);
                self.actions.push(RepairAction::RemovedGroup(id));
                debug!(group = %id, "removed empty group");
            }
            Step::RemoveSplit => {
                self.remove_child(id);
                self.actions.push(RepairAction::RemovedSplit(id));
                debug!(split = %id, "removed empty split");
            }
            Step::SpliceOut => self.splice_out(id),
            Step::NormalizeRoot => self.normalize_root(),
            Step::Keep => {}
        }
    }

    /// Detaches a non-root node from its parent and drops its record.
    fn remove_child(&mut self, id: NodeId) {
        self.suppress(id);
        let parent = self.tree.parent(id);
        if let Some(parent) = parent {
            if let Ok(split) = self.tree.split_mut(parent)
                && let Some(index) = split.index_of(id)
            {
                split.remove_slot(index);
            }
            self.mark(parent);
        }
        self.tree.drop_subtree(id);
        self.release(id);
    }

    fn splice_out(&mut self, id: NodeId) {
        let Some(parent) = self.tree.parent(id) else {
            return;
        };
        self.suppress(id);

        let Some(split) = self.take_split(id) else {
            self.release(id);
            return;
        };
        let Some(&promoted) = split.children.first() else {
            self.release(id);
            return;
        };

        if let Ok(parent_split) = self.tree.split_mut(parent)
            && let Some(index) = parent_split.index_of(id)
        {
            parent_split.children[index] = promoted;
        }
        if let Ok(node) = self.tree.node_mut(promoted) {
            node.parent = Some(parent);
        }
        self.actions.push(RepairAction::SplicedOut { split: id, promoted });
        debug!(split = %id, promoted = %promoted, "spliced out single-slot split");

        self.release(id);
        self.merge_if_same_orientation(promoted);
        if parent == self.tree.root {
            self.mark(parent);
        }
    }

    /// Merges split `id` into its parent when both share an orientation.
    ///
    /// The lone-slot root is exempt; it adopts the child's orientation in
    /// [`Self::normalize_root`] instead.
    pub(crate) fn merge_if_same_orientation(&mut self, id: NodeId) {
        let Some(orientation) = self.tree.split(id).ok().map(|s| s.orientation) else {
            return;
        };
        let Some(parent) = self.tree.parent(id) else {
            return;
        };
        let Ok(parent_split) = self.tree.split(parent) else {
            return;
        };
        if parent_split.orientation != orientation
            || (parent == self.tree.root && parent_split.len() == 1)
        {
            return;
        }

        self.suppress(id);
        let Some(split) = self.take_split(id) else {
            self.release(id);
            return;
        };
        if let Ok(parent_split) = self.tree.split_mut(parent)
            && let Some(index) = parent_split.index_of(id)
        {
            parent_split.fractions.splice(index, &split.fractions);
            parent_split
                .children
                .splice(index..=index, split.children.iter().copied());
        }
        for child in &split.children {
            if let Ok(node) = self.tree.node_mut(*child) {
                node.parent = Some(parent);
            }
        }
        self.actions.push(RepairAction::Flattened { split: id, into: parent });
        debug!(split = %id, into = %parent, "flattened same-orientation split");
        self.release(id);
    }

    /// Checks that a freshly linked split does not share its parent's
    /// orientation, flattening it when it does.
    pub(crate) fn ensure_alternating(&mut self, id: NodeId) {
        let nested = match (self.tree.split(id), self.tree.parent(id)) {
            (Ok(split), Some(parent)) => self.tree.split(parent).is_ok_and(|p| {
                p.orientation == split.orientation
                    && !(parent == self.tree.root && p.len() == 1)
            }),
            _ => false,
        };
        debug_assert!(
            !nested,
            "split {id} nested inside a split of the same orientation"
        );
        if nested {
            warn!(split = %id, "same-orientation nesting corrected by flattening");
            self.merge_if_same_orientation(id);
        }
    }

    fn normalize_root(&mut self) {
        let root = self.tree.root;
        let children = self.tree.children(root).to_vec();
        match children.as_slice() {
            [] => {
                let group = self.tree.attach_new_group(root, 0, 1, Vec::new());
                self.actions.push(RepairAction::RecreatedFallback(group));
                debug!(group = %group, "recreated fallback group");
            }
            [only] if self.tree.split(*only).is_ok() => {
                let only = *only;
                self.suppress(only);
                if let Some(split) = self.take_split(only) {
                    for child in &split.children {
                        if let Ok(node) = self.tree.node_mut(*child) {
                            node.parent = Some(root);
                        }
                    }
                    if let Ok(root_split) = self.tree.split_mut(root) {
                        root_split.orientation = split.orientation;
                        root_split.fractions = split.fractions;
                        root_split.children = split.children;
                    }
                    self.actions.push(RepairAction::HoistedIntoRoot(only));
                    debug!(split = %only, "hoisted lone split into root");
                }
                self.release(only);
            }
            _ => {}
        }
    }

    /// Removes a split record from the arena, returning its payload.
    fn take_split(&mut self, id: NodeId) -> Option<SplitNode> {
        if self.tree.split(id).is_err() {
            return None;
        }
        match self.tree.nodes.remove(&id)?.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::TabGroup(_) => None,
        }
    }
}

enum Step {
    RemoveGroup,
    RemoveSplit,
    SpliceOut,
    NormalizeRoot,
    Keep,
}
