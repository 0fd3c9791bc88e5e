//! Invariant-preserving mutations of the docking tree
//!
//! Every public mutation validates its inputs first and fails without
//! touching the tree, then applies the change inside a repair
//! [`Transaction`].

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::StructuralError;
use crate::geometry::{Rect, Size};
use crate::trace_operation;
use crate::tracing::span_names;

use super::dock_tree::DockTree;
use super::fractions::SplitFractions;
use super::node::{DockNode, NodeKind, SplitNode, Tab};
use super::repair::{RepairAction, Transaction};
use super::types::{Direction, NodeId, Orientation, TabId};

impl DockTree {
    // ===== Docking =====

    /// Docks `tabs` as a new group along the `direction` edge of `target`.
    ///
    /// The target is wrapped in a two-slot split oriented along the
    /// direction, with the new group first for Left/Top and last for
    /// Right/Bottom. When the target's parent already runs along that axis
    /// (or is a root holding only the target) a slot is inserted into the
    /// parent instead. Targeting the root docks along the whole tree's edge.
    ///
    /// `fraction` is the share of the target's current extent given to the
    /// new group.
    ///
    /// Returns the ID of the new group.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is not in the tree, `tabs` is empty, or
    /// one of the tabs is already owned by a group.
    pub fn insert_split(
        &mut self,
        target: NodeId,
        direction: Direction,
        tabs: Vec<Tab>,
        fraction: f64,
    ) -> Result<NodeId, StructuralError> {
        if target == self.root {
            return self.dock_outer(direction, tabs, fraction);
        }
        let node = self.node(target)?;
        self.check_new_tabs(&tabs)?;

        let span = trace_operation!(span_names::TREE_MUTATION, op = "insert_split", %target, %direction);
        let _guard = span.enter();

        let axis = direction.orientation();
        let leading = direction.is_leading();
        let extent = axis.extent(node.bounds.size());
        let Some(parent) = node.parent else {
            return Err(StructuralError::NodeNotFound(target));
        };
        let target_axis = node.as_split().map(|s| s.orientation);
        let parent_split = self.split(parent)?;
        let index = parent_split
            .index_of(target)
            .ok_or(StructuralError::NodeNotFound(target))?;
        let lone_root_child = parent == self.root && parent_split.len() == 1;
        let parent_axis = parent_split.orientation;

        let mut tx = Transaction::begin(self);
        let group = if target_axis == Some(axis) {
            // a split along the same axis takes the new slot at its own edge
            let len = tx.tree.split(target)?.len();
            let slot = if leading { 0 } else { len };
            let group = tx.tree.attach_new_group(target, slot, 1, tabs);
            insert_share_weight(tx.tree, target, group, fraction)?;
            group
        } else if parent_axis == axis || lone_root_child {
            let parent_split = tx.tree.split_mut(parent)?;
            parent_split.orientation = axis;
            let mut fractions = parent_split.fractions.clone();
            let slot = fractions.split_slot(index, fraction, leading);
            let group = tx.tree.attach_new_group(parent, slot, 1, tabs);
            tx.tree.split_mut(parent)?.fractions = fractions;
            group
        } else {
            let wrapper = tx.tree.wrap_in_split(target, axis)?;
            let group = tx.tree.attach_new_group(wrapper, usize::from(!leading), 1, tabs);
            tx.tree.split_mut(wrapper)?.fractions = SplitFractions::two_way(extent, fraction, leading);
            tx.ensure_alternating(wrapper);
            group
        };
        tx.mark(target);
        let actions = tx.commit();

        info!(group = %group, %direction, repaired = actions.len(), "docked new group");
        Ok(group)
    }

    /// Docks `tabs` as a new group along an outer edge of the whole tree.
    ///
    /// When the root already runs along the edge's axis the group becomes
    /// its first or last slot. Otherwise the root's current content is moved
    /// into a new split and the root takes the new group beside it.
    ///
    /// # Errors
    ///
    /// Returns an error if `tabs` is empty or already owned.
    pub fn dock_outer(
        &mut self,
        direction: Direction,
        tabs: Vec<Tab>,
        fraction: f64,
    ) -> Result<NodeId, StructuralError> {
        self.check_new_tabs(&tabs)?;

        let span = trace_operation!(span_names::TREE_MUTATION, op = "dock_outer", %direction);
        let _guard = span.enter();

        let root = self.root;
        let axis = direction.orientation();
        let leading = direction.is_leading();
        let bounds = self.node(root)?.bounds;
        let fallback = self.fallback_group();
        let root_split = self.split(root)?;
        let len = root_split.len();
        let along_axis = len <= 1 || root_split.orientation == axis;

        let mut tx = Transaction::begin(self);
        let group = if along_axis {
            tx.tree.split_mut(root)?.orientation = axis;
            let slot = if leading { 0 } else { len };
            let group = tx.tree.attach_new_group(root, slot, 1, tabs);
            insert_share_weight(tx.tree, root, group, fraction)?;
            group
        } else {
            let content = tx.tree.take_root_content(axis)?;
            let group = tx.tree.attach_new_group(root, usize::from(!leading), 1, tabs);
            tx.tree.split_mut(root)?.fractions =
                SplitFractions::two_way(axis.extent(bounds.size()), fraction, leading);
            tx.ensure_alternating(content);
            group
        };
        if let Some(fallback) = fallback {
            tx.mark(fallback);
        }
        tx.mark(root);
        let actions = tx.commit();

        info!(group = %group, %direction, repaired = actions.len(), "docked group at outer edge");
        Ok(group)
    }

    /// Inserts `tabs` as a new group at slot `index` of `split`, taking
    /// `fraction` of the split's whole extent.
    ///
    /// This is the structural half of a neighbor dock.
    ///
    /// # Errors
    ///
    /// Returns an error if `split` is not a split, `index` is past the end,
    /// or `tabs` is empty or already owned.
    pub fn insert_slot(
        &mut self,
        split: NodeId,
        index: usize,
        tabs: Vec<Tab>,
        fraction: f64,
    ) -> Result<NodeId, StructuralError> {
        let len = self.split(split)?.len();
        if index > len {
            return Err(StructuralError::IndexOutOfRange { index, len });
        }
        self.check_new_tabs(&tabs)?;

        let span = trace_operation!(span_names::TREE_MUTATION, op = "insert_slot", %split, index);
        let _guard = span.enter();

        let fallback = (split == self.root)
            .then(|| self.fallback_group())
            .flatten();
        let mut tx = Transaction::begin(self);
        let group = tx.tree.attach_new_group(split, index, 1, tabs);
        insert_share_weight(tx.tree, split, group, fraction)?;
        if let Some(fallback) = fallback {
            tx.mark(fallback);
        }
        tx.mark(split);
        tx.commit();

        info!(group = %group, %split, index, "inserted neighbor slot");
        Ok(group)
    }

    // ===== Removal =====

    /// Detaches `node` and its subtree, returning the tabs it owned.
    ///
    /// Repair runs in the same transaction, so a parent left with one slot
    /// is spliced out. Removing the root's last child leaves a new empty
    /// fallback group.
    ///
    /// # Errors
    ///
    /// Returns an error for the root or for a node not in the tree.
    pub fn remove_node(&mut self, node: NodeId) -> Result<Vec<Tab>, StructuralError> {
        if node == self.root {
            return Err(StructuralError::CannotRemoveRoot);
        }
        let parent = self
            .node(node)?
            .parent
            .ok_or(StructuralError::NodeNotFound(node))?;

        let span = trace_operation!(span_names::TREE_MUTATION, op = "remove_node", %node);
        let _guard = span.enter();

        let mut tx = Transaction::begin(self);
        tx.suppress(node);
        let split = tx.tree.split_mut(parent)?;
        if let Some(index) = split.index_of(node) {
            split.remove_slot(index);
        }
        let released = tx.tree.drop_subtree(node);
        tx.release(node);
        tx.mark(parent);
        let actions = tx.commit();

        info!(%node, tabs = released.len(), repaired = actions.len(), "removed node");
        Ok(released)
    }

    // ===== Tabs =====

    /// Inserts `tab` into `group` at `index` (clamped to the tab count) and
    /// selects it.
    ///
    /// Returns the index the tab landed at.
    ///
    /// # Errors
    ///
    /// Returns an error if `group` is not a tab group or the tab is already
    /// owned by a group.
    pub fn merge_into_tab_group(
        &mut self,
        group: NodeId,
        tab: Tab,
        index: usize,
    ) -> Result<usize, StructuralError> {
        self.group(group)?;
        if self.find_tab(tab.id).is_some() {
            return Err(StructuralError::DuplicateTab(tab.id));
        }

        let tab_id = tab.id;
        let mut tx = Transaction::begin(self);
        let target = tx.tree.group_mut(group)?;
        let index = index.min(target.len());
        target.tabs.insert(index, tab);
        target.selected = index;
        tx.mark(group);
        tx.commit();

        debug!(%group, tab = %tab_id, index, "merged tab into group");
        Ok(index)
    }

    /// Removes `tab` from its group and returns it.
    ///
    /// A group left without tabs is removed unless it is the fallback.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::TabNotFound`] if no group owns the tab.
    pub fn remove_tab(&mut self, tab: TabId) -> Result<Tab, StructuralError> {
        let (group, index) = self.find_tab(tab).ok_or(StructuralError::TabNotFound(tab))?;

        let mut tx = Transaction::begin(self);
        let owner = tx.tree.group_mut(group)?;
        let removed = owner.tabs.remove(index);
        if index < owner.selected {
            owner.selected -= 1;
        }
        owner.clamp_selection();
        tx.mark(group);
        let actions = tx.commit();

        if actions.contains(&RepairAction::RemovedGroup(group)) {
            debug!(%group, tab = %tab, "last tab removed, group dropped");
        }
        Ok(removed)
    }

    /// Closes a closable tab.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::TabNotClosable`] for a pinned tab, or
    /// [`StructuralError::TabNotFound`].
    pub fn close_tab(&mut self, tab: TabId) -> Result<Tab, StructuralError> {
        let closable = self
            .tab(tab)
            .map(|t| t.closable)
            .ok_or(StructuralError::TabNotFound(tab))?;
        if !closable {
            return Err(StructuralError::TabNotClosable(tab));
        }
        let closed = self.remove_tab(tab)?;
        info!(tab = %tab, title = %closed.title, "closed tab");
        Ok(closed)
    }

    /// Makes `tab` the visible tab of its group.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::TabNotFound`] if no group owns the tab.
    pub fn select_tab(&mut self, tab: TabId) -> Result<(), StructuralError> {
        let (group, index) = self.find_tab(tab).ok_or(StructuralError::TabNotFound(tab))?;
        let owner = self.group_mut(group)?;
        if owner.selected != index {
            owner.selected = index;
            self.bump_revision();
        }
        Ok(())
    }

    /// Moves the tab at `from` to `to` within `group`. The selected tab
    /// stays selected.
    ///
    /// # Errors
    ///
    /// Returns an error if `group` is not a tab group or either index is
    /// out of range.
    pub fn move_tab_within(
        &mut self,
        group: NodeId,
        from: usize,
        to: usize,
    ) -> Result<(), StructuralError> {
        let owner = self.group_mut(group)?;
        let len = owner.len();
        for index in [from, to] {
            if index >= len {
                return Err(StructuralError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let selected = owner.selected_tab().map(|t| t.id);
        let tab = owner.tabs.remove(from);
        owner.tabs.insert(to, tab);
        if let Some(index) = selected.and_then(|id| owner.position(id)) {
            owner.selected = index;
        }
        self.bump_revision();
        Ok(())
    }

    // ===== Resize =====

    /// Moves the divider after slot `index` of `split` by `pixel_delta`
    /// pixels along the split's axis, measured against the split's current
    /// bounds.
    ///
    /// Returns the delta actually applied; see [`SplitFractions::adjust`].
    ///
    /// # Errors
    ///
    /// Returns an error if `split` is not a split or `index` has no slot
    /// after it.
    pub fn adjust_divider(
        &mut self,
        split: NodeId,
        index: usize,
        pixel_delta: i64,
        min_slot_pixels: i64,
    ) -> Result<i64, StructuralError> {
        let bounds = self.node(split)?.bounds;
        let node = self.split_mut(split)?;
        let len = node.len();
        if index + 1 >= len {
            return Err(StructuralError::IndexOutOfRange { index, len });
        }
        let total = node.orientation.extent(bounds.size()).max(0.0).round() as i64;
        let applied = node.fractions.adjust(index, pixel_delta, total, min_slot_pixels);
        if applied != 0 {
            self.bump_revision();
        }
        Ok(applied)
    }

    // ===== Host layout =====

    /// Records the on-screen bounds of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::NodeNotFound`] if the node is absent.
    pub fn set_bounds(&mut self, node: NodeId, bounds: Rect) -> Result<(), StructuralError> {
        self.node_mut(node)?.bounds = bounds;
        Ok(())
    }

    /// Records the tab bar rectangle of `group`.
    ///
    /// # Errors
    ///
    /// Returns an error if `group` is not a tab group.
    pub fn set_tab_bar(&mut self, group: NodeId, tab_bar: Rect) -> Result<(), StructuralError> {
        self.group_mut(group)?.tab_bar = tab_bar;
        Ok(())
    }

    /// Records the measured header size of `tab`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::TabNotFound`] if no group owns the tab.
    pub fn set_header_size(&mut self, tab: TabId, size: Size) -> Result<(), StructuralError> {
        let (group, index) = self.find_tab(tab).ok_or(StructuralError::TabNotFound(tab))?;
        let owner = self.group_mut(group)?;
        if let Some(entry) = owner.tabs.get_mut(index) {
            entry.header_size = size;
        }
        Ok(())
    }

    // ===== Helpers =====

    fn check_new_tabs(&self, tabs: &[Tab]) -> Result<(), StructuralError> {
        if tabs.is_empty() {
            return Err(StructuralError::EmptyContent);
        }
        let mut seen = HashSet::new();
        for tab in tabs {
            if !seen.insert(tab.id) || self.find_tab(tab.id).is_some() {
                return Err(StructuralError::DuplicateTab(tab.id));
            }
        }
        Ok(())
    }

    /// Puts a new split of `orientation` in `target`'s slot and moves
    /// `target` into it as the only child.
    fn wrap_in_split(
        &mut self,
        target: NodeId,
        orientation: Orientation,
    ) -> Result<NodeId, StructuralError> {
        let parent = self
            .parent(target)
            .ok_or(StructuralError::NodeNotFound(target))?;
        let bounds = self.node(target)?.bounds;

        let mut split = SplitNode::new(orientation);
        split.insert_slot(0, 1, target);
        let mut wrapper = DockNode::new(Some(parent), NodeKind::Split(split));
        wrapper.bounds = bounds;
        let wrapper_id = wrapper.id;
        self.nodes.insert(wrapper_id, wrapper);

        let parent_split = self.split_mut(parent)?;
        if let Some(index) = parent_split.index_of(target) {
            parent_split.children[index] = wrapper_id;
        }
        self.node_mut(target)?.parent = Some(wrapper_id);
        Ok(wrapper_id)
    }

    /// Moves every slot of the root into a new child split and reorients
    /// the root along `axis`. The child becomes the root's only slot.
    fn take_root_content(&mut self, axis: Orientation) -> Result<NodeId, StructuralError> {
        let root = self.root;
        let bounds = self.node(root)?.bounds;
        let root_split = self.split_mut(root)?;
        let content = SplitNode {
            orientation: root_split.orientation,
            fractions: std::mem::take(&mut root_split.fractions),
            children: std::mem::take(&mut root_split.children),
            dividers: std::mem::take(&mut root_split.dividers),
        };
        root_split.orientation = axis;

        let children = content.children.clone();
        let mut node = DockNode::new(Some(root), NodeKind::Split(content));
        node.bounds = bounds;
        let content_id = node.id;
        self.nodes.insert(content_id, node);
        for child in children {
            self.node_mut(child)?.parent = Some(content_id);
        }
        self.split_mut(root)?.insert_slot(0, 1, content_id);
        Ok(content_id)
    }
}

/// Gives the freshly attached `child` of `split` a weight worth `fraction`
/// of the whole, shrinking the other slots proportionally.
fn insert_share_weight(
    tree: &mut DockTree,
    split: NodeId,
    child: NodeId,
    fraction: f64,
) -> Result<(), StructuralError> {
    let split = tree.split_mut(split)?;
    let Some(index) = split.index_of(child) else {
        return Ok(());
    };
    let mut fractions = split.fractions.clone();
    fractions.remove(index);
    fractions.insert_share(index, fraction);
    split.fractions = fractions;
    Ok(())
}
