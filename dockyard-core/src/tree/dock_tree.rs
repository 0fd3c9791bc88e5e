//! The docking tree arena and its read-only queries

use std::collections::{HashMap, HashSet};

use crate::error::StructuralError;

use super::node::{DockNode, NodeKind, SplitNode, Tab, TabGroup};
use super::types::{NodeId, Orientation, TabId};

/// Arena of dock nodes rooted at a permanent split.
///
/// Nodes refer to each other by [`NodeId`]; every node except the root
/// carries a back-pointer to its parent split. The root split is created
/// with the tree and never removed.
#[derive(Debug, Clone)]
pub struct DockTree {
    pub(crate) nodes: HashMap<NodeId, DockNode>,
    pub(crate) root: NodeId,
    pub(crate) revision: u64,
}

impl Default for DockTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DockTree {
    /// Creates a tree holding only the empty fallback group.
    #[must_use]
    pub fn new() -> Self {
        let root = DockNode::new(None, NodeKind::Split(SplitNode::new(Orientation::Horizontal)));
        let root_id = root.id;
        let mut tree = Self {
            nodes: HashMap::from([(root_id, root)]),
            root: root_id,
            revision: 0,
        };
        tree.attach_new_group(root_id, 0, 1, Vec::new());
        tree
    }

    // ===== Lookup =====

    /// The root split.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Counter bumped by every committed mutation.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of nodes, splits and groups alike.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root split is permanent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if `id` is part of the tree.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&DockNode> {
        self.nodes.get(&id)
    }

    /// Looks up a node, failing if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::NodeNotFound`] if `id` is not in the tree.
    pub fn node(&self, id: NodeId) -> Result<&DockNode, StructuralError> {
        self.nodes.get(&id).ok_or(StructuralError::NodeNotFound(id))
    }

    /// Looks up a tab group.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is absent or is a split.
    pub fn group(&self, id: NodeId) -> Result<&TabGroup, StructuralError> {
        self.node(id)?
            .as_group()
            .ok_or(StructuralError::NotATabGroup(id))
    }

    /// Looks up a split.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is absent or is a tab group.
    pub fn split(&self, id: NodeId) -> Result<&SplitNode, StructuralError> {
        self.node(id)?
            .as_split()
            .ok_or(StructuralError::NotASplit(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut DockNode, StructuralError> {
        self.nodes
            .get_mut(&id)
            .ok_or(StructuralError::NodeNotFound(id))
    }

    pub(crate) fn group_mut(&mut self, id: NodeId) -> Result<&mut TabGroup, StructuralError> {
        self.node_mut(id)?
            .as_group_mut()
            .ok_or(StructuralError::NotATabGroup(id))
    }

    pub(crate) fn split_mut(&mut self, id: NodeId) -> Result<&mut SplitNode, StructuralError> {
        self.node_mut(id)?
            .as_split_mut()
            .ok_or(StructuralError::NotASplit(id))
    }

    /// Parent split of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Slot index of `id` within its parent.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.split(parent).ok()?.index_of(id)
    }

    /// Children of a split, empty for groups and unknown IDs.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .and_then(DockNode::as_split)
            .map_or(&[], |s| s.children.as_slice())
    }

    /// Ancestors of `id` from its parent up to the root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            ancestors.push(node);
            current = self.parent(node);
        }
        ancestors
    }

    // ===== Traversal =====

    /// All nodes in depth-first pre-order, starting at the root.
    #[must_use]
    pub fn nodes_depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    /// All tab groups in depth-first order.
    #[must_use]
    pub fn groups(&self) -> Vec<NodeId> {
        self.nodes_depth_first()
            .into_iter()
            .filter(|id| self.nodes.get(id).is_some_and(DockNode::is_group))
            .collect()
    }

    /// All splits in depth-first order, root first.
    #[must_use]
    pub fn splits(&self) -> Vec<NodeId> {
        self.nodes_depth_first()
            .into_iter()
            .filter(|id| self.nodes.get(id).is_some_and(|n| !n.is_group()))
            .collect()
    }

    /// The group owning `tab` and the tab's index in it.
    #[must_use]
    pub fn find_tab(&self, tab: TabId) -> Option<(NodeId, usize)> {
        self.nodes.values().find_map(|node| {
            node.as_group()
                .and_then(|g| g.position(tab))
                .map(|index| (node.id, index))
        })
    }

    /// Looks up a tab by ID.
    #[must_use]
    pub fn tab(&self, tab: TabId) -> Option<&Tab> {
        let (group, index) = self.find_tab(tab)?;
        self.group(group).ok()?.tabs.get(index)
    }

    /// Total number of real tabs in the tree.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.nodes
            .values()
            .filter_map(DockNode::as_group)
            .map(TabGroup::len)
            .sum()
    }

    /// Returns true if `group` is the sole child of the root, the one group
    /// allowed to stay empty.
    #[must_use]
    pub fn is_fallback(&self, group: NodeId) -> bool {
        self.parent(group) == Some(self.root) && self.children(self.root).len() == 1
    }

    /// The group that fills the host when nothing else is left.
    #[must_use]
    pub fn fallback_group(&self) -> Option<NodeId> {
        match self.children(self.root) {
            [only] if self.nodes.get(only).is_some_and(DockNode::is_group) => Some(*only),
            _ => None,
        }
    }

    // ===== Invariants =====

    /// Describes every structural invariant the tree currently violates.
    ///
    /// An empty result means the tree is well formed.
    #[must_use]
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen_tabs = HashSet::new();
        let reachable: HashSet<NodeId> = self.nodes_depth_first().into_iter().collect();

        if reachable.len() != self.nodes.len() {
            issues.push(format!(
                "{} nodes are not reachable from the root",
                self.nodes.len() - reachable.len()
            ));
        }

        for id in &reachable {
            let Some(node) = self.nodes.get(id) else {
                issues.push(format!("{id} is referenced but missing"));
                continue;
            };
            let is_root = *id == self.root;

            if let Some(parent) = node.parent {
                if !self.children(parent).contains(id) {
                    issues.push(format!("{id} points at {parent} which does not list it"));
                }
            } else if !is_root {
                issues.push(format!("{id} has no parent"));
            }

            match &node.kind {
                NodeKind::Split(split) => {
                    if split.fractions.len() != split.children.len() {
                        issues.push(format!("{id} has mismatched weights and children"));
                    }
                    if is_root {
                        if split.is_empty() {
                            issues.push("root has no slots".to_string());
                        }
                        if let [only] = split.children.as_slice()
                            && self.nodes.get(only).is_some_and(|n| !n.is_group())
                        {
                            issues.push("root holds a lone split".to_string());
                        }
                    } else if split.len() < 2 {
                        issues.push(format!("{id} has {} slots", split.len()));
                    }
                    if let Some(parent) = node.parent.and_then(|p| self.split(p).ok())
                        && parent.orientation == split.orientation
                        && !(node.parent == Some(self.root) && parent.len() == 1)
                    {
                        issues.push(format!("{id} shares its parent's orientation"));
                    }
                    for child in &split.children {
                        if self.parent(*child) != Some(*id) {
                            issues.push(format!("{child} does not point back at {id}"));
                        }
                    }
                }
                NodeKind::TabGroup(group) => {
                    if group.is_empty() && !self.is_fallback(*id) {
                        issues.push(format!("{id} is an empty group"));
                    }
                    for tab in &group.tabs {
                        if !seen_tabs.insert(tab.id) {
                            issues.push(format!("{} is owned twice", tab.id));
                        }
                    }
                }
            }
        }
        issues
    }

    // ===== Internal construction helpers =====

    /// Creates a group under `parent` at `index` without running repair.
    pub(crate) fn attach_new_group(
        &mut self,
        parent: NodeId,
        index: usize,
        weight: u32,
        tabs: Vec<Tab>,
    ) -> NodeId {
        let node = DockNode::new(Some(parent), NodeKind::TabGroup(TabGroup::with_tabs(tabs)));
        let id = node.id;
        self.nodes.insert(id, node);
        if let Some(split) = self.nodes.get_mut(&parent).and_then(DockNode::as_split_mut) {
            split.insert_slot(index, weight, id);
        }
        id
    }

    /// Removes `id` and its whole subtree from the arena without touching
    /// the parent's slot list.
    pub(crate) fn drop_subtree(&mut self, id: NodeId) -> Vec<Tab> {
        let mut released = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                match node.kind {
                    NodeKind::Split(split) => stack.extend(split.children),
                    NodeKind::TabGroup(group) => released.extend(group.tabs),
                }
            }
        }
        released
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
