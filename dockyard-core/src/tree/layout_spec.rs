//! Initial layout descriptions
//!
//! A host describes its starting layout in TOML or JSON and turns it into a
//! tree with [`create_tree`]:
//!
//! ```toml
//! orientation = "horizontal"
//!
//! [[slots]]
//! weight = 1
//! [slots.node]
//! type = "tab_group"
//! tabs = [{ title = "Explorer" }]
//!
//! [[slots]]
//! weight = 3
//! [slots.node]
//! type = "tab_group"
//! tabs = [{ title = "main.rs" }, { title = "lib.rs", closable = false }]
//! ```
//!
//! Layouts are only read, never written back.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, StructuralError};
use crate::geometry::Size;
use crate::trace_operation;
use crate::tracing::span_names;

use super::dock_tree::DockTree;
use super::fractions::SplitFractions;
use super::node::{DockNode, NodeKind, SplitNode, Tab, TabGroup};
use super::types::{NodeId, Orientation};

/// A split description. The root of a layout is one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpec {
    /// Layout axis.
    #[serde(default)]
    pub orientation: Orientation,
    /// Optional weight list such as `"1 2 1"`, overriding the slot weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<String>,
    /// Child slots in order.
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
}

/// One weighted slot of a split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSpec {
    /// Relative weight, at least 1.
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// The slot's content.
    pub node: NodeSpec,
}

const fn default_weight() -> u32 {
    1
}

/// Content of a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeSpec {
    /// A nested split.
    Split(LayoutSpec),
    /// A leaf.
    TabGroup(GroupSpec),
}

/// A tab group description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Tabs in header order.
    #[serde(default)]
    pub tabs: Vec<TabSpec>,
    /// Index of the visible tab.
    #[serde(default)]
    pub selected: usize,
}

/// A tab description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSpec {
    /// Header label.
    pub title: String,
    /// Whether the user may close the tab.
    #[serde(default = "default_true")]
    pub closable: bool,
    /// Measured header width, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_width: Option<f64>,
}

const fn default_true() -> bool {
    true
}

impl TabSpec {
    fn to_tab(&self) -> Tab {
        Tab::new(self.title.clone())
            .with_closable(self.closable)
            .with_header_size(Size::new(self.header_width.unwrap_or(0.0), 0.0))
    }
}

impl LayoutSpec {
    /// Parses a TOML layout description.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text does not describe a layout.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parses a JSON layout description.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text does not describe a layout.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads a layout file, JSON when the extension is `.json` and TOML
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it does not describe a layout.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_toml(&text)
        }
    }

    fn resolved_weights(&self) -> Result<Vec<u32>, StructuralError> {
        if let Some(text) = &self.weights {
            let fractions = SplitFractions::parse(text)?;
            if fractions.len() != self.slots.len() {
                return Err(StructuralError::InvalidLayout(format!(
                    "{} weights given for {} slots",
                    fractions.len(),
                    self.slots.len()
                )));
            }
            return Ok(fractions.weights().to_vec());
        }
        self.slots
            .iter()
            .map(|slot| {
                if slot.weight == 0 {
                    Err(StructuralError::InvalidLayout(
                        "slot weights must be at least 1".to_string(),
                    ))
                } else {
                    Ok(slot.weight)
                }
            })
            .collect()
    }

    /// The description the root actually takes: a root whose only slot is a
    /// split is replaced by that split.
    fn hoisted(&self) -> &Self {
        let mut spec = self;
        while let [SlotSpec {
            node: NodeSpec::Split(inner),
            ..
        }] = spec.slots.as_slice()
        {
            spec = inner;
        }
        spec
    }
}

/// Builds a tree from a layout description.
///
/// A root without slots yields the empty fallback group. An empty group is
/// only accepted as the root's sole child.
///
/// # Errors
///
/// Returns [`StructuralError::InvalidLayout`] for a non-root split with
/// fewer than two slots, an empty group elsewhere, or bad weights;
/// [`StructuralError::SameOrientationNesting`] for a split nested in a split
/// of the same orientation; [`StructuralError::IndexOutOfRange`] for a
/// selected index past the group's tabs.
pub fn create_tree(spec: &LayoutSpec) -> Result<DockTree, StructuralError> {
    let span = trace_operation!(span_names::LAYOUT_CREATE, slots = spec.slots.len());
    let _guard = span.enter();

    let spec = spec.hoisted();
    let root = DockNode::new(None, NodeKind::Split(SplitNode::new(spec.orientation)));
    let root_id = root.id;
    let mut tree = DockTree {
        nodes: std::collections::HashMap::from([(root_id, root)]),
        root: root_id,
        revision: 0,
    };

    if spec.slots.is_empty() {
        tree.attach_new_group(root_id, 0, 1, Vec::new());
        return Ok(tree);
    }

    let sole = spec.slots.len() == 1;
    let weights = spec.resolved_weights()?;
    for (index, (slot, weight)) in spec.slots.iter().zip(weights).enumerate() {
        let child = build_node(&mut tree, root_id, spec.orientation, &slot.node, sole)?;
        tree.split_mut(root_id)?.insert_slot(index, weight, child);
    }

    debug_assert!(
        tree.invariant_violations().is_empty(),
        "layout produced an invalid tree: {:?}",
        tree.invariant_violations()
    );
    debug!(nodes = tree.len(), tabs = tree.tab_count(), "created tree from layout");
    Ok(tree)
}

fn build_node(
    tree: &mut DockTree,
    parent: NodeId,
    parent_orientation: Orientation,
    spec: &NodeSpec,
    sole_root_child: bool,
) -> Result<NodeId, StructuralError> {
    match spec {
        NodeSpec::TabGroup(group) => {
            if group.tabs.is_empty() && !sole_root_child {
                return Err(StructuralError::InvalidLayout(
                    "only the root's sole child may be an empty tab group".to_string(),
                ));
            }
            if !group.tabs.is_empty() && group.selected >= group.tabs.len() {
                return Err(StructuralError::IndexOutOfRange {
                    index: group.selected,
                    len: group.tabs.len(),
                });
            }
            let mut leaf = TabGroup::with_tabs(group.tabs.iter().map(TabSpec::to_tab).collect());
            leaf.selected = group.selected;
            let node = DockNode::new(Some(parent), NodeKind::TabGroup(leaf));
            let id = node.id;
            tree.nodes.insert(id, node);
            Ok(id)
        }
        NodeSpec::Split(split) => {
            if split.slots.len() < 2 {
                return Err(StructuralError::InvalidLayout(format!(
                    "nested split has {} slots, at least 2 are required",
                    split.slots.len()
                )));
            }
            let node = DockNode::new(Some(parent), NodeKind::Split(SplitNode::new(split.orientation)));
            let id = node.id;
            if split.orientation == parent_orientation {
                return Err(StructuralError::SameOrientationNesting(id));
            }
            tree.nodes.insert(id, node);

            let weights = split.resolved_weights()?;
            for (index, (slot, weight)) in split.slots.iter().zip(weights).enumerate() {
                let child = build_node(tree, id, split.orientation, &slot.node, false)?;
                tree.split_mut(id)?.insert_slot(index, weight, child);
            }
            Ok(id)
        }
    }
}
