//! Node records stored in the docking tree arena

use crate::drop_target::DropTarget;
use crate::geometry::{Point, Rect, Size};

use super::fractions::SplitFractions;
use super::types::{NodeId, Orientation, TabId};

/// A tab owned by a group or by the floating carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    /// Unique identifier that survives moves between groups.
    pub id: TabId,
    /// Header label.
    pub title: String,
    /// Whether the tab may be closed by the user.
    pub closable: bool,
    /// Header size measured by the host. Zero means "use the default".
    pub header_size: Size,
    /// Header rectangle in host coordinates, computed by the layout pass.
    pub header: Rect,
}

impl Tab {
    /// Creates a closable tab with a fresh ID.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TabId::new(),
            title: title.into(),
            closable: true,
            header_size: Size::default(),
            header: Rect::EMPTY,
        }
    }

    /// Sets whether the tab can be closed.
    #[must_use]
    pub const fn with_closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    /// Sets the measured header size.
    #[must_use]
    pub const fn with_header_size(mut self, size: Size) -> Self {
        self.header_size = size;
        self
    }
}

/// Ghost header shown where a foreign tab would land.
///
/// It is not a tab: it is never counted, selected or dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placeholder {
    /// Position among the real tabs where the ghost is shown.
    pub index: usize,
    /// Header size of the carried tab.
    pub size: Size,
    /// Rectangle computed by the layout pass.
    pub rect: Rect,
}

/// What a pointer hit inside a tab bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderHit {
    /// A real tab header at this index.
    Tab(usize),
    /// The placeholder shown at this index.
    Placeholder(usize),
}

impl HeaderHit {
    /// Index among the real tabs.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Tab(index) | Self::Placeholder(index) => index,
        }
    }
}

/// A leaf holding an ordered set of tabs, one of which is visible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabGroup {
    /// Real tabs in header order.
    pub tabs: Vec<Tab>,
    /// Index of the visible tab. Meaningless when `tabs` is empty.
    pub selected: usize,
    /// The header strip, computed by the layout pass.
    pub tab_bar: Rect,
    /// Ghost header for an incoming foreign tab.
    pub placeholder: Option<Placeholder>,
    /// Drop target currently highlighted while a tab floats over the group.
    pub hover: Option<DropTarget>,
}

impl TabGroup {
    /// Creates a group holding `tabs`, with the first one selected.
    #[must_use]
    pub fn with_tabs(tabs: Vec<Tab>) -> Self {
        Self {
            tabs,
            ..Self::default()
        }
    }

    /// Number of real tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns true if the group holds no real tab.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Index of `tab` in this group.
    #[must_use]
    pub fn position(&self, tab: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab)
    }

    /// The visible tab.
    #[must_use]
    pub fn selected_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.selected)
    }

    /// Hit-tests tab headers, last to first, then the placeholder.
    #[must_use]
    pub fn header_at(&self, point: Point) -> Option<HeaderHit> {
        if let Some(index) = self.tabs.iter().rposition(|t| t.header.contains(point)) {
            return Some(HeaderHit::Tab(index));
        }
        self.placeholder
            .filter(|p| p.rect.contains(point))
            .map(|p| HeaderHit::Placeholder(p.index))
    }

    pub(crate) fn clamp_selection(&mut self) {
        if self.selected >= self.tabs.len() {
            self.selected = self.tabs.len().saturating_sub(1);
        }
    }
}

/// A node that divides its space among weighted child slots.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitNode {
    /// Layout axis.
    pub orientation: Orientation,
    /// One weight per child.
    pub fractions: SplitFractions,
    /// Children in slot order.
    pub children: Vec<NodeId>,
    /// Divider rectangles between adjacent slots, computed by the layout pass.
    pub dividers: Vec<Rect>,
}

impl SplitNode {
    /// Creates an empty split.
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            fractions: SplitFractions::default(),
            children: Vec::new(),
            dividers: Vec::new(),
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the split has no slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// `(weight, child)` pairs in slot order.
    pub fn slots(&self) -> impl Iterator<Item = (u32, NodeId)> + '_ {
        self.fractions
            .weights()
            .iter()
            .copied()
            .zip(self.children.iter().copied())
    }

    /// Slot index of `child`.
    #[must_use]
    pub fn index_of(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    pub(crate) fn insert_slot(&mut self, index: usize, weight: u32, child: NodeId) {
        let index = index.min(self.children.len());
        self.fractions.insert(index, weight);
        self.children.insert(index, child);
    }

    pub(crate) fn remove_slot(&mut self, index: usize) -> Option<(u32, NodeId)> {
        if index >= self.children.len() {
            return None;
        }
        let weight = self.fractions.remove(index).unwrap_or(1);
        Some((weight, self.children.remove(index)))
    }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An interior node.
    Split(SplitNode),
    /// A leaf.
    TabGroup(TabGroup),
}

/// A node record in the tree arena.
#[derive(Debug, Clone, PartialEq)]
pub struct DockNode {
    /// This node's ID.
    pub id: NodeId,
    /// Back-pointer to the parent split; `None` only for the root.
    pub parent: Option<NodeId>,
    /// On-screen bounds in host coordinates.
    pub bounds: Rect,
    /// Split or tab group payload.
    pub kind: NodeKind,
}

impl DockNode {
    pub(crate) fn new(parent: Option<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            parent,
            bounds: Rect::EMPTY,
            kind,
        }
    }

    /// Returns the split payload, if this is a split.
    #[must_use]
    pub const fn as_split(&self) -> Option<&SplitNode> {
        match &self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::TabGroup(_) => None,
        }
    }

    /// Returns the tab group payload, if this is a leaf.
    #[must_use]
    pub const fn as_group(&self) -> Option<&TabGroup> {
        match &self.kind {
            NodeKind::TabGroup(group) => Some(group),
            NodeKind::Split(_) => None,
        }
    }

    pub(crate) fn as_split_mut(&mut self) -> Option<&mut SplitNode> {
        match &mut self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::TabGroup(_) => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut TabGroup> {
        match &mut self.kind {
            NodeKind::TabGroup(group) => Some(group),
            NodeKind::Split(_) => None,
        }
    }

    /// Returns true if this node is a tab group.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::TabGroup(_))
    }
}
