//! Identifier types and small enums shared by the docking tree
//!
//! Node and tab identifiers are random UUIDs so that references held by a
//! drag session can be validated against the live tree at drop time.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Rect, Size};

/// Unique identifier for a node (split or tab group) in the docking tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Creates a new random node ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Unique identifier for a tab.
///
/// A tab keeps its ID while it moves between groups and through the
/// floating carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub Uuid);

impl TabId {
    /// Creates a new random tab ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tab({})", self.0)
    }
}

/// Axis along which a split divides its space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Slots laid out left to right.
    #[default]
    Horizontal,
    /// Slots laid out top to bottom.
    Vertical,
}

impl Orientation {
    /// The other axis.
    #[must_use]
    pub const fn perpendicular(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Extent of `size` along this axis.
    #[must_use]
    pub const fn extent(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Coordinate of `point` along this axis.
    #[must_use]
    pub const fn coordinate(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }

    /// Start of `rect` along this axis.
    #[must_use]
    pub const fn start(self, rect: Rect) -> f64 {
        match self {
            Self::Horizontal => rect.x,
            Self::Vertical => rect.y,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// An edge of a node, used for split and neighbor docking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Left edge.
    Left,
    /// Top edge.
    Top,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
}

impl Direction {
    /// All four directions in evaluation order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Top, Self::Right, Self::Bottom];

    /// Orientation of the split created when docking along this edge.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Horizontal,
            Self::Top | Self::Bottom => Orientation::Vertical,
        }
    }

    /// Returns true if docked content goes before the existing content.
    #[must_use]
    pub const fn is_leading(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }

    /// The opposite edge.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
        }
    }

    /// The edge of `orientation` at the leading or trailing end.
    #[must_use]
    pub const fn from_orientation(orientation: Orientation, leading: bool) -> Self {
        match (orientation, leading) {
            (Orientation::Horizontal, true) => Self::Left,
            (Orientation::Horizontal, false) => Self::Right,
            (Orientation::Vertical, true) => Self::Top,
            (Orientation::Vertical, false) => Self::Bottom,
        }
    }

    /// The matching single-bit flag.
    #[must_use]
    pub const fn flag(self) -> DockFlags {
        match self {
            Self::Left => DockFlags::LEFT,
            Self::Top => DockFlags::TOP,
            Self::Right => DockFlags::RIGHT,
            Self::Bottom => DockFlags::BOTTOM,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Top => write!(f, "top"),
            Self::Right => write!(f, "right"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}

bitflags! {
    /// Set of edges along which something may be docked.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DockFlags: u8 {
        /// Left edge.
        const LEFT = 0b0001;
        /// Top edge.
        const TOP = 0b0010;
        /// Right edge.
        const RIGHT = 0b0100;
        /// Bottom edge.
        const BOTTOM = 0b1000;
        /// Every edge.
        const ALL = Self::LEFT.bits() | Self::TOP.bits() | Self::RIGHT.bits() | Self::BOTTOM.bits();
    }
}

impl Default for DockFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl DockFlags {
    /// Returns true if `direction` is part of the set.
    #[must_use]
    pub const fn allows(self, direction: Direction) -> bool {
        self.contains(direction.flag())
    }

    /// Both edges perpendicular to `orientation`.
    #[must_use]
    pub const fn across(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => Self::TOP.union(Self::BOTTOM),
            Orientation::Vertical => Self::LEFT.union(Self::RIGHT),
        }
    }
}
