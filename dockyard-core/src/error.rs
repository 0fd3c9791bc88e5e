//! Error types for the docking engine
//!
//! Structural errors reject a mutation before anything changes. Consistency
//! errors report a drop whose target moved under it; the drop is cancelled.
//! Geometry never fails and has no error type.

use std::path::PathBuf;

use crate::tree::{Direction, NodeId, TabId};

/// A mutation targeted something absent from the tree or would break a
/// structural rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// The node is not part of the tree.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The tab is not owned by any group.
    #[error("tab not found: {0}")]
    TabNotFound(TabId),

    /// The node exists but is not a tab group.
    #[error("node is not a tab group: {0}")]
    NotATabGroup(NodeId),

    /// The node exists but is not a split.
    #[error("node is not a split: {0}")]
    NotASplit(NodeId),

    /// The root split is permanent.
    #[error("the root split cannot be removed")]
    CannotRemoveRoot,

    /// An index was outside the valid range.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of entries.
        len: usize,
    },

    /// Close was requested for a tab that is not closable.
    #[error("tab is not closable: {0}")]
    TabNotClosable(TabId),

    /// Docked content must carry at least one tab.
    #[error("docked content has no tabs")]
    EmptyContent,

    /// The tab is already owned by a group.
    #[error("tab already present in the tree: {0}")]
    DuplicateTab(TabId),

    /// A split would be nested directly inside a split of the same
    /// orientation.
    #[error("split {0} has the same orientation as its parent")]
    SameOrientationNesting(NodeId),

    /// An initial layout description could not be turned into a tree.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}

/// The tree changed between hover and drop so the resolved position no
/// longer exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    /// The split captured for a neighbor dock no longer has the anchor at
    /// the expected edge.
    #[error(
        "layout has changed since the tab was dragged: {anchor} is no longer at the {direction} edge of {split}"
    )]
    NeighborPositionVanished {
        /// The split the new slot would have been inserted into.
        split: NodeId,
        /// The child that was expected at the docking edge.
        anchor: NodeId,
        /// The docking direction.
        direction: Direction,
    },

    /// The node under the pointer at hover time is gone.
    #[error("drop target vanished: {0}")]
    TargetVanished(NodeId),

    /// A drop or close was requested while nothing is floating.
    #[error("no floating tab to drop")]
    NoDragInProgress,
}

/// Configuration could not be loaded or is invalid.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or JSON for the expected shape.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Umbrella error for docking operations.
#[derive(Debug, thiserror::Error)]
pub enum DockError {
    /// See [`StructuralError`].
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// See [`ConsistencyError`].
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for docking operations.
pub type DockResult<T> = Result<T, DockError>;
