//! Docking tree model
//!
//! The tree is an arena of [`DockNode`] records. Interior nodes are splits
//! dividing their space among weighted slots; leaves are tab groups. The
//! root is a permanent split.
//!
//! # Architecture
//!
//! - **Alternating orientation**: a split never sits directly inside a split
//!   of the same orientation; such splits are merged into one.
//! - **No degenerate nodes**: only the root may have a single slot, and only
//!   the root's sole child (the fallback group) may hold no tab.
//! - **Transactional repair**: every mutation runs repair before returning,
//!   so callers never observe a half-repaired tree.
//!
//! # Module Structure
//!
//! - `types` - IDs, `Orientation`, `Direction`, `DockFlags`
//! - `fractions` - Weight to pixel arithmetic (`SplitFractions`)
//! - `node` - Node records (`DockNode`, `SplitNode`, `TabGroup`, `Tab`)
//! - `dock_tree` - The arena and its queries (`DockTree`)
//! - `ops` - Docking, removal and tab mutations
//! - `repair` - Post-mutation repair (`RepairAction`)
//! - `layout` - Bounds, dividers and header rectangles
//! - `layout_spec` - Initial layout descriptions (`LayoutSpec`, `create_tree`)
//!
//! # Example
//!
//! ```
//! use dockyard_core::tree::{Direction, DockTree, Orientation, Tab};
//!
//! let mut tree = DockTree::new();
//! let editor = tree.fallback_group().unwrap();
//! tree.merge_into_tab_group(editor, Tab::new("main.rs"), 0).unwrap();
//!
//! let terminal = tree
//!     .insert_split(editor, Direction::Bottom, vec![Tab::new("Terminal")], 0.3)
//!     .unwrap();
//!
//! let root = tree.split(tree.root()).unwrap();
//! assert_eq!(root.orientation, Orientation::Vertical);
//! assert_eq!(root.children, vec![editor, terminal]);
//! ```

mod dock_tree;
mod fractions;
mod layout;
mod layout_spec;
mod node;
mod ops;
mod repair;
mod types;

pub use dock_tree::DockTree;
pub use fractions::{SplitFractions, UNLAID_BASE};
pub use layout_spec::{GroupSpec, LayoutSpec, NodeSpec, SlotSpec, TabSpec, create_tree};
pub use node::{DockNode, HeaderHit, NodeKind, Placeholder, SplitNode, Tab, TabGroup};
pub use repair::RepairAction;
pub use types::{Direction, DockFlags, NodeId, Orientation, TabId};
