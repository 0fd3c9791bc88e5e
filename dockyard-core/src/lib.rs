//! `Dockyard` Core Library
//!
//! A docking-layout engine: an arrangement of tabbed document groups inside
//! nested, alternately oriented splits, rearranged by dragging tabs onto
//! drop targets. The crate owns the layout model, drop-target resolution and
//! the drag state machine; the embedding application owns windows, drawing
//! and input delivery.
//!
//! # Crate Structure
//!
//! - [`tree`] - The split/tab-group arena, its mutations, repair and layout
//! - [`drop_target`] - Indicator grid geometry and target resolution
//! - [`drag`] - Tab drag session state (reorder in bar, floating carrier)
//! - [`resize`] - Divider drag sessions
//! - [`host`] - `DockingHost`, the pointer entry points
//! - [`hooks`] - Lifecycle event callbacks
//! - [`render`] - Indicator painting onto a host-provided sink
//! - [`script`] - Replaying recorded pointer sessions
//! - [`config`] - `DockConfig` and TOML loading
//! - [`error`] - Error taxonomy
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod drag;
pub mod drop_target;
pub mod error;
pub mod geometry;
pub mod hooks;
pub mod host;
pub mod render;
pub mod resize;
pub mod script;
pub mod tracing;
pub mod tree;

pub use config::DockConfig;
pub use drop_target::{DropTarget, Hover};
pub use error::{ConfigError, ConsistencyError, DockError, DockResult, StructuralError};
pub use geometry::{Point, Rect, Size};
pub use hooks::{DockEvent, HookId, HookRegistry};
pub use host::{DockingHost, DragOutcome, PointerEvent};
pub use tree::{Direction, DockTree, NodeId, Orientation, Tab, TabId, create_tree};
