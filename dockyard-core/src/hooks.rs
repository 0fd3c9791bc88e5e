//! Outward lifecycle events
//!
//! The host subscribes plain callbacks to learn about floating surfaces it
//! has to create, move and close, and about tree changes that need a
//! re-render. Callbacks run synchronously, in subscription order, before the
//! pointer entry point that triggered them returns.

use std::fmt;

use crate::drop_target::DropTarget;
use crate::error::ConsistencyError;
use crate::geometry::{Point, Size};
use crate::tree::{NodeId, TabId};

/// Event emitted by the docking host.
#[derive(Debug, Clone, PartialEq)]
pub enum DockEvent {
    /// A tab left its tab bar; the host should show a floating surface.
    TabDetachedToFloating {
        /// The carried tab.
        tab: TabId,
        /// Surface size, from the tab's measured content size.
        size: Size,
        /// Surface top-left in host coordinates.
        position: Point,
    },
    /// The floating surface follows the pointer.
    FloatingMoved {
        /// The carried tab.
        tab: TabId,
        /// Surface top-left in host coordinates.
        position: Point,
    },
    /// A group was told about the carried tab hovering over the host.
    ForeignTabHover {
        /// The notified group.
        group: NodeId,
        /// Pointer position.
        pointer: Point,
        /// Carried content size.
        content_size: Size,
        /// Carried header size.
        header_size: Size,
        /// Target the group highlights, `None` when not hovered.
        target: DropTarget,
    },
    /// The floating surface must be closed.
    FloatingClosed {
        /// The tab that was carried.
        tab: TabId,
    },
    /// A drop was applied.
    DropCommitted {
        /// The dropped tab.
        tab: TabId,
        /// Group now owning the tab.
        group: NodeId,
        /// The target that was applied.
        target: DropTarget,
    },
    /// The drop ended without a target and the tab went back to its source.
    DropCancelled {
        /// The restored tab.
        tab: TabId,
        /// Group now owning the tab.
        group: NodeId,
    },
    /// A drop could not be applied; the tab went back to its source.
    DropFailed {
        /// The restored tab.
        tab: TabId,
        /// Why the drop failed.
        error: ConsistencyError,
    },
    /// The tree or its geometry changed.
    TreeChanged {
        /// Tree revision after the change.
        revision: u64,
    },
}

impl DockEvent {
    /// Short event name for logs and CLI output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TabDetachedToFloating { .. } => "tab_detached_to_floating",
            Self::FloatingMoved { .. } => "floating_moved",
            Self::ForeignTabHover { .. } => "foreign_tab_hover",
            Self::FloatingClosed { .. } => "floating_closed",
            Self::DropCommitted { .. } => "drop_committed",
            Self::DropCancelled { .. } => "drop_cancelled",
            Self::DropFailed { .. } => "drop_failed",
            Self::TreeChanged { .. } => "tree_changed",
        }
    }
}

/// Handle returned by [`HookRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookId(u64);

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook({})", self.0)
    }
}

type EventCallback = Box<dyn FnMut(&DockEvent)>;

struct HookEntry {
    id: HookId,
    callback: EventCallback,
}

/// Callback registry for [`DockEvent`]s.
#[derive(Default)]
pub struct HookRegistry {
    next_id: u64,
    hooks: Vec<HookEntry>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for every event.
    pub fn subscribe<F>(&mut self, callback: F) -> HookId
    where
        F: FnMut(&DockEvent) + 'static,
    {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.hooks.push(HookEntry {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: HookId) -> bool {
        if let Some(index) = self.hooks.iter().position(|entry| entry.id == id) {
            self.hooks.remove(index);
            return true;
        }
        false
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Delivers `event` to every callback in subscription order.
    pub fn emit(&mut self, event: &DockEvent) {
        tracing::trace!(event = event.name(), hooks = self.hooks.len(), "emitting dock event");
        for entry in &mut self.hooks {
            (entry.callback)(event);
        }
    }
}
