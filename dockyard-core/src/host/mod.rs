//! The docking host: pointer entry points over a tree
//!
//! [`DockingHost`] owns the tree, the configuration, the drag and resize
//! sessions and the hook registry. The embedding application forwards its
//! pointer events and renders from the tree's geometry; everything else
//! (tree mutation, repair, drop resolution) happens inside the entry points
//! before they return.
//!
//! # Example
//!
//! ```
//! use dockyard_core::config::DockConfig;
//! use dockyard_core::geometry::{Point, Rect};
//! use dockyard_core::host::{DockingHost, DragOutcome, PointerEvent};
//! use dockyard_core::tree::{DockTree, Tab};
//!
//! let mut tree = DockTree::new();
//! let group = tree.fallback_group().unwrap();
//! tree.merge_into_tab_group(group, Tab::new("a"), 0).unwrap();
//! tree.merge_into_tab_group(group, Tab::new("b"), 1).unwrap();
//!
//! let mut host = DockingHost::new(tree, DockConfig::default(), Rect::new(0.0, 0.0, 800.0, 600.0));
//! host.on_pointer_down(PointerEvent::new(10.0, 10.0)).unwrap();
//! // drag "a" onto the right edge of its own group
//! host.on_pointer_move(PointerEvent::new(10.0, 100.0)).unwrap();
//! host.on_pointer_move(PointerEvent::new(540.0, 300.0)).unwrap();
//! let outcome = host.on_pointer_up(PointerEvent::new(540.0, 300.0)).unwrap();
//! assert!(matches!(outcome, DragOutcome::Committed { .. }));
//! assert_eq!(host.tree().groups().len(), 2);
//! ```

mod drop;

use tracing::{debug, info, warn};

use crate::config::DockConfig;
use crate::drag::{DragPhase, DragSession, FloatingCarrier, TabOrigin, rearrange_step};
use crate::drop_target::{CarriedSizes, DropTarget, Hover, group_at, resolve_hover};
use crate::error::{DockResult, StructuralError};
use crate::geometry::{Point, Rect, Size};
use crate::hooks::{DockEvent, HookId, HookRegistry};
use crate::resize::ResizeSession;
use crate::trace_operation;
use crate::tracing::span_names;
use crate::tree::{DockTree, HeaderHit, NodeId, Placeholder, TabId};

/// Mouse button of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    /// The button that drags tabs and dividers.
    #[default]
    Primary,
    /// Context button.
    Secondary,
    /// Middle button.
    Middle,
}

/// A pointer event in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    /// Pointer position.
    pub position: Point,
    /// Button pressed or released.
    pub button: PointerButton,
}

impl PointerEvent {
    /// A primary-button event at `(x, y)`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    /// Sets the button.
    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}

/// How a pointer release ended the interaction in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing was in progress.
    Idle,
    /// A tab was pressed and released without dragging.
    Clicked(TabId),
    /// A tab was reordered within its bar and released there.
    Rearranged(TabId),
    /// A divider drag ended.
    Resized(NodeId),
    /// The floating tab was dropped onto a target.
    Committed {
        /// The dropped tab.
        tab: TabId,
        /// Group now owning the tab.
        group: NodeId,
        /// Applied target.
        target: DropTarget,
    },
    /// The floating tab went back to where it came from.
    Cancelled {
        /// The restored tab.
        tab: TabId,
        /// Group now owning the tab.
        group: NodeId,
    },
}

/// Owns a docking tree and drives it from pointer events.
#[derive(Debug)]
pub struct DockingHost {
    tree: DockTree,
    config: DockConfig,
    bounds: Rect,
    hooks: HookRegistry,
    drag: DragSession,
    resize: Option<ResizeSession>,
}

impl DockingHost {
    /// Creates a host and lays the tree out in `bounds`.
    #[must_use]
    pub fn new(tree: DockTree, config: DockConfig, bounds: Rect) -> Self {
        let mut host = Self {
            tree,
            config,
            bounds,
            hooks: HookRegistry::new(),
            drag: DragSession::default(),
            resize: None,
        };
        host.arrange();
        host
    }

    // ===== Accessors =====

    /// The docking tree.
    #[must_use]
    pub const fn tree(&self) -> &DockTree {
        &self.tree
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &DockConfig {
        &self.config
    }

    /// Host area.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The tab drag session.
    #[must_use]
    pub const fn drag(&self) -> &DragSession {
        &self.drag
    }

    /// Current drag phase.
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.drag.phase()
    }

    /// The divider drag in progress.
    #[must_use]
    pub const fn resize_session(&self) -> Option<&ResizeSession> {
        self.resize.as_ref()
    }

    /// Registers an event callback.
    pub fn subscribe<F>(&mut self, callback: F) -> HookId
    where
        F: FnMut(&DockEvent) + 'static,
    {
        self.hooks.subscribe(callback)
    }

    /// The hook registry.
    pub const fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// Resolves `pointer` the way a floating tab would see it.
    #[must_use]
    pub fn probe(&self, pointer: Point) -> Hover {
        resolve_hover(&self.tree, pointer, &self.config)
    }

    // ===== Programmatic changes =====

    /// Moves the host area and lays the tree out again.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.arrange();
        self.emit_tree_changed();
    }

    /// Runs a programmatic tree mutation, then lays the tree out again and
    /// reports the change when the revision moved.
    ///
    /// # Errors
    ///
    /// Returns the mutation's error; the tree is unchanged in that case.
    pub fn mutate<R>(
        &mut self,
        change: impl FnOnce(&mut DockTree) -> Result<R, StructuralError>,
    ) -> DockResult<R> {
        let before = self.tree.revision();
        let result = change(&mut self.tree)?;
        if self.tree.revision() != before {
            self.arrange();
            self.emit_tree_changed();
        }
        Ok(result)
    }

    // ===== Pointer entry points =====

    /// Handles a pointer press.
    ///
    /// A press on a divider starts a resize; a press on a tab header selects
    /// the tab and arms a drag.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree is inconsistent with its own geometry.
    pub fn on_pointer_down(&mut self, event: PointerEvent) -> DockResult<()> {
        if event.button != PointerButton::Primary {
            return Ok(());
        }
        if self.drag.is_active() || self.resize.is_some() {
            debug!(phase = %self.drag.phase(), "pointer down ignored during active session");
            return Ok(());
        }
        let pointer = event.position;

        if let Some(session) = ResizeSession::begin(&self.tree, pointer) {
            debug!(split = %session.split, index = session.index, "divider resize started");
            self.resize = Some(session);
            return Ok(());
        }

        let Some(group) = group_at(&self.tree, pointer) else {
            return Ok(());
        };
        let owner = self.tree.group(group)?;
        let Some(HeaderHit::Tab(index)) = owner.header_at(pointer) else {
            return Ok(());
        };
        let tab = &owner.tabs[index];
        let (tab_id, grab_offset) = (tab.id, tab.header.origin() - pointer);

        let revision = self.tree.revision();
        self.tree.select_tab(tab_id)?;
        if self.tree.revision() != revision {
            self.emit_tree_changed();
        }
        self.drag.arm(tab_id, group, grab_offset, pointer);
        debug!(tab = %tab_id, %group, "tab drag armed");
        Ok(())
    }

    /// Handles a pointer move.
    ///
    /// # Errors
    ///
    /// Returns an error if a mutation driven by the move is rejected.
    pub fn on_pointer_move(&mut self, event: PointerEvent) -> DockResult<()> {
        let pointer = event.position;
        if let Some(session) = self.resize.as_mut() {
            let applied = session.drag_to(&mut self.tree, pointer, self.config.min_slot_pixels)?;
            if applied != 0 {
                self.arrange();
                self.emit_tree_changed();
            }
            return Ok(());
        }
        match self.drag.phase() {
            DragPhase::Idle => Ok(()),
            DragPhase::Armed | DragPhase::RearrangingInBar => self.drag_in_bar(pointer),
            DragPhase::Floating => self.float_to(pointer),
        }
    }

    /// Handles a pointer release, committing or cancelling a floating drop.
    ///
    /// # Errors
    ///
    /// Returns a consistency error when the resolved drop position no longer
    /// exists; the tab has been put back by then.
    pub fn on_pointer_up(&mut self, event: PointerEvent) -> DockResult<DragOutcome> {
        self.release_at(event.position)
    }

    /// Handles loss of pointer capture as a release at the last known
    /// position.
    ///
    /// # Errors
    ///
    /// As [`DockingHost::on_pointer_up`].
    pub fn on_capture_lost(&mut self) -> DockResult<DragOutcome> {
        if let Some(session) = self.resize.take() {
            warn!(split = %session.split, "pointer capture lost during resize");
            return Ok(DragOutcome::Resized(session.split));
        }
        let Some(pointer) = self.drag.last_pointer() else {
            return Ok(DragOutcome::Idle);
        };
        warn!(phase = %self.drag.phase(), "pointer capture lost, ending interaction");
        self.release_at(pointer)
    }

    /// The host closed the floating surface: the tab goes back to its
    /// source. Does nothing before the tab has detached.
    ///
    /// # Errors
    ///
    /// Returns an error if the tab could not be restored.
    pub fn close_floating(&mut self) -> DockResult<DragOutcome> {
        if self.drag.phase() != DragPhase::Floating {
            return Ok(DragOutcome::Idle);
        }
        self.drag.set_hover(Hover::default());
        self.drop_floating()
    }

    // ===== Drag phases =====

    fn release_at(&mut self, pointer: Point) -> DockResult<DragOutcome> {
        if let Some(mut session) = self.resize.take() {
            if session.drag_to(&mut self.tree, pointer, self.config.min_slot_pixels)? != 0 {
                self.arrange();
                self.emit_tree_changed();
            }
            debug!(split = %session.split, "divider resize ended");
            return Ok(DragOutcome::Resized(session.split));
        }

        match self.drag.phase() {
            DragPhase::Idle => Ok(DragOutcome::Idle),
            DragPhase::Armed | DragPhase::RearrangingInBar => {
                let phase = self.drag.phase();
                let tab = self.drag.tab();
                self.drag.finish();
                Ok(match (phase, tab) {
                    (DragPhase::Armed, Some(tab)) => DragOutcome::Clicked(tab),
                    (_, Some(tab)) => DragOutcome::Rearranged(tab),
                    _ => DragOutcome::Idle,
                })
            }
            DragPhase::Floating => {
                if self.drag.last_pointer() != Some(pointer) {
                    self.float_to(pointer)?;
                }
                self.drop_floating()
            }
        }
    }

    fn drag_in_bar(&mut self, pointer: Point) -> DockResult<()> {
        self.drag.record_pointer(pointer);
        let (Some(tab), Some(source)) = (self.drag.tab(), self.drag.source()) else {
            return Ok(());
        };
        let Ok(owner) = self.tree.group(source) else {
            warn!(%source, "source group vanished during drag");
            self.drag.finish();
            return Ok(());
        };

        if !owner.tab_bar.contains(pointer) {
            return self.detach(tab, source, pointer);
        }

        self.drag.set_phase(DragPhase::RearrangingInBar);
        let (latch, ghost) = self.drag.rearrange_state();
        if let Some(step) = rearrange_step(owner, tab, pointer, latch, ghost) {
            self.tree.move_tab_within(source, step.from, step.to)?;
            self.tree.relayout_headers(source, &self.config);
            debug!(tab = %tab, from = step.from, to = step.to, returning = step.returning, "tab reordered");
            self.emit_tree_changed();
        }
        Ok(())
    }

    fn detach(&mut self, tab: TabId, source: NodeId, pointer: Point) -> DockResult<()> {
        let span = trace_operation!(span_names::DRAG, op = "detach", tab = %tab);
        let _guard = span.enter();

        let origin = TabOrigin::capture(&self.tree, tab).ok_or(StructuralError::TabNotFound(tab))?;
        let node = self.tree.node(source)?;
        let owner = node.as_group().ok_or(StructuralError::NotATabGroup(source))?;
        let header = self
            .tree
            .tab(tab)
            .map(|t| t.header.size())
            .filter(|size| !size.is_empty())
            .unwrap_or(Size::new(self.config.default_tab_width, self.config.tab_bar_height));
        let sizes = CarriedSizes {
            header,
            content: Size::new(
                node.bounds.width,
                (node.bounds.height - owner.tab_bar.height).max(0.0),
            ),
            group: node.bounds.size(),
        };

        let carried = self.tree.remove_tab(tab)?;
        let position = pointer + self.drag.grab_offset();
        info!(tab = %tab, title = %carried.title, group = %source, "tab detached to floating");
        self.drag.start_floating(FloatingCarrier {
            tab: carried,
            origin,
            position,
            sizes,
        });

        self.arrange();
        self.emit(&DockEvent::TabDetachedToFloating {
            tab,
            size: sizes.content,
            position,
        });
        self.emit_tree_changed();
        self.float_to(pointer)
    }

    fn float_to(&mut self, pointer: Point) -> DockResult<()> {
        self.drag.record_pointer(pointer);
        let grab_offset = self.drag.grab_offset();
        let Some(carrier) = self.drag.carrier_mut() else {
            return Ok(());
        };
        carrier.position = pointer + grab_offset;
        let (tab, position, sizes) = (carrier.tab.id, carrier.position, carrier.sizes);
        self.emit(&DockEvent::FloatingMoved { tab, position });

        let hover = resolve_hover(&self.tree, pointer, &self.config);
        debug!(target = ?hover.target, node = ?hover.node, "floating hover resolved");
        self.drag.set_hover(hover);

        for group in self.tree.groups() {
            let target = if hover.node == Some(group) {
                hover.target
            } else {
                DropTarget::None
            };
            self.show_foreign_hover(group, target, sizes.header)?;
            self.emit(&DockEvent::ForeignTabHover {
                group,
                pointer,
                content_size: sizes.content,
                header_size: sizes.header,
                target,
            });
        }
        Ok(())
    }

    /// Updates a group's highlighted target and its placeholder header.
    fn show_foreign_hover(
        &mut self,
        group: NodeId,
        target: DropTarget,
        header: Size,
    ) -> Result<(), StructuralError> {
        let owner = self.tree.group_mut(group)?;
        let placeholder = match target {
            DropTarget::TabBar(index) => Some((index.min(owner.len()), header)),
            _ => None,
        };
        owner.hover = (!target.is_none()).then_some(target);
        if owner.placeholder.map(|p| (p.index, p.size)) != placeholder {
            owner.placeholder = placeholder.map(|(index, size)| Placeholder {
                index,
                size,
                rect: Rect::EMPTY,
            });
            self.tree.relayout_headers(group, &self.config);
        }
        Ok(())
    }

    // ===== Helpers =====

    fn arrange(&mut self) {
        self.tree.arrange(self.bounds, &self.config);
    }

    fn emit(&mut self, event: &DockEvent) {
        self.hooks.emit(event);
    }

    fn emit_tree_changed(&mut self) {
        let revision = self.tree.revision();
        self.hooks.emit(&DockEvent::TreeChanged { revision });
    }
}

