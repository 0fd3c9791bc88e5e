//! Drop-target resolution
//!
//! Maps a pointer position over a node to the place a dragged tab would
//! land. Candidates are checked in priority order, first match wins:
//!
//! 1. a tab header or the empty tab bar strip ([`DropTarget::TabBar`]);
//! 2. the center cell of the indicator grid ([`DropTarget::Fill`]);
//! 3. the four edge cells ([`DropTarget::SplitDock`]);
//! 4. the neighbor cells one step further out ([`DropTarget::NeighborDock`]).
//!
//! The grid is a 3×3 block of square cells centered on the node and scaled
//! down (never up) to fit it. Corner cells are inert. Every function here is
//! total: empty bounds produce empty rectangles and no target.

use std::fmt;

use tracing::trace;

use crate::config::{DockConfig, IndicatorStyle};
use crate::error::ConsistencyError;
use crate::geometry::{Point, Rect, Size};
use crate::tree::{Direction, DockFlags, DockTree, NodeId, NodeKind, Orientation};

/// Where a dragged tab would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DropTarget {
    /// Nowhere; dropping cancels the drag.
    #[default]
    None,
    /// Appended to the hovered group.
    Fill,
    /// Docked beside the hovered node by splitting its space.
    SplitDock(Direction),
    /// Docked as a new slot next to the hovered node's edge of its split.
    NeighborDock(Direction),
    /// Inserted into the hovered group's tab bar at this index.
    TabBar(usize),
}

impl DropTarget {
    /// Returns true for [`DropTarget::None`].
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Docking direction of split and neighbor docks.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::SplitDock(d) | Self::NeighborDock(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Fill => write!(f, "fill"),
            Self::SplitDock(d) => write!(f, "split-dock {d}"),
            Self::NeighborDock(d) => write!(f, "neighbor-dock {d}"),
            Self::TabBar(index) => write!(f, "tab-bar {index}"),
        }
    }
}

/// Measured sizes of the tab being carried.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarriedSizes {
    /// Header of the dragged tab.
    pub header: Size,
    /// Content area of the dragged tab.
    pub content: Size,
    /// The whole source group, tab bar included.
    pub group: Size,
}

/// Which cells a grid offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offer {
    /// Center cell.
    pub fill: bool,
    /// The four edge cells.
    pub split: bool,
    /// Directions with a neighbor cell.
    pub neighbor: DockFlags,
    /// Neighbor cells are centered on the border instead of clamped inside.
    pub outer: bool,
}

/// Geometry of one indicator grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorLayout {
    /// The area the grid is centered on.
    pub bounds: Rect,
    /// Scale applied to cell size, spacing and corner radius.
    pub scale: f64,
    /// Scaled corner radius for painting.
    pub corner_radius: f64,
    /// Center cell, when offered.
    pub fill: Option<Rect>,
    split: [Option<Rect>; 4],
    split_zones: [Option<Rect>; 4],
    neighbor: [Option<Rect>; 4],
}

/// Position of a direction in the per-direction arrays.
const fn slot(direction: Direction) -> usize {
    match direction {
        Direction::Left => 0,
        Direction::Top => 1,
        Direction::Right => 2,
        Direction::Bottom => 3,
    }
}

/// Unit step of a direction in grid coordinates.
const fn step(direction: Direction) -> (f64, f64) {
    match direction {
        Direction::Left => (-1.0, 0.0),
        Direction::Top => (0.0, -1.0),
        Direction::Right => (1.0, 0.0),
        Direction::Bottom => (0.0, 1.0),
    }
}

impl IndicatorLayout {
    /// Lays out the grid for `bounds`.
    #[must_use]
    pub fn compute(bounds: Rect, style: &IndicatorStyle, offer: Offer) -> Self {
        let mut layout = Self {
            bounds,
            ..Self::default()
        };
        let total = 3.0 * style.size + 2.0 * style.spacing;
        if bounds.is_empty() || total <= 0.0 {
            return layout;
        }

        let scale = (bounds.width.min(bounds.height) / total).min(1.0);
        let cell = Size::new(style.size * scale, style.size * scale);
        let distance = (style.size + style.spacing) * scale;
        let center = bounds.center_rect(cell);
        let at = |d: Direction, steps: f64| {
            let (dx, dy) = step(d);
            center.translate(dx * distance * steps, dy * distance * steps)
        };

        layout.scale = scale;
        layout.corner_radius = style.corner_radius * scale;
        if offer.fill {
            layout.fill = Some(center);
        }

        for d in Direction::ALL {
            let i = slot(d);
            if offer.neighbor.allows(d) {
                let rect = at(d, 2.0);
                layout.neighbor[i] = Some(if offer.outer {
                    center_on_border(rect, bounds, d)
                } else {
                    align_inside(rect, bounds, d)
                });
            }
            if offer.split {
                let rect = at(d, 1.0);
                layout.split[i] = Some(rect);
                layout.split_zones[i] = Some(if layout.neighbor[i].is_some() {
                    rect
                } else {
                    extend_to_border(rect, bounds, d)
                });
            }
        }
        layout
    }

    /// Painted edge cell for `direction`, when offered.
    #[must_use]
    pub const fn split_cell(&self, direction: Direction) -> Option<Rect> {
        self.split[slot(direction)]
    }

    /// Hit zone of the edge cell for `direction`. It reaches the border
    /// when no neighbor cell is offered on that side.
    #[must_use]
    pub const fn split_zone(&self, direction: Direction) -> Option<Rect> {
        self.split_zones[slot(direction)]
    }

    /// Neighbor cell for `direction`, when offered.
    #[must_use]
    pub const fn neighbor_cell(&self, direction: Direction) -> Option<Rect> {
        self.neighbor[slot(direction)]
    }

    /// Resolves a pointer against the cells, in priority order.
    #[must_use]
    pub fn hit(&self, pointer: Point) -> DropTarget {
        let inside = |rect: Option<Rect>| rect.is_some_and(|r| r.contains(pointer));
        if inside(self.fill) {
            return DropTarget::Fill;
        }
        if let Some(d) = Direction::ALL.into_iter().find(|&d| inside(self.split_zone(d))) {
            return DropTarget::SplitDock(d);
        }
        if let Some(d) = Direction::ALL.into_iter().find(|&d| inside(self.neighbor_cell(d))) {
            return DropTarget::NeighborDock(d);
        }
        DropTarget::None
    }
}

/// Shifts a neighbor cell back inside `bounds` when it sticks out on its
/// own side.
fn align_inside(rect: Rect, bounds: Rect, direction: Direction) -> Rect {
    match direction {
        Direction::Left if rect.left() < bounds.left() => rect.translate(bounds.left() - rect.left(), 0.0),
        Direction::Right if rect.right() > bounds.right() => {
            rect.translate(bounds.right() - rect.right(), 0.0)
        }
        Direction::Top if rect.top() < bounds.top() => rect.translate(0.0, bounds.top() - rect.top()),
        Direction::Bottom if rect.bottom() > bounds.bottom() => {
            rect.translate(0.0, bounds.bottom() - rect.bottom())
        }
        _ => rect,
    }
}

/// Centers a cell on the `direction` border of `bounds`, keeping it on the
/// grid's row or column.
fn center_on_border(rect: Rect, bounds: Rect, direction: Direction) -> Rect {
    let center = rect.center();
    let target = match direction {
        Direction::Left => Point::new(bounds.left(), center.y),
        Direction::Right => Point::new(bounds.right(), center.y),
        Direction::Top => Point::new(center.x, bounds.top()),
        Direction::Bottom => Point::new(center.x, bounds.bottom()),
    };
    rect.translate(target.x - center.x, target.y - center.y)
}

/// Stretches an edge cell outward to the `direction` border of `bounds`.
fn extend_to_border(rect: Rect, bounds: Rect, direction: Direction) -> Rect {
    match direction {
        Direction::Left => Rect::from_points(
            Point::new(bounds.left().min(rect.left()), rect.top()),
            Point::new(rect.right(), rect.bottom()),
        ),
        Direction::Right => Rect::from_points(
            Point::new(rect.left(), rect.top()),
            Point::new(bounds.right().max(rect.right()), rect.bottom()),
        ),
        Direction::Top => Rect::from_points(
            Point::new(rect.left(), bounds.top().min(rect.top())),
            Point::new(rect.right(), rect.bottom()),
        ),
        Direction::Bottom => Rect::from_points(
            Point::new(rect.left(), rect.top()),
            Point::new(rect.right(), bounds.bottom().max(rect.bottom())),
        ),
    }
}

// ===== Neighbor docking structure =====

/// Directions along which something may be docked next to `node`.
///
/// Walking up from `node`, a direction survives a split level when it is
/// perpendicular to the split or the child is at that end of it.
#[must_use]
pub fn neighbor_flags(tree: &DockTree, node: NodeId) -> DockFlags {
    if !tree.contains(node) {
        return DockFlags::empty();
    }
    let mut flags = DockFlags::ALL;
    let mut current = node;
    while let Some(parent) = tree.parent(current) {
        let Ok(split) = tree.split(parent) else {
            return DockFlags::empty();
        };
        let mut mask = DockFlags::across(split.orientation);
        if split.children.first() == Some(&current) {
            mask |= Direction::from_orientation(split.orientation, true).flag();
        }
        if split.children.last() == Some(&current) {
            mask |= Direction::from_orientation(split.orientation, false).flag();
        }
        flags &= mask;
        current = parent;
    }
    flags
}

/// Structural position a neighbor dock will insert at, captured at hover
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborPlan {
    /// The split receiving the new slot.
    pub split: NodeId,
    /// The child of `split` expected at the docking edge.
    pub anchor: NodeId,
    /// Slot index of the new group.
    pub index: usize,
    /// Docking direction.
    pub direction: Direction,
}

impl NeighborPlan {
    /// Checks the plan against the current tree and returns the index to
    /// insert at.
    ///
    /// # Errors
    ///
    /// Returns [`ConsistencyError::NeighborPositionVanished`] when the split
    /// is gone, changed axis, or no longer has the anchor at the edge.
    pub fn validate(&self, tree: &DockTree) -> Result<usize, ConsistencyError> {
        let vanished = || ConsistencyError::NeighborPositionVanished {
            split: self.split,
            anchor: self.anchor,
            direction: self.direction,
        };
        let split = tree.split(self.split).map_err(|_| vanished())?;
        if split.orientation != self.direction.orientation() {
            return Err(vanished());
        }
        let (edge, index) = if self.direction.is_leading() {
            (split.children.first(), 0)
        } else {
            (split.children.last(), split.len())
        };
        if edge != Some(&self.anchor) {
            return Err(vanished());
        }
        Ok(index)
    }
}

/// Plans a neighbor dock of `direction` next to `node`.
///
/// The new slot goes into the outermost ancestor split running along the
/// direction's axis. Returns `None` when the direction is not allowed or no
/// ancestor runs along that axis.
#[must_use]
pub fn plan_neighbor_dock(tree: &DockTree, node: NodeId, direction: Direction) -> Option<NeighborPlan> {
    if !neighbor_flags(tree, node).allows(direction) {
        return None;
    }
    let axis = direction.orientation();
    let mut plan = None;
    let mut current = node;
    while let Some(parent) = tree.parent(current) {
        let split = tree.split(parent).ok()?;
        if split.orientation == axis && split.len() > 1 {
            plan = Some(NeighborPlan {
                split: parent,
                anchor: current,
                index: if direction.is_leading() { 0 } else { split.len() },
                direction,
            });
        }
        current = parent;
    }
    plan
}

/// Neighbor plan when it docks inside the tree rather than at the outer
/// edge.
fn inner_neighbor_plan(tree: &DockTree, node: NodeId, direction: Direction) -> Option<NeighborPlan> {
    plan_neighbor_dock(tree, node, direction).filter(|plan| plan.split != tree.root())
}

// ===== Per-node queries =====

/// Which cells `node` offers.
///
/// Neighbor cells appear only for directions with a non-root split on
/// that axis above `node`. Docking along the root's own axis is served by
/// the outer edge cells, so a group directly under the root offers none.
#[must_use]
pub fn offer_for(tree: &DockTree, node: NodeId) -> Offer {
    let Some(entry) = tree.get(node) else {
        return Offer::default();
    };
    let has_tabs = entry.as_group().is_some_and(|g| !g.is_empty());
    let is_split = !entry.is_group();

    let mut neighbor = DockFlags::empty();
    if node != tree.root() {
        for d in Direction::ALL {
            if inner_neighbor_plan(tree, node, d).is_some() {
                neighbor |= d.flag();
            }
        }
    }
    Offer {
        fill: has_tabs,
        split: has_tabs || is_split,
        neighbor,
        outer: false,
    }
}

/// Layout rectangles of one node for the host's renderer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeGeometry {
    /// Node bounds.
    pub bounds: Rect,
    /// Indicator grid for the node.
    pub indicators: IndicatorLayout,
    /// Tab bar of a group.
    pub tab_bar: Option<Rect>,
    /// Header rectangles of a group's real tabs.
    pub headers: Vec<Rect>,
    /// Placeholder header rectangle.
    pub placeholder: Option<Rect>,
    /// Divider rectangles of a split.
    pub dividers: Vec<Rect>,
}

/// Geometry of `node`. An unknown node yields empty geometry.
#[must_use]
pub fn layout_rects(tree: &DockTree, node: NodeId, config: &DockConfig) -> NodeGeometry {
    let Some(entry) = tree.get(node) else {
        return NodeGeometry::default();
    };
    let indicators = IndicatorLayout::compute(entry.bounds, &config.indicator, offer_for(tree, node));
    match &entry.kind {
        NodeKind::TabGroup(group) => NodeGeometry {
            bounds: entry.bounds,
            indicators,
            tab_bar: Some(group.tab_bar),
            headers: group.tabs.iter().map(|t| t.header).collect(),
            placeholder: group.placeholder.map(|p| p.rect),
            dividers: Vec::new(),
        },
        NodeKind::Split(split) => NodeGeometry {
            bounds: entry.bounds,
            indicators,
            tab_bar: None,
            headers: Vec::new(),
            placeholder: None,
            dividers: split.dividers.clone(),
        },
    }
}

/// Indicator grid for the outer edges of the whole tree.
#[must_use]
pub fn outer_layout(tree: &DockTree, config: &DockConfig) -> IndicatorLayout {
    let bounds = tree.get(tree.root()).map_or(Rect::EMPTY, |root| root.bounds);
    IndicatorLayout::compute(
        bounds,
        &config.indicator,
        Offer {
            neighbor: DockFlags::ALL,
            outer: true,
            ..Offer::default()
        },
    )
}

/// Resolves `pointer` (host coordinates) against `node`.
#[must_use]
pub fn compute_drop_target(
    tree: &DockTree,
    node: NodeId,
    pointer: Point,
    config: &DockConfig,
) -> DropTarget {
    let Some(entry) = tree.get(node) else {
        return DropTarget::None;
    };
    if entry.bounds.is_empty() {
        return DropTarget::None;
    }

    if let Some(group) = entry.as_group() {
        if let Some(hit) = group.header_at(pointer) {
            return DropTarget::TabBar(hit.index());
        }
        if group.tab_bar.contains(pointer) {
            return DropTarget::TabBar(group.len());
        }
    }

    IndicatorLayout::compute(entry.bounds, &config.indicator, offer_for(tree, node)).hit(pointer)
}

/// Resolves `pointer` against the outer edges of the whole tree. Only
/// neighbor docks are offered there.
#[must_use]
pub fn compute_outer_drop_target(tree: &DockTree, pointer: Point, config: &DockConfig) -> DropTarget {
    outer_layout(tree, config).hit(pointer)
}

// ===== Host-level hover =====

/// Result of resolving a pointer over the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hover {
    /// Group under the pointer, `None` for the outer edges or nowhere.
    pub node: Option<NodeId>,
    /// Resolved target.
    pub target: DropTarget,
    /// Structural position of a neighbor dock inside the tree.
    pub plan: Option<NeighborPlan>,
}

/// The deepest group containing `pointer`.
#[must_use]
pub fn group_at(tree: &DockTree, pointer: Point) -> Option<NodeId> {
    tree.groups()
        .into_iter()
        .rev()
        .find(|&g| tree.get(g).is_some_and(|n| n.bounds.contains(pointer)))
}

/// Resolves `pointer` against the group under it, falling back to the outer
/// edges when that gives no target.
#[must_use]
pub fn resolve_hover(tree: &DockTree, pointer: Point, config: &DockConfig) -> Hover {
    if let Some(node) = group_at(tree, pointer) {
        let target = compute_drop_target(tree, node, pointer, config);
        if !target.is_none() {
            let plan = match target {
                DropTarget::NeighborDock(d) => inner_neighbor_plan(tree, node, d),
                _ => None,
            };
            trace!(%node, ?target, "hover resolved on node");
            return Hover {
                node: Some(node),
                target,
                plan,
            };
        }
    }
    let target = compute_outer_drop_target(tree, pointer, config);
    Hover {
        node: None,
        target,
        plan: None,
    }
}

// ===== Size fractions and previews =====

/// Share of the target's extent a split dock gives the carried group: its
/// own extent, at most half. `None` when either extent is unknown.
#[must_use]
pub fn split_fraction(bounds: Rect, carried: &CarriedSizes, direction: Direction) -> Option<f64> {
    let axis = direction.orientation();
    let extent = axis.extent(bounds.size());
    let carried_extent = axis.extent(carried.group);
    (extent > 0.0 && carried_extent > 0.0).then(|| carried_extent.min(extent / 2.0) / extent)
}

/// Share of a split's extent a neighbor dock gives the carried content.
/// `None` when either extent is unknown.
#[must_use]
pub fn neighbor_fraction(bounds: Rect, carried: &CarriedSizes, direction: Direction) -> Option<f64> {
    let axis = direction.orientation();
    let extent = axis.extent(bounds.size());
    let content = axis.extent(carried.content);
    (extent > 0.0 && content > 0.0).then(|| (content / extent).min(1.0))
}

/// Strip along the `direction` edge of `bounds` the carried group would
/// take with a split dock.
#[must_use]
pub fn split_preview(bounds: Rect, carried: &CarriedSizes, direction: Direction) -> Rect {
    let width = carried.group.width.min(bounds.width / 2.0).max(0.0);
    let height = carried.group.height.min(bounds.height / 2.0).max(0.0);
    match direction {
        Direction::Left => bounds.with_width(width),
        Direction::Top => bounds.with_height(height),
        Direction::Right => Rect::new(bounds.right() - width, bounds.y, width, bounds.height),
        Direction::Bottom => Rect::new(bounds.x, bounds.bottom() - height, bounds.width, height),
    }
}

/// Strip along the `direction` edge of `bounds` the carried content would
/// take with a neighbor dock.
#[must_use]
pub fn neighbor_preview(bounds: Rect, carried: &CarriedSizes, direction: Direction) -> Rect {
    let size = match direction.orientation() {
        Orientation::Horizontal => Size::new(carried.content.width.max(0.0), bounds.height),
        Orientation::Vertical => Size::new(bounds.width, carried.content.height.max(0.0)),
    };
    if direction.is_leading() {
        Rect::from_origin(bounds.origin(), size)
    } else {
        Rect::new(
            bounds.right() - size.width,
            bounds.bottom() - size.height,
            size.width,
            size.height,
        )
    }
}

/// The rectangle to highlight for `hover`.
#[must_use]
pub fn preview_rect(tree: &DockTree, hover: &Hover, carried: &CarriedSizes) -> Option<Rect> {
    let root_bounds = tree.get(tree.root()).map(|n| n.bounds)?;
    let node = hover.node.and_then(|id| tree.get(id));
    match (hover.target, node) {
        (DropTarget::None, _) => None,
        (DropTarget::Fill, Some(node)) => Some(node.bounds),
        (DropTarget::SplitDock(d), Some(node)) => Some(split_preview(node.bounds, carried, d)),
        (DropTarget::NeighborDock(d), Some(_)) => {
            let region = hover
                .plan
                .and_then(|plan| tree.get(plan.split))
                .map_or(root_bounds, |split| split.bounds);
            Some(neighbor_preview(region, carried, d))
        }
        (DropTarget::NeighborDock(d), None) => Some(neighbor_preview(root_bounds, carried, d)),
        (DropTarget::TabBar(index), Some(node)) => {
            let group = node.as_group()?;
            let origin = group
                .placeholder
                .filter(|p| p.index == index)
                .map(|p| p.rect.origin())
                .or_else(|| group.tabs.get(index).map(|t| t.header.origin()))
                .or_else(|| {
                    group
                        .tabs
                        .last()
                        .map(|t| Point::new(t.header.right(), t.header.top()))
                })
                .unwrap_or_else(|| group.tab_bar.origin());
            Some(Rect::from_origin(origin, carried.header))
        }
        (_, None) => None,
    }
}
