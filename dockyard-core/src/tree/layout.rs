//! Layout pass: node bounds, divider rectangles, tab bars and headers

use crate::config::DockConfig;
use crate::geometry::Rect;
use crate::trace_operation_debug;
use crate::tracing::span_names;

use super::dock_tree::DockTree;
use super::node::{NodeKind, TabGroup};
use super::types::{NodeId, Orientation};

impl DockTree {
    /// Assigns bounds to every node for a host area of `bounds`.
    ///
    /// Split slots get their pixel sizes from the split's fractions along
    /// its axis, dividers are centered on slot boundaries, and every group
    /// gets a tab bar at its top edge with headers laid out left to right.
    /// Hosts doing their own layout set bounds with
    /// [`DockTree::set_bounds`] and [`DockTree::set_tab_bar`] instead.
    pub fn arrange(&mut self, bounds: Rect, config: &DockConfig) {
        let span = trace_operation_debug!(span_names::TREE_ARRANGE, nodes = self.nodes.len());
        let _guard = span.enter();

        let mut stack: Vec<(NodeId, Rect)> = vec![(self.root, bounds)];
        while let Some((id, rect)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            node.bounds = rect;
            match &mut node.kind {
                NodeKind::Split(split) => {
                    let extent = split.orientation.extent(rect.size()).max(0.0).round() as i64;
                    let infos = split.fractions.layout_infos(extent);
                    split.dividers.clear();
                    for (index, (&child, &(offset, size))) in
                        split.children.iter().zip(&infos).enumerate()
                    {
                        let child_rect = slot_rect(rect, split.orientation, offset, size);
                        if index > 0 {
                            split.dividers.push(divider_rect(
                                rect,
                                split.orientation,
                                offset,
                                config.divider_thickness,
                            ));
                        }
                        stack.push((child, child_rect));
                    }
                }
                NodeKind::TabGroup(group) => {
                    group.tab_bar = rect.with_height(config.tab_bar_height.min(rect.height).max(0.0));
                    layout_headers(group, config);
                }
            }
        }
    }

    /// Re-lays the headers of `group` inside its current tab bar.
    pub(crate) fn relayout_headers(&mut self, group: NodeId, config: &DockConfig) {
        if let Ok(group) = self.group_mut(group) {
            layout_headers(group, config);
        }
    }
}

fn slot_rect(bounds: Rect, orientation: Orientation, offset: i64, size: i64) -> Rect {
    let (offset, size) = (offset as f64, size.max(0) as f64);
    match orientation {
        Orientation::Horizontal => Rect::new(bounds.x + offset, bounds.y, size, bounds.height),
        Orientation::Vertical => Rect::new(bounds.x, bounds.y + offset, bounds.width, size),
    }
}

fn divider_rect(bounds: Rect, orientation: Orientation, offset: i64, thickness: f64) -> Rect {
    let center = offset as f64;
    match orientation {
        Orientation::Horizontal => Rect::new(
            bounds.x + center - thickness / 2.0,
            bounds.y,
            thickness,
            bounds.height,
        ),
        Orientation::Vertical => Rect::new(
            bounds.x,
            bounds.y + center - thickness / 2.0,
            bounds.width,
            thickness,
        ),
    }
}

/// Places headers left to right inside the tab bar, leaving room for the
/// placeholder at its index.
pub(crate) fn layout_headers(group: &mut TabGroup, config: &DockConfig) {
    let bar = group.tab_bar;
    let width_or_default = |width: f64| {
        if width > 0.0 {
            width
        } else {
            config.default_tab_width
        }
    };

    let mut x = bar.x;
    let placeholder_index = group.placeholder.map(|p| p.index.min(group.tabs.len()));
    for index in 0..=group.tabs.len() {
        if placeholder_index == Some(index)
            && let Some(placeholder) = group.placeholder.as_mut()
        {
            let width = width_or_default(placeholder.size.width);
            placeholder.rect = Rect::new(x, bar.y, width, bar.height);
            x += width;
        }
        if let Some(tab) = group.tabs.get_mut(index) {
            let width = width_or_default(tab.header_size.width);
            tab.header = Rect::new(x, bar.y, width, bar.height);
            x += width;
        }
    }
}
