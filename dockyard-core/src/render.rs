//! Drop indicator painting
//!
//! The engine does not draw. [`paint_indicators`] turns the current drag
//! state into rectangle primitives on a [`DrawSink`] the host implements on
//! top of its own canvas. [`RecordingSink`] keeps the primitives as data.

use serde::Serialize;

use crate::config::{IndicatorStyle, Rgba};
use crate::drag::DragPhase;
use crate::drop_target::{DropTarget, IndicatorLayout, group_at, offer_for, outer_layout, preview_rect};
use crate::geometry::Rect;
use crate::host::DockingHost;
use crate::tree::Direction;

/// Receives drawing primitives.
pub trait DrawSink {
    /// Fills `rect` with `color`, rounding corners by `corner_radius`.
    fn fill_rect(&mut self, rect: Rect, color: Rgba, corner_radius: f64);

    /// Outlines `rect`.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba, thickness: f64, corner_radius: f64);
}

/// One recorded primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// A filled rectangle.
    Fill {
        /// Area.
        rect: Rect,
        /// Fill color.
        color: Rgba,
        /// Corner radius.
        corner_radius: f64,
    },
    /// An outlined rectangle.
    Stroke {
        /// Area.
        rect: Rect,
        /// Line color.
        color: Rgba,
        /// Line thickness.
        thickness: f64,
        /// Corner radius.
        corner_radius: f64,
    },
}

impl DrawCommand {
    /// The rectangle the command covers.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        match self {
            Self::Fill { rect, .. } | Self::Stroke { rect, .. } => *rect,
        }
    }
}

/// A sink that stores every primitive in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSink {
    /// Recorded primitives.
    pub commands: Vec<DrawCommand>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded fills.
    pub fn fills(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { .. }))
    }

    /// Recorded outlines.
    pub fn strokes(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Stroke { .. }))
    }

    /// Drops all recorded primitives.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl DrawSink for RecordingSink {
    fn fill_rect(&mut self, rect: Rect, color: Rgba, corner_radius: f64) {
        self.commands.push(DrawCommand::Fill {
            rect,
            color,
            corner_radius,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, thickness: f64, corner_radius: f64) {
        self.commands.push(DrawCommand::Stroke {
            rect,
            color,
            thickness,
            corner_radius,
        });
    }
}

/// The half of a cell a direction points at; the whole cell for `None`.
fn direction_half(cell: Rect, direction: Option<Direction>) -> Rect {
    match direction {
        None => cell,
        Some(Direction::Left) => cell.lerp_sub((0.0, 0.5), (0.0, 1.0)),
        Some(Direction::Right) => cell.lerp_sub((0.5, 1.0), (0.0, 1.0)),
        Some(Direction::Top) => cell.lerp_sub((0.0, 1.0), (0.0, 0.5)),
        Some(Direction::Bottom) => cell.lerp_sub((0.0, 1.0), (0.5, 1.0)),
    }
}

struct Painter<'a, S: DrawSink + ?Sized> {
    sink: &'a mut S,
    style: &'a IndicatorStyle,
}

impl<S: DrawSink + ?Sized> Painter<'_, S> {
    /// Fills the direction half of `cell` and outlines it. Split and fill
    /// cells outline the whole cell, neighbor cells only the filled half.
    fn cell(&mut self, cell: Rect, direction: Option<Direction>, hovered: bool, radius: f64, neighbor: bool) {
        let half = direction_half(cell, direction);
        let fill = if hovered {
            self.style.hovered_fill
        } else {
            self.style.fill
        };
        self.sink.fill_rect(half, fill, radius);
        let outline = if neighbor { half } else { cell };
        self.sink
            .stroke_rect(outline, self.style.stroke, self.style.stroke_thickness, radius);
    }

    fn neighbor_cells(&mut self, layout: &IndicatorLayout, active: DropTarget) {
        for d in Direction::ALL {
            if let Some(cell) = layout.neighbor_cell(d) {
                let hovered = active == DropTarget::NeighborDock(d);
                self.cell(cell, Some(d), hovered, layout.corner_radius, true);
            }
        }
    }

    fn node_cells(&mut self, layout: &IndicatorLayout, active: DropTarget) {
        for d in Direction::ALL {
            if let Some(cell) = layout.split_cell(d) {
                let hovered = active == DropTarget::SplitDock(d);
                self.cell(cell, Some(d), hovered, layout.corner_radius, false);
            }
        }
        if let Some(cell) = layout.fill {
            self.cell(cell, None, active == DropTarget::Fill, layout.corner_radius, false);
        }
        self.neighbor_cells(layout, active);
    }
}

/// Paints the drop indicators of the floating drag in progress.
///
/// Paints nothing unless a tab is floating. The group under the pointer gets
/// its outline and grid; the outer edge cells are always painted; the
/// active target's preview rectangle is filled last.
pub fn paint_indicators<S: DrawSink + ?Sized>(host: &DockingHost, sink: &mut S) {
    let drag = host.drag();
    let (DragPhase::Floating, Some(carrier)) = (drag.phase(), drag.carrier()) else {
        return;
    };
    let tree = host.tree();
    let config = host.config();
    let hover = *drag.hover();
    let mut painter = Painter {
        sink,
        style: &config.indicator,
    };

    let under_pointer = hover
        .node
        .or_else(|| drag.last_pointer().and_then(|p| group_at(tree, p)));
    if let Some(node) = under_pointer
        && let Some(entry) = tree.get(node)
    {
        painter.sink.stroke_rect(
            entry.bounds,
            config.indicator.stroke,
            config.indicator.stroke_thickness,
            0.0,
        );
        let layout = IndicatorLayout::compute(entry.bounds, &config.indicator, offer_for(tree, node));
        let active = if hover.node == Some(node) {
            hover.target
        } else {
            DropTarget::None
        };
        painter.node_cells(&layout, active);
    }

    let outer_active = if hover.node.is_none() {
        hover.target
    } else {
        DropTarget::None
    };
    painter.neighbor_cells(&outer_layout(tree, config), outer_active);

    if let Some(preview) = preview_rect(tree, &hover, &carrier.sizes) {
        let color = if matches!(hover.target, DropTarget::TabBar(_)) {
            config.indicator.hovered_fill
        } else {
            config.indicator.fill
        };
        painter.sink.fill_rect(preview, color, 0.0);
    }
}
