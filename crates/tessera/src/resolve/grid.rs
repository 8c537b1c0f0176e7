//! Terminal grid fallback.
//!
//! Re-lays every node onto a regular grid whose cells are as large as the
//! largest node plus the separation, so no two nodes can overlap. The grid
//! starts square and loses columns until it fits the canvas width. When even
//! that does not fit, the grid keeps as many of its square columns as the
//! separations alone allow, and all nodes shrink uniformly.
//!
//! If the separations alone already fill an axis, the gap between cells is
//! reduced so that gaps and nodes share that axis evenly. Nodes then never
//! intersect and stay on the canvas, but they are closer than the configured
//! separation, so the overlap count stays above zero.
//!
//! Placement depends only on node order and sizes, which makes the fallback
//! deterministic and idempotent.

use log::debug;

use tessera_core::{
    geometry::{Point, Size},
    layout::PositionedNode,
};

use crate::{config::LayoutConfig, spacing};

/// Headroom kept when shrinking, so shrunk nodes fit on a second run
/// without shrinking again.
const SHRINK_SLACK: f32 = 1e-4;

/// Grid placement that always succeeds
#[derive(Debug, Clone, Copy, Default)]
pub struct GridFallback;

impl GridFallback {
    /// Name reported in resolver metrics.
    pub const NAME: &'static str = "grid";

    /// Creates the grid fallback.
    pub fn new() -> Self {
        Self
    }

    /// Places `nodes` on the grid, in input order.
    pub fn apply(
        &self,
        mut nodes: Vec<PositionedNode>,
        config: &LayoutConfig,
    ) -> Vec<PositionedNode> {
        let count = nodes.len();
        if count == 0 {
            return nodes;
        }

        let separation = config.node_separation().max(0.0);
        let usable = config.usable_size();
        let largest = nodes
            .iter()
            .fold(Size::default(), |largest, node| largest.max(node.size()));

        let square = (count as f32).sqrt().ceil().max(1.0) as usize;
        let columns_fitting = |cell_width: f32| {
            if cell_width > 0.0 {
                (((usable.width() + separation) / cell_width).floor() as usize).max(1)
            } else {
                square
            }
        };

        let fits = |extent: Size| {
            extent.width() <= usable.width() && extent.height() <= usable.height()
        };

        let mut columns = square.min(columns_fitting(largest.width() + separation));
        let mut gap = separation;
        let mut scale = 1.0;
        if !fits(grid_extent(count, columns, largest, gap)) {
            columns = square.min(columns_fitting(separation));
            gap = fitted_gap(count, columns, separation, usable);
            if !fits(grid_extent(count, columns, largest, gap)) {
                scale = shrink_factor(count, columns, largest, gap, usable);
            }
            debug!(columns, gap, scale; "Grid fallback shrinks nodes to fit the canvas");
        }

        let content = largest.scale(scale);
        let extent = grid_extent(count, columns, content, gap);
        let origin = Point::new(
            config.margin_x() + ((usable.width() - extent.width()) / 2.0).max(0.0),
            config.margin_y() + ((usable.height() - extent.height()) / 2.0).max(0.0),
        );

        for (i, node) in nodes.iter_mut().enumerate() {
            if scale < 1.0 {
                node.set_size(node.size().scale(scale));
            }
            let cell = Point::new(
                origin.x() + (content.width() + gap) * (i % columns) as f32,
                origin.y() + (content.height() + gap) * (i / columns) as f32,
            );
            let center = cell.add_point(Point::new(content.width() / 2.0, content.height() / 2.0));
            let size = node.size();
            let top_left = Point::new(
                center.x() - size.width() / 2.0,
                center.y() - size.height() / 2.0,
            );
            node.set_position(spacing::clamp_position(top_left, size, config));
        }

        nodes
    }
}

/// Total size of a grid of `count` cells holding boxes of `content`.
fn grid_extent(count: usize, columns: usize, content: Size, separation: f32) -> Size {
    let rows = count.div_ceil(columns);
    Size::new(
        columns as f32 * (content.width() + separation) - separation,
        rows as f32 * (content.height() + separation) - separation,
    )
}

/// Gap between cells of a `columns`-wide grid.
///
/// This is `separation` unless the separations alone fill an axis; that axis
/// is then split evenly between gaps and nodes.
fn fitted_gap(count: usize, columns: usize, separation: f32, usable: Size) -> f32 {
    let rows = count.div_ceil(columns);
    let axis = |available: f32, cells: usize| {
        let room = (available + separation) / cells as f32 - separation;
        if room > 0.0 || available <= 0.0 {
            separation
        } else {
            available / (2 * cells) as f32
        }
    };
    axis(usable.width(), columns).min(axis(usable.height(), rows))
}

/// Uniform scale that makes a `columns`-wide grid fit `usable`.
fn shrink_factor(count: usize, columns: usize, largest: Size, separation: f32, usable: Size) -> f32 {
    let rows = count.div_ceil(columns);
    let axis = |available: f32, cells: usize, extent: f32| {
        if extent <= 0.0 {
            return 1.0;
        }
        let room = (available + separation) / cells as f32 - separation;
        room / extent
    };
    let factor = axis(usable.width(), columns, largest.width())
        .min(axis(usable.height(), rows, largest.height()))
        .min(1.0);
    (factor * (1.0 - SHRINK_SLACK)).max(0.0)
}
