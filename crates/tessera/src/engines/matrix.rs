//! Matrix layout engine
//!
//! Places nodes in the cells of a regular grid with `ceil(sqrt(n))` columns.
//! Nodes carrying `row`/`column` metadata claim their cell first; the
//! remaining nodes fill free cells row-major in input order. Every node is
//! centered in its cell, and cells share the usable canvas equally.

use std::collections::HashSet;

use tessera_core::{
    geometry::{Point, Size},
    graph::NodeMetadata,
    layout::PositionedNode,
};

use crate::{
    config::LayoutConfig,
    engines::{EdgeRouter, LayoutContext, LayoutStrategy},
    error::StrategyFailure,
    spacing,
    structure::SceneGraph,
};

type Cell = (usize, usize);

/// Matrix layout engine
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine;

impl Engine {
    /// Create a new matrix layout engine
    pub fn new() -> Self {
        Self
    }

    /// Assign a `(row, column)` cell to every node, in input order.
    fn assign_cells(graph: &SceneGraph<'_>) -> (Vec<Cell>, usize) {
        let count = graph.node_count();
        let claimed_columns = graph
            .nodes()
            .iter()
            .filter_map(|node| node.metadata().column)
            .filter(|&column| column < count)
            .map(|column| column + 1)
            .max()
            .unwrap_or(0);
        let columns = ((count as f32).sqrt().ceil() as usize)
            .max(claimed_columns)
            .max(1);

        let mut occupied: HashSet<Cell> = HashSet::with_capacity(count);
        let mut cells: Vec<Option<Cell>> = vec![None; count];

        for (i, node) in graph.nodes().iter().enumerate() {
            if let Some(cell) = claimed_cell(node.metadata(), columns, count, &occupied) {
                occupied.insert(cell);
                cells[i] = Some(cell);
            }
        }

        let mut free = (0..).map(|k| (k / columns, k % columns));
        let cells = cells
            .into_iter()
            .map(|cell| match cell {
                Some(cell) => cell,
                None => {
                    let cell = free
                        .by_ref()
                        .find(|cell| !occupied.contains(cell))
                        .unwrap_or_default();
                    occupied.insert(cell);
                    cell
                }
            })
            .collect();

        (cells, columns)
    }
}

/// The cell a node asks for through its metadata, if it is still free.
///
/// Row or column indices beyond the node count are ignored so a stray value
/// cannot stretch the grid.
fn claimed_cell(
    metadata: &NodeMetadata,
    columns: usize,
    count: usize,
    occupied: &HashSet<Cell>,
) -> Option<Cell> {
    let row = metadata.row.filter(|&row| row < count);
    let column = metadata.column.filter(|&column| column < columns);
    match (row, column) {
        (Some(row), Some(column)) => Some((row, column)).filter(|cell| !occupied.contains(cell)),
        (Some(row), None) => (0..columns)
            .map(|column| (row, column))
            .find(|cell| !occupied.contains(cell)),
        (None, Some(column)) => (0..count)
            .map(|row| (row, column))
            .find(|cell| !occupied.contains(cell)),
        (None, None) => None,
    }
}

impl EdgeRouter for Engine {}

impl LayoutStrategy for Engine {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn place(
        &self,
        graph: &SceneGraph<'_>,
        config: &LayoutConfig,
        _ctx: &LayoutContext<'_>,
    ) -> Result<Vec<PositionedNode>, StrategyFailure> {
        if graph.node_count() == 0 {
            return Ok(Vec::new());
        }

        let (cells, columns) = Self::assign_cells(graph);
        let rows = cells.iter().map(|&(row, _)| row + 1).max().unwrap_or(1);
        let usable = config.usable_size();
        let cell_size = Size::new(
            usable.width() / columns as f32,
            usable.height() / rows as f32,
        );

        Ok(graph
            .nodes()
            .iter()
            .zip(cells)
            .map(|(datum, (row, column))| {
                let size = spacing::estimate_node_size(datum, config);
                let top_left = Point::new(
                    config.margin_x()
                        + cell_size.width() * column as f32
                        + (cell_size.width() - size.width()) / 2.0,
                    config.margin_y()
                        + cell_size.height() * row as f32
                        + (cell_size.height() - size.height()) / 2.0,
                );
                PositionedNode::new(datum, spacing::clamp_position(top_left, size, config), size)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use tessera_core::graph::NodeDatum;

    use super::*;
    use crate::{
        clock::{Deadline, ManualClock},
        observe::NoopObserver,
    };

    fn cell(id: &str, row: Option<usize>, column: Option<usize>) -> NodeDatum {
        NodeDatum::new(id, id).with_metadata(NodeMetadata {
            row,
            column,
            ..NodeMetadata::default()
        })
    }

    fn cells_of(nodes: &[NodeDatum]) -> (Vec<Cell>, usize) {
        let graph = SceneGraph::new(nodes, &[]).expect("valid graph");
        Engine::assign_cells(&graph)
    }

    #[test]
    fn test_row_major_fill() {
        let nodes: Vec<_> = (0..5).map(|i| cell(&format!("n{i}"), None, None)).collect();

        let (cells, columns) = cells_of(&nodes);

        assert_eq!(columns, 3);
        assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_metadata_claims_cells_first() {
        let nodes = vec![
            cell("free", None, None),
            cell("pinned", Some(0), Some(0)),
            cell("row", Some(1), None),
            cell("column", None, Some(1)),
        ];

        let (cells, columns) = cells_of(&nodes);

        assert_eq!(columns, 2);
        assert_eq!(cells[1], (0, 0));
        assert_eq!(cells[2], (1, 0));
        assert_eq!(cells[3], (0, 1));
        assert_eq!(cells[0], (1, 1));
    }

    #[test]
    fn test_conflicting_claims_fall_back_to_free_cells() {
        let nodes = vec![
            cell("a", Some(0), Some(0)),
            cell("b", Some(0), Some(0)),
            cell("c", Some(99), Some(99)),
        ];

        let (cells, _) = cells_of(&nodes);

        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_nodes_are_centered_in_cells() {
        let clock = ManualClock::new();
        let observer = NoopObserver;
        let ctx = LayoutContext::new(Deadline::unbounded(&clock), &observer);
        let config = LayoutConfig::default();
        let nodes: Vec<_> = (0..4).map(|i| cell(&format!("n{i}"), None, None)).collect();
        let graph = SceneGraph::new(&nodes, &[]).expect("valid graph");

        let placed = Engine::new()
            .place(&graph, &config, &ctx)
            .expect("placement");

        let usable = config.usable_size();
        assert_approx_eq!(
            f32,
            placed[3].center().x(),
            config.margin_x() + usable.width() * 0.75,
            epsilon = 1e-3
        );
        assert_approx_eq!(
            f32,
            placed[3].center().y(),
            config.margin_y() + usable.height() * 0.75,
            epsilon = 1e-3
        );
    }
}
