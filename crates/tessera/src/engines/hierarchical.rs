//! Hierarchical layout engine for flow and tree diagrams
//!
//! Nodes are assigned to layers by longest path from the roots. Cycles are
//! broken by ignoring the back edges found by a depth-first search, and a
//! node's `level` metadata overrides the computed layer. Layers are stacked
//! top-down and centered horizontally; nodes inside a layer are ordered by
//! the barycenter of their parents in the layers above.

use std::collections::{HashMap, HashSet};

use log::trace;
use petgraph::{
    Direction,
    algo::toposort,
    graph::DiGraph,
    visit::{DfsEvent, depth_first_search},
};

use tessera_core::{
    geometry::{Point, Size},
    graph::EdgeDatum,
    layout::{LayoutEdge, PositionedNode},
};

use crate::{
    config::LayoutConfig,
    engines::{EdgeRouter, LayoutContext, LayoutStrategy, self_loop},
    error::StrategyFailure,
    spacing,
    structure::SceneGraph,
};

/// Layered layout engine
#[derive(Debug, Clone, Default)]
pub struct Engine {
    layer_gap: Option<f32>,
}

impl Engine {
    /// Create a new hierarchical layout engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vertical gap between layers. Defaults to the node separation.
    pub fn set_layer_gap(&mut self, gap: f32) -> &mut Self {
        self.layer_gap = Some(gap);
        self
    }

    /// Assign a layer to every node, in input order.
    fn assign_layers(&self, graph: &SceneGraph<'_>) -> Result<Vec<usize>, StrategyFailure> {
        let dag = acyclic_subgraph(graph.digraph());
        let order = toposort(&dag, None).map_err(|cycle| {
            StrategyFailure::new(
                self.name(),
                format!(
                    "cycle through node `{}` survived back-edge removal",
                    graph.nodes()[cycle.node_id().index()].id()
                ),
            )
            .in_phase("layering")
        })?;

        let mut layers = vec![0; graph.node_count()];
        for node in order {
            let computed = dag
                .neighbors_directed(node, Direction::Incoming)
                .map(|parent| layers[parent.index()] + 1)
                .max()
                .unwrap_or(0);
            // Explicit levels are capped at the node count
            layers[node.index()] = graph.nodes()[node.index()]
                .metadata()
                .level
                .map_or(computed, |level| level.min(graph.node_count()));
        }

        Ok(layers)
    }

    /// Group nodes by layer and order each layer by parent barycenter.
    fn order_layers(&self, graph: &SceneGraph<'_>, layers: &[usize]) -> Vec<Vec<usize>> {
        let depth = layers.iter().max().map_or(0, |deepest| deepest + 1);
        let mut grouped: Vec<Vec<usize>> = vec![Vec::new(); depth];
        for (node, &layer) in layers.iter().enumerate() {
            grouped[layer].push(node);
        }

        let mut parents: HashMap<usize, Vec<usize>> = HashMap::new();
        for &(source, target) in graph.endpoints() {
            if layers[source] < layers[target] {
                parents.entry(target).or_default().push(source);
            }
        }

        let mut slot = vec![0usize; layers.len()];
        for layer in &mut grouped {
            let keys: HashMap<usize, f32> = layer
                .iter()
                .enumerate()
                .map(|(position, &node)| {
                    let key = match parents.get(&node) {
                        Some(above) if !above.is_empty() => {
                            above.iter().map(|&parent| slot[parent] as f32).sum::<f32>()
                                / above.len() as f32
                        }
                        _ => position as f32,
                    };
                    (node, key)
                })
                .collect();

            // Stable, so ties keep input order
            layer.sort_by(|a, b| keys[a].total_cmp(&keys[b]));

            for (position, &node) in layer.iter().enumerate() {
                slot[node] = position;
            }
        }

        grouped
    }
}

impl EdgeRouter for Engine {
    /// Elbow routes from the bottom of the source to the top of the target.
    fn route_edges(
        &self,
        nodes: &[PositionedNode],
        edges: &[EdgeDatum],
        config: &LayoutConfig,
    ) -> Vec<LayoutEdge> {
        let by_id: HashMap<&str, &PositionedNode> =
            nodes.iter().map(|node| (node.id(), node)).collect();

        edges
            .iter()
            .filter_map(|edge| {
                let source = by_id.get(edge.source())?;
                let target = by_id.get(edge.target())?;
                let points = if edge.is_self_edge() {
                    self_loop(source, config)
                } else {
                    let start = Point::new(source.center().x(), source.bounds().max_y());
                    let end = Point::new(target.center().x(), target.bounds().min_y());
                    let mid_y = (start.y() + end.y()) / 2.0;
                    vec![start, start.with_y(mid_y), end.with_y(mid_y), end]
                };
                Some(LayoutEdge::new(
                    edge.source(),
                    edge.target(),
                    points,
                    edge.label().map(str::to_string),
                ))
            })
            .collect()
    }
}

impl LayoutStrategy for Engine {
    fn name(&self) -> &'static str {
        "hierarchical"
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

        let sizes: Vec<Size> = graph
            .nodes()
            .iter()
            .map(|node| spacing::estimate_node_size(node, config))
            .collect();
        let layers = self.assign_layers(graph)?;
        let ordered = self.order_layers(graph, &layers);
        trace!(layers = ordered.len(); "Hierarchical layers assigned");

        let separation = config.node_separation();
        let layer_gap = self.layer_gap.unwrap_or(separation);
        let usable_width = config.usable_size().width();

        let mut positions = vec![Point::default(); graph.node_count()];
        let mut y = config.margin_y();
        for layer in &ordered {
            if layer.is_empty() {
                continue;
            }
            let layer_width = layer.iter().map(|&node| sizes[node].width()).sum::<f32>()
                + separation * (layer.len() - 1) as f32;
            let layer_height = layer
                .iter()
                .map(|&node| sizes[node].height())
                .fold(0.0, f32::max);

            let mut x = config.margin_x() + (usable_width - layer_width) / 2.0;
            for &node in layer {
                let size = sizes[node];
                let top = y + (layer_height - size.height()) / 2.0;
                positions[node] = Point::new(x, top);
                x += size.width() + separation;
            }
            y += layer_height + layer_gap;
        }

        Ok(graph
            .nodes()
            .iter()
            .zip(positions)
            .zip(sizes)
            .map(|((datum, position), size)| {
                PositionedNode::new(datum, spacing::clamp_position(position, size, config), size)
            })
            .collect())
    }
}

/// Copy of `graph` without the back edges of a depth-first search from every
/// node in input order.
fn acyclic_subgraph(graph: &DiGraph<usize, usize>) -> DiGraph<usize, usize> {
    let mut back_edges = HashSet::new();
    depth_first_search(graph, graph.node_indices(), |event| {
        if let DfsEvent::BackEdge(source, target) = event {
            back_edges.insert((source, target));
        }
    });

    let mut dag = DiGraph::with_capacity(graph.node_count(), graph.edge_count());
    for node in graph.node_indices() {
        dag.add_node(graph[node]);
    }
    for edge in graph.edge_indices() {
        if let Some((source, target)) = graph.edge_endpoints(edge) {
            if !back_edges.contains(&(source, target)) {
                dag.add_edge(source, target, graph[edge]);
            }
        }
    }
    dag
}
