//! Layout strategies, one per diagram kind.
//!
//! Every strategy implements [`LayoutStrategy`]: it places the nodes of a
//! validated [`SceneGraph`] and routes the edges once positions are final.
//! The positions it produces may still overlap; repairing them is the job of
//! the [`Resolver`](crate::resolve::Resolver).
//!
//! [`EngineSet`] owns one configured strategy per [`DiagramKind`] and is
//! immutable after construction, so a single set can serve concurrent calls.

mod cyclic;
mod force;
mod hierarchical;
mod matrix;
mod timeline;

pub use cyclic::Engine as Cyclic;
pub use force::{Engine as Force, ForceReport, Phase};
pub use hierarchical::Engine as Hierarchical;
pub use matrix::Engine as Matrix;
pub use timeline::Engine as Timeline;

use std::collections::HashMap;

use tessera_core::{
    geometry::Point,
    graph::{DiagramKind, EdgeDatum, NodeDatum},
    layout::{Layout, LayoutEdge, PositionedNode},
};

use crate::{
    clock::Deadline,
    config::LayoutConfig,
    error::{LayoutError, StrategyFailure},
    observe::{LayoutEvent, LayoutObserver},
    spacing,
    structure::SceneGraph,
};

/// Per-call context handed to a layout strategy.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    deadline: Deadline<'a>,
    observer: &'a dyn LayoutObserver,
}

impl<'a> LayoutContext<'a> {
    /// Creates a context from a deadline and an observer.
    pub fn new(deadline: Deadline<'a>, observer: &'a dyn LayoutObserver) -> Self {
        Self { deadline, observer }
    }

    /// Returns the deadline for iterative strategies.
    pub fn deadline(&self) -> &Deadline<'a> {
        &self.deadline
    }

    /// Reports an event to the observer.
    pub fn emit(&self, event: LayoutEvent) {
        self.observer.on_event(&event);
    }
}

/// Routes edges between positioned nodes.
pub trait EdgeRouter {
    /// Produces one route per edge, in input order.
    ///
    /// Every edge endpoint must name a node in `nodes`; edges that do not are
    /// skipped. Self-loops keep `edge_separation` clear of their node.
    fn route_edges(
        &self,
        nodes: &[PositionedNode],
        edges: &[EdgeDatum],
        config: &LayoutConfig,
    ) -> Vec<LayoutEdge> {
        route_straight(nodes, edges, config)
    }
}

/// Straight-line routing between node centers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightRouter;

impl EdgeRouter for StraightRouter {}

/// Trait defining the interface for layout strategies.
pub trait LayoutStrategy: EdgeRouter + Send + Sync {
    /// Short name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Computes initial positions for every node, in input order.
    ///
    /// # Errors
    ///
    /// Returns a [`StrategyFailure`] when the strategy cannot produce a
    /// usable placement, e.g. when its numerical state diverges.
    fn place(
        &self,
        graph: &SceneGraph<'_>,
        config: &LayoutConfig,
        ctx: &LayoutContext<'_>,
    ) -> Result<Vec<PositionedNode>, StrategyFailure>;

    /// Whether the strategy tolerates edges from a node to itself.
    fn accepts_self_edges(&self) -> bool {
        true
    }

    /// Validates the graph, places the nodes, and routes the edges.
    ///
    /// A failing [`place`](Self::place) is not an error: it is reported to the
    /// observer and replaced by a deterministic grid seeding.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidGraph`] when node ids are not unique, an
    /// edge references an unknown node, or the strategy rejects self-edges.
    fn generate_layout(
        &self,
        nodes: &[NodeDatum],
        edges: &[EdgeDatum],
        config: &LayoutConfig,
        ctx: &LayoutContext<'_>,
    ) -> Result<Layout, LayoutError> {
        let graph = SceneGraph::new(nodes, edges)?;
        let positioned = self.place_validated(&graph, config, ctx)?;
        let routed = self.route_edges(&positioned, edges, config);
        Ok(Layout::new(config.canvas(), positioned, routed))
    }

    /// Places the nodes of an already validated graph, substituting grid
    /// seeding when the strategy fails.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidGraph`] when the strategy rejects
    /// self-edges present in the graph.
    fn place_validated(
        &self,
        graph: &SceneGraph<'_>,
        config: &LayoutConfig,
        ctx: &LayoutContext<'_>,
    ) -> Result<Vec<PositionedNode>, LayoutError> {
        if !self.accepts_self_edges() {
            graph.reject_self_edges(self.name())?;
        }

        ctx.emit(LayoutEvent::PlacementStarted {
            strategy: self.name(),
            nodes: graph.node_count(),
            edges: graph.edges().len(),
        });

        match self.place(graph, config, ctx) {
            Ok(nodes) => Ok(nodes),
            Err(failure) => {
                ctx.emit(LayoutEvent::PlacementFailed {
                    failure,
                    substitute: "grid",
                });
                Ok(seed_grid(graph.nodes(), config))
            }
        }
    }
}

/// Lays nodes row-major on a `ceil(sqrt(n))`-column grid spanning the usable
/// canvas, each node centered in its cell.
///
/// Used to seed layouts and as the substitute when a strategy fails.
pub fn seed_grid(nodes: &[NodeDatum], config: &LayoutConfig) -> Vec<PositionedNode> {
    if nodes.is_empty() {
        return Vec::new();
    }
    let columns = (nodes.len() as f32).sqrt().ceil().max(1.0) as usize;
    let rows = nodes.len().div_ceil(columns);
    let usable = config.usable_size();
    let cell_width = usable.width() / columns as f32;
    let cell_height = usable.height() / rows as f32;

    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let size = spacing::estimate_node_size(node, config);
            let center = Point::new(
                config.margin_x() + cell_width * ((i % columns) as f32 + 0.5),
                config.margin_y() + cell_height * ((i / columns) as f32 + 0.5),
            );
            let top_left = Point::new(
                center.x() - size.width() / 2.0,
                center.y() - size.height() / 2.0,
            );
            PositionedNode::new(node, spacing::clamp_position(top_left, size, config), size)
        })
        .collect()
}

/// Routes every edge as a straight segment between node centers.
///
/// Self-edges become a small loop over the node's top-right corner.
pub fn route_straight(
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
                vec![source.center(), target.center()]
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

/// A closed loop leaving the top edge and re-entering the right edge,
/// reaching `edge_separation` beyond the node.
pub(crate) fn self_loop(node: &PositionedNode, config: &LayoutConfig) -> Vec<Point> {
    let bounds = node.bounds();
    let reach = config.edge_separation().max(1.0);
    let start = Point::new(bounds.max_x() - node.size().width() / 4.0, bounds.min_y());
    let end = Point::new(bounds.max_x(), bounds.min_y() + node.size().height() / 4.0);
    vec![
        start,
        start.with_y(bounds.min_y() - reach),
        Point::new(bounds.max_x() + reach, bounds.min_y() - reach),
        end.with_x(bounds.max_x() + reach),
        end,
    ]
}

/// One configured strategy per diagram kind.
pub struct EngineSet {
    flow: Box<dyn LayoutStrategy>,
    timeline: Box<dyn LayoutStrategy>,
    matrix: Box<dyn LayoutStrategy>,
    cycle: Box<dyn LayoutStrategy>,
    network: Box<dyn LayoutStrategy>,
}

impl EngineSet {
    /// Creates the default strategy for every diagram kind.
    pub fn new() -> Self {
        Self {
            flow: Box::new(Hierarchical::new()),
            timeline: Box::new(Timeline::new()),
            matrix: Box::new(Matrix::new()),
            cycle: Box::new(Cyclic::new()),
            network: Box::new(Force::new()),
        }
    }

    /// Replaces the strategy used for `kind`.
    pub fn with_engine(mut self, kind: DiagramKind, engine: Box<dyn LayoutStrategy>) -> Self {
        *self.slot_mut(kind) = engine;
        self
    }

    /// Returns the strategy for `kind`.
    pub fn engine(&self, kind: DiagramKind) -> &dyn LayoutStrategy {
        match kind {
            DiagramKind::Flow => self.flow.as_ref(),
            DiagramKind::Timeline => self.timeline.as_ref(),
            DiagramKind::Matrix => self.matrix.as_ref(),
            DiagramKind::Cycle => self.cycle.as_ref(),
            DiagramKind::Network => self.network.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: DiagramKind) -> &mut Box<dyn LayoutStrategy> {
        match kind {
            DiagramKind::Flow => &mut self.flow,
            DiagramKind::Timeline => &mut self.timeline,
            DiagramKind::Matrix => &mut self.matrix,
            DiagramKind::Cycle => &mut self.cycle,
            DiagramKind::Network => &mut self.network,
        }
    }
}

impl Default for EngineSet {
    fn default() -> Self {
        Self::new()
    }
}
