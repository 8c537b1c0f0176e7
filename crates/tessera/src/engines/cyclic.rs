//! Cyclic layout engine
//!
//! Places nodes on a ring centered in the canvas. The ring order follows a
//! depth-first walk along the edges starting at the first node, so the
//! steps of a cycle appear consecutively; nodes the walk never reaches are
//! appended in input order.

use std::f32::consts::{FRAC_PI_2, TAU};

use petgraph::{graph::NodeIndex, visit::Dfs};

use tessera_core::{
    geometry::{Point, Size},
    layout::PositionedNode,
};

use crate::{
    config::LayoutConfig,
    engines::{EdgeRouter, LayoutContext, LayoutStrategy},
    error::StrategyFailure,
    spacing,
    structure::SceneGraph,
};

/// Ring layout engine
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine;

impl Engine {
    /// Create a new cyclic layout engine
    pub fn new() -> Self {
        Self
    }

    /// Input indices in ring order.
    fn ring_order(graph: &SceneGraph<'_>) -> Vec<usize> {
        let count = graph.node_count();
        let mut order = Vec::with_capacity(count);
        let mut seen = vec![false; count];

        if count > 0 {
            let digraph = graph.digraph();
            let mut dfs = Dfs::new(digraph, NodeIndex::new(0));
            while let Some(node) = dfs.next(digraph) {
                seen[node.index()] = true;
                order.push(node.index());
            }
        }

        order.extend((0..count).filter(|&node| !seen[node]));
        order
    }

    /// Ring radius: long enough for the nodes to sit side by side, but never
    /// reaching past the margins.
    fn radius(count: usize, largest: Size, config: &LayoutConfig) -> f32 {
        if count < 2 {
            return 0.0;
        }
        let circumference = count as f32 * (largest.width() + config.node_separation());
        let usable = config.usable_size();
        let cap = ((usable.width() - largest.width()) / 2.0)
            .min((usable.height() - largest.height()) / 2.0);
        (circumference / TAU).min(cap).max(0.0)
    }
}

impl EdgeRouter for Engine {}

impl LayoutStrategy for Engine {
    fn name(&self) -> &'static str {
        "cyclic"
    }

    fn place(
        &self,
        graph: &SceneGraph<'_>,
        config: &LayoutConfig,
        _ctx: &LayoutContext<'_>,
    ) -> Result<Vec<PositionedNode>, StrategyFailure> {
        let count = graph.node_count();
        if count == 0 {
            return Ok(Vec::new());
        }

        let sizes: Vec<Size> = graph
            .nodes()
            .iter()
            .map(|node| spacing::estimate_node_size(node, config))
            .collect();
        let largest = sizes
            .iter()
            .fold(Size::default(), |largest, size| largest.max(*size));
        let radius = Self::radius(count, largest, config);
        let usable = config.usable_size();
        let center = Point::new(
            config.margin_x() + usable.width() / 2.0,
            config.margin_y() + usable.height() / 2.0,
        );

        let mut centers = vec![center; count];
        for (slot, node) in Self::ring_order(graph).into_iter().enumerate() {
            // Clockwise from twelve o'clock
            let angle = TAU * slot as f32 / count as f32 - FRAC_PI_2;
            centers[node] = center.add_point(Point::new(angle.cos(), angle.sin()).scale(radius));
        }

        Ok(graph
            .nodes()
            .iter()
            .zip(centers)
            .zip(sizes)
            .map(|((datum, center), size)| {
                let top_left = Point::new(
                    center.x() - size.width() / 2.0,
                    center.y() - size.height() / 2.0,
                );
                PositionedNode::new(datum, spacing::clamp_position(top_left, size, config), size)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use tessera_core::graph::{EdgeDatum, NodeDatum};

    use super::*;
    use crate::{
        clock::{Deadline, ManualClock},
        observe::NoopObserver,
    };

    fn named(ids: &[&str]) -> Vec<NodeDatum> {
        ids.iter().map(|id| NodeDatum::new(*id, *id)).collect()
    }

    fn place(nodes: &[NodeDatum], edges: &[EdgeDatum], config: &LayoutConfig) -> Vec<PositionedNode> {
        let clock = ManualClock::new();
        let observer = NoopObserver;
        let ctx = LayoutContext::new(Deadline::unbounded(&clock), &observer);
        let graph = SceneGraph::new(nodes, edges).expect("valid graph");
        Engine::new().place(&graph, config, &ctx).expect("placement")
    }

    #[test]
    fn test_ring_order_follows_edges() {
        let nodes = named(&["a", "b", "c", "d", "lonely"]);
        let edges = vec![
            EdgeDatum::new("a", "c"),
            EdgeDatum::new("c", "b"),
            EdgeDatum::new("b", "a"),
            EdgeDatum::new("d", "a"),
        ];
        let graph = SceneGraph::new(&nodes, &edges).expect("valid graph");

        assert_eq!(Engine::ring_order(&graph), vec![0, 2, 1, 3, 4]);
    }

    #[test]
    fn test_nodes_share_one_circle() {
        let config = LayoutConfig::default();
        let nodes = named(&["a", "b", "c", "d", "e", "f"]);
        let placed = place(&nodes, &[], &config);

        let center = Point::new(config.width() / 2.0, config.height() / 2.0);
        let radius = placed[0].center().sub_point(center).hypot();
        assert!(radius > 0.0);
        for node in &placed {
            assert_approx_eq!(
                f32,
                node.center().sub_point(center).hypot(),
                radius,
                epsilon = 1e-2
            );
        }
        // First node at twelve o'clock
        assert_approx_eq!(f32, placed[0].center().x(), center.x(), epsilon = 1e-2);
        assert!(placed[0].center().y() < center.y());
    }

    #[test]
    fn test_radius_is_capped_by_canvas() {
        let config = LayoutConfig::default().with_canvas(400.0, 300.0);
        let nodes: Vec<_> = (0..40)
            .map(|i| NodeDatum::new(format!("n{i}"), ""))
            .collect();

        let placed = place(&nodes, &[], &config);

        for node in &placed {
            assert!(node.position().x() >= config.margin_x());
            assert!(node.position().y() >= config.margin_y());
            assert!(node.bounds().max_x() <= config.width() - config.margin_x() + 1e-3);
            assert!(node.bounds().max_y() <= config.height() - config.margin_y() + 1e-3);
        }
    }

    #[test]
    fn test_single_node_sits_in_center() {
        let config = LayoutConfig::default();
        let placed = place(&named(&["solo"]), &[], &config);

        assert_approx_eq!(f32, placed[0].center().x(), config.width() / 2.0);
        assert_approx_eq!(f32, placed[0].center().y(), config.height() / 2.0);
    }
}
