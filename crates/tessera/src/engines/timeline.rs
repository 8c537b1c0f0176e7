//! Timeline layout engine
//!
//! Nodes are sorted by their `time` metadata and projected onto a horizontal
//! axis through the middle of the canvas, proportionally to time. Nodes
//! alternate above and below the axis so neighbours with close timestamps do
//! not collide. Nodes without a (finite) time follow the timed ones in input
//! order, on evenly spaced slots.

use std::cmp::Ordering;

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

/// Timeline layout engine
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine;

impl Engine {
    /// Create a new timeline layout engine
    pub fn new() -> Self {
        Self
    }

    /// Input indices sorted by time. Untimed nodes come last, in input order.
    fn chronological_order(graph: &SceneGraph<'_>) -> Vec<usize> {
        let mut order: Vec<usize> = (0..graph.node_count()).collect();
        order.sort_by(|&a, &b| match (time_of(graph, a), time_of(graph, b)) {
            (Some(ta), Some(tb)) => ta.total_cmp(&tb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        order
    }
}

fn time_of(graph: &SceneGraph<'_>, node: usize) -> Option<f64> {
    graph.nodes()[node]
        .metadata()
        .time
        .filter(|time| time.is_finite())
}

impl EdgeRouter for Engine {}

impl LayoutStrategy for Engine {
    fn name(&self) -> &'static str {
        "timeline"
    }

    fn accepts_self_edges(&self) -> bool {
        false
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
        let widest = sizes.iter().map(|size| size.width()).fold(0.0, f32::max);

        let order = Self::chronological_order(graph);
        let times: Vec<f64> = order
            .iter()
            .filter_map(|&node| time_of(graph, node))
            .collect();
        let (first, last) = match (times.first(), times.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => (0.0, 0.0),
        };

        // Axis runs between the centers of the outermost possible nodes
        let axis_start = config.margin_x() + widest / 2.0;
        let axis_length = (config.usable_size().width() - widest).max(0.0);
        let slot = if count > 1 {
            axis_length / (count - 1) as f32
        } else {
            0.0
        };
        let timed_span = slot * times.len().saturating_sub(1) as f32;
        let axis_y = config.margin_y() + config.usable_size().height() / 2.0;

        let mut centers = vec![Point::default(); count];
        for (rank, &node) in order.iter().enumerate() {
            let offset = match time_of(graph, node) {
                Some(time) if last > first => ((time - first) / (last - first)) as f32 * timed_span,
                _ if count == 1 => axis_length / 2.0,
                _ => slot * rank as f32,
            };
            let lift = sizes[node].height() / 2.0 + config.node_separation();
            let y = if rank % 2 == 0 {
                axis_y - lift
            } else {
                axis_y + lift
            };
            centers[node] = Point::new(axis_start + offset, y);
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

    use tessera_core::graph::{EdgeDatum, NodeDatum, NodeMetadata};

    use super::*;
    use crate::{
        clock::{Deadline, ManualClock},
        error::LayoutError,
        observe::NoopObserver,
    };

    fn event(id: &str, time: Option<f64>) -> NodeDatum {
        NodeDatum::new(id, id).with_metadata(NodeMetadata {
            time,
            ..NodeMetadata::default()
        })
    }

    fn place(nodes: &[NodeDatum]) -> Vec<PositionedNode> {
        let clock = ManualClock::new();
        let observer = NoopObserver;
        let ctx = LayoutContext::new(Deadline::unbounded(&clock), &observer);
        let graph = SceneGraph::new(nodes, &[]).expect("valid graph");
        Engine::new()
            .place(&graph, &LayoutConfig::default(), &ctx)
            .expect("placement")
    }

    #[test]
    fn test_nodes_follow_time() {
        let nodes = vec![
            event("late", Some(30.0)),
            event("early", Some(10.0)),
            event("middle", Some(20.0)),
        ];

        let placed = place(&nodes);

        assert!(placed[1].center().x() < placed[2].center().x());
        assert!(placed[2].center().x() < placed[0].center().x());
        // Middle event sits halfway along the timed span
        let halfway = (placed[1].center().x() + placed[0].center().x()) / 2.0;
        assert_approx_eq!(f32, placed[2].center().x(), halfway, epsilon = 1e-3);
    }

    #[test]
    fn test_nodes_alternate_around_axis() {
        let config = LayoutConfig::default();
        let axis_y = config.height() / 2.0;
        let nodes = vec![
            event("a", Some(1.0)),
            event("b", Some(2.0)),
            event("c", Some(3.0)),
        ];

        let placed = place(&nodes);

        assert!(placed[0].center().y() < axis_y);
        assert!(placed[1].center().y() > axis_y);
        assert!(placed[2].center().y() < axis_y);
    }

    #[test]
    fn test_untimed_nodes_follow_timed_ones() {
        let nodes = vec![
            event("floating", None),
            event("b", Some(5.0)),
            event("a", Some(1.0)),
            event("nan", Some(f64::NAN)),
        ];

        let placed = place(&nodes);

        assert!(placed[2].center().x() < placed[1].center().x());
        assert!(placed[1].center().x() < placed[0].center().x());
        assert!(placed[0].center().x() < placed[3].center().x());
    }

    #[test]
    fn test_equal_times_are_spaced_evenly() {
        let nodes = vec![
            event("a", Some(7.0)),
            event("b", Some(7.0)),
            event("c", Some(7.0)),
        ];

        let placed = place(&nodes);

        let first_gap = placed[1].center().x() - placed[0].center().x();
        let second_gap = placed[2].center().x() - placed[1].center().x();
        assert!(first_gap > 0.0);
        assert_approx_eq!(f32, first_gap, second_gap, epsilon = 1e-3);
    }

    #[test]
    fn test_single_node_is_centered() {
        let config = LayoutConfig::default();
        let placed = place(&[event("solo", None)]);

        assert_approx_eq!(
            f32,
            placed[0].center().x(),
            config.width() / 2.0,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_self_edges_are_rejected() {
        let clock = ManualClock::new();
        let observer = NoopObserver;
        let ctx = LayoutContext::new(Deadline::unbounded(&clock), &observer);
        let nodes = vec![event("a", Some(1.0))];
        let edges = vec![EdgeDatum::new("a", "a")];

        let result = Engine::new().generate_layout(&nodes, &edges, &LayoutConfig::default(), &ctx);

        assert!(matches!(result, Err(LayoutError::InvalidGraph(_))));
    }
}
