//! Spreading about the centroid.
//!
//! Scales the node centers away from their common centroid by growing
//! factors and nudges each scaled layout. The best candidate wins. Scaling
//! keeps the relative arrangement intact, which suits layouts that are
//! merely too tight.

use tessera_core::{geometry::Point, layout::PositionedNode};

use crate::{
    clock::Deadline,
    config::LayoutConfig,
    error::StrategyFailure,
    resolve::{Nudge, OverlapStrategy},
    spacing,
};

/// Scale-then-nudge strategy
#[derive(Debug, Clone)]
pub struct Spread {
    factors: Vec<f32>,
    nudge: Nudge,
}

impl Spread {
    /// Creates a spread strategy trying factors 1.25 to 2.0.
    pub fn new() -> Self {
        Self {
            factors: vec![1.25, 1.5, 1.75, 2.0],
            nudge: Nudge::new().with_max_passes(10),
        }
    }

    /// Sets the scale factors to try, in order.
    pub fn with_factors(mut self, factors: Vec<f32>) -> Self {
        self.factors = factors;
        self
    }
}

impl Default for Spread {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlapStrategy for Spread {
    fn name(&self) -> &'static str {
        "spread"
    }

    fn resolve(
        &self,
        nodes: Vec<PositionedNode>,
        config: &LayoutConfig,
        deadline: &Deadline<'_>,
    ) -> Result<Vec<PositionedNode>, StrategyFailure> {
        let separation = config.node_separation();
        let centroid = centroid(&nodes);
        let mut best_count = spacing::count_overlaps(&nodes, separation);
        let mut best = nodes.clone();

        for &factor in &self.factors {
            if best_count == 0 || deadline.expired() {
                break;
            }
            if !factor.is_finite() || factor <= 0.0 {
                return Err(StrategyFailure::new(
                    self.name(),
                    format!("invalid scale factor {factor}"),
                ));
            }

            let mut scaled = nodes.clone();
            for node in scaled.iter_mut().filter(|node| !node.is_fixed()) {
                let offset = node.center().sub_point(centroid).scale(factor);
                node.set_center(centroid.add_point(offset));
            }
            spacing::clamp_to_canvas(&mut scaled, config);

            let candidate = self.nudge.run(scaled, config, deadline);
            let count = spacing::count_overlaps(&candidate, separation);
            if count < best_count {
                best_count = count;
                best = candidate;
            }
        }

        Ok(best)
    }
}

fn centroid(nodes: &[PositionedNode]) -> Point {
    if nodes.is_empty() {
        return Point::default();
    }
    nodes
        .iter()
        .fold(Point::default(), |sum, node| sum.add_point(node.center()))
        .scale(1.0 / nodes.len() as f32)
}
