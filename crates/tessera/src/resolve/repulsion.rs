//! Overlap-only repulsion.
//!
//! Unlike the force layout, only overlapping pairs interact: each pair is
//! pushed apart along the line between its centers in proportion to its
//! penetration depth. Non-overlapping nodes never move, so the topology the
//! layout strategy produced is preserved as far as possible.

use log::trace;

use tessera_core::{geometry::Point, layout::PositionedNode};

use crate::{
    clock::Deadline,
    config::LayoutConfig,
    error::StrategyFailure,
    resolve::OverlapStrategy,
    spacing::{self, OVERLAP_TOLERANCE},
};

/// Golden angle in radians, for coincident pairs.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Overlap-only repulsive iterations
#[derive(Debug, Clone)]
pub struct Repulsion {
    max_iterations: usize,
    strength: f32,
    check_interval: usize,
}

impl Repulsion {
    /// Creates a repulsion strategy with default parameters.
    pub fn new() -> Self {
        Self {
            max_iterations: 200,
            strength: 0.5,
            check_interval: 10,
        }
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for Repulsion {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlapStrategy for Repulsion {
    fn name(&self) -> &'static str {
        "repulsion"
    }

    fn resolve(
        &self,
        mut nodes: Vec<PositionedNode>,
        config: &LayoutConfig,
        deadline: &Deadline<'_>,
    ) -> Result<Vec<PositionedNode>, StrategyFailure> {
        let separation = config.node_separation();
        let half = separation / 2.0;

        for iteration in 1..=self.max_iterations {
            let pairs = spacing::overlapping_pairs(&nodes, separation);
            if pairs.is_empty() {
                trace!(iteration; "Repulsion cleared all overlaps");
                break;
            }

            let mut forces = vec![Point::default(); nodes.len()];
            for (i, j) in pairs {
                let Some(extent) = nodes[i]
                    .bounds()
                    .expand(half)
                    .intersection_extent(&nodes[j].bounds().expand(half), OVERLAP_TOLERANCE)
                else {
                    continue;
                };

                let delta = nodes[j].center().sub_point(nodes[i].center());
                let distance = delta.hypot();
                let direction = if distance < 0.01 {
                    let angle = GOLDEN_ANGLE * (i + j + 1) as f32;
                    Point::new(angle.cos(), angle.sin())
                } else {
                    delta.scale(1.0 / distance)
                };

                let depth = extent.width().min(extent.height());
                let push = direction.scale(self.strength * depth + 1.0);
                forces[i] = forces[i].sub_point(push);
                forces[j] = forces[j].add_point(push);
            }

            for (i, node) in nodes.iter_mut().enumerate() {
                if node.is_fixed() {
                    continue;
                }
                let moved = node.position().add_point(forces[i]);
                if !moved.is_finite() {
                    return Err(StrategyFailure::new(
                        self.name(),
                        format!("position of node `{}` is not finite", node.id()),
                    )
                    .in_phase(format!("iteration {iteration}")));
                }
                node.set_position(spacing::clamp_position(moved, node.size(), config));
            }

            if iteration % self.check_interval == 0 && deadline.expired() {
                trace!(iteration; "Repulsion deadline reached");
                break;
            }
        }

        Ok(nodes)
    }
}
