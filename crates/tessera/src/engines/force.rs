//! Force-directed network layout engine
//!
//! Nodes start on a jittered grid and are then moved by a physics simulation
//! of pairwise repulsion and edge attraction. The simulation runs in three
//! sequential phases of decreasing strength (separation, structure,
//! refinement). Mixing them would let the strong early forces destabilize
//! the fine-tuning. Each step clamps the net force to a quarter of the node
//! spacing and then damps it, keeping the explicit integration stable.
//!
//! The overlap count is re-checked every few iterations; reaching zero ends
//! the simulation early (convergence). The deadline from the layout context
//! is polled at the same boundaries.

use log::trace;
use rand::{Rng, SeedableRng, rngs::StdRng};

use tessera_core::{geometry::Point, layout::PositionedNode};

use crate::{
    config::LayoutConfig,
    engines::{EdgeRouter, LayoutContext, LayoutStrategy},
    error::StrategyFailure,
    observe::LayoutEvent,
    spacing,
    structure::SceneGraph,
};

/// Golden angle in radians; spreads coincident pairs in distinct directions.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Centre distances below this are treated as coincident.
const MIN_DISTANCE: f32 = 0.01;

/// Cap on the `ideal / distance` amplification of close-range repulsion.
const MAX_REPULSION_RATIO: f32 = 10.0;

/// One stage of the force schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phase {
    name: &'static str,
    iterations: usize,
    multiplier: f32,
}

impl Phase {
    /// Pushes overlapping nodes apart aggressively.
    pub const SEPARATION: Phase = Phase::new("separation", 20, 2.0);
    /// Lets edge attraction settle the topology.
    pub const STRUCTURE: Phase = Phase::new("structure", 30, 1.0);
    /// Small corrective adjustments only.
    pub const REFINEMENT: Phase = Phase::new("refinement", 25, 0.5);

    /// Creates a phase running `iterations` steps with forces scaled by
    /// `multiplier`.
    pub const fn new(name: &'static str, iterations: usize, multiplier: f32) -> Self {
        Self {
            name,
            iterations,
            multiplier,
        }
    }

    /// Returns the phase name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the number of iterations in the phase.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the force multiplier of the phase.
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }
}

/// Outcome of a force simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceReport {
    converged: bool,
    iterations: usize,
    overlaps: usize,
    deadline_reached: bool,
}

impl ForceReport {
    /// Whether the overlap count reached zero.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Number of force iterations executed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Overlap count at the last check.
    pub fn overlaps(&self) -> usize {
        self.overlaps
    }

    /// Whether the simulation stopped because its deadline passed.
    pub fn deadline_reached(&self) -> bool {
        self.deadline_reached
    }
}

/// Force layout engine for network diagrams
pub struct Engine {
    phases: Vec<Phase>,
    damping: f32,
    attraction: f32,
    weak_repulsion: f32,
    check_interval: usize,
}

impl Engine {
    /// Create a new force layout engine with the default three-phase schedule
    pub fn new() -> Self {
        Self {
            phases: vec![Phase::SEPARATION, Phase::STRUCTURE, Phase::REFINEMENT],
            damping: 0.1,
            attraction: 0.5,
            weak_repulsion: 0.05,
            check_interval: 10,
        }
    }

    /// Set the phase schedule
    pub fn set_phases(&mut self, phases: Vec<Phase>) -> &mut Self {
        self.phases = phases;
        self
    }

    /// Set the damping applied to the clamped net force before it moves a
    /// node
    pub fn set_damping(&mut self, damping: f32) -> &mut Self {
        self.damping = damping;
        self
    }

    /// Set the spring constant for edge forces
    pub fn set_attraction(&mut self, attraction: f32) -> &mut Self {
        self.attraction = attraction;
        self
    }

    /// Set how many iterations run between overlap and deadline checks
    pub fn set_check_interval(&mut self, interval: usize) -> &mut Self {
        self.check_interval = interval.max(1);
        self
    }

    /// Run the simulation and report how it ended.
    ///
    /// # Errors
    ///
    /// Returns a [`StrategyFailure`] naming the phase and iteration in which
    /// a node position stopped being finite.
    pub fn simulate(
        &self,
        graph: &SceneGraph<'_>,
        config: &LayoutConfig,
        ctx: &LayoutContext<'_>,
    ) -> Result<(Vec<PositionedNode>, ForceReport), StrategyFailure> {
        let spacing =
            spacing::min_spacing(config.node_separation().max(1.0), graph.node_count());
        let separation = config.node_separation();
        let mut nodes = self.initialize_positions(graph, config, spacing);

        let mut report = ForceReport {
            converged: false,
            iterations: 0,
            overlaps: spacing::count_overlaps(&nodes, separation),
            deadline_reached: false,
        };
        if report.overlaps == 0 {
            report.converged = true;
            ctx.emit(LayoutEvent::Converged { iterations: 0 });
            return Ok((nodes, report));
        }

        'phases: for phase in &self.phases {
            ctx.emit(LayoutEvent::PhaseStarted {
                phase: phase.name,
                iterations: phase.iterations,
                multiplier: phase.multiplier,
            });

            for step in 1..=phase.iterations {
                if let Err(index) = self.apply_forces(&mut nodes, graph, config, spacing, phase) {
                    return Err(StrategyFailure::new(
                        self.name(),
                        format!("position of node `{}` is not finite", nodes[index].id()),
                    )
                    .in_phase(format!("{} iteration {step}", phase.name)));
                }
                report.iterations += 1;

                if step % self.check_interval != 0 && step != phase.iterations {
                    continue;
                }

                report.overlaps = spacing::count_overlaps(&nodes, separation);
                trace!(phase = phase.name, step, overlaps = report.overlaps; "Force checkpoint");

                if report.overlaps == 0 {
                    report.converged = true;
                } else if ctx.deadline().expired() {
                    report.deadline_reached = true;
                }

                if report.converged || report.deadline_reached {
                    ctx.emit(LayoutEvent::PhaseFinished {
                        phase: phase.name,
                        iterations: step,
                        overlaps: report.overlaps,
                    });
                    break 'phases;
                }
            }

            ctx.emit(LayoutEvent::PhaseFinished {
                phase: phase.name,
                iterations: phase.iterations,
                overlaps: report.overlaps,
            });
        }

        if report.converged {
            ctx.emit(LayoutEvent::Converged {
                iterations: report.iterations,
            });
        } else if report.deadline_reached {
            ctx.emit(LayoutEvent::DeadlineReached {
                strategy: self.name(),
                iterations: report.iterations,
            });
        }

        Ok((nodes, report))
    }

    /// Place nodes on a `ceil(sqrt(n))` square grid spanning the canvas and
    /// jitter them to break the grid symmetry
    fn initialize_positions(
        &self,
        graph: &SceneGraph<'_>,
        config: &LayoutConfig,
        spacing: f32,
    ) -> Vec<PositionedNode> {
        let mut rng = StdRng::seed_from_u64(config.effective_seed());
        let grid_size = (graph.node_count() as f32).sqrt().ceil().max(1.0);
        let usable = config.usable_size();
        let cell_width = usable.width() / grid_size;
        let cell_height = usable.height() / grid_size;
        let half_jitter = spacing / 2.0;
        let grid_size = grid_size as usize;

        graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, datum)| {
                let size = spacing::estimate_node_size(datum, config);
                let top_left = match datum.position() {
                    Some(hint) => hint.point(),
                    None => {
                        let center = Point::new(
                            config.margin_x() + cell_width * ((i % grid_size) as f32 + 0.5),
                            config.margin_y() + cell_height * ((i / grid_size) as f32 + 0.5),
                        );
                        let jitter = if half_jitter.is_finite() && half_jitter > 0.0 {
                            Point::new(
                                rng.random_range(-half_jitter..=half_jitter),
                                rng.random_range(-half_jitter..=half_jitter),
                            )
                        } else {
                            Point::default()
                        };
                        Point::new(
                            center.x() - size.width() / 2.0,
                            center.y() - size.height() / 2.0,
                        )
                        .add_point(jitter)
                    }
                };
                PositionedNode::new(datum, spacing::clamp_position(top_left, size, config), size)
            })
            .collect()
    }

    /// Run one force iteration. Returns the index of the first node whose
    /// new position is not finite.
    fn apply_forces(
        &self,
        nodes: &mut [PositionedNode],
        graph: &SceneGraph<'_>,
        config: &LayoutConfig,
        spacing: f32,
        phase: &Phase,
    ) -> Result<(), usize> {
        let mut forces = vec![Point::default(); nodes.len()];

        // Repulsion between every unordered pair
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let delta = nodes[i].center().sub_point(nodes[j].center());
                let mut distance = delta.hypot();
                let direction = if distance < MIN_DISTANCE {
                    distance = MIN_DISTANCE;
                    let angle = GOLDEN_ANGLE * (i + j + 1) as f32;
                    Point::new(angle.cos(), angle.sin())
                } else {
                    delta.scale(1.0 / distance)
                };

                let ideal =
                    spacing + (nodes[i].size().width() + nodes[j].size().width()) / 2.0;
                let magnitude = if distance < ideal {
                    (ideal - distance) * (ideal / distance).min(MAX_REPULSION_RATIO)
                } else if distance < 2.0 * ideal {
                    (2.0 * ideal - distance) * self.weak_repulsion
                } else {
                    0.0
                };

                let force = direction.scale(magnitude);
                forces[i] = forces[i].add_point(force);
                forces[j] = forces[j].sub_point(force);
            }
        }

        // Attraction along edges; centres at the ideal edge length are at rest
        let ideal_edge_length = 2.0 * spacing;
        for &(source, target) in graph.endpoints() {
            if source == target {
                continue;
            }
            let delta = nodes[target].center().sub_point(nodes[source].center());
            let distance = delta.hypot();
            if distance < MIN_DISTANCE {
                continue;
            }
            let pull = delta.scale(self.attraction * (distance - ideal_edge_length) / distance);
            forces[source] = forces[source].add_point(pull);
            forces[target] = forces[target].sub_point(pull);
        }

        let max_step = spacing / 4.0;
        for (i, node) in nodes.iter_mut().enumerate() {
            if node.is_fixed() {
                continue;
            }
            let step = forces[i]
                .scale(phase.multiplier)
                .clamp_length(max_step)
                .scale(self.damping);
            let moved = node.position().add_point(step);
            if !moved.is_finite() {
                return Err(i);
            }
            node.set_position(spacing::clamp_position(moved, node.size(), config));
        }

        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeRouter for Engine {}

impl LayoutStrategy for Engine {
    fn name(&self) -> &'static str {
        "force"
    }

    fn place(
        &self,
        graph: &SceneGraph<'_>,
        config: &LayoutConfig,
        ctx: &LayoutContext<'_>,
    ) -> Result<Vec<PositionedNode>, StrategyFailure> {
        self.simulate(graph, config, ctx).map(|(nodes, _)| nodes)
    }
}
