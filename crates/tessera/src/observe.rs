//! Structured observation of the layout pipeline.
//!
//! Strategies and the resolver report phase transitions, convergence, and
//! fallbacks as [`LayoutEvent`]s to a [`LayoutObserver`] passed by reference.
//! [`LogObserver`] forwards events to the `log` facade as key-value records;
//! callers that need metrics or test assertions provide their own observer.

use std::time::Duration;

use log::{debug, info, warn};

use crate::error::StrategyFailure;

/// A notable step of a layout call.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    /// A layout strategy started placing nodes.
    PlacementStarted {
        strategy: &'static str,
        nodes: usize,
        edges: usize,
    },

    /// A force simulation phase started.
    PhaseStarted {
        phase: &'static str,
        iterations: usize,
        multiplier: f32,
    },

    /// A force simulation phase finished.
    PhaseFinished {
        phase: &'static str,
        iterations: usize,
        overlaps: usize,
    },

    /// The force simulation reached zero overlaps.
    Converged { iterations: usize },

    /// A strategy stopped early because its deadline passed.
    DeadlineReached {
        strategy: &'static str,
        iterations: usize,
    },

    /// The layout strategy failed and was substituted by grid seeding.
    PlacementFailed {
        failure: StrategyFailure,
        substitute: &'static str,
    },

    /// A remediation strategy started.
    StrategyStarted {
        strategy: &'static str,
        overlaps: usize,
        budget: Duration,
    },

    /// A remediation strategy finished.
    StrategyFinished {
        strategy: &'static str,
        overlaps: usize,
        accepted: bool,
        elapsed: Duration,
    },

    /// A remediation strategy failed and the chain moved on.
    StrategyFailed { failure: StrategyFailure },

    /// The total resolution budget ran out before the chain was exhausted.
    BudgetExhausted { elapsed: Duration },

    /// The grid fallback was applied.
    FallbackApplied { overlaps: usize },
}

/// Receives layout events.
pub trait LayoutObserver: Send + Sync {
    /// Called for every event, in order.
    fn on_event(&self, event: &LayoutEvent);
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LayoutObserver for NoopObserver {
    fn on_event(&self, _event: &LayoutEvent) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl LayoutObserver for LogObserver {
    fn on_event(&self, event: &LayoutEvent) {
        match event {
            LayoutEvent::PlacementStarted {
                strategy,
                nodes,
                edges,
            } => debug!(strategy, nodes, edges; "Placing nodes"),
            LayoutEvent::PhaseStarted {
                phase,
                iterations,
                multiplier,
            } => debug!(phase, iterations, multiplier; "Force phase started"),
            LayoutEvent::PhaseFinished {
                phase,
                iterations,
                overlaps,
            } => debug!(phase, iterations, overlaps; "Force phase finished"),
            LayoutEvent::Converged { iterations } => {
                debug!(iterations; "Force simulation converged")
            }
            LayoutEvent::DeadlineReached {
                strategy,
                iterations,
            } => debug!(strategy, iterations; "Deadline reached"),
            LayoutEvent::PlacementFailed {
                failure,
                substitute,
            } => warn!(
                strategy = failure.strategy(),
                phase:? = failure.phase(),
                substitute;
                "Placement failed: {failure}"
            ),
            LayoutEvent::StrategyStarted {
                strategy,
                overlaps,
                budget,
            } => debug!(strategy, overlaps, budget:?; "Resolver strategy started"),
            LayoutEvent::StrategyFinished {
                strategy,
                overlaps,
                accepted,
                elapsed,
            } => debug!(strategy, overlaps, accepted, elapsed:?; "Resolver strategy finished"),
            LayoutEvent::StrategyFailed { failure } => warn!(
                strategy = failure.strategy(),
                phase:? = failure.phase();
                "Resolver strategy failed: {failure}"
            ),
            LayoutEvent::BudgetExhausted { elapsed } => {
                info!(elapsed:?; "Resolution budget exhausted")
            }
            LayoutEvent::FallbackApplied { overlaps } => {
                info!(overlaps; "Grid fallback applied")
            }
        }
    }
}
