//! Error types for Tessera layout.
//!
//! Only [`LayoutError`] ever reaches the caller, and only for an invalid
//! input graph. [`StrategyFailure`] describes a single strategy giving up; it
//! is reported to the observer and absorbed by the caller of that strategy.

use thiserror::Error;

/// Validation failures of the input graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),

    #[error("edge {edge} references unknown node `{node}`")]
    UnknownEndpoint { edge: usize, node: String },

    #[error("edge {edge} is a self-edge on `{node}`, which the {strategy} strategy rejects")]
    SelfEdge {
        edge: usize,
        node: String,
        strategy: &'static str,
    },
}

/// The error type returned by layout calls.
///
/// The caller must supply a corrected graph; nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Invalid graph: {0}")]
    InvalidGraph(#[from] GraphError),
}

/// A single strategy failed to produce a placement.
///
/// Carries enough context to diagnose the failure: which strategy, in which
/// phase, and why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{strategy} strategy failed{}: {reason}", phase_suffix(.phase))]
pub struct StrategyFailure {
    strategy: String,
    phase: Option<String>,
    reason: String,
}

impl StrategyFailure {
    /// Creates a failure for `strategy` with a human-readable reason.
    pub fn new(strategy: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            phase: None,
            reason: reason.into(),
        }
    }

    /// Attaches the phase in which the failure happened.
    pub fn in_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    /// Returns the failing strategy name.
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Returns the phase in which the failure happened, if known.
    pub fn phase(&self) -> Option<&str> {
        self.phase.as_deref()
    }

    /// Returns the failure reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

fn phase_suffix(phase: &Option<String>) -> String {
    phase
        .as_ref()
        .map(|phase| format!(" during {phase}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_failure_display() {
        let plain = StrategyFailure::new("nudge", "boom");
        assert_eq!(plain.to_string(), "nudge strategy failed: boom");

        let phased = StrategyFailure::new("force", "position is not finite")
            .in_phase("separation iteration 12");
        assert_eq!(
            phased.to_string(),
            "force strategy failed during separation iteration 12: position is not finite"
        );
        assert_eq!(phased.phase(), Some("separation iteration 12"));
    }

    #[test]
    fn test_layout_error_from_graph_error() {
        let err: LayoutError = GraphError::DuplicateNode("a".to_string()).into();
        assert_eq!(err.to_string(), "Invalid graph: duplicate node id `a`");
    }
}
