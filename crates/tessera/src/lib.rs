//! Tessera - bounded-time automatic diagram layout.
//!
//! Given the nodes and edges of a diagram, Tessera computes a readable 2-D
//! placement within a wall-clock budget. A layout strategy chosen by the
//! diagram kind produces initial positions, then an overlap resolver repairs
//! any remaining overlaps through a chain of increasingly disruptive
//! strategies, ending in a grid fallback that always succeeds. A layout call
//! only fails when the input graph itself is invalid.

pub mod clock;
pub mod config;
pub mod engines;
pub mod observe;
pub mod resolve;
pub mod spacing;
pub mod structure;

mod error;

pub use tessera_core::{geometry, graph, layout};

pub use error::{GraphError, LayoutError, StrategyFailure};

use std::{sync::Arc, time::Duration};

use log::{debug, info};
use serde::Serialize;

use clock::{Clock, Deadline, SystemClock};
use config::AppConfig;
use engines::{EngineSet, LayoutContext};
use graph::{DiagramKind, Scene};
use layout::Layout;
use observe::{LayoutObserver, LogObserver};
use resolve::{ResolveBudget, ResolveMetrics, Resolver};
use structure::SceneGraph;

/// Entry point for laying out scenes.
///
/// Holds the configuration, one layout strategy per diagram kind, and the
/// overlap resolver. A `Layouter` is immutable once built and can serve
/// concurrent calls.
///
/// # Examples
///
/// ```
/// use tessera::{
///     Layouter,
///     config::AppConfig,
///     graph::{DiagramKind, EdgeDatum, NodeDatum, Scene},
/// };
///
/// let scene = Scene::new(
///     DiagramKind::Flow,
///     vec![NodeDatum::new("a", "Start"), NodeDatum::new("b", "End")],
///     vec![EdgeDatum::new("a", "b")],
/// );
///
/// let layouter = Layouter::new(AppConfig::default());
/// let outcome = layouter.layout(&scene).expect("valid scene");
///
/// assert_eq!(outcome.layout().nodes().len(), 2);
/// assert!(outcome.metrics().success());
/// ```
pub struct Layouter {
    config: AppConfig,
    engines: EngineSet,
    resolver: Resolver,
    clock: Arc<dyn Clock>,
}

impl Default for Layouter {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Layouter {
    /// Create a new layouter with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Layout geometry and time budgets
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            engines: EngineSet::new(),
            resolver: Resolver::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the layout strategies.
    pub fn with_engines(mut self, engines: EngineSet) -> Self {
        self.engines = engines;
        self
    }

    /// Replace the overlap resolver. It is switched to this layouter's clock.
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver.with_clock(Arc::clone(&self.clock));
        self
    }

    /// Replace the clock used for every budget.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.resolver = self.resolver.with_clock(Arc::clone(&clock));
        self.clock = clock;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Lay out a scene, logging progress through the `log` facade.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidGraph`] when node ids are not unique, an
    /// edge references an unknown node, or the strategy for the scene's kind
    /// rejects a self-edge.
    pub fn layout(&self, scene: &Scene) -> Result<LayoutOutcome, LayoutError> {
        self.layout_observed(scene, &LogObserver)
    }

    /// Lay out a scene, reporting every step to `observer`.
    ///
    /// # Errors
    ///
    /// See [`Layouter::layout`].
    pub fn layout_observed(
        &self,
        scene: &Scene,
        observer: &dyn LayoutObserver,
    ) -> Result<LayoutOutcome, LayoutError> {
        let start = self.clock.now();
        let layout_config = self.config.layout();
        let engine = self.engines.engine(scene.kind);

        info!(
            kind = scene.kind.as_str(),
            engine = engine.name(),
            nodes = scene.nodes.len(),
            edges = scene.edges.len();
            "Laying out scene"
        );

        let graph = SceneGraph::new(&scene.nodes, &scene.edges)?;
        let deadline = Deadline::after(self.clock.as_ref(), self.config.resolver().layout_time());
        let ctx = LayoutContext::new(deadline, observer);
        let placed = engine.place_validated(&graph, layout_config, &ctx)?;
        debug!(engine = engine.name(); "Initial placement done");

        let resolution = self.resolver.resolve_with_router(
            placed,
            &scene.edges,
            layout_config,
            ResolveBudget::from(self.config.resolver()),
            observer,
            engine,
        );
        let (layout, success, resolution) = resolution.into_parts();
        let elapsed = self.clock.now().saturating_duration_since(start);

        info!(
            engine = engine.name(),
            success,
            overlaps = resolution.overlap_count(),
            resolved_by = resolution.resolved_by(),
            elapsed:?;
            "Layout complete"
        );

        Ok(LayoutOutcome {
            layout,
            metrics: LayoutMetrics {
                kind: scene.kind,
                engine: engine.name(),
                success,
                elapsed,
                resolution,
            },
        })
    }
}

/// Result of a layout call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOutcome {
    metrics: LayoutMetrics,
    layout: Layout,
}

impl LayoutOutcome {
    /// Returns the final layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Returns the layout metrics.
    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Consumes the outcome, returning the layout.
    pub fn into_layout(self) -> Layout {
        self.layout
    }
}

/// Observability data of a layout call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutMetrics {
    kind: DiagramKind,
    engine: &'static str,
    success: bool,
    #[serde(rename = "elapsed_ms", serialize_with = "resolve::serialize_millis")]
    elapsed: Duration,
    resolution: ResolveMetrics,
}

impl LayoutMetrics {
    /// Returns the diagram kind of the scene.
    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    /// Returns the name of the layout strategy used.
    pub fn engine(&self) -> &'static str {
        self.engine
    }

    /// Returns true when the final layout has no overlaps.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Returns the total wall-clock time of the call.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the overlap resolution metrics.
    pub fn resolution(&self) -> &ResolveMetrics {
        &self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        graph::{EdgeDatum, NodeDatum},
    };

    fn scene(kind: DiagramKind, count: usize) -> Scene {
        let nodes = (0..count)
            .map(|i| NodeDatum::new(format!("n{i}"), format!("Node {i}")))
            .collect();
        let edges = (1..count)
            .map(|i| EdgeDatum::new(format!("n{}", i - 1), format!("n{i}")))
            .collect();
        Scene::new(kind, nodes, edges)
    }

    #[test]
    fn test_every_kind_lays_out() {
        let layouter = Layouter::default().with_clock(Arc::new(ManualClock::new()));
        for kind in DiagramKind::ALL {
            let outcome = layouter.layout(&scene(kind, 6)).expect("valid scene");

            assert_eq!(outcome.layout().nodes().len(), 6, "{kind}");
            assert_eq!(outcome.layout().edges().len(), 5, "{kind}");
            assert!(outcome.metrics().success(), "{kind}");
            assert_eq!(outcome.metrics().kind(), kind);
        }
    }

    #[test]
    fn test_engine_matches_kind() {
        let layouter = Layouter::default();
        let outcome = layouter
            .layout(&scene(DiagramKind::Cycle, 3))
            .expect("valid scene");
        assert_eq!(outcome.metrics().engine(), "cyclic");
    }

    #[test]
    fn test_invalid_graph_propagates() {
        let mut scene = scene(DiagramKind::Network, 2);
        scene.nodes.push(NodeDatum::new("n0", "again"));

        let result = Layouter::default().layout(&scene);

        assert_eq!(
            result.unwrap_err(),
            LayoutError::InvalidGraph(GraphError::DuplicateNode("n0".to_string()))
        );
    }

    #[test]
    fn test_edges_follow_final_positions() {
        let outcome = Layouter::default()
            .layout(&scene(DiagramKind::Network, 4))
            .expect("valid scene");
        let layout = outcome.layout();

        for edge in layout.edges() {
            let source = layout.node(edge.source()).expect("source node");
            let target = layout.node(edge.target()).expect("target node");
            assert_eq!(edge.points().first(), Some(&source.center()));
            assert_eq!(edge.points().last(), Some(&target.center()));
        }
    }
}
