//! Overlap resolution under a time budget.
//!
//! The [`Resolver`] runs an ordered chain of [`OverlapStrategy`]s over a
//! placed layout, lowest disruption first. Each strategy gets its own
//! deadline, bounded by both the per-strategy and the remaining total
//! budget. A strategy's output is only accepted when it does not increase
//! the overlap count, so the result never gets worse than the input. When
//! overlaps remain after the chain, the terminal [`GridFallback`] re-lays
//! every node on a non-overlapping grid.
//!
//! Resolution never fails. Strategy failures and panics are reported to the
//! observer and the chain moves on; running out of time is reported through
//! [`ResolveMetrics::budget_exhausted`].

mod grid;
mod nudge;
mod repulsion;
mod spread;

pub use grid::GridFallback;
pub use nudge::Nudge;
pub use repulsion::Repulsion;
pub use spread::Spread;

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::Duration,
};

use serde::{Serialize, Serializer};

use tessera_core::{
    graph::EdgeDatum,
    layout::{Layout, PositionedNode},
};

use crate::{
    clock::{Clock, Deadline, SystemClock},
    config::{LayoutConfig, ResolverConfig},
    engines::{EdgeRouter, StraightRouter},
    error::StrategyFailure,
    observe::{LayoutEvent, LayoutObserver},
    spacing,
};

/// Name reported in [`ResolveMetrics::resolved_by`] when the input already
/// had the fewest overlaps.
pub const INITIAL: &str = "initial";

/// A remediation algorithm in the resolver chain.
pub trait OverlapStrategy: Send + Sync {
    /// Short name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Moves `nodes` to reduce overlaps, returning every node in input order.
    ///
    /// Implementations poll `deadline` at iteration boundaries and return
    /// their best effort once it has passed.
    ///
    /// # Errors
    ///
    /// Returns a [`StrategyFailure`] when the strategy cannot continue, e.g.
    /// on diverging numerical state.
    fn resolve(
        &self,
        nodes: Vec<PositionedNode>,
        config: &LayoutConfig,
        deadline: &Deadline<'_>,
    ) -> Result<Vec<PositionedNode>, StrategyFailure>;
}

/// Time limits for one resolution call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveBudget {
    max_time_per_strategy: Duration,
    max_total_time: Duration,
}

impl ResolveBudget {
    /// Creates a budget from the per-strategy and total limits.
    pub fn new(max_time_per_strategy: Duration, max_total_time: Duration) -> Self {
        Self {
            max_time_per_strategy,
            max_total_time,
        }
    }

    /// Returns the time limit of a single strategy.
    pub fn max_time_per_strategy(&self) -> Duration {
        self.max_time_per_strategy
    }

    /// Returns the time limit of the whole chain.
    pub fn max_total_time(&self) -> Duration {
        self.max_total_time
    }
}

impl Default for ResolveBudget {
    fn default() -> Self {
        Self::from(&ResolverConfig::default())
    }
}

impl From<&ResolverConfig> for ResolveBudget {
    fn from(config: &ResolverConfig) -> Self {
        Self::new(config.max_time_per_strategy(), config.max_total_time())
    }
}

/// How a single strategy run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyOutcome {
    /// Reached zero overlaps.
    Resolved,
    /// Reduced the overlap count.
    Improved,
    /// Ran but did not reduce the overlap count.
    NoImprovement,
    /// Returned an error or panicked.
    Failed,
}

/// Report of one strategy run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyReport {
    name: &'static str,
    outcome: StrategyOutcome,
    accepted: bool,
    overlaps_after: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    elapsed: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<String>,
}

impl StrategyReport {
    fn failed(name: &'static str, failure: &StrategyFailure, overlaps_after: usize) -> Self {
        Self {
            name,
            outcome: StrategyOutcome::Failed,
            accepted: false,
            overlaps_after,
            elapsed: Duration::ZERO,
            failure: Some(failure.to_string()),
        }
    }

    /// Returns the strategy name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns how the run ended.
    pub fn outcome(&self) -> StrategyOutcome {
        self.outcome
    }

    /// Returns true when the strategy output replaced the current best.
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// Returns the best overlap count after the run.
    pub fn overlaps_after(&self) -> usize {
        self.overlaps_after
    }

    /// Returns the wall-clock time the run took.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the failure message of a failed run.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

/// Observability data of one resolution call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveMetrics {
    overlap_count: usize,
    initial_overlaps: usize,
    resolved_by: &'static str,
    budget_exhausted: bool,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    elapsed: Duration,
    strategies: Vec<StrategyReport>,
}

impl ResolveMetrics {
    fn empty() -> Self {
        Self {
            overlap_count: 0,
            initial_overlaps: 0,
            resolved_by: INITIAL,
            budget_exhausted: false,
            elapsed: Duration::ZERO,
            strategies: Vec::new(),
        }
    }

    /// Returns the number of overlapping pairs left in the result.
    pub fn overlap_count(&self) -> usize {
        self.overlap_count
    }

    /// Returns the number of overlapping pairs in the input.
    pub fn initial_overlaps(&self) -> usize {
        self.initial_overlaps
    }

    /// Returns the name of the strategy that produced the result, or
    /// [`INITIAL`] if no strategy output was accepted.
    pub fn resolved_by(&self) -> &'static str {
        self.resolved_by
    }

    /// Returns true when the total budget ran out before the chain finished.
    pub fn budget_exhausted(&self) -> bool {
        self.budget_exhausted
    }

    /// Returns the total wall-clock time of the call.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns one report per strategy that ran, in chain order.
    pub fn strategies(&self) -> &[StrategyReport] {
        &self.strategies
    }
}

/// Result of a resolution call.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    layout: Layout,
    success: bool,
    metrics: ResolveMetrics,
}

impl Resolution {
    /// Returns the resolved layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Returns true when no overlaps remain.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Returns the resolution metrics.
    pub fn metrics(&self) -> &ResolveMetrics {
        &self.metrics
    }

    /// Splits the resolution into its layout and metrics.
    pub fn into_parts(self) -> (Layout, bool, ResolveMetrics) {
        (self.layout, self.success, self.metrics)
    }
}

/// Runs the overlap strategy chain.
///
/// The chain is fixed at construction, and budgets are passed per call, so
/// one resolver can serve concurrent calls.
///
/// # Examples
///
/// ```
/// # use tessera::{
/// #     config::LayoutConfig,
/// #     geometry::{Point, Size},
/// #     graph::NodeDatum,
/// #     layout::PositionedNode,
/// #     observe::NoopObserver,
/// #     resolve::{ResolveBudget, Resolver},
/// # };
/// let config = LayoutConfig::default();
/// let nodes: Vec<_> = ["a", "b", "c"]
///     .iter()
///     .map(|id| {
///         PositionedNode::new(
///             &NodeDatum::new(*id, *id),
///             Point::new(100.0, 100.0),
///             Size::new(120.0, 60.0),
///         )
///     })
///     .collect();
///
/// let resolution = Resolver::new().resolve(
///     nodes,
///     &[],
///     &config,
///     ResolveBudget::default(),
///     &NoopObserver,
/// );
///
/// assert!(resolution.success());
/// assert_eq!(resolution.layout().nodes().len(), 3);
/// ```
pub struct Resolver {
    strategies: Vec<Box<dyn OverlapStrategy>>,
    fallback: GridFallback,
    clock: Arc<dyn Clock>,
}

impl Resolver {
    /// Creates the default chain (nudge, repulsion, spread) on the system
    /// clock.
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(Nudge::new()),
                Box::new(Repulsion::new()),
                Box::new(Spread::new()),
            ],
            fallback: GridFallback::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the strategy chain. The grid fallback always stays last.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn OverlapStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Replaces the clock used for budgets.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the strategy names in chain order, ending with the fallback.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies
            .iter()
            .map(|strategy| strategy.name())
            .chain(std::iter::once(GridFallback::NAME))
            .collect()
    }

    /// Resolves overlaps and routes edges as straight lines.
    pub fn resolve(
        &self,
        nodes: Vec<PositionedNode>,
        edges: &[EdgeDatum],
        config: &LayoutConfig,
        budget: ResolveBudget,
        observer: &dyn LayoutObserver,
    ) -> Resolution {
        self.resolve_with_router(nodes, edges, config, budget, observer, &StraightRouter)
    }

    /// Resolves overlaps and routes edges with `router` once positions are
    /// final.
    pub fn resolve_with_router(
        &self,
        nodes: Vec<PositionedNode>,
        edges: &[EdgeDatum],
        config: &LayoutConfig,
        budget: ResolveBudget,
        observer: &dyn LayoutObserver,
        router: &dyn EdgeRouter,
    ) -> Resolution {
        if nodes.is_empty() {
            return Resolution {
                layout: Layout::empty(config.canvas()),
                success: true,
                metrics: ResolveMetrics::empty(),
            };
        }

        let start = self.clock.now();
        let separation = config.node_separation();

        let mut best = nodes;
        spacing::clamp_to_canvas(&mut best, config);
        let initial_overlaps = spacing::count_overlaps(&best, separation);

        let mut metrics = ResolveMetrics {
            initial_overlaps,
            overlap_count: initial_overlaps,
            ..ResolveMetrics::empty()
        };

        for strategy in &self.strategies {
            if metrics.overlap_count == 0 {
                break;
            }

            let elapsed = self.clock.now().saturating_duration_since(start);
            if elapsed >= budget.max_total_time {
                metrics.budget_exhausted = true;
                observer.on_event(&LayoutEvent::BudgetExhausted { elapsed });
                break;
            }
            let allowance = budget
                .max_time_per_strategy
                .min(budget.max_total_time - elapsed);

            observer.on_event(&LayoutEvent::StrategyStarted {
                strategy: strategy.name(),
                overlaps: metrics.overlap_count,
                budget: allowance,
            });

            let began = self.clock.now();
            let deadline = Deadline::after(self.clock.as_ref(), allowance);
            let attempt = run_guarded(strategy.as_ref(), best.clone(), config, &deadline);
            let took = self.clock.now().saturating_duration_since(began);

            let report = match attempt.and_then(|candidate| {
                self.accept(strategy.name(), candidate, &mut best, &mut metrics, config)
            }) {
                Ok(report) => {
                    observer.on_event(&LayoutEvent::StrategyFinished {
                        strategy: strategy.name(),
                        overlaps: metrics.overlap_count,
                        accepted: report.accepted,
                        elapsed: took,
                    });
                    report
                }
                Err(failure) => {
                    let report =
                        StrategyReport::failed(strategy.name(), &failure, metrics.overlap_count);
                    observer.on_event(&LayoutEvent::StrategyFailed { failure });
                    report
                }
            };
            metrics.strategies.push(StrategyReport {
                elapsed: took,
                ..report
            });
        }

        if metrics.overlap_count > 0 {
            let began = self.clock.now();
            let candidate = self.fallback.apply(best.clone(), config);
            let report = self
                .accept(GridFallback::NAME, candidate, &mut best, &mut metrics, config)
                .unwrap_or_else(|failure| {
                    StrategyReport::failed(GridFallback::NAME, &failure, metrics.overlap_count)
                });
            observer.on_event(&LayoutEvent::FallbackApplied {
                overlaps: metrics.overlap_count,
            });
            metrics.strategies.push(StrategyReport {
                elapsed: self.clock.now().saturating_duration_since(began),
                ..report
            });
        }

        metrics.elapsed = self.clock.now().saturating_duration_since(start);

        let edges = router.route_edges(&best, edges, config);
        Resolution {
            layout: Layout::new(config.canvas(), best, edges),
            success: metrics.overlap_count == 0,
            metrics,
        }
    }

    /// Accepts `candidate` into `best` when it does not increase the overlap
    /// count, and reports how the strategy did.
    fn accept(
        &self,
        name: &'static str,
        mut candidate: Vec<PositionedNode>,
        best: &mut Vec<PositionedNode>,
        metrics: &mut ResolveMetrics,
        config: &LayoutConfig,
    ) -> Result<StrategyReport, StrategyFailure> {
        if candidate.len() != best.len() {
            return Err(StrategyFailure::new(
                name,
                format!("returned {} nodes for {}", candidate.len(), best.len()),
            ));
        }

        spacing::clamp_to_canvas(&mut candidate, config);
        let overlaps = spacing::count_overlaps(&candidate, config.node_separation());
        let before = metrics.overlap_count;
        let accepted = overlaps <= before;

        if accepted {
            *best = candidate;
            metrics.overlap_count = overlaps;
            metrics.resolved_by = name;
        }

        let outcome = if accepted && overlaps == 0 {
            StrategyOutcome::Resolved
        } else if overlaps < before {
            StrategyOutcome::Improved
        } else {
            StrategyOutcome::NoImprovement
        };

        Ok(StrategyReport {
            name,
            outcome,
            accepted,
            overlaps_after: metrics.overlap_count,
            elapsed: Duration::ZERO,
            failure: None,
        })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `strategy`, turning a panic into a [`StrategyFailure`].
fn run_guarded(
    strategy: &dyn OverlapStrategy,
    nodes: Vec<PositionedNode>,
    config: &LayoutConfig,
    deadline: &Deadline<'_>,
) -> Result<Vec<PositionedNode>, StrategyFailure> {
    panic::catch_unwind(AssertUnwindSafe(|| strategy.resolve(nodes, config, deadline)))
        .unwrap_or_else(|payload| {
            Err(StrategyFailure::new(
                strategy.name(),
                format!("panicked: {}", panic_message(payload.as_ref())),
            ))
        })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload")
}

pub(crate) fn serialize_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tessera_core::{
        geometry::{Point, Size},
        graph::NodeDatum,
    };

    use super::*;
    use crate::{clock::ManualClock, observe::NoopObserver};

    struct AlwaysFails;

    impl OverlapStrategy for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }

        fn resolve(
            &self,
            _nodes: Vec<PositionedNode>,
            _config: &LayoutConfig,
            _deadline: &Deadline<'_>,
        ) -> Result<Vec<PositionedNode>, StrategyFailure> {
            Err(StrategyFailure::new(self.name(), "intentional").in_phase("setup"))
        }
    }

    struct Panics;

    impl OverlapStrategy for Panics {
        fn name(&self) -> &'static str {
            "panics"
        }

        fn resolve(
            &self,
            _nodes: Vec<PositionedNode>,
            _config: &LayoutConfig,
            _deadline: &Deadline<'_>,
        ) -> Result<Vec<PositionedNode>, StrategyFailure> {
            panic!("strategy blew up")
        }
    }

    /// Moves every node to one spot, making things worse.
    struct Collapse;

    impl OverlapStrategy for Collapse {
        fn name(&self) -> &'static str {
            "collapse"
        }

        fn resolve(
            &self,
            mut nodes: Vec<PositionedNode>,
            _config: &LayoutConfig,
            _deadline: &Deadline<'_>,
        ) -> Result<Vec<PositionedNode>, StrategyFailure> {
            for node in &mut nodes {
                node.set_position(Point::new(500.0, 500.0));
            }
            Ok(nodes)
        }
    }

    /// Burns a fixed amount of manual time.
    struct Slow(Arc<ManualClock>, Duration);

    impl OverlapStrategy for Slow {
        fn name(&self) -> &'static str {
            "slow"
        }

        fn resolve(
            &self,
            nodes: Vec<PositionedNode>,
            _config: &LayoutConfig,
            _deadline: &Deadline<'_>,
        ) -> Result<Vec<PositionedNode>, StrategyFailure> {
            self.0.advance(self.1);
            Ok(nodes)
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<LayoutEvent>>);

    impl LayoutObserver for Recorder {
        fn on_event(&self, event: &LayoutEvent) {
            if let Ok(mut events) = self.0.lock() {
                events.push(event.clone());
            }
        }
    }

    fn stacked(count: usize) -> Vec<PositionedNode> {
        (0..count)
            .map(|i| {
                PositionedNode::new(
                    &NodeDatum::new(format!("n{i}"), format!("N{i}")),
                    Point::new(300.0 + i as f32, 300.0),
                    Size::new(120.0, 60.0),
                )
            })
            .collect()
    }

    fn budget(per_ms: u64, total_ms: u64) -> ResolveBudget {
        ResolveBudget::new(
            Duration::from_millis(per_ms),
            Duration::from_millis(total_ms),
        )
    }

    #[test]
    fn test_empty_input_succeeds_immediately() {
        let resolution = Resolver::new().resolve(
            Vec::new(),
            &[EdgeDatum::new("a", "b")],
            &LayoutConfig::default(),
            budget(10, 30),
            &NoopObserver,
        );

        assert!(resolution.success());
        assert!(resolution.layout().is_empty());
        assert!(resolution.layout().edges().is_empty());
        assert!(resolution.metrics().strategies().is_empty());
    }

    #[test]
    fn test_non_overlapping_input_is_untouched() {
        let config = LayoutConfig::default();
        let nodes: Vec<_> = (0..3)
            .map(|i| {
                PositionedNode::new(
                    &NodeDatum::new(format!("n{i}"), ""),
                    Point::new(100.0 + 300.0 * i as f32, 100.0),
                    Size::new(120.0, 60.0),
                )
            })
            .collect();

        let resolution =
            Resolver::new().resolve(nodes.clone(), &[], &config, budget(10, 30), &NoopObserver);

        assert!(resolution.success());
        assert_eq!(resolution.layout().nodes(), nodes.as_slice());
        assert_eq!(resolution.metrics().resolved_by(), INITIAL);
        assert!(resolution.metrics().strategies().is_empty());
    }

    #[test]
    fn test_failing_strategy_does_not_stop_the_chain() {
        let recorder = Recorder::default();
        let resolver = Resolver::new()
            .with_strategies(vec![Box::new(AlwaysFails), Box::new(Nudge::new())])
            .with_clock(Arc::new(ManualClock::new()));

        let resolution = resolver.resolve(
            stacked(5),
            &[],
            &LayoutConfig::default(),
            budget(10, 30),
            &recorder,
        );

        assert!(resolution.success());
        let reports = resolution.metrics().strategies();
        assert_eq!(reports[0].name(), "always-fails");
        assert_eq!(reports[0].outcome(), StrategyOutcome::Failed);
        assert!(reports[0].failure().is_some_and(|f| f.contains("during setup")));
        assert_eq!(reports[1].name(), "nudge");

        let events = recorder.0.lock().expect("events");
        assert!(
            events
                .iter()
                .any(|event| matches!(event, LayoutEvent::StrategyFailed { .. }))
        );
    }

    #[test]
    fn test_panicking_strategy_is_contained() {
        let resolver = Resolver::new()
            .with_strategies(vec![Box::new(Panics)])
            .with_clock(Arc::new(ManualClock::new()));

        let resolution = resolver.resolve(
            stacked(4),
            &[],
            &LayoutConfig::default(),
            budget(10, 30),
            &NoopObserver,
        );

        assert!(resolution.success());
        let reports = resolution.metrics().strategies();
        assert_eq!(reports[0].outcome(), StrategyOutcome::Failed);
        assert!(
            reports[0]
                .failure()
                .is_some_and(|f| f.contains("strategy blew up"))
        );
        assert_eq!(resolution.metrics().resolved_by(), GridFallback::NAME);
    }

    #[test]
    fn test_worse_output_is_rejected() {
        let config = LayoutConfig::default();
        let mut nodes = stacked(2);
        nodes.push(PositionedNode::new(
            &NodeDatum::new("far", ""),
            Point::new(1500.0, 800.0),
            Size::new(120.0, 60.0),
        ));
        let resolver = Resolver::new()
            .with_strategies(vec![Box::new(Collapse)])
            .with_clock(Arc::new(ManualClock::new()));

        let resolution = resolver.resolve(nodes, &[], &config, budget(10, 30), &NoopObserver);

        let report = &resolution.metrics().strategies()[0];
        assert_eq!(report.outcome(), StrategyOutcome::NoImprovement);
        assert_eq!(report.overlaps_after(), 1);
        assert_eq!(resolution.metrics().initial_overlaps(), 1);
        assert_eq!(resolution.metrics().overlap_count(), 0);
    }

    #[test]
    fn test_total_budget_stops_the_chain() {
        let clock = Arc::new(ManualClock::new());
        let recorder = Recorder::default();
        let resolver = Resolver::new()
            .with_strategies(vec![
                Box::new(Slow(clock.clone(), Duration::from_millis(40))),
                Box::new(Nudge::new()),
            ])
            .with_clock(clock);

        let resolution = resolver.resolve(
            stacked(3),
            &[],
            &LayoutConfig::default(),
            budget(10, 30),
            &recorder,
        );

        assert!(resolution.metrics().budget_exhausted());
        let names: Vec<_> = resolution
            .metrics()
            .strategies()
            .iter()
            .map(StrategyReport::name)
            .collect();
        assert_eq!(names, vec!["slow", "grid"]);
        assert!(resolution.success());

        let events = recorder.0.lock().expect("events");
        assert!(
            events
                .iter()
                .any(|event| matches!(event, LayoutEvent::BudgetExhausted { .. }))
        );
        assert!(
            events
                .iter()
                .any(|event| matches!(event, LayoutEvent::FallbackApplied { overlaps: 0 }))
        );
    }

    #[test]
    fn test_strategy_budget_is_capped_by_remaining_total() {
        let clock = Arc::new(ManualClock::new());
        let recorder = Recorder::default();
        let resolver = Resolver::new()
            .with_strategies(vec![
                Box::new(Slow(clock.clone(), Duration::from_millis(25))),
                Box::new(AlwaysFails),
            ])
            .with_clock(clock);

        resolver.resolve(
            stacked(3),
            &[],
            &LayoutConfig::default(),
            budget(20, 30),
            &recorder,
        );

        let events = recorder.0.lock().expect("events");
        let budgets: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                LayoutEvent::StrategyStarted { budget, .. } => Some(*budget),
                _ => None,
            })
            .collect();
        assert_eq!(
            budgets,
            vec![Duration::from_millis(20), Duration::from_millis(5)]
        );
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(
            Resolver::new().strategy_names(),
            vec!["nudge", "repulsion", "spread", "grid"]
        );
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
