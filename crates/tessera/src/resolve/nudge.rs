//! Minimum-displacement nudging.
//!
//! Each pass separates every overlapping pair along the axis of least
//! penetration, by just enough to clear the separation. The displacement is
//! split between the two nodes unless one of them is fixed.

use tessera_core::{geometry::Point, layout::PositionedNode};

use crate::{
    clock::Deadline,
    config::LayoutConfig,
    error::StrategyFailure,
    resolve::OverlapStrategy,
    spacing::{self, OVERLAP_TOLERANCE},
};

/// Extra distance added to every push so touching boxes end up clear of the
/// overlap tolerance.
const CLEARANCE: f32 = 0.5;

/// Pairwise minimum-displacement strategy
#[derive(Debug, Clone)]
pub struct Nudge {
    max_passes: usize,
}

impl Nudge {
    /// Creates a nudge strategy with the default pass limit.
    pub fn new() -> Self {
        Self { max_passes: 50 }
    }

    /// Sets the maximum number of passes.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Runs nudge passes until no overlap remains, the pass limit is hit, or
    /// the deadline passes.
    pub(super) fn run(
        &self,
        mut nodes: Vec<PositionedNode>,
        config: &LayoutConfig,
        deadline: &Deadline<'_>,
    ) -> Vec<PositionedNode> {
        let separation = config.node_separation();
        for _ in 0..self.max_passes {
            let pairs = spacing::overlapping_pairs(&nodes, separation);
            if pairs.is_empty() {
                break;
            }
            for (i, j) in pairs {
                separate(&mut nodes, i, j, config);
            }
            if deadline.expired() {
                break;
            }
        }
        nodes
    }
}

impl Default for Nudge {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlapStrategy for Nudge {
    fn name(&self) -> &'static str {
        "nudge"
    }

    fn resolve(
        &self,
        nodes: Vec<PositionedNode>,
        config: &LayoutConfig,
        deadline: &Deadline<'_>,
    ) -> Result<Vec<PositionedNode>, StrategyFailure> {
        Ok(self.run(nodes, config, deadline))
    }
}

/// Pushes nodes `i` and `j` apart along the axis of least penetration.
fn separate(nodes: &mut [PositionedNode], i: usize, j: usize, config: &LayoutConfig) {
    let half = config.node_separation() / 2.0;
    let Some(extent) = nodes[i]
        .bounds()
        .expand(half)
        .intersection_extent(&nodes[j].bounds().expand(half), OVERLAP_TOLERANCE)
    else {
        // An earlier push in this pass already cleared the pair
        return;
    };

    let delta = nodes[j].center().sub_point(nodes[i].center());
    // Coincident centers push `j` right or down
    let sign = |d: f32| if d < 0.0 { -1.0 } else { 1.0 };
    let push = if extent.width() <= extent.height() {
        Point::new(sign(delta.x()) * (extent.width() + CLEARANCE), 0.0)
    } else {
        Point::new(0.0, sign(delta.y()) * (extent.height() + CLEARANCE))
    };

    let (share_i, share_j) = match (nodes[i].is_fixed(), nodes[j].is_fixed()) {
        (false, false) => (0.5, 0.5),
        (true, false) => (0.0, 1.0),
        (false, true) => (1.0, 0.0),
        (true, true) => return,
    };

    let moved_i = nodes[i].position().sub_point(push.scale(share_i));
    let moved_j = nodes[j].position().add_point(push.scale(share_j));
    let (size_i, size_j) = (nodes[i].size(), nodes[j].size());
    nodes[i].set_position(spacing::clamp_position(moved_i, size_i, config));
    nodes[j].set_position(spacing::clamp_position(moved_j, size_j, config));
}

#[cfg(test)]
mod tests {
    use tessera_core::{
        geometry::Size,
        graph::{NodeDatum, PositionHint},
    };

    use super::*;
    use crate::clock::ManualClock;

    fn node(id: &str, x: f32, y: f32, fixed: bool) -> PositionedNode {
        let datum = NodeDatum::new(id, "").with_position(PositionHint { x, y, fixed });
        PositionedNode::new(&datum, Point::new(x, y), Size::new(100.0, 50.0))
    }

    #[test]
    fn test_pair_is_separated_along_shallow_axis() {
        let config = LayoutConfig::default().with_separation(20.0, 10.0);
        let clock = ManualClock::new();
        let nodes = vec![
            node("a", 400.0, 400.0, false),
            node("b", 480.0, 410.0, false),
        ];

        let nodes = Nudge::new()
            .resolve(nodes, &config, &Deadline::unbounded(&clock))
            .expect("nudge");

        assert_eq!(spacing::count_overlaps(&nodes, 20.0), 0);
        // Horizontal penetration was shallower, so y is untouched
        assert_eq!(nodes[0].position().y(), 400.0);
        assert_eq!(nodes[1].position().y(), 410.0);
        assert!(nodes[0].position().x() < 400.0);
        assert!(nodes[1].position().x() > 480.0);
    }

    #[test]
    fn test_fixed_node_stays_put() {
        let config = LayoutConfig::default();
        let clock = ManualClock::new();
        let nodes = vec![
            node("anchor", 400.0, 400.0, true),
            node("b", 410.0, 400.0, false),
        ];

        let nodes = Nudge::new()
            .resolve(nodes, &config, &Deadline::unbounded(&clock))
            .expect("nudge");

        assert_eq!(nodes[0].position(), Point::new(400.0, 400.0));
        assert_eq!(spacing::count_overlaps(&nodes, config.node_separation()), 0);
    }

    #[test]
    fn test_coincident_nodes_are_separated() {
        let config = LayoutConfig::default();
        let clock = ManualClock::new();
        let nodes: Vec<_> = (0..4)
            .map(|i| node(&format!("n{i}"), 600.0, 500.0, false))
            .collect();

        let nodes = Nudge::new()
            .resolve(nodes, &config, &Deadline::unbounded(&clock))
            .expect("nudge");

        assert_eq!(nodes.len(), 4);
        assert!(spacing::count_overlaps(&nodes, config.node_separation()) < 6);
    }

    #[test]
    fn test_expired_deadline_stops_after_one_pass() {
        let config = LayoutConfig::default();
        let clock = ManualClock::new();
        let deadline = Deadline::after(&clock, std::time::Duration::ZERO);
        let nodes: Vec<_> = (0..6)
            .map(|i| node(&format!("n{i}"), 600.0, 500.0, false))
            .collect();
        let original = nodes.clone();

        let one_pass = Nudge::new()
            .resolve(nodes.clone(), &config, &deadline)
            .expect("nudge");
        let limited = Nudge::new()
            .with_max_passes(1)
            .resolve(original, &config, &Deadline::unbounded(&clock))
            .expect("nudge");

        assert_eq!(one_pass, limited);
    }
}
