//! Geometry utilities shared by layout strategies and the overlap resolver.
//!
//! Overlap is measured on node boxes expanded by half the configured node
//! separation, so two nodes "overlap" whenever the gap between them is
//! smaller than the separation.

use unicode_width::UnicodeWidthStr;

use tessera_core::{
    geometry::{Point, Size},
    graph::NodeDatum,
    layout::PositionedNode,
};

use crate::config::LayoutConfig;

/// Intersections thinner than this are treated as touching.
pub const OVERLAP_TOLERANCE: f32 = 1e-3;

/// Approximate advance of one terminal column of label text.
const CHAR_WIDTH: f32 = 8.0;

/// Horizontal padding around a label inside its node.
const LABEL_PADDING: f32 = 24.0;

/// Target inter-node spacing for `node_count` nodes.
///
/// Grows sub-linearly with density so dense graphs do not explode the canvas
/// and small graphs are not over-spaced.
///
/// # Examples
///
/// ```
/// # use tessera::spacing::min_spacing;
/// assert_eq!(min_spacing(50.0, 4), 50.0);
/// assert_eq!(min_spacing(50.0, 40), 100.0);
/// ```
pub fn min_spacing(base: f32, node_count: usize) -> f32 {
    base.max(base * (node_count as f32 / 10.0).sqrt())
}

/// Estimated rendered width of a label.
pub fn estimate_label_width(label: &str) -> f32 {
    if label.is_empty() {
        return 0.0;
    }
    label.width() as f32 * CHAR_WIDTH + LABEL_PADDING
}

/// Estimated size of a node: wide enough for its label, never smaller than
/// the configured default, scaled by its importance weight.
pub fn estimate_node_size(node: &NodeDatum, config: &LayoutConfig) -> Size {
    let default = config.node_size();
    let width = default.width().max(estimate_label_width(node.label()));
    let scale = node
        .metadata()
        .weight
        .filter(|weight| weight.is_finite())
        .map(|weight| weight.clamp(0.5, 2.0).sqrt())
        .unwrap_or(1.0);
    Size::new(width * scale, default.height() * scale)
}

/// Returns true if two nodes are closer than `separation`.
pub fn overlaps(a: &PositionedNode, b: &PositionedNode, separation: f32) -> bool {
    let half = separation / 2.0;
    a.bounds()
        .expand(half)
        .intersects(&b.bounds().expand(half), OVERLAP_TOLERANCE)
}

/// Returns every overlapping pair `(i, j)` with `i < j`.
pub fn overlapping_pairs(nodes: &[PositionedNode], separation: f32) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if overlaps(&nodes[i], &nodes[j], separation) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Counts overlapping node pairs.
pub fn count_overlaps(nodes: &[PositionedNode], separation: f32) -> usize {
    let mut count = 0;
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if overlaps(&nodes[i], &nodes[j], separation) {
                count += 1;
            }
        }
    }
    count
}

/// Clamps `value` into `[lo, hi]`, preferring `lo` when the range is empty
/// or not a number.
pub fn clamp_axis(value: f32, lo: f32, hi: f32) -> f32 {
    if hi >= lo {
        value.clamp(lo, hi)
    } else {
        lo
    }
}

/// Clamps a top-left position so a box of `size` stays inside the margins.
pub fn clamp_position(position: Point, size: Size, config: &LayoutConfig) -> Point {
    Point::new(
        clamp_axis(
            position.x(),
            config.margin_x(),
            config.width() - config.margin_x() - size.width(),
        ),
        clamp_axis(
            position.y(),
            config.margin_y(),
            config.height() - config.margin_y() - size.height(),
        ),
    )
}

/// Clamps every node into the canvas margins.
///
/// Non-finite positions are reset to the top-left margin corner.
pub fn clamp_to_canvas(nodes: &mut [PositionedNode], config: &LayoutConfig) {
    for node in nodes {
        let position = if node.position().is_finite() {
            node.position()
        } else {
            Point::new(config.margin_x(), config.margin_y())
        };
        node.set_position(clamp_position(position, node.size(), config));
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use tessera_core::graph::NodeMetadata;

    use super::*;

    fn node_at(id: &str, x: f32, y: f32) -> PositionedNode {
        PositionedNode::new(
            &NodeDatum::new(id, id),
            Point::new(x, y),
            Size::new(100.0, 50.0),
        )
    }

    #[test]
    fn test_min_spacing_grows_sublinearly() {
        assert_approx_eq!(f32, min_spacing(50.0, 0), 50.0);
        assert_approx_eq!(f32, min_spacing(50.0, 10), 50.0);
        assert_approx_eq!(f32, min_spacing(50.0, 90), 150.0);
    }

    #[test]
    fn test_estimate_label_width_uses_display_columns() {
        assert_approx_eq!(f32, estimate_label_width(""), 0.0);
        assert_approx_eq!(f32, estimate_label_width("abcd"), 4.0 * 8.0 + 24.0);
        // Wide CJK characters take two columns each.
        assert_approx_eq!(f32, estimate_label_width("日本"), 4.0 * 8.0 + 24.0);
    }

    #[test]
    fn test_estimate_node_size() {
        let config = LayoutConfig::default().with_node_size(120.0, 60.0);

        let short = NodeDatum::new("a", "A");
        assert_eq!(estimate_node_size(&short, &config), Size::new(120.0, 60.0));

        let long = NodeDatum::new("b", "a rather long label for a node");
        let size = estimate_node_size(&long, &config);
        assert!(size.width() > 120.0);
        assert_approx_eq!(f32, size.height(), 60.0);

        let heavy = NodeDatum::new("c", "C").with_metadata(NodeMetadata {
            weight: Some(4.0),
            ..NodeMetadata::default()
        });
        let size = estimate_node_size(&heavy, &config);
        assert_approx_eq!(f32, size.width(), 120.0 * 2.0f32.sqrt());
    }

    #[test]
    fn test_overlap_accounts_for_separation() {
        let a = node_at("a", 0.0, 0.0);
        let touching = node_at("b", 100.0, 0.0);
        let spaced = node_at("c", 120.0, 0.0);

        assert!(!overlaps(&a, &touching, 0.0));
        assert!(overlaps(&a, &touching, 10.0));
        assert!(!overlaps(&a, &spaced, 20.0));
        assert!(overlaps(&a, &spaced, 21.0));
    }

    #[test]
    fn test_count_overlaps() {
        let nodes = vec![
            node_at("a", 0.0, 0.0),
            node_at("b", 10.0, 10.0),
            node_at("c", 20.0, 20.0),
            node_at("d", 500.0, 500.0),
        ];

        assert_eq!(count_overlaps(&nodes, 10.0), 3);
        assert_eq!(overlapping_pairs(&nodes, 10.0), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_clamp_to_canvas() {
        let config = LayoutConfig::default()
            .with_canvas(400.0, 300.0)
            .with_margins(10.0, 20.0);
        let mut nodes = vec![
            node_at("a", -50.0, 1000.0),
            node_at("b", f32::NAN, 30.0),
        ];

        clamp_to_canvas(&mut nodes, &config);

        assert_eq!(nodes[0].position(), Point::new(10.0, 230.0));
        assert_eq!(nodes[1].position(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_clamp_axis_empty_range() {
        assert_approx_eq!(f32, clamp_axis(5.0, 10.0, 0.0), 10.0);
        assert_approx_eq!(f32, clamp_axis(5.0, 0.0, 10.0), 5.0);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn nodes_strategy() -> impl Strategy<Value = Vec<PositionedNode>> {
        prop::collection::vec(
            (-500.0f32..2500.0, -500.0f32..1500.0, 1.0f32..300.0, 1.0f32..150.0),
            0..16,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (x, y, w, h))| {
                    PositionedNode::new(
                        &NodeDatum::new(format!("n{i}"), ""),
                        Point::new(x, y),
                        Size::new(w, h),
                    )
                })
                .collect()
        })
    }

    /// Overlap is symmetric and counting agrees with pair listing.
    fn check_overlap_count_matches_pairs(
        nodes: Vec<PositionedNode>,
        separation: f32,
    ) -> Result<(), TestCaseError> {
        for a in &nodes {
            for b in &nodes {
                prop_assert_eq!(overlaps(a, b, separation), overlaps(b, a, separation));
            }
        }
        prop_assert_eq!(
            count_overlaps(&nodes, separation),
            overlapping_pairs(&nodes, separation).len()
        );
        Ok(())
    }

    /// Clamped nodes lie inside the margins whenever they fit at all.
    fn check_clamp_keeps_nodes_inside(
        mut nodes: Vec<PositionedNode>,
    ) -> Result<(), TestCaseError> {
        let config = LayoutConfig::default();
        clamp_to_canvas(&mut nodes, &config);

        for node in &nodes {
            prop_assert!(node.position().x() >= config.margin_x());
            prop_assert!(node.position().y() >= config.margin_y());
            prop_assert!(node.bounds().max_x() <= config.width() - config.margin_x() + 1e-3);
            prop_assert!(node.bounds().max_y() <= config.height() - config.margin_y() + 1e-3);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn overlap_count_matches_pairs(nodes in nodes_strategy(), separation in 0.0f32..100.0) {
            check_overlap_count_matches_pairs(nodes, separation)?;
        }

        #[test]
        fn clamp_keeps_nodes_inside(nodes in nodes_strategy()) {
            check_clamp_keeps_nodes_inside(nodes)?;
        }
    }
}
