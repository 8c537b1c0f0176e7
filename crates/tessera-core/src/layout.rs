//! Positioned layout output.
//!
//! A [`Layout`] is what the layout engine hands to the rendering side: every
//! input node with resolved geometry ([`PositionedNode`]) and every edge with
//! a route ([`LayoutEdge`]), scoped to a canvas size. Once returned to the
//! caller a layout is never touched again by the engine.

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Bounds, Point, Size},
    graph::NodeDatum,
};

/// A node with resolved top-left position and size, in canvas units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    id: String,
    label: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    fixed: bool,
}

impl PositionedNode {
    /// Creates a positioned node for `datum` at `top_left` with `size`.
    pub fn new(datum: &NodeDatum, top_left: Point, size: Size) -> Self {
        Self {
            id: datum.id().to_string(),
            label: datum.label().to_string(),
            x: top_left.x(),
            y: top_left.y(),
            width: size.width(),
            height: size.height(),
            fixed: datum.is_fixed(),
        }
    }

    /// Returns the node id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the node label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns the node size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the center of the node box.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns the node box.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position(), self.size())
    }

    /// Returns true if strategies that honor hints must not move the node.
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Moves the node so its top-left corner is at `top_left`.
    pub fn set_position(&mut self, top_left: Point) {
        self.x = top_left.x();
        self.y = top_left.y();
    }

    /// Moves the node so its center is at `center`.
    pub fn set_center(&mut self, center: Point) {
        self.x = center.x() - self.width / 2.0;
        self.y = center.y() - self.height / 2.0;
    }

    /// Moves the node by `offset`.
    pub fn translate(&mut self, offset: Point) {
        self.x += offset.x();
        self.y += offset.y();
    }

    /// Changes the node size, keeping the top-left corner.
    pub fn set_size(&mut self, size: Size) {
        self.width = size.width();
        self.height = size.height();
    }
}

/// A routed edge between two positioned nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    source: String,
    target: String,
    points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl LayoutEdge {
    /// Creates a routed edge.
    ///
    /// Routes always hold at least two points; a shorter route is padded by
    /// repeating its last point (or the origin when empty).
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        mut points: Vec<Point>,
        label: Option<String>,
    ) -> Self {
        while points.len() < 2 {
            let last = points.last().copied().unwrap_or_default();
            points.push(last);
        }
        Self {
            source: source.into(),
            target: target.into(),
            points,
            label,
        }
    }

    /// Returns the source node id.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the target node id.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the route points in drawing order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the edge label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// A finished layout scoped to a canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    canvas: Size,
    nodes: Vec<PositionedNode>,
    edges: Vec<LayoutEdge>,
}

impl Layout {
    /// Creates a layout from positioned nodes and routed edges.
    pub fn new(canvas: Size, nodes: Vec<PositionedNode>, edges: Vec<LayoutEdge>) -> Self {
        Self {
            canvas,
            nodes,
            edges,
        }
    }

    /// Creates an empty layout for the given canvas.
    pub fn empty(canvas: Size) -> Self {
        Self::new(canvas, Vec::new(), Vec::new())
    }

    /// Returns the declared canvas size.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Returns the positioned nodes, in input order.
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    /// Returns the routed edges, in input order.
    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Returns true if the layout has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the bounds covering every node, or `None` for an empty layout.
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(PositionedNode::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_positioned_node_center_round_trip() {
        let datum = NodeDatum::new("a", "Alpha");
        let mut node = PositionedNode::new(&datum, Point::new(10.0, 20.0), Size::new(100.0, 40.0));

        assert_eq!(node.center(), Point::new(60.0, 40.0));

        node.set_center(Point::new(200.0, 100.0));
        assert_approx_eq!(f32, node.position().x(), 150.0);
        assert_approx_eq!(f32, node.position().y(), 80.0);
        assert_eq!(node.label(), "Alpha");
    }

    #[test]
    fn test_layout_edge_pads_short_routes() {
        let edge = LayoutEdge::new("a", "b", vec![Point::new(1.0, 1.0)], None);
        assert_eq!(edge.points().len(), 2);
        assert_eq!(edge.points()[1], Point::new(1.0, 1.0));

        let empty = LayoutEdge::new("a", "b", Vec::new(), Some("x".to_string()));
        assert_eq!(empty.points().len(), 2);
        assert_eq!(empty.label(), Some("x"));
    }

    #[test]
    fn test_layout_content_bounds() {
        let a = PositionedNode::new(
            &NodeDatum::new("a", ""),
            Point::new(0.0, 0.0),
            Size::new(10.0, 10.0),
        );
        let b = PositionedNode::new(
            &NodeDatum::new("b", ""),
            Point::new(30.0, 5.0),
            Size::new(10.0, 10.0),
        );
        let layout = Layout::new(Size::new(100.0, 100.0), vec![a, b], Vec::new());

        let bounds = layout.content_bounds().expect("non-empty layout");
        assert_approx_eq!(f32, bounds.width(), 40.0);
        assert_approx_eq!(f32, bounds.height(), 15.0);
        assert!(layout.node("b").is_some());
        assert!(Layout::empty(Size::new(1.0, 1.0)).content_bounds().is_none());
    }
}
