//! Abstract diagram graph handed over by content analysis.
//!
//! A [`Scene`] bundles the [`DiagramKind`] chosen by the classifier with the
//! typed nodes ([`NodeDatum`]) and labeled edges ([`EdgeDatum`]) to be laid
//! out. These values are read-only inputs: the layout engine never mutates
//! them and produces fresh positioned copies instead.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Point;

/// The kind of diagram a scene should be drawn as.
///
/// The kind is used solely to select the layout strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    /// Layered flow charts and trees.
    #[serde(alias = "tree", alias = "hierarchy")]
    Flow,
    /// Events projected on a chronological axis.
    Timeline,
    /// Items arranged in grid cells.
    Matrix,
    /// Items arranged on a ring.
    Cycle,
    /// Free-form graphs laid out by force simulation.
    #[default]
    Network,
}

impl DiagramKind {
    /// All diagram kinds, in declaration order.
    pub const ALL: [DiagramKind; 5] = [
        DiagramKind::Flow,
        DiagramKind::Timeline,
        DiagramKind::Matrix,
        DiagramKind::Cycle,
        DiagramKind::Network,
    ];

    /// Returns the canonical lowercase name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagramKind::Flow => "flow",
            DiagramKind::Timeline => "timeline",
            DiagramKind::Matrix => "matrix",
            DiagramKind::Cycle => "cycle",
            DiagramKind::Network => "network",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`DiagramKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown diagram kind `{0}`")]
pub struct ParseDiagramKindError(String);

impl FromStr for DiagramKind {
    type Err = ParseDiagramKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flow" | "tree" | "hierarchy" => Ok(DiagramKind::Flow),
            "timeline" => Ok(DiagramKind::Timeline),
            "matrix" => Ok(DiagramKind::Matrix),
            "cycle" => Ok(DiagramKind::Cycle),
            "network" => Ok(DiagramKind::Network),
            _ => Err(ParseDiagramKindError(s.to_string())),
        }
    }
}

/// Diagram-specific hints attached to a node.
///
/// Every field is optional; strategies read only the fields relevant to them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Relative importance. Values above 1.0 enlarge the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,

    /// Position on the timeline axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,

    /// Matrix row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,

    /// Matrix column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,

    /// Explicit tree level, overriding the computed layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
}

/// A requested starting position for a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionHint {
    /// Top-left x coordinate.
    pub x: f32,
    /// Top-left y coordinate.
    pub y: f32,
    /// When set, strategies that honor hints keep the node where it is.
    #[serde(default)]
    pub fixed: bool,
}

impl PositionHint {
    /// Returns the hinted top-left corner.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A node of the abstract input graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDatum {
    id: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    metadata: NodeMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<PositionHint>,
}

impl NodeDatum {
    /// Creates a node with the given id and label and no metadata.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            metadata: NodeMetadata::default(),
            position: None,
        }
    }

    /// Sets the diagram-specific metadata.
    pub fn with_metadata(mut self, metadata: NodeMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the requested starting position.
    pub fn with_position(mut self, position: PositionHint) -> Self {
        self.position = Some(position);
        self
    }

    /// Returns the unique node identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the diagram-specific metadata.
    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    /// Returns the requested starting position, if any.
    pub fn position(&self) -> Option<&PositionHint> {
        self.position.as_ref()
    }

    /// Returns true if the node must not be moved by hint-aware strategies.
    pub fn is_fixed(&self) -> bool {
        self.position.is_some_and(|hint| hint.fixed)
    }
}

/// A directed edge of the abstract input graph.
///
/// Multiple edges between the same pair of nodes are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDatum {
    source: String,
    target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl EdgeDatum {
    /// Creates an unlabeled edge.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    /// Sets the edge label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the source node id.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the target node id.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the edge label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns true if the edge starts and ends at the same node.
    pub fn is_self_edge(&self) -> bool {
        self.source == self.target
    }
}

/// One diagram scene: the unit of work for a single layout call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Diagram classification used to select the layout strategy.
    #[serde(default)]
    pub kind: DiagramKind,

    /// Nodes to place.
    #[serde(default)]
    pub nodes: Vec<NodeDatum>,

    /// Edges to route.
    #[serde(default)]
    pub edges: Vec<EdgeDatum>,
}

impl Scene {
    /// Creates a scene of the given kind.
    pub fn new(kind: DiagramKind, nodes: Vec<NodeDatum>, edges: Vec<EdgeDatum>) -> Self {
        Self { kind, nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_kind_from_str_accepts_aliases() {
        assert_eq!("tree".parse::<DiagramKind>(), Ok(DiagramKind::Flow));
        assert_eq!("Hierarchy".parse::<DiagramKind>(), Ok(DiagramKind::Flow));
        assert_eq!(" cycle ".parse::<DiagramKind>(), Ok(DiagramKind::Cycle));
        assert!("pie".parse::<DiagramKind>().is_err());
    }

    #[test]
    fn test_diagram_kind_display_round_trips() {
        for kind in DiagramKind::ALL {
            assert_eq!(kind.to_string().parse::<DiagramKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_node_fixed_flag() {
        let free = NodeDatum::new("a", "A");
        let hinted = NodeDatum::new("b", "B").with_position(PositionHint {
            x: 1.0,
            y: 2.0,
            fixed: false,
        });
        let pinned = NodeDatum::new("c", "C").with_position(PositionHint {
            x: 1.0,
            y: 2.0,
            fixed: true,
        });

        assert!(!free.is_fixed());
        assert!(!hinted.is_fixed());
        assert!(pinned.is_fixed());
        assert_eq!(hinted.position().map(PositionHint::point), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_edge_self_edge() {
        assert!(EdgeDatum::new("a", "a").is_self_edge());
        assert!(!EdgeDatum::new("a", "b").with_label("x").is_self_edge());
    }
}
