//! Validated graph structure for a single scene.
//!
//! [`SceneGraph`] checks the graph invariants once (unique node ids,
//! resolvable edge endpoints) and then offers index-based access plus a
//! [`petgraph`] directed graph for traversal-heavy strategies. Node and edge
//! indices follow the input order, so strategies can produce output in the
//! same order the caller supplied.

use indexmap::IndexMap;
use log::trace;
use petgraph::graph::{DiGraph, NodeIndex};

use tessera_core::graph::{EdgeDatum, NodeDatum};

use crate::error::GraphError;

/// A validated view over the nodes and edges of one scene.
#[derive(Debug)]
pub struct SceneGraph<'a> {
    nodes: &'a [NodeDatum],
    edges: &'a [EdgeDatum],
    index: IndexMap<&'a str, usize>,
    endpoints: Vec<(usize, usize)>,
    graph: DiGraph<usize, usize>,
}

impl<'a> SceneGraph<'a> {
    /// Validates `nodes` and `edges` and builds the graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateNode`] for a repeated node id and
    /// [`GraphError::UnknownEndpoint`] for an edge naming a missing node.
    pub fn new(nodes: &'a [NodeDatum], edges: &'a [EdgeDatum]) -> Result<Self, GraphError> {
        let mut index = IndexMap::with_capacity(nodes.len());
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());

        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id(), i).is_some() {
                return Err(GraphError::DuplicateNode(node.id().to_string()));
            }
            graph.add_node(i);
        }

        let mut endpoints = Vec::with_capacity(edges.len());
        for (i, edge) in edges.iter().enumerate() {
            let lookup = |id: &str| {
                index
                    .get(id)
                    .copied()
                    .ok_or_else(|| GraphError::UnknownEndpoint {
                        edge: i,
                        node: id.to_string(),
                    })
            };
            let source = lookup(edge.source())?;
            let target = lookup(edge.target())?;
            graph.add_edge(NodeIndex::new(source), NodeIndex::new(target), i);
            endpoints.push((source, target));
        }

        trace!(nodes = nodes.len(), edges = edges.len(); "Scene graph validated");

        Ok(Self {
            nodes,
            edges,
            index,
            endpoints,
            graph,
        })
    }

    /// Rejects self-edges on behalf of `strategy`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SelfEdge`] for the first self-edge found.
    pub fn reject_self_edges(&self, strategy: &'static str) -> Result<(), GraphError> {
        match self.edges.iter().position(EdgeDatum::is_self_edge) {
            Some(edge) => Err(GraphError::SelfEdge {
                edge,
                node: self.edges[edge].source().to_string(),
                strategy,
            }),
            None => Ok(()),
        }
    }

    /// Returns the nodes in input order.
    pub fn nodes(&self) -> &'a [NodeDatum] {
        self.nodes
    }

    /// Returns the edges in input order.
    pub fn edges(&self) -> &'a [EdgeDatum] {
        self.edges
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the input index of the node with `id`.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns `(source, target)` node indices for every edge, in input order.
    pub fn endpoints(&self) -> &[(usize, usize)] {
        &self.endpoints
    }

    /// Returns the directed graph. Node weights are input node indices and
    /// edge weights are input edge indices; `NodeIndex::new(i)` addresses
    /// input node `i`.
    pub fn digraph(&self) -> &DiGraph<usize, usize> {
        &self.graph
    }
}
