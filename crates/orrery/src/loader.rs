//! Graph loading: document parsing, edge id synthesis, adjacency maps.
//!
//! A single pass over the document produces a [`GraphModel`] holding the
//! node and edge lists (original order preserved) together with the lookup
//! maps selection propagation depends on:
//!
//! - `nodes_by_id` / `edges_by_id`: id to ordinal index
//! - `edges_by_node_id`: source node id to its ordered outgoing edge ids
//!
//! Edge ids are synthesized here as `"Edge{ordinal}-{value}"`; the ordinal
//! guarantees uniqueness and the relation kind keeps the ids legible in
//! logs. Edges are never renamed afterward.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Edge, EdgeId, GraphDocument, GraphKind, Node, NodeId};

/// The loaded graph: typed entities plus the lookup maps built at load time.
#[derive(Debug, Clone)]
pub struct GraphModel {
    /// Rendering mode for this graph.
    pub kind: GraphKind,
    /// Chart title from the document.
    pub title: String,
    /// Optional chart subtitle.
    pub description: Option<String>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    nodes_by_id: HashMap<NodeId, usize>,
    edges_by_id: HashMap<EdgeId, usize>,
    edges_by_node_id: HashMap<NodeId, Vec<EdgeId>>,
}

impl GraphModel {
    /// Build a model from a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedGraphType`] if the document's `type` is
    /// not a recognized graph kind; no partial model is produced.
    pub fn from_document(document: GraphDocument) -> Result<Self> {
        let Some(kind) = GraphKind::parse(&document.kind) else {
            return Err(Error::UnsupportedGraphType(document.kind));
        };

        let nodes = document.nodes;
        let nodes_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();

        let mut edges = document.edges;
        let mut edges_by_id = HashMap::with_capacity(edges.len());
        let mut edges_by_node_id: HashMap<NodeId, Vec<EdgeId>> = HashMap::new();
        for (ordinal, edge) in edges.iter_mut().enumerate() {
            edge.id = EdgeId(format!("Edge{ordinal}-{}", edge.value));
            edges_by_id.insert(edge.id.clone(), ordinal);
            edges_by_node_id
                .entry(edge.source.clone())
                .or_default()
                .push(edge.id.clone());
        }

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            kind = ?kind,
            "graph document loaded"
        );

        Ok(Self {
            kind,
            title: document.title,
            description: document.description,
            nodes,
            edges,
            nodes_by_id,
            edges_by_id,
            edges_by_node_id,
        })
    }

    /// Parse a model from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] on malformed JSON and
    /// [`Error::UnsupportedGraphType`] for an unrecognized graph type.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: GraphDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Parse a model from any reader producing a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] on malformed JSON and
    /// [`Error::UnsupportedGraphType`] for an unrecognized graph type.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let document: GraphDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    /// Load a model from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataSourceUnavailable`] if the file cannot be
    /// opened, plus the parse errors of [`GraphModel::from_reader`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Nodes in document order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in document order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes_by_id.get(id).map(|&index| &self.nodes[index])
    }

    /// Look up an edge by id.
    #[must_use]
    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges_by_id.get(id).map(|&index| &self.edges[index])
    }

    /// Whether a node with this id exists.
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes_by_id.contains_key(id)
    }

    /// Outgoing edge ids of a node, in document order.
    #[must_use]
    pub fn adjacent_edges(&self, id: &NodeId) -> &[EdgeId] {
        match self.edges_by_node_id.get(id) {
            Some(edges) => edges,
            None => &[],
        }
    }

    /// Mutable access to the node list, restricted to the layout engine.
    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Drop every edge the predicate rejects and rebuild the edge maps.
    ///
    /// Edge ids are preserved; only the ordinal indexes in the lookup maps
    /// change. Used by layout to filter requirements on the pinned root.
    pub(crate) fn retain_edges<F: Fn(&Edge) -> bool>(&mut self, keep: F) {
        self.edges.retain(|edge| keep(edge));
        self.edges_by_id = self
            .edges
            .iter()
            .enumerate()
            .map(|(index, edge)| (edge.id.clone(), index))
            .collect();
        self.edges_by_node_id.clear();
        for edge in &self.edges {
            self.edges_by_node_id
                .entry(edge.source.clone())
                .or_default()
                .push(edge.id.clone());
        }
    }
}
