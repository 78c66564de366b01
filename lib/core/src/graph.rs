// Geographic graph - nodes positioned by lon/lat, edges referencing nodes by id
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

pub type NodeId = String;
pub type EdgeId = String;
pub type Properties = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub properties: Properties,
}

impl Node {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<NodeId>, lon: f64, lat: f64) -> Self {
        Self {
            id: id.into(),
            lon,
            lat,
            properties: Properties::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    #[inline]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

impl Edge {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            properties: Properties::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    #[inline]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// True if the edge joins `a` and `b` in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// A graph of geographical positions.
///
/// Nodes and edges are kept in insertion order; every order-sensitive stage
/// (room grouping, place clustering, edge combination) iterates in this order.
/// Edges refer to their endpoints by id and an edge is only accepted while
/// both endpoints are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphRepr")]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
}

/// Unchecked wire form of [`Graph`]; deserialized graphs are validated
/// before they are handed out.
#[derive(Deserialize)]
struct GraphRepr {
    #[serde(default)]
    nodes: IndexMap<NodeId, Node>,
    #[serde(default)]
    edges: IndexMap<EdgeId, Edge>,
}

impl TryFrom<GraphRepr> for Graph {
    type Error = Error;

    fn try_from(repr: GraphRepr) -> Result<Self> {
        let graph = Self::from_parts(repr.nodes, repr.edges);
        graph.validate()?;
        Ok(graph)
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a graph from stage output. Callers guarantee that every edge
    /// endpoint is a key of `nodes`.
    pub(crate) fn from_parts(nodes: IndexMap<NodeId, Node>, edges: IndexMap<EdgeId, Edge>) -> Self {
        Self { nodes, edges }
    }

    pub(crate) fn into_parts(self) -> (IndexMap<NodeId, Node>, IndexMap<EdgeId, Edge>) {
        (self.nodes, self.edges)
    }

    /// Insert a node. A node with the same id is replaced in place and
    /// returned.
    pub fn add_node(&mut self, node: Node) -> Option<Node> {
        self.nodes.insert(node.id.clone(), node)
    }

    /// Insert an edge if both of its endpoints are known. Returns `false`
    /// (and drops the edge) otherwise.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if !self.nodes.contains_key(&edge.source) || !self.nodes.contains_key(&edge.target) {
            return false;
        }
        self.edges.insert(edge.id.clone(), edge);
        true
    }

    pub fn nodes(&self) -> &IndexMap<NodeId, Node> {
        &self.nodes
    }

    pub fn edges(&self) -> &IndexMap<EdgeId, Edge> {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check the structural invariant: every edge endpoint is a node of this
    /// graph and every entry is keyed by its own id.
    pub fn validate(&self) -> Result<()> {
        for (id, node) in &self.nodes {
            if *id != node.id {
                return Err(Error::Invariant(format!(
                    "node {} stored under key {}",
                    node.id, id
                )));
            }
        }
        for (id, edge) in &self.edges {
            if *id != edge.id {
                return Err(Error::Invariant(format!(
                    "edge {} stored under key {}",
                    edge.id, id
                )));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !self.nodes.contains_key(endpoint) {
                    return Err(Error::Invariant(format!(
                        "edge {} references unknown node {}",
                        edge.id, endpoint
                    )));
                }
            }
        }
        Ok(())
    }
}
