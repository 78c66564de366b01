// Area filtering - restrict a graph to the nodes a filter selects
use ahash::AHashSet;
use indexmap::IndexMap;
use tracing::debug;

use crate::config::Bounds;
use crate::graph::{Graph, Node, NodeId};

pub trait Filter {
    fn matches(&self, node: &Node) -> bool;
}

impl Filter for Bounds {
    fn matches(&self, node: &Node) -> bool {
        self.contains(node.lon, node.lat)
    }
}

/// Keep every edge with at least one matching endpoint, the matching nodes,
/// and the far endpoints of kept edges (even when those do not match).
pub fn filter_graph<F: Filter + ?Sized>(graph: Graph, filter: &F) -> Graph {
    let before = (graph.node_count(), graph.edge_count());
    let (nodes, edges) = graph.into_parts();

    let mut keep: AHashSet<NodeId> = nodes
        .values()
        .filter(|node| filter.matches(node))
        .map(|node| node.id.clone())
        .collect();

    let edges: IndexMap<_, _> = edges
        .into_iter()
        .filter(|(_, edge)| keep.contains(&edge.source) || keep.contains(&edge.target))
        .collect();

    for edge in edges.values() {
        keep.insert(edge.source.clone());
        keep.insert(edge.target.clone());
    }

    let nodes: IndexMap<_, _> = nodes
        .into_iter()
        .filter(|(id, _)| keep.contains(id))
        .collect();

    debug!(
        "area filter: {} -> {} nodes, {} -> {} edges",
        before.0,
        nodes.len(),
        before.1,
        edges.len()
    );
    Graph::from_parts(nodes, edges)
}

/// Restrict a graph to a geographical area.
pub fn area_filter(graph: Graph, bounds: &Bounds) -> Graph {
    filter_graph(graph, bounds)
}
