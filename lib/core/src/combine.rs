//! Edge combination
//!
//! Parallel edges (the same two endpoints, in either direction) are merged
//! into one edge. Members are first turned to match the orientation of the
//! first edge of their group, so directional traffic counters add up on the
//! correct side.

use indexmap::IndexMap;
use tracing::debug;

use crate::aggregate::AggregatorTable;
use crate::graph::{Edge, EdgeId, Graph, NodeId};
use crate::keys;
use crate::{Error, Result};

/// Id of the edge replacing `members`: `ce[id1;id2;...]`.
pub fn combined_edge_id<'a, I>(members: I) -> EdgeId
where
    I: IntoIterator<Item = &'a str>,
{
    format!("ce[{}]", members.into_iter().collect::<Vec<_>>().join(";"))
}

/// Flip an edge: swap its endpoints and its `load_in`/`load_out` values.
pub fn reverse_edge(mut edge: Edge) -> Edge {
    std::mem::swap(&mut edge.source, &mut edge.target);
    let load_in = edge.properties.remove(keys::LOAD_IN);
    let load_out = edge.properties.remove(keys::LOAD_OUT);
    if let Some(value) = load_out {
        edge.properties.insert(keys::LOAD_IN.to_string(), value);
    }
    if let Some(value) = load_in {
        edge.properties.insert(keys::LOAD_OUT.to_string(), value);
    }
    edge
}

/// Reverse every edge whose source differs from the first edge's source.
pub fn equalize_orientation(edges: Vec<Edge>) -> Vec<Edge> {
    let Some(reference) = edges.first().map(|e| e.source.clone()) else {
        return edges;
    };
    edges
        .into_iter()
        .map(|edge| {
            if edge.source != reference {
                reverse_edge(edge)
            } else {
                edge
            }
        })
        .collect()
}

fn endpoint_pair(edge: &Edge) -> (NodeId, NodeId) {
    if edge.source <= edge.target {
        (edge.source.clone(), edge.target.clone())
    } else {
        (edge.target.clone(), edge.source.clone())
    }
}

/// Group edges by unordered endpoint pair. Groups are ordered by their first
/// edge and members keep graph order.
pub fn parallel_groups(graph: &Graph) -> Vec<Vec<EdgeId>> {
    let mut groups: IndexMap<(NodeId, NodeId), Vec<EdgeId>> = IndexMap::new();
    for edge in graph.edges().values() {
        groups.entry(endpoint_pair(edge)).or_default().push(edge.id.clone());
    }
    groups.into_values().collect()
}

fn merge_group(group: Vec<Edge>, aggregators: &AggregatorTable) -> Result<Edge> {
    let oriented = equalize_orientation(group);
    let id = combined_edge_id(oriented.iter().map(|e| e.id.as_str()));
    let (source, target) = (oriented[0].source.clone(), oriented[0].target.clone());

    let mut properties = aggregators.aggregate(&oriented)?;
    properties.insert(keys::SUBEDGES.to_string(), serde_json::to_value(&oriented)?);

    Ok(Edge::new(id, source, target).with_properties(properties))
}

/// Replace every set of parallel edges with a single combined edge listing
/// the originals under `subedges`.
pub fn combine_edges(graph: Graph, aggregators: &AggregatorTable) -> Result<Graph> {
    let (nodes, edges) = graph.into_parts();
    let edge_count = edges.len();

    let mut groups: IndexMap<(NodeId, NodeId), Vec<Edge>> = IndexMap::new();
    for (_, edge) in edges {
        groups.entry(endpoint_pair(&edge)).or_default().push(edge);
    }

    debug!("combining {} edges into {} groups", edge_count, groups.len());
    let mut combined = IndexMap::with_capacity(groups.len());
    for (_, group) in groups {
        let edge = merge_group(group, aggregators)?;
        let id = edge.id.clone();
        if combined.insert(id.clone(), edge).is_some() {
            return Err(Error::Invariant(format!(
                "two edge groups combine to the same id {}",
                id
            )));
        }
    }
    Ok(Graph::from_parts(nodes, combined))
}
