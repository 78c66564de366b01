//! Node collapsing
//!
//! Replaces each group of a node partition with a single synthetic node at
//! the group centroid, then redirects every edge to the new nodes. Edges whose
//! endpoints end up in the same group are removed.

use ahash::AHashMap;
use indexmap::IndexMap;
use tracing::debug;

use crate::aggregate::AggregatorTable;
use crate::graph::{Graph, Node, NodeId};
use crate::{Error, Result};

/// Id of the node replacing `members`: `cn[id1;id2;...]`.
pub fn collapsed_node_id<'a, I>(members: I) -> NodeId
where
    I: IntoIterator<Item = &'a str>,
{
    format!("cn[{}]", members.into_iter().collect::<Vec<_>>().join(";"))
}

/// Collapse every set in `node_sets` to one node.
///
/// `node_sets` must partition the graph's nodes: every node in exactly one
/// set, no unknown ids, no empty sets. A violation is reported as
/// [`Error::Invariant`] and the graph is not returned.
///
/// Each new node sits at the mean position of its members, carries the
/// properties computed by `aggregators`, and lists its members (in set order)
/// under `member_key`.
pub fn collapse_nodes(
    graph: Graph,
    node_sets: &[Vec<NodeId>],
    member_key: &str,
    aggregators: &AggregatorTable,
) -> Result<Graph> {
    let (mut remaining, edges) = graph.into_parts();
    let node_count = remaining.len();

    let mut nodes = IndexMap::with_capacity(node_sets.len());
    let mut lookup: AHashMap<NodeId, NodeId> = AHashMap::with_capacity(node_count);

    for set in node_sets {
        if set.is_empty() {
            return Err(Error::Invariant("cannot collapse an empty node set".into()));
        }
        let mut members = Vec::with_capacity(set.len());
        for id in set {
            match remaining.swap_remove(id) {
                Some(node) => members.push(node),
                None if lookup.contains_key(id) || set.iter().filter(|m| *m == id).count() > 1 => {
                    return Err(Error::Invariant(format!(
                        "node {} appears in more than one node set",
                        id
                    )));
                }
                None => {
                    return Err(Error::Invariant(format!("node {} is not in the graph", id)));
                }
            }
        }

        let node = collapse_group(members, member_key, aggregators)?;
        let new_id = node.id.clone();
        if nodes.insert(new_id.clone(), node).is_some() {
            return Err(Error::Invariant(format!(
                "two node sets collapse to the same id {}",
                new_id
            )));
        }
        for id in set {
            lookup.insert(id.clone(), new_id.clone());
        }
    }

    if !remaining.is_empty() {
        let missing: Vec<_> = remaining.keys().take(5).cloned().collect();
        return Err(Error::Invariant(format!(
            "{} node(s) not covered by any node set (e.g. {})",
            remaining.len(),
            missing.join(", ")
        )));
    }

    let edge_count = edges.len();
    let mut redirected = IndexMap::with_capacity(edge_count);
    for (id, mut edge) in edges {
        edge.source = resolve(&lookup, &edge.source, &id)?;
        edge.target = resolve(&lookup, &edge.target, &id)?;
        if !edge.is_self_loop() {
            redirected.insert(id, edge);
        }
    }

    debug!(
        "collapsed {} nodes into {} ({}); {} of {} edges became internal",
        node_count,
        nodes.len(),
        member_key,
        edge_count - redirected.len(),
        edge_count
    );
    Ok(Graph::from_parts(nodes, redirected))
}

fn resolve(lookup: &AHashMap<NodeId, NodeId>, endpoint: &NodeId, edge: &str) -> Result<NodeId> {
    lookup.get(endpoint).cloned().ok_or_else(|| {
        Error::Invariant(format!("edge {} references unknown node {}", edge, endpoint))
    })
}

fn collapse_group(members: Vec<Node>, member_key: &str, aggregators: &AggregatorTable) -> Result<Node> {
    let n = members.len() as f64;
    let lon = members.iter().map(|m| m.lon).sum::<f64>() / n;
    let lat = members.iter().map(|m| m.lat).sum::<f64>() / n;
    let id = collapsed_node_id(members.iter().map(|m| m.id.as_str()));

    let mut properties = aggregators.aggregate(&members)?;
    properties.insert(member_key.to_string(), serde_json::to_value(&members)?);

    Ok(Node::new(id, lon, lat).with_properties(properties))
}
