//! Graph construction from device and connection records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::graph::{Edge, EdgeId, Graph, Node, NodeId, Properties};

/// A positioned network device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: NodeId,
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub properties: Properties,
}

impl DeviceRecord {
    pub fn new(id: impl Into<NodeId>, lon: f64, lat: f64) -> Self {
        Self {
            id: id.into(),
            lon,
            lat,
            properties: Properties::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// A physical link between two devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub from_id: NodeId,
    pub to_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<EdgeId>,
    #[serde(default)]
    pub properties: Properties,
}

impl ConnectionRecord {
    pub fn new(from_id: impl Into<NodeId>, to_id: impl Into<NodeId>) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            link_id: None,
            properties: Properties::new(),
        }
    }

    #[must_use]
    pub fn with_link_id(mut self, link_id: impl Into<EdgeId>) -> Self {
        self.link_id = Some(link_id.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// The link id, or `"{fromId}-{toId}"` when the source data has none.
    pub fn edge_id(&self) -> EdgeId {
        match &self.link_id {
            Some(id) => id.clone(),
            None => format!("{}-{}", self.from_id, self.to_id),
        }
    }
}

/// Collects records and turns them into a [`Graph`].
///
/// All devices are inserted before any connection, so record order between
/// the two kinds does not matter. Connections whose endpoints are not known
/// devices are dropped.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    devices: Vec<DeviceRecord>,
    connections: Vec<ConnectionRecord>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn device(mut self, device: DeviceRecord) -> Self {
        self.devices.push(device);
        self
    }

    #[must_use]
    pub fn devices<I: IntoIterator<Item = DeviceRecord>>(mut self, devices: I) -> Self {
        self.devices.extend(devices);
        self
    }

    #[must_use]
    pub fn connection(mut self, connection: ConnectionRecord) -> Self {
        self.connections.push(connection);
        self
    }

    #[must_use]
    pub fn connections<I: IntoIterator<Item = ConnectionRecord>>(mut self, connections: I) -> Self {
        self.connections.extend(connections);
        self
    }

    pub fn build(self) -> Graph {
        let mut graph = Graph::new();
        for device in self.devices {
            graph.add_node(
                Node::new(device.id, device.lon, device.lat).with_properties(device.properties),
            );
        }

        let total = self.connections.len();
        let mut dropped = 0usize;
        for connection in self.connections {
            let id = connection.edge_id();
            let edge = Edge::new(id, connection.from_id, connection.to_id)
                .with_properties(connection.properties);
            if !graph.add_edge(edge) {
                dropped += 1;
            }
        }

        debug!(
            "built graph: {} nodes, {} edges ({} of {} connections dropped)",
            graph.node_count(),
            graph.edge_count(),
            dropped,
            total
        );
        graph
    }
}

pub fn build_graph<D, C>(devices: D, connections: C) -> Graph
where
    D: IntoIterator<Item = DeviceRecord>,
    C: IntoIterator<Item = ConnectionRecord>,
{
    GraphBuilder::new()
        .devices(devices)
        .connections(connections)
        .build()
}
