//! Topology dump rows
//!
//! A dump is the JSON export of the device and link queries that feed the
//! map: one row per netbox and one row per connection. Columns the
//! simplifier does not interpret are carried through as node and edge
//! properties.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use topomap_core::{build_graph, keys, ConnectionRecord, DeviceRecord, Graph, Properties};

/// Row identifier; the database hands out integers but exports may quote them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Integer(u64),
    String(String),
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowId::Integer(i) => write!(f, "{}", i),
            RowId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for RowId {
    fn from(i: u64) -> Self {
        RowId::Integer(i)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        RowId::String(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetboxRow {
    pub netboxid: RowId,
    /// Missing when the room has no position.
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub roomid: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(flatten)]
    pub extra: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRow {
    pub from_netboxid: RowId,
    /// The far end of the link.
    pub netboxid: RowId,
    #[serde(default)]
    pub netident: Option<String>,
    #[serde(flatten)]
    pub extra: Properties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyDump {
    #[serde(default)]
    pub netboxes: Vec<NetboxRow>,
    #[serde(default)]
    pub connections: Vec<ConnectionRow>,
}

impl NetboxRow {
    /// Convert to a device record, or `None` if the netbox has no position.
    pub fn into_record(self) -> Option<DeviceRecord> {
        let (lon, lat) = match (self.lon, self.lat) {
            (Some(lon), Some(lat)) => (lon, lat),
            _ => return None,
        };
        let mut record = DeviceRecord::new(self.netboxid.to_string(), lon, lat);
        record.properties = self.extra;
        record
            .properties
            .insert("netboxid".to_string(), Value::String(self.netboxid.to_string()));
        if let Some(roomid) = self.roomid {
            record.properties.insert(keys::ROOM_ID.to_string(), Value::String(roomid));
        }
        if let Some(room) = self.room {
            record.properties.insert(keys::ROOM.to_string(), Value::String(room));
        }
        Some(record)
    }
}

impl ConnectionRow {
    pub fn into_record(self) -> ConnectionRecord {
        let mut record = ConnectionRecord::new(self.from_netboxid.to_string(), self.netboxid.to_string());
        record.link_id = self.netident.clone();
        record.properties = self.extra;
        if let Some(netident) = self.netident {
            record.properties.insert("netident".to_string(), Value::String(netident));
        }
        record
    }
}

impl TopologyDump {
    pub fn new(netboxes: Vec<NetboxRow>, connections: Vec<ConnectionRow>) -> Self {
        Self {
            netboxes,
            connections,
        }
    }

    /// Split the dump into core records. Netboxes without a position are
    /// skipped, which in turn drops their connections when the graph is built.
    pub fn into_records(self) -> (Vec<DeviceRecord>, Vec<ConnectionRecord>) {
        let total = self.netboxes.len();
        let devices: Vec<DeviceRecord> = self
            .netboxes
            .into_iter()
            .filter_map(|row| {
                let id = row.netboxid.clone();
                let record = row.into_record();
                if record.is_none() {
                    debug!("netbox {} has no position", id);
                }
                record
            })
            .collect();
        if devices.len() < total {
            warn!(
                "skipped {} of {} netboxes without a position",
                total - devices.len(),
                total
            );
        }
        let connections = self
            .connections
            .into_iter()
            .map(ConnectionRow::into_record)
            .collect();
        (devices, connections)
    }

    pub fn into_graph(self) -> Graph {
        let (devices, connections) = self.into_records();
        build_graph(devices, connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dump() -> TopologyDump {
        serde_json::from_value(json!({
            "netboxes": [
                {"netboxid": 1, "sysname": "gw.example.org", "lon": 10.39, "lat": 63.42,
                 "roomid": "lab", "room": "Lab", "load": 0.4},
                {"netboxid": "2", "lon": 10.40, "lat": 63.43, "roomid": "lab", "room": "Lab"},
                {"netboxid": 3, "lon": null, "lat": null, "roomid": "attic"}
            ],
            "connections": [
                {"from_netboxid": 1, "netboxid": 2, "netident": "gw-sw", "speed": 1000,
                 "load_in": 1.5, "load_out": 2.5},
                {"from_netboxid": 2, "netboxid": 1, "speed": 100},
                {"from_netboxid": 1, "netboxid": 3, "speed": 10}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_rows_deserialize_with_extra_columns() {
        let dump = dump();
        assert_eq!(dump.netboxes.len(), 3);
        assert_eq!(dump.netboxes[0].netboxid, RowId::Integer(1));
        assert_eq!(dump.netboxes[1].netboxid, RowId::from("2"));
        assert_eq!(dump.netboxes[0].extra.get("sysname"), Some(&json!("gw.example.org")));
        assert_eq!(dump.netboxes[2].lon, None);
        assert_eq!(dump.connections[0].extra.get("speed"), Some(&json!(1000)));
    }

    #[test]
    fn test_into_records_maps_room_columns() {
        let (devices, connections) = dump().into_records();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id, "1");
        assert_eq!(devices[0].properties.get(keys::ROOM_ID), Some(&json!("lab")));
        assert_eq!(devices[0].properties.get(keys::ROOM), Some(&json!("Lab")));
        assert_eq!(devices[0].properties.get("load"), Some(&json!(0.4)));

        assert_eq!(connections.len(), 3);
        assert_eq!(connections[0].edge_id(), "gw-sw");
        assert_eq!(connections[1].edge_id(), "2-1");
    }

    #[test]
    fn test_into_graph_drops_links_to_unplaced_netboxes() {
        let graph = dump().into_graph();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.edge("1-3").is_none());
        assert_eq!(graph.edge("gw-sw").unwrap().property("netident"), Some(&json!("gw-sw")));
    }
}
