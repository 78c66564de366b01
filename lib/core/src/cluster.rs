//! Room and place clustering
//!
//! Netboxes are first merged per room (exact match on the room id), then
//! rooms that would be drawn too close together on the map are merged into
//! places.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::aggregate::AggregatorTable;
use crate::collapse::collapse_nodes;
use crate::config::{validate_limit, Bounds, Viewport};
use crate::graph::{Graph, Node, NodeId};
use crate::keys;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RoomKey {
    Integer(i128),
    /// Bit pattern of a non-integral number.
    Float(u64),
    Room(String),
    /// Netboxes without a room id stay on their own.
    Unplaced(NodeId),
}

/// Numbers compare by value, so `1` and `1.0` share a room; strings never
/// match numbers.
fn number_key(number: &serde_json::Number) -> Option<RoomKey> {
    if let Some(i) = number.as_i64() {
        return Some(RoomKey::Integer(i128::from(i)));
    }
    if let Some(u) = number.as_u64() {
        return Some(RoomKey::Integer(i128::from(u)));
    }
    let f = number.as_f64()?;
    if f.fract() == 0.0 && f.abs() < 1e30 {
        Some(RoomKey::Integer(f as i128))
    } else {
        Some(RoomKey::Float(f.to_bits()))
    }
}

fn room_key(node: &Node) -> RoomKey {
    match node.property(keys::ROOM_ID) {
        None | Some(Value::Null) => RoomKey::Unplaced(node.id.clone()),
        Some(Value::Number(n)) => number_key(n).unwrap_or_else(|| RoomKey::Room(n.to_string())),
        Some(value) => RoomKey::Room(value.to_string()),
    }
}

/// Partition node ids by room, in order of first appearance.
pub fn group_by_room(graph: &Graph) -> Vec<Vec<NodeId>> {
    let mut rooms: IndexMap<RoomKey, Vec<NodeId>> = IndexMap::new();
    for node in graph.nodes().values() {
        rooms.entry(room_key(node)).or_default().push(node.id.clone());
    }
    rooms.into_values().collect()
}

/// Convert a graph of netboxes into a graph of rooms.
///
/// Each room node lists its netboxes under `netboxes`.
pub fn create_rooms(graph: Graph, aggregators: &AggregatorTable) -> Result<Graph> {
    let rooms = group_by_room(&graph);
    debug!("grouping {} netboxes into {} rooms", graph.node_count(), rooms.len());
    collapse_nodes(graph, &rooms, keys::NETBOXES, aggregators)
}

/// Degrees -> pixels for a bounding box drawn into a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelScale {
    pub lon_scale: f64,
    pub lat_scale: f64,
}

impl PixelScale {
    pub fn new(bounds: &Bounds, viewport: &Viewport) -> Result<Self> {
        bounds.validate()?;
        viewport.validate()?;
        Ok(Self {
            lon_scale: viewport.width / bounds.width(),
            lat_scale: viewport.height / bounds.height(),
        })
    }

    /// Flat Euclidean distance in pixels between two (lon, lat) positions.
    #[inline]
    pub fn distance(&self, a: (f64, f64), b: (f64, f64)) -> f64 {
        let dx = (a.0 - b.0) * self.lon_scale;
        let dy = (a.1 - b.1) * self.lat_scale;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A place under construction: its current centroid and its rooms.
#[derive(Debug, Clone)]
struct Place {
    lon: f64,
    lat: f64,
    members: Vec<NodeId>,
    positions: Vec<(f64, f64)>,
}

impl Place {
    fn new(node: &Node) -> Self {
        Self {
            lon: node.lon,
            lat: node.lat,
            members: vec![node.id.clone()],
            positions: vec![(node.lon, node.lat)],
        }
    }

    fn join(&mut self, node: &Node) {
        self.members.push(node.id.clone());
        self.positions.push((node.lon, node.lat));
        let n = self.positions.len() as f64;
        self.lon = self.positions.iter().map(|p| p.0).sum::<f64>() / n;
        self.lat = self.positions.iter().map(|p| p.1).sum::<f64>() / n;
    }
}

/// Greedy first-fit partition of the graph's nodes into places.
///
/// Nodes are visited in graph order; a node joins the first existing place
/// whose centroid is closer than `limit` pixels, which moves that centroid.
/// The result depends on node order, and because centroids drift a member can
/// end up farther than `limit` from its final place.
// TODO: bounds crossing the antimeridian need longitudes unwrapped before scaling.
pub fn group_by_place(graph: &Graph, scale: &PixelScale, limit: f64) -> Vec<Vec<NodeId>> {
    let mut places: Vec<Place> = Vec::new();
    for node in graph.nodes().values() {
        let position = (node.lon, node.lat);
        match places
            .iter_mut()
            .find(|place| scale.distance(position, (place.lon, place.lat)) < limit)
        {
            Some(place) => place.join(node),
            None => places.push(Place::new(node)),
        }
    }
    places.into_iter().map(|place| place.members).collect()
}

/// Convert a graph of rooms into a graph of places no closer than `limit`
/// pixels (approximately, see [`group_by_place`]).
///
/// Each place node lists its rooms under `rooms`.
pub fn create_places(
    graph: Graph,
    bounds: &Bounds,
    viewport: &Viewport,
    limit: f64,
    aggregators: &AggregatorTable,
) -> Result<Graph> {
    validate_limit(limit)?;
    let scale = PixelScale::new(bounds, viewport)?;
    let places = group_by_place(&graph, &scale, limit);
    debug!(
        "grouping {} rooms into {} places (limit {}px, scale {:.3}x{:.3})",
        graph.node_count(),
        places.len(),
        limit,
        scale.lon_scale,
        scale.lat_scale
    );
    collapse_nodes(graph, &places, keys::ROOMS, aggregators)
}
