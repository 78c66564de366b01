//! # topomap Core
//!
//! Core library for simplifying geographic network topologies.
//!
//! A raw graph of netboxes (devices positioned by longitude/latitude) and the
//! links between them is reduced to a graph that can be drawn on a map at a
//! given viewport size:
//!
//! - [`GraphBuilder`] - Builds a [`Graph`] from device and connection records
//! - [`area_filter`] - Restricts a graph to a bounding box
//! - [`collapse_nodes`] - Replaces groups of nodes with centroid nodes
//! - [`create_rooms`] / [`create_places`] - Room and place clustering
//! - [`combine_edges`] - Merges parallel edges
//! - [`Simplifier`] - Runs the whole pipeline
//!
//! ## Example
//!
//! ```rust
//! use topomap_core::{build_graph, Bounds, ConnectionRecord, DeviceRecord, Simplifier, SimplifyConfig, Viewport};
//! use serde_json::json;
//!
//! let graph = build_graph(
//!     vec![
//!         DeviceRecord::new("1", 10.39, 63.42).with_property("roomId", json!("lab")),
//!         DeviceRecord::new("2", 10.40, 63.42).with_property("roomId", json!("lab")),
//!         DeviceRecord::new("3", 10.90, 63.80).with_property("roomId", json!("dc")),
//!     ],
//!     vec![
//!         ConnectionRecord::new("1", "3").with_property("speed", json!(1000)),
//!         ConnectionRecord::new("3", "2").with_property("speed", json!(1000)),
//!     ],
//! );
//!
//! let config = SimplifyConfig::new(Bounds::new(10.0, 11.0, 63.0, 64.0), Viewport::new(800.0, 600.0), 30.0);
//! let simplified = Simplifier::new(config).unwrap().simplify(graph).unwrap();
//!
//! assert_eq!(simplified.node_count(), 2);
//! assert_eq!(simplified.edge_count(), 1);
//! ```

pub mod aggregate;
pub mod builder;
pub mod cluster;
pub mod collapse;
pub mod combine;
pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod keys;
pub mod pipeline;

pub use aggregate::{float_or_nan, Aggregate, Aggregator, AggregatorTable, Presets, Reducer};
pub use builder::{build_graph, ConnectionRecord, DeviceRecord, GraphBuilder};
pub use cluster::{create_places, create_rooms, group_by_place, group_by_room, PixelScale};
pub use collapse::collapse_nodes;
pub use combine::{combine_edges, equalize_orientation, reverse_edge};
pub use config::{Bounds, SimplifyConfig, Viewport};
pub use error::{Error, Result};
pub use filter::{area_filter, filter_graph, Filter};
pub use graph::{Edge, EdgeId, Graph, Node, NodeId, Properties};
pub use pipeline::{simplify, SimplifyStats, Simplifier, StageCount};
