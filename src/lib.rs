//! # topomap
//!
//! Simplify a geographic network topology so it can be drawn on a map.
//!
//! Netboxes (network devices with a longitude/latitude) and the links between
//! them are reduced in four steps:
//!
//! 1. **Area filter**: drop everything outside the region of interest, except
//!    the far ends of links that leave it
//! 2. **Rooms**: merge the netboxes of each room into one node
//! 3. **Places**: merge rooms that would be drawn closer than a pixel limit
//! 4. **Links**: merge parallel links, summing their capacity and traffic
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! topomap dump.json --min-lon 10 --max-lon 11 --min-lat 63 --max-lat 64 \
//!     --width 1024 --height 768 --limit 30 -o simplified.json
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use topomap::prelude::*;
//!
//! let dump = load_dump("dump.json").unwrap();
//! let config = SimplifyConfig::new(
//!     Bounds::new(10.0, 11.0, 63.0, 64.0),
//!     Viewport::new(1024.0, 768.0),
//!     30.0,
//! );
//! let graph = Simplifier::new(config).unwrap().simplify(dump.into_graph()).unwrap();
//! write_graph("simplified.json", &graph).unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! - [`topomap-core`](https://docs.rs/topomap-core) - Graph model and the simplification stages
//! - [`topomap-records`](https://docs.rs/topomap-records) - Topology dumps, config files, graph output

// Re-export core types
pub use topomap_core::{
    area_filter, build_graph, collapse_nodes, combine_edges, create_places, create_rooms,
    simplify, Aggregator, AggregatorTable, Bounds, ConnectionRecord, DeviceRecord, Edge, Error,
    Graph, GraphBuilder, Node, Presets, Reducer, Result, SimplifyConfig, SimplifyStats,
    Simplifier, Viewport,
};

// Re-export records
pub use topomap_records::{load_config, load_dump, load_graph, read_config, write_graph, TopologyDump};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build_graph, load_config, load_dump, load_graph, simplify, write_graph, Bounds, ConnectionRecord,
        DeviceRecord, Edge, Graph, Node, SimplifyConfig, Simplifier, TopologyDump, Viewport,
    };
}

/// Property names used by the stages
pub mod keys {
    pub use topomap_core::keys::*;
}
