//! # topomap Records
//!
//! Input and output around the simplification core: topology dumps exported
//! from the device database, run configuration files, and the JSON form of
//! the simplified graph.

pub mod dump;
pub mod error;
pub mod io;

pub use dump::{ConnectionRow, NetboxRow, RowId, TopologyDump};
pub use error::{Error, Result};
pub use io::{load_config, load_dump, load_graph, read_config, write_graph, write_graph_to};
