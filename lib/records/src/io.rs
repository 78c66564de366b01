// File input and output for dumps, run configuration and simplified graphs
use atomicwrites::{AtomicFile, OverwriteBehavior};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;
use topomap_core::{Graph, SimplifyConfig};

use crate::dump::TopologyDump;
use crate::{Error, Result};

fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a topology dump (`{"netboxes": [...], "connections": [...]}`).
pub fn load_dump<P: AsRef<Path>>(path: P) -> Result<TopologyDump> {
    let dump: TopologyDump = read_json(&path)?;
    debug!(
        "loaded {} netboxes and {} connections from {:?}",
        dump.netboxes.len(),
        dump.connections.len(),
        path.as_ref()
    );
    Ok(dump)
}

/// Read a run configuration without validating it, for callers that
/// override parts of it before use.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<SimplifyConfig> {
    read_json(path)
}

/// Read and validate a run configuration.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimplifyConfig> {
    let config = read_config(path)?;
    config.validate()?;
    Ok(config)
}

/// Read a graph previously written by [`write_graph`]. Edges pointing at
/// missing nodes are a parse error.
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<Graph> {
    read_json(path)
}

/// Write a graph as pretty-printed JSON to any writer.
pub fn write_graph_to<W: Write>(writer: W, graph: &Graph) -> serde_json::Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, graph)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)
}

/// Write a graph to `path`, replacing any existing file atomically.
pub fn write_graph<P: AsRef<Path>>(path: P, graph: &Graph) -> Result<()> {
    let path = path.as_ref();
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|file| write_graph_to(file, graph))
        .map_err(|e| Error::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    debug!(
        "wrote {} nodes and {} edges to {:?}",
        graph.node_count(),
        graph.edge_count(),
        path
    );
    Ok(())
}
