use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::Presets;
use crate::cluster::{create_places, create_rooms};
use crate::combine::combine_edges;
use crate::config::SimplifyConfig;
use crate::filter::area_filter;
use crate::graph::Graph;
use crate::Result;

/// Node and edge count of a graph at one point of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub nodes: usize,
    pub edges: usize,
}

impl StageCount {
    pub fn of(graph: &Graph) -> Self {
        Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        }
    }
}

/// Graph size after each stage of [`Simplifier::simplify_with_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimplifyStats {
    pub input: StageCount,
    pub filtered: StageCount,
    pub rooms: StageCount,
    pub places: StageCount,
    pub combined: StageCount,
}

/// Runs the full simplification: area filter, rooms, places, edge
/// combination.
#[derive(Debug, Clone)]
pub struct Simplifier {
    config: SimplifyConfig,
    presets: Presets,
}

impl Simplifier {
    pub fn new(config: SimplifyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            presets: Presets::default(),
        })
    }

    #[must_use]
    pub fn with_presets(mut self, presets: Presets) -> Self {
        self.presets = presets;
        self
    }

    pub fn config(&self) -> &SimplifyConfig {
        &self.config
    }

    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    pub fn simplify(&self, graph: Graph) -> Result<Graph> {
        self.simplify_with_stats(graph).map(|(graph, _)| graph)
    }

    pub fn simplify_with_stats(&self, graph: Graph) -> Result<(Graph, SimplifyStats)> {
        let SimplifyConfig {
            bounds,
            viewport,
            limit,
        } = self.config;
        let mut stats = SimplifyStats {
            input: StageCount::of(&graph),
            ..Default::default()
        };

        let graph = area_filter(graph, &bounds);
        stats.filtered = StageCount::of(&graph);
        debug!("after area filter: {:?}", stats.filtered);

        let graph = create_rooms(graph, &self.presets.rooms)?;
        stats.rooms = StageCount::of(&graph);
        debug!("after rooms: {:?}", stats.rooms);

        let graph = create_places(graph, &bounds, &viewport, limit, &self.presets.places)?;
        stats.places = StageCount::of(&graph);
        debug!("after places: {:?}", stats.places);

        let graph = combine_edges(graph, &self.presets.edges)?;
        stats.combined = StageCount::of(&graph);

        info!(
            "simplified {} nodes / {} edges to {} places / {} links",
            stats.input.nodes, stats.input.edges, stats.combined.nodes, stats.combined.edges
        );
        Ok((graph, stats))
    }
}

/// Simplify `graph` with the default aggregator presets.
pub fn simplify(graph: Graph, config: &SimplifyConfig) -> Result<Graph> {
    Simplifier::new(*config)?.simplify(graph)
}
