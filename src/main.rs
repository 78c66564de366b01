use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use topomap_core::{Bounds, Simplifier, SimplifyConfig, Viewport};
use topomap_records::{load_dump, read_config, write_graph, write_graph_to};

/// Simplify a geographic network topology for map rendering
#[derive(Parser, Debug)]
#[command(name = "topomap")]
#[command(about = "Simplify a network topology for a map viewport", long_about = None)]
struct Args {
    /// Topology dump with `netboxes` and `connections` rows
    input: PathBuf,

    /// Write the simplified graph here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with `bounds`, `viewport` and `limit`; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Western edge of the region of interest
    #[arg(long, allow_hyphen_values = true)]
    min_lon: Option<f64>,

    /// Eastern edge of the region of interest
    #[arg(long, allow_hyphen_values = true)]
    max_lon: Option<f64>,

    /// Southern edge of the region of interest
    #[arg(long, allow_hyphen_values = true)]
    min_lat: Option<f64>,

    /// Northern edge of the region of interest
    #[arg(long, allow_hyphen_values = true)]
    max_lat: Option<f64>,

    /// Viewport width in pixels
    #[arg(long)]
    width: Option<f64>,

    /// Viewport height in pixels
    #[arg(long)]
    height: Option<f64>,

    /// Minimum distance in pixels between two places
    #[arg(long)]
    limit: Option<f64>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Config file (or defaults) with the flags applied on top. Validation is
    /// left to `Simplifier::new` so flags can replace unusable file values.
    fn simplify_config(&self) -> anyhow::Result<SimplifyConfig> {
        let base = match &self.config {
            Some(path) => read_config(path)?,
            None => SimplifyConfig::default(),
        };
        let bounds = Bounds::new(
            self.min_lon.unwrap_or(base.bounds.min_lon),
            self.max_lon.unwrap_or(base.bounds.max_lon),
            self.min_lat.unwrap_or(base.bounds.min_lat),
            self.max_lat.unwrap_or(base.bounds.max_lat),
        );
        let viewport = Viewport::new(
            self.width.unwrap_or(base.viewport.width),
            self.height.unwrap_or(base.viewport.height),
        );
        Ok(SimplifyConfig::new(bounds, viewport, self.limit.unwrap_or(base.limit)))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout may carry the graph, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.simplify_config()?;
    info!("Bounds: {:?}", config.bounds);
    info!("Viewport: {}x{} px, limit {} px", config.viewport.width, config.viewport.height, config.limit);

    let simplifier = Simplifier::new(config)?;
    let graph = load_dump(&args.input)?.into_graph();
    info!("Loaded {} netboxes and {} links from {:?}", graph.node_count(), graph.edge_count(), args.input);

    let (graph, stats) = simplifier.simplify_with_stats(graph)?;
    info!(
        "Area filter kept {} netboxes; {} rooms; {} places; {} links",
        stats.filtered.nodes, stats.rooms.nodes, stats.places.nodes, stats.combined.edges
    );

    match &args.output {
        Some(path) => {
            write_graph(path, &graph)?;
            info!("Wrote simplified graph to {:?}", path);
        }
        None => write_graph_to(std::io::stdout().lock(), &graph)?,
    }
    Ok(())
}
