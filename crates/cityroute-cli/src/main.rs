use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cityroute_cli::commands::assign::{handle_assign, handle_dispatch, DispatchArgs};
use cityroute_cli::commands::route::{
    handle_all_pairs, handle_alternatives, handle_route, handle_station, AlternativesArgs,
    RouteArgs, StationArgs,
};
use cityroute_cli::commands::{build_router, parse_placement, parse_traffic, StrategyArg};
use cityroute_cli::loader::load_graph;
use cityroute_cli::output::OutputFormat;
use cityroute_lib::{
    NodeId, Router, RouterConfig, DEFAULT_ASTAR_THRESHOLD, DEFAULT_CACHE_CAPACITY,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Traffic-aware city routing and dispatch")]
struct Cli {
    /// Graph file (JSON) to route over.
    #[arg(long, env = "CITYROUTE_GRAPH", global = true)]
    graph: Option<PathBuf>,

    /// Maximum number of cached routes.
    #[arg(long, env = "CITYROUTE_CACHE_CAPACITY", default_value_t = DEFAULT_CACHE_CAPACITY, global = true)]
    cache_capacity: usize,

    /// Straight-line distance above which A* replaces Dijkstra.
    #[arg(long, env = "CITYROUTE_ASTAR_THRESHOLD", default_value_t = DEFAULT_ASTAR_THRESHOLD, global = true)]
    astar_threshold: f64,

    /// Traffic override applied before routing; may be repeated.
    #[arg(long = "traffic", value_name = "NODE=MULTIPLIER", value_parser = parse_traffic, global = true)]
    traffic: Vec<(NodeId, f64)>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the best route between two nodes.
    Route {
        #[arg(long = "from", allow_negative_numbers = true)]
        from: NodeId,
        #[arg(long = "to", allow_negative_numbers = true)]
        to: NodeId,
        #[arg(long, value_enum, default_value_t = StrategyArg::Balanced)]
        strategy: StrategyArg,
        /// Use the learning A* search.
        #[arg(long)]
        adaptive: bool,
    },
    /// List several distinct routes between two nodes.
    Alternatives {
        #[arg(long = "from", allow_negative_numbers = true)]
        from: NodeId,
        #[arg(long = "to", allow_negative_numbers = true)]
        to: NodeId,
        #[arg(long, value_enum, default_value_t = StrategyArg::Balanced)]
        strategy: StrategyArg,
        /// Maximum number of routes.
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
    /// Print the distance between every pair of nodes.
    AllPairs,
    /// Choose the station site with the best worst-case response distance.
    Station {
        /// Candidate nodes, comma separated.
        #[arg(long, value_delimiter = ',', required = true)]
        candidates: Vec<NodeId>,
        /// Nodes to serve, comma separated; defaults to every node.
        #[arg(long, value_delimiter = ',')]
        demand: Vec<NodeId>,
        /// Report how many nodes lie within this distance of the site.
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Solve an assignment problem from a JSON cost file.
    Assign {
        #[arg(long)]
        costs: PathBuf,
    },
    /// Assign units to tasks by travel distance over the graph.
    Dispatch {
        /// Unit placement; may be repeated.
        #[arg(long = "unit", value_name = "NAME=NODE", value_parser = parse_placement, required = true)]
        units: Vec<(String, NodeId)>,
        /// Task placement; may be repeated.
        #[arg(long = "task", value_name = "NAME=NODE", value_parser = parse_placement, required = true)]
        tasks: Vec<(String, NodeId)>,
        #[arg(long, value_enum, default_value_t = StrategyArg::Balanced)]
        strategy: StrategyArg,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let started = Instant::now();

    let output = match &cli.command {
        Command::Assign { costs } => handle_assign(costs, cli.format)?,
        command => {
            let router = load_router(&cli)?;
            run_graph_command(&router, command, cli.format)?
        }
    };
    print!("{output}");

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::debug!(elapsed_ms, "command finished");
    Ok(())
}

fn load_router(cli: &Cli) -> Result<Router> {
    let path: &Path = cli
        .graph
        .as_deref()
        .context("a graph file is required; pass --graph or set CITYROUTE_GRAPH")?;
    let graph = load_graph(path)?;
    let config = RouterConfig {
        cache_capacity: cli.cache_capacity,
        astar_threshold: cli.astar_threshold,
    };
    build_router(graph, config, &cli.traffic)
}

fn run_graph_command(router: &Router, command: &Command, format: OutputFormat) -> Result<String> {
    match command {
        Command::Route {
            from,
            to,
            strategy,
            adaptive,
        } => handle_route(
            router,
            &RouteArgs {
                from: *from,
                to: *to,
                strategy: (*strategy).into(),
                adaptive: *adaptive,
            },
            format,
        ),
        Command::Alternatives {
            from,
            to,
            strategy,
            count,
        } => handle_alternatives(
            router,
            &AlternativesArgs {
                from: *from,
                to: *to,
                strategy: (*strategy).into(),
                count: *count,
            },
            format,
        ),
        Command::AllPairs => handle_all_pairs(router, format),
        Command::Station {
            candidates,
            demand,
            radius,
        } => handle_station(
            router,
            &StationArgs {
                candidates: candidates.clone(),
                demand: demand.clone(),
                radius: *radius,
            },
            format,
        ),
        Command::Dispatch {
            units,
            tasks,
            strategy,
        } => handle_dispatch(
            router,
            &DispatchArgs {
                units: units.clone(),
                tasks: tasks.clone(),
                strategy: (*strategy).into(),
            },
            format,
        ),
        Command::Assign { costs } => handle_assign(costs, format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
