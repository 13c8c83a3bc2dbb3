//! Command-line driver: parse a hypergraph, optionally precondition it, search for a
//! width-bounded GHD, and print the result.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use ghd_search::config::{Algorithm, BalSepMode, DetKMode, Parallelism, SearchConfig};
use ghd_search::engine;
use ghd_search::error::GhdError;
use ghd_search::graph::Graph;
use ghd_search::heuristics::{degree_order, max_separator_order, msco_order};
use ghd_search::names::NameTable;
use ghd_search::parse::{hyperbench::parse_hyperbench, pace::parse_pace, update::parse_update};
use ghd_search::reductions::{gyo_reduct, type_collapse};
use ghd_search::validate::validate;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Choice {
    /// Full parallelism: parallel separator search, parallel children recursion.
    Full = 1,
    /// Parallel separator search only.
    Search = 2,
    /// Parallel children recursion only.
    Comp = 3,
    /// No parallelism anywhere.
    Sequential = 4,
    /// Full parallelism, BalSep local attachment instead of rerooting.
    LocalFull = 5,
    /// Search-only parallelism, BalSep local attachment.
    LocalSearch = 6,
    /// Comp-only parallelism, BalSep local attachment.
    LocalComp = 7,
    /// Sequential, BalSep local attachment.
    LocalSequential = 8,
}

impl Choice {
    fn parallelism(self) -> Parallelism {
        match self {
            Choice::Full | Choice::LocalFull => Parallelism::Full,
            Choice::Search | Choice::LocalSearch => Parallelism::Search,
            Choice::Comp | Choice::LocalComp => Parallelism::Comp,
            Choice::Sequential | Choice::LocalSequential => Parallelism::Sequential,
        }
    }

    fn balsep_mode(self) -> BalSepMode {
        match self {
            Choice::LocalFull | Choice::LocalSearch | Choice::LocalComp | Choice::LocalSequential => {
                BalSepMode::Local
            }
            _ => BalSepMode::Global,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Heuristic {
    Degree,
    MaxSeparator,
    Msco,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Hyperbench,
    Pace,
    Update,
}

#[derive(Parser, Debug)]
#[command(name = "ghd-decomp", about = "Search for width-bounded generalized hypertree decompositions")]
struct Cli {
    /// Path to the input hypergraph file.
    #[arg(long = "graph")]
    graph: PathBuf,

    /// Input format.
    #[arg(long, value_enum, default_value = "hyperbench")]
    format: Format,

    /// Width to search for (a positive integer).
    #[arg(long)]
    width: usize,

    /// Algorithm to run.
    #[arg(long, default_value = "balsep")]
    algorithm: Algorithm,

    /// Force the BalSep algorithm, overriding --algorithm. Convenience alias; does not replicate
    /// the original tool's hardcoded test-harness special edges.
    #[arg(long = "akatov")]
    akatov: bool,

    /// Force the DetK algorithm, overriding --algorithm. Convenience alias; does not replicate
    /// the original tool's hardcoded test-harness special edges.
    #[arg(long = "det")]
    det: bool,

    /// Parallelism/attachment strategy.
    #[arg(long, value_enum)]
    choice: Option<Choice>,

    /// Balance factor used by the balanced-separator check.
    #[arg(long = "balfactor", default_value_t = 2)]
    balance_factor: usize,

    /// Edge-ordering heuristic to apply before searching.
    #[arg(long, value_enum)]
    heuristic: Option<Heuristic>,

    /// Precompute subedges before searching (DetK only).
    #[arg(long = "sub")]
    subedges: bool,

    /// Perform a GYÖ reduction and show the resulting graph.
    #[arg(short = 'g', long = "gyo")]
    gyo: bool,

    /// Perform a type collapse and show the resulting graph.
    #[arg(short = 't', long = "type-collapse")]
    type_collapse: bool,

    /// Use the isHinge optimization. Accepted for interface parity; not implemented.
    #[arg(long = "hinge")]
    hinge: bool,

    /// Enable verbose logging (equivalent to setting RUST_LOG=debug).
    #[arg(long = "log")]
    log: bool,

    /// Number of worker threads to use (defaults to all available).
    #[arg(long = "cpu")]
    num_threads: Option<usize>,

    /// Write a CPU profile to this path. Accepted for interface parity; profiling itself is not
    /// implemented.
    #[arg(long = "cpuprofile")]
    cpuprofile: Option<PathBuf>,
}

fn parse_graph(format: Format, input: &str) -> Result<(Graph, NameTable), GhdError> {
    match format {
        Format::Hyperbench => parse_hyperbench(input),
        Format::Pace => parse_pace(input),
        Format::Update => parse_update(input).map(|(graph, _specials, names)| (graph, names)),
    }
}

struct Millis(f64);

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5} ms", self.0)
    }
}

fn main() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() && std::env::args().any(|a| a == "--log") {
        env_logger::Builder::new().filter_level(log::LevelFilter::Debug).init();
    } else {
        env_logger::init();
    }
    let mut cli = Cli::parse();

    if cli.akatov {
        cli.algorithm = Algorithm::BalSep;
    }
    if cli.det {
        cli.algorithm = Algorithm::DetK;
    }
    if cli.hinge {
        log::warn!("--hinge was given but the isHinge optimization is not implemented");
    }

    if cli.width == 0 {
        return Err(GhdError::InvalidWidth(cli.width).into());
    }

    if let Some(path) = &cli.cpuprofile {
        std::fs::File::create(path)
            .with_context(|| format!("cpuprofile path {path:?} is not writable"))?;
        log::warn!("--cpuprofile was given but CPU profiling is not implemented");
    }

    let input = std::fs::read_to_string(&cli.graph)
        .with_context(|| format!("failed to read graph file {:?}", cli.graph))?;
    let (mut graph, _names) = parse_graph(cli.format, &input)?;

    if cli.type_collapse {
        let (collapsed, _groups, count) = type_collapse(&graph);
        log::info!("type collapse removed {count} vertex/vertices");
        graph = collapsed;
    }

    if cli.gyo {
        let (reduced, ops) = gyo_reduct(&graph);
        log::info!("GYÖ reduction performed {} steps", ops.len());
        graph = reduced;
    }

    if cli.subedges && !matches!(cli.algorithm, Algorithm::DetK) {
        let widened = ghd_search::subedge::compute_subedges(&graph.edges, cli.width);
        graph = Graph::new(widened, graph.specials);
    }

    let ordered_edges = match cli.heuristic {
        Some(Heuristic::Degree) => Some(degree_order(&graph.edges)),
        Some(Heuristic::MaxSeparator) => Some(max_separator_order(&graph.edges)),
        Some(Heuristic::Msco) => Some(msco_order(&graph.edges)),
        None => None,
    };
    if let Some(ordered) = ordered_edges {
        graph = Graph::new(ordered, graph.specials);
    }

    let mut config = SearchConfig::new(cli.width, cli.algorithm).with_balance_factor(cli.balance_factor);
    if let Some(choice) = cli.choice {
        config = config
            .with_parallelism(choice.parallelism())
            .with_balsep_mode(choice.balsep_mode());
    }
    if cli.subedges {
        config = config.with_detk_mode(DetKMode::SubEdge);
    }
    if let Some(n) = cli.num_threads {
        config = config.with_num_threads(n);
    }

    let graph_edges = graph.edges.clone();
    let built = engine::build(graph, &config);

    let start = Instant::now();
    let decomp = built.find_decomp(&config);
    let elapsed = Millis(start.elapsed().as_secs_f64() * 1000.0);

    match decomp {
        Some(decomp) => {
            println!("Result:\n{decomp}");
            println!("Time: {elapsed}");
            println!("Width: {}", decomp.width());
            let failures = validate(&decomp, &graph_edges, cli.width);
            if failures.is_empty() {
                println!("Correct: true");
            } else {
                println!("Correct: false");
                for f in failures {
                    println!("  - {f}");
                }
                anyhow::bail!("produced decomposition failed validation");
            }
            Ok(())
        }
        None => {
            println!("No width-{} decomposition exists", cli.width);
            println!("Time: {elapsed}");
            Ok(())
        }
    }
}
