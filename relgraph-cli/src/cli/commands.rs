//! Command implementations and argument parsing for the relgraph CLI.

use std::collections::HashSet;
use std::io::{self, Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use relgraph_core::{
    BitMatrix, GenerationSummary, GeneratorParams, Graph, GraphGenerator, IdentityMapping,
    RelgraphError, convert,
    generate::{DEFAULT_DEGREE_OFFSET, DEFAULT_MAX_REJECTIONS, DEFAULT_RNG_SEED, constant},
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "relgraph", about = "Generate random graphs and inspect their shape.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build a graph over the labels `0..N` and connect it with a policy.
    Generate(GenerateCommand),
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Number of nodes, labelled `0..N`.
    #[arg(long)]
    pub nodes: u32,
    /// Edge-placement policy.
    #[arg(long, value_enum)]
    pub policy: Policy,
    /// Final edge count. Required by `random` and `preferential`.
    #[arg(long)]
    pub edges: Option<u64>,
    /// Seed for the generator's random number generator.
    #[arg(long, default_value_t = DEFAULT_RNG_SEED)]
    pub seed: u64,
    /// Offset added to every degree by the preferential policy.
    #[arg(long = "degree-offset", default_value_t = DEFAULT_DEGREE_OFFSET)]
    pub degree_offset: f64,
    /// Consecutive rejected draws tolerated by the preferential policy.
    #[arg(long = "max-rejections", default_value_t = DEFAULT_MAX_REJECTIONS)]
    pub max_rejections: u64,
    /// Print the adjacency matrix after the summary.
    #[arg(long)]
    pub adjacency: bool,
}

/// Edge-placement policies exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Connect every ordered pair of distinct nodes.
    Complete,
    /// Draw both endpoints uniformly; loops and parallel edges allowed.
    Random,
    /// Draw endpoints proportionally to their degree.
    Preferential,
}

impl Policy {
    const fn label(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Random => "random",
            Self::Preferential => "preferential",
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A sampling policy was chosen without a target edge count.
    #[error("the `{policy}` policy requires `--edges`")]
    MissingEdges {
        /// Label of the selected policy.
        policy: &'static str,
    },
    /// `--edges` was supplied to the complete policy, which fixes its own count.
    #[error("the `complete` policy does not accept `--edges`")]
    UnexpectedEdges,
    /// Core generation or conversion failed.
    #[error(transparent)]
    Core(#[from] RelgraphError),
}

/// Shape of a generated graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Policy that placed the edges.
    pub policy: Policy,
    /// Node count.
    pub nodes: usize,
    /// Edge count.
    pub edges: usize,
    /// Edges whose endpoints coincide.
    pub self_loops: usize,
    /// Edges repeating an earlier `(source, target)` pair.
    pub duplicate_pairs: usize,
    /// Largest node degree, counting a self-loop once.
    pub max_degree: usize,
    /// Counters reported by the generator.
    pub summary: GenerationSummary,
    /// Adjacency matrix, present when `--adjacency` was requested.
    pub adjacency: Option<BitMatrix>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the arguments are inconsistent or generation
/// fails.
///
/// # Examples
/// ```
/// # use relgraph_cli::cli::{Cli, Command, GenerateCommand, Policy, run_cli};
/// let cli = Cli {
///     command: Command::Generate(GenerateCommand {
///         nodes: 4,
///         policy: Policy::Complete,
///         edges: None,
///         seed: 1,
///         degree_offset: 0.1,
///         max_rejections: 1_000,
///         adjacency: false,
///     }),
/// };
/// let report = run_cli(cli)?;
/// assert_eq!(report.edges, 12);
/// assert_eq!(report.max_degree, 6);
/// # Ok::<(), relgraph_cli::cli::CliError>(())
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<GenerationReport, CliError> {
    match cli.command {
        Command::Generate(generate) => {
            Span::current().record("command", field::display("generate"));
            run_generate(&generate)
        }
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(nodes = command.nodes, policy = command.policy.label(), seed = command.seed),
)]
pub(super) fn run_generate(command: &GenerateCommand) -> Result<GenerationReport, CliError> {
    let params = GeneratorParams::new()
        .with_rng_seed(command.seed)
        .with_degree_offset(command.degree_offset)
        .with_max_rejections(command.max_rejections);
    let mut generator = GraphGenerator::new(params)?;
    let mut graph: Graph<u64, ()> = Graph::try_from_node_values(0..u64::from(command.nodes))?;

    let summary = match (command.policy, command.edges) {
        (Policy::Complete, None) => generator.complete(&mut graph, constant(()))?,
        (Policy::Complete, Some(_)) => return Err(CliError::UnexpectedEdges),
        (Policy::Random, Some(target)) => generator.random(&mut graph, target, constant(()))?,
        (Policy::Preferential, Some(target)) => {
            generator.preferential(&mut graph, target, constant(()))?
        }
        (policy, None) => {
            return Err(CliError::MissingEdges {
                policy: policy.label(),
            });
        }
    };

    let adjacency = if command.adjacency {
        let mapping = IdentityMapping::new(u64::from(command.nodes));
        Some(convert::to_bit_matrix(&graph, &mapping, convert::accept_all)?)
    } else {
        None
    };

    let report = describe(&graph, command.policy, summary, adjacency);
    info!(
        edges = report.edges,
        self_loops = report.self_loops,
        duplicate_pairs = report.duplicate_pairs,
        "generation completed"
    );
    Ok(report)
}

pub(super) fn describe<V, E>(
    graph: &Graph<V, E>,
    policy: Policy,
    summary: GenerationSummary,
    adjacency: Option<BitMatrix>,
) -> GenerationReport {
    let mut seen = HashSet::with_capacity(graph.edge_count());
    let mut self_loops = 0;
    let mut duplicate_pairs = 0;
    for edge in graph.edges() {
        if edge.is_self_loop() {
            self_loops += 1;
        }
        if !seen.insert((edge.source(), edge.target())) {
            duplicate_pairs += 1;
        }
    }

    GenerationReport {
        policy,
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        self_loops,
        duplicate_pairs,
        max_degree: graph.nodes().map(|node| node.degree()).max().unwrap_or(0),
        summary,
        adjacency,
    }
}

/// Renders `report` to `writer` as `key: value` lines, followed by one
/// `0`/`1` row per node when the adjacency matrix was requested.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use relgraph_cli::cli::{Cli, Command, GenerateCommand, Policy, render_summary, run_cli};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_cli(Cli {
///     command: Command::Generate(GenerateCommand {
///         nodes: 2,
///         policy: Policy::Complete,
///         edges: None,
///         seed: 0,
///         degree_offset: 0.1,
///         max_rejections: 10,
///         adjacency: true,
///     }),
/// })?;
/// let mut buffer = Vec::new();
/// render_summary(&report, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.ends_with("01\n10\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(report: &GenerationReport, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "policy: {}", report.policy.label())?;
    writeln!(writer, "nodes: {}", report.nodes)?;
    writeln!(writer, "edges: {}", report.edges)?;
    writeln!(writer, "self-loops: {}", report.self_loops)?;
    writeln!(writer, "duplicate pairs: {}", report.duplicate_pairs)?;
    writeln!(writer, "max degree: {}", report.max_degree)?;
    writeln!(writer, "rejected draws: {}", report.summary.rejected_draws)?;
    if let Some(matrix) = &report.adjacency {
        for row in 0..matrix.dimension() {
            let line: String = (0..matrix.dimension())
                .map(|column| if matrix.get(row, column) { '1' } else { '0' })
                .collect();
            writeln!(writer, "{line}")?;
        }
    }
    Ok(())
}
