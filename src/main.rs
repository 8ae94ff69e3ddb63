//! got CLI: validate and propagate reasoning graphs stored as JSON documents.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use got_reason::config::ReasoningConfig;
use got_reason::graph::{Graph, GraphDocument};
use got_reason::node::NodeId;
use got_reason::pipeline::{PropagationScope, ValidateAndPropagate};
use got_reason::propagate::PropagationService;
use got_reason::validate::{ValidationResult, ValidationSummary, Validator};

#[derive(Parser)]
#[command(
    name = "got",
    version,
    about = "Graph-of-thought reasoning: validation and confidence propagation"
)]
struct Cli {
    /// TOML file overriding the reasoning defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a graph and print the findings as JSON.
    Validate {
        /// Path to a JSON graph document.
        file: PathBuf,

        /// Validate a single layer (causal, epistemic or structural).
        #[arg(long)]
        layer: Option<String>,
    },

    /// Propagate confidence from seed nodes and print the updated graph.
    Propagate {
        /// Path to a JSON graph document.
        file: PathBuf,

        /// Start node ids (comma-separated, e.g. "rain,clouds").
        #[arg(long, value_delimiter = ',')]
        seeds: Vec<String>,

        /// Also run causal propagation after epistemic.
        #[arg(long)]
        causal: bool,
    },

    /// Validate, then propagate, and print both.
    Run {
        /// Path to a JSON graph document.
        file: PathBuf,

        /// Start node ids (comma-separated).
        #[arg(long, value_delimiter = ',')]
        seeds: Vec<String>,

        /// Also run causal propagation after epistemic.
        #[arg(long)]
        causal: bool,
    },
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    summary: ValidationSummary,
    result: &'a ValidationResult,
}

#[derive(Serialize)]
struct RunReport<'a> {
    validation: ValidationReport<'a>,
    scope: PropagationScope,
    graph: GraphDocument,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ReasoningConfig::load(path)?,
        None => ReasoningConfig::default(),
    };

    match cli.command {
        Commands::Validate { file, layer } => {
            let graph = load_graph(&file, &config)?;
            let validator = Validator::with_config(&config);
            let result = match layer {
                Some(name) => validator.validate_layer(&graph, &name)?,
                None => validator.validate(&graph),
            };
            print_json(&ValidationReport {
                summary: result.summary(),
                result: &result,
            })?;
        }

        Commands::Propagate {
            file,
            seeds,
            causal,
        } => {
            let mut graph = load_graph(&file, &config)?;
            let seeds = parse_seeds(&seeds);
            let service = PropagationService::from_config(&config)?;
            if causal {
                service.propagate_all(&mut graph, &seeds);
            } else {
                service.propagate_epistemic(&mut graph, &seeds);
            }
            print_json(&graph.to_document())?;
        }

        Commands::Run {
            file,
            seeds,
            causal,
        } => {
            let mut graph = load_graph(&file, &config)?;
            let seeds = parse_seeds(&seeds);
            let pipeline = ValidateAndPropagate::from_config(&config)?;
            let scope = PropagationScope::from_causal_flag(causal);
            let outcome = pipeline.execute(&mut graph, &seeds, scope);
            print_json(&RunReport {
                validation: ValidationReport {
                    summary: outcome.validation.summary(),
                    result: &outcome.validation,
                },
                scope: outcome.scope,
                graph: graph.to_document(),
            })?;
        }
    }

    Ok(())
}

fn load_graph(path: &Path, config: &ReasoningConfig) -> Result<Graph> {
    let json = std::fs::read_to_string(path).into_diagnostic()?;
    let document = GraphDocument::from_json(&json).into_diagnostic()?;
    let graph = document.into_graph(config.initial_confidence())?;
    tracing::debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

fn parse_seeds(raw: &[String]) -> Vec<NodeId> {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(NodeId::from)
        .collect()
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}
