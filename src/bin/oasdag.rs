//! Command-line driver: `oasdag build` runs the full static pipeline and
//! writes one or more export formats to a directory; `oasdag sequence`
//! prints the execution order needed to reach one operation.

use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use oasdag::{export, pipeline};

/// Static dependency-graph inference over OpenAPI v3 specifications.
#[derive(Parser)]
#[command(about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level to output. Takes precedence over the RUST_LOG environment
    /// variable. [possible values: off, error, warn, info, debug, trace]
    #[arg(long, global = true, value_parser = clap::value_parser!(log::LevelFilter), env = "LOG_LEVEL", ignore_case = true)]
    log_level: Option<log::LevelFilter>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dependency graph for a specification and export it
    Build {
        /// OpenAPI v3 specification to analyze
        #[arg(long, value_name = "OPENAPI_SPEC.YAML")]
        input: PathBuf,
        /// Directory to write export files into; created if missing
        #[arg(long, value_name = "OUTPUT_DIR")]
        output: PathBuf,
        /// Which export format(s) to write
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Print an execution sequence that reaches one operation
    Sequence {
        /// OpenAPI v3 specification to analyze
        #[arg(long, value_name = "OPENAPI_SPEC.YAML")]
        input: PathBuf,
        /// The operation id to find a sequence for
        #[arg(long)]
        operation: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Annotated,
    Dot,
    Graphml,
    Html,
    All,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = cli.log_level {
        builder.filter_level(level);
    }
    builder.init();

    match cli.command {
        Commands::Build { input, output, format } => run_build(&input, &output, format),
        Commands::Sequence { input, operation } => run_sequence(&input, &operation),
    }
}

fn run_build(input: &std::path::Path, output: &std::path::Path, format: Format) -> anyhow::Result<()> {
    let outcome = pipeline::run(input)?;
    fs::create_dir_all(output)?;

    let formats: &[Format] = match format {
        Format::All => &[Format::Json, Format::Annotated, Format::Dot, Format::Graphml, Format::Html],
        _ => std::slice::from_ref(&format),
    };

    for fmt in formats {
        match fmt {
            Format::Json => {
                let json = export::json::export(&outcome.graph);
                fs::write(output.join("graph.json"), serde_json::to_string_pretty(&json)?)?;
            }
            Format::Annotated => {
                let original = fs::read_to_string(input)?;
                let annotated = export::annotated::export(&original, &outcome.graph)?;
                fs::write(output.join("annotated.yaml"), annotated)?;
            }
            Format::Dot => {
                fs::write(output.join("graph.dot"), export::dot::export(&outcome.graph))?;
            }
            Format::Graphml => {
                fs::write(output.join("graph.graphml"), export::graphml::export(&outcome.graph))?;
            }
            Format::Html => {
                fs::write(
                    output.join("report.html"),
                    export::html::export(&outcome.graph, &outcome.report),
                )?;
            }
            Format::All => unreachable!("expanded above"),
        }
    }

    println!(
        "built {} nodes, {} edges ({} candidates, {} rejected for cycles, {} warnings)",
        outcome.graph.node_count(),
        outcome.graph.edge_count(),
        outcome.report.candidate_count,
        outcome.report.rejected_cycle_count,
        outcome.report.warnings.len(),
    );
    Ok(())
}

fn run_sequence(input: &std::path::Path, operation: &str) -> anyhow::Result<()> {
    let outcome = pipeline::run(input)?;
    let sequence = outcome
        .graph
        .sequence_to(operation)
        .ok_or_else(|| anyhow::anyhow!("unknown operation id: {operation}"))?;
    for (i, step) in sequence.iter().enumerate() {
        println!("{}. {step}", i + 1);
    }
    Ok(())
}
