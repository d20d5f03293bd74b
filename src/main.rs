//! pawnsym
//!
//! Replays a declaration event script through the symbol table core and
//! reports name resolution diagnostics.

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pawnsym::{Analysis, Options, Script, SemanticAnalyzer};

/// Pawn symbol table checker
#[derive(Parser, Debug)]
#[command(name = "pawnsym")]
#[command(author = "Z1529")]
#[command(version = "0.1.0")]
#[command(about = "Symbol table and name resolution checker for Pawn declaration scripts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check an event script for naming errors
    Check {
        /// Input event script (JSON)
        input: PathBuf,

        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,

        /// Print the function reference graph and removable functions
        #[arg(long)]
        graph: bool,

        /// Disable a warning by number (repeatable)
        #[arg(short = 'w', value_name = "CODE")]
        disable: Vec<u32>,

        /// Treat warnings as errors
        #[arg(long)]
        warnings_as_errors: bool,

        /// Implicit entry point for reachability
        #[arg(long, default_value = "main")]
        entry: String,
    },
    /// Print version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            input,
            json,
            graph,
            disable,
            warnings_as_errors,
            entry,
        } => {
            let options = Options {
                disabled_warnings: disable,
                warnings_as_errors,
            };
            match check_file(&input, options, &entry) {
                Ok(analysis) => {
                    report(&analysis, json, graph);
                    if analysis.cc.diags.has_errors() {
                        process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    process::exit(1);
                }
            }
        }
        Commands::Version => {
            println!("pawnsym 0.1.0");
            println!("License: Apache-2.0");
        }
    }
}

/// Load and analyze an event script
fn check_file(input: &PathBuf, options: Options, entry: &str) -> Result<Analysis> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let script = Script::from_json(&source)
        .with_context(|| format!("parsing {}", input.display()))?;
    log::info!("{}: {} events", script.file, script.events.len());

    let analysis = SemanticAnalyzer::with_options(options)
        .with_entry(entry)
        .analyze(&script)
        .with_context(|| format!("analyzing {}", script.file))?;
    Ok(analysis)
}

fn report(analysis: &Analysis, json: bool, graph: bool) {
    let diags = &analysis.cc.diags;
    if json {
        println!("{}", diags.to_json());
    } else {
        for diag in diags.all() {
            println!("{}", diag.render(&analysis.file));
        }
    }

    if graph {
        println!("references:");
        for (from, to) in analysis.edge_names() {
            println!("  {} -> {}", from, to);
        }
        println!("removable:");
        for name in analysis.removable_names() {
            println!("  {}", name);
        }
    }

    if !json {
        println!(
            "{} error(s), {} warning(s)",
            diags.error_count(),
            diags.warning_count()
        );
    }
}
