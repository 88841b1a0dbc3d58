//! Command line argument parsing for the Xyston CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Xyston - a BM25 ranking engine over a precomputed inverted index
#[derive(Parser, Debug, Clone)]
#[command(name = "xyston")]
#[command(about = "A BM25 document ranking engine over a precomputed inverted index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct XystonArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Path to the inverted index (overrides XYSTON_INDEX_PATH)
    #[arg(long, value_name = "INDEX_PATH")]
    pub index_path: Option<PathBuf>,

    /// Path to the metadata store (overrides XYSTON_METADATA_PATH)
    #[arg(long, value_name = "METADATA_PATH")]
    pub metadata_path: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl XystonArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Rank documents against a query
    Search(SearchArgs),

    /// Report backing-store health
    Health,

    /// Show corpus statistics the engine was constructed with
    Stats,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of results to return (default from configuration)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Abandon the search after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
