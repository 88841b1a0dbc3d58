//! Command implementations for the Xyston CLI.

use std::time::{Duration, Instant};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::RankerConfig;
use crate::engine::{RankingEngine, SearchRequest};
use crate::error::Result;

/// Execute a CLI command.
pub fn execute_command(args: XystonArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => run_search(search_args.clone(), &args),
        Command::Health => run_health(&args),
        Command::Stats => run_stats(&args),
    }
}

/// Build the engine from environment configuration plus CLI overrides.
///
/// Construction never fails; a store that cannot be opened leaves the
/// engine degraded, which the health command reports.
fn open_engine(cli_args: &XystonArgs) -> RankingEngine {
    let mut config = RankerConfig::from_env();
    if let Some(path) = &cli_args.index_path {
        config.index_path = path.clone();
    }
    if let Some(path) = &cli_args.metadata_path {
        config.metadata_path = path.clone();
    }

    if cli_args.verbosity() > 1 {
        println!("Index: {}", config.index_path.display());
        println!("Metadata: {}", config.metadata_path.display());
    }

    RankingEngine::open(&config)
}

/// Rank documents against a query.
fn run_search(args: SearchArgs, cli_args: &XystonArgs) -> Result<()> {
    let engine = open_engine(cli_args);

    let mut request = SearchRequest::new(&args.query);
    if let Some(limit) = args.limit {
        request = request.with_limit(limit);
    }
    if let Some(ms) = args.timeout_ms {
        request = request.with_deadline(Instant::now() + Duration::from_millis(ms));
    }

    let start = Instant::now();
    let results = engine.search_with_request(request);
    let latency_ms = start.elapsed().as_millis() as u64;

    let response = SearchResponse {
        query: args.query,
        meta: SearchMeta {
            count: results.len(),
            latency_ms,
        },
        results,
    };

    output_result("Search completed", &response, cli_args)
}

/// Report backing-store health.
fn run_health(cli_args: &XystonArgs) -> Result<()> {
    let engine = open_engine(cli_args);

    let report = HealthReport {
        status: engine.health(),
    };

    output_result("Engine health", &report, cli_args)
}

/// Show the corpus statistics the engine was constructed with.
fn run_stats(cli_args: &XystonArgs) -> Result<()> {
    let engine = open_engine(cli_args);
    let stats = engine.stats();

    let response = EngineStats {
        index: engine.index_name().to_string(),
        average_document_length: stats.avgdl,
        total_documents: stats.total_docs,
        status: engine.health(),
    };

    output_result("Engine statistics", &response, cli_args)
}
