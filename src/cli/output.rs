//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, XystonArgs};
use crate::engine::{HealthStatus, ScoredDocument};
use crate::error::Result;

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<ScoredDocument>,
    pub meta: SearchMeta,
}

/// Request-level metadata attached to a search response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchMeta {
    pub count: usize,
    pub latency_ms: u64,
}

/// Result structure for the health command.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
}

/// Result structure for the stats command.
#[derive(Debug, Serialize, Deserialize)]
pub struct EngineStats {
    pub index: String,
    pub average_document_length: f64,
    pub total_documents: i64,
    pub status: HealthStatus,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &XystonArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &XystonArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;

    if std::any::type_name::<T>().contains("SearchResponse") {
        output_search_response_human(&value)
    } else {
        output_generic_human(&value)
    }
}

/// Output search results in human format.
fn output_search_response_human(value: &serde_json::Value) -> Result<()> {
    let Some(obj) = value.as_object() else {
        return Ok(());
    };

    if let Some(results) = obj.get("results").and_then(|r| r.as_array()) {
        println!("Search Results:");
        println!("═══════════════");

        for (i, result) in results.iter().enumerate() {
            println!();
            println!(
                "Result {}: (Score: {:.4})",
                i + 1,
                result.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0)
            );
            println!("─────────────");

            if let Some(id) = result.get("id").and_then(|d| d.as_i64()) {
                println!("id: {id}");
            }
            if let Some(url) = result.get("url").and_then(|u| u.as_str()) {
                println!("url: {url}");
            }
            if let Some(title) = result.get("title").and_then(|t| t.as_str()) {
                println!("title: {title}");
            }
        }
    }

    println!();

    if let Some(meta) = obj.get("meta").and_then(|m| m.as_object()) {
        if let Some(count) = meta.get("count").and_then(|c| c.as_u64()) {
            println!("Total results: {count}");
        }
        if let Some(latency) = meta.get("latency_ms").and_then(|l| l.as_u64()) {
            println!("Search time: {latency}ms");
        }
    }

    Ok(())
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                println!("{key}: {}", format_value(val));
            }
        }
        _ => println!("{}", format_value(value)),
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &XystonArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
