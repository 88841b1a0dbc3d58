use std::path::{Path, PathBuf};

use redb::{Database, TableDefinition};
use rusqlite::Connection;
use tempfile::TempDir;

use xyston::config::RankerConfig;
use xyston::engine::{HealthStatus, RankingEngine, SearchRequest};
use xyston::scoring::Bm25Params;

const POSTINGS: TableDefinition<&str, &str> = TableDefinition::new("postings");

fn write_index(path: &Path, entries: &[(&str, &str)]) {
    let db = Database::create(path).unwrap();
    let txn = db.begin_write().unwrap();
    {
        let mut table = txn.open_table(POSTINGS).unwrap();
        for (token, postings) in entries {
            table.insert(*token, *postings).unwrap();
        }
    }
    txn.commit().unwrap();
}

fn write_metadata(path: &Path, docs: &[(i64, i64, &str)]) {
    let conn = Connection::open(path).unwrap();
    conn.execute(
        "CREATE TABLE documents (id INTEGER PRIMARY KEY, length INTEGER NOT NULL, url TEXT NOT NULL)",
        [],
    )
    .unwrap();
    for (id, length, url) in docs {
        conn.execute(
            "INSERT INTO documents (id, length, url) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, length, url],
        )
        .unwrap();
    }
}

fn config_for(dir: &TempDir) -> RankerConfig {
    RankerConfig {
        index_path: dir.path().join("search_index.redb"),
        metadata_path: dir.path().join("metadata.sqlite"),
        default_limit: 10,
        bm25: Bm25Params::default(),
    }
}

/// Ten documents with an average length of exactly 50; docs 1-4 carry
/// distinct lengths and urls, the rest pad the corpus.
fn seed_corpus(config: &RankerConfig) {
    write_index(
        &config.index_path,
        &[("computer", "1,2"), ("cats", "3,4")],
    );

    let mut docs: Vec<(i64, i64, String)> = vec![
        (1, 40, "http://example.com/one".to_string()),
        (2, 60, "http://example.com/two".to_string()),
        (3, 50, "http://example.com/three".to_string()),
        (4, 50, "http://example.com/four".to_string()),
    ];
    for id in 5..=10 {
        docs.push((id, 50, format!("http://example.com/{id}")));
    }
    let rows: Vec<(i64, i64, &str)> = docs
        .iter()
        .map(|(id, len, url)| (*id, *len, url.as_str()))
        .collect();
    write_metadata(&config.metadata_path, &rows);
}

fn seeded_engine(dir: &TempDir) -> RankingEngine {
    let config = config_for(dir);
    seed_corpus(&config);
    RankingEngine::open(&config)
}

#[test]
fn engine_ranks_reference_corpus() {
    let dir = TempDir::new().unwrap();
    let engine = seeded_engine(&dir);

    assert_eq!(engine.health(), HealthStatus::Healthy);
    assert_eq!(engine.stats().avgdl, 50.0);
    assert_eq!(engine.stats().total_docs, 10);

    let results = engine.search("cats", 10);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 3);
    assert_eq!(results[1].id, 4);

    // Both matches sit exactly at the average length, so each score is
    // the bare idf: ln((10 - 2 + 0.5) / (2 + 0.5) + 1) = ln(4.4).
    let expected = 4.4f64.ln();
    assert!((results[0].score - expected).abs() < 1e-9);
    assert!((results[1].score - expected).abs() < 1e-9);

    assert_eq!(results[0].url, "http://example.com/three");
    assert_eq!(results[0].title, "http://example.com/three");
}

#[test]
fn shorter_document_outranks_longer() {
    let dir = TempDir::new().unwrap();
    let engine = seeded_engine(&dir);

    let results = engine.search("computer", 10);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 1);
    assert_eq!(results[1].id, 2);
    assert!(results[0].score > results[1].score);
}

#[test]
fn multi_token_query_scores_each_document_once() {
    let dir = TempDir::new().unwrap();
    let engine = seeded_engine(&dir);

    let results = engine.search("cats and computer", 10);
    assert_eq!(results.len(), 4);

    let mut ids: Vec<i64> = results.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn unmatched_query_returns_empty() {
    let dir = TempDir::new().unwrap();
    let engine = seeded_engine(&dir);

    assert!(engine.search("zebras", 10).is_empty());
    assert!(engine.search("", 10).is_empty());
}

#[test]
fn limit_truncates_ranked_results() {
    let dir = TempDir::new().unwrap();
    let engine = seeded_engine(&dir);

    let results = engine.search("cats computer", 3);
    assert_eq!(results.len(), 3);
}

#[test]
fn missing_index_falls_back_to_stub_postings() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(&dir);
    seed_corpus(&config);
    config.index_path = PathBuf::from(dir.path().join("nonexistent.redb"));

    let engine = RankingEngine::open(&config);
    assert_eq!(engine.health(), HealthStatus::Degraded);
    assert_eq!(engine.index_name(), "stub");

    // The stub carries the same seed postings, and metadata is live, so
    // ranking and enrichment still work end to end.
    let results = engine.search("cats", 10);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, "http://example.com/three");
}

#[test]
fn missing_stores_still_answer_with_defaults() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir);

    let engine = RankingEngine::open(&config);
    assert_eq!(engine.health(), HealthStatus::Degraded);
    assert_eq!(engine.stats().avgdl, 100.0);
    assert_eq!(engine.stats().total_docs, 1000);

    let results = engine.search("cats", 10);
    assert_eq!(results.len(), 2);
    for result in &results {
        assert!(result.score > 0.0);
        assert!(result.url.starts_with("http://xyston.invalid/doc/"));
        assert!(result.title.starts_with("Untitled document"));
    }
}

#[test]
fn deadline_in_the_past_yields_empty() {
    let dir = TempDir::new().unwrap();
    let engine = seeded_engine(&dir);

    let request = SearchRequest::new("cats")
        .with_deadline(std::time::Instant::now() - std::time::Duration::from_millis(1));
    assert!(engine.search_with_request(request).is_empty());
}

#[test]
fn close_degrades_but_search_still_answers() {
    let dir = TempDir::new().unwrap();
    let engine = seeded_engine(&dir);

    engine.close();
    engine.close();
    assert_eq!(engine.health(), HealthStatus::Degraded);

    // Statistics were captured at construction; with metadata gone the
    // survivors fall back to synthetic urls.
    let results = engine.search("cats", 10);
    assert_eq!(results.len(), 2);
    assert!(results[0].url.starts_with("http://xyston.invalid/doc/"));
}

#[test]
fn repeated_queries_are_deterministic() {
    let dir = TempDir::new().unwrap();
    let engine = seeded_engine(&dir);

    let first = engine.search("cats computer", 10);
    let second = engine.search("cats computer", 10);

    let first_ids: Vec<i64> = first.iter().map(|r| r.id).collect();
    let second_ids: Vec<i64> = second.iter().map(|r| r.id).collect();
    assert_eq!(first_ids, second_ids);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.score, b.score);
    }
}
