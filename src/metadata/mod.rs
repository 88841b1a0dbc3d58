//! Document metadata access for the ranking engine.
//!
//! The metadata store holds per-document lengths and URLs plus the
//! corpus-wide statistics BM25 needs. Every method degrades to a fixed
//! documented default on connectivity or query failure instead of
//! returning an error; the ranking path has no failure mode by contract.

use std::collections::HashMap;

use crate::index::DocId;

pub mod sqlite;

pub use sqlite::SqliteMetadataStore;

/// Average document length used when the store cannot answer.
pub const DEFAULT_AVGDL: f64 = 100.0;

/// Total document count used when the store cannot answer.
pub const DEFAULT_TOTAL_DOCS: i64 = 1000;

/// Read access to per-document metadata and corpus statistics.
///
/// Implementations never fail: each method falls back to its documented
/// default when the store is unavailable or a query errors.
pub trait MetadataStore: Send + Sync + std::fmt::Debug {
    /// Mean document length across the corpus, or [`DEFAULT_AVGDL`].
    fn average_document_length(&self) -> f64;

    /// Total number of documents, or [`DEFAULT_TOTAL_DOCS`].
    fn total_document_count(&self) -> i64;

    /// Lengths for the resolvable subset of `ids`; empty on failure.
    ///
    /// A single-id request and a multi-id request return identical results
    /// for identical inputs; only the query shape may differ.
    fn batch_document_lengths(&self, ids: &[DocId]) -> HashMap<DocId, i64>;

    /// URL for a document, or `None` when unresolvable. The caller
    /// substitutes a synthetic placeholder.
    fn resolve_url(&self, id: DocId) -> Option<String>;

    /// Whether the backing connection is live.
    fn is_available(&self) -> bool;

    /// Release the backing connection. Idempotent.
    fn close(&self);
}
