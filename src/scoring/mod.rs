//! Scoring functions for search relevance.

pub mod bm25;

pub use bm25::Bm25Params;
