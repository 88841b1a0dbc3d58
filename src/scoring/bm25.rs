//! BM25 scoring for (token, document) pairs.
//!
//! The persisted index keeps no per-occurrence term frequencies, so tf is
//! fixed at 1 for every posting. This is a documented limitation of the
//! index format, not something to compensate for here.

use serde::{Deserialize, Serialize};

/// Configuration for the BM25 ranking function.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bm25Params {
    /// K1 parameter (term frequency saturation).
    pub k1: f64,

    /// B parameter (document length normalization).
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Bm25Params { k1: 1.5, b: 0.75 }
    }
}

/// Inverse document frequency for a token appearing in `doc_freq` of
/// `total_docs` documents.
///
/// `total_docs` is floored to 1 so an empty corpus cannot push the
/// argument of the logarithm negative.
pub fn idf(doc_freq: usize, total_docs: i64) -> f64 {
    let n = total_docs.max(1) as f64;
    let df = doc_freq as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// BM25 contribution of one token to one document, with tf fixed at 1.
///
/// The caller substitutes `avgdl` for a missing or zero `doc_len` before
/// calling; `doc_len` is assumed positive here.
pub fn term_score(idf: f64, doc_len: f64, avgdl: f64, params: &Bm25Params) -> f64 {
    let numerator = idf * (params.k1 + 1.0);
    let denominator = 1.0 + params.k1 * (1.0 - params.b + params.b * (doc_len / avgdl));
    numerator / denominator
}
