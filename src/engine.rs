//! The ranking engine: orchestrates tokenization, posting-list
//! retrieval, BM25 scoring, top-k selection, and metadata enrichment.
//!
//! The engine is constructed once at process start and handed to request
//! handlers; construction never fails. A store that cannot be opened
//! pushes the engine into degraded mode for that store (stub postings,
//! documented metadata defaults) instead of aborting, and nothing inside
//! [`RankingEngine::search`] surfaces an error to the caller.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::QueryTokenizer;
use crate::config::RankerConfig;
use crate::index::{DocId, IndexClient, StoreIndexClient, StubIndexClient};
use crate::metadata::{DEFAULT_AVGDL, MetadataStore, SqliteMetadataStore};
use crate::scoring::bm25::{self, Bm25Params};

/// Health of the engine's backing stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Both backing stores are live.
    Healthy,
    /// At least one backing store is unavailable (or the engine is closed).
    Degraded,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
        }
    }
}

/// Corpus-wide statistics, computed once at engine construction and held
/// for the engine's lifetime. The ranking path never refreshes them.
#[derive(Debug, Clone, Copy)]
pub struct GlobalStats {
    /// Average document length across the corpus. Always positive.
    pub avgdl: f64,

    /// Total number of documents in the corpus.
    pub total_docs: i64,
}

/// One ranked search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// Document identifier.
    pub id: DocId,

    /// Cumulative BM25 score across all matched query tokens.
    pub score: f64,

    /// Document URL, or a synthetic placeholder when unresolvable.
    pub url: String,

    /// Document title. The corpus stores no titles, so this is derived
    /// from the URL.
    pub title: String,
}

/// A search request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,

    /// Number of results to return; the engine's configured default when
    /// unset.
    pub limit: Option<usize>,

    /// Optional deadline. When it passes mid-search the remaining work is
    /// abandoned and the request yields an empty result rather than a
    /// partial, unsorted one.
    pub deadline: Option<Instant>,
}

impl SearchRequest {
    /// Create a request for the given query with default limit and no
    /// deadline.
    pub fn new<S: Into<String>>(query: S) -> Self {
        SearchRequest {
            query: query.into(),
            limit: None,
            deadline: None,
        }
    }

    /// Set the number of results to return.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set a deadline for the request.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Reserved host for synthetic URLs; `.invalid` can never be a real
/// crawled origin.
const SYNTHETIC_HOST: &str = "xyston.invalid";

fn synthetic_url(id: DocId) -> String {
    format!("http://{SYNTHETIC_HOST}/doc/{id}")
}

fn synthetic_title(id: DocId) -> String {
    format!("Untitled document {id}")
}

/// BM25 ranking engine over an inverted index and a metadata store.
pub struct RankingEngine {
    tokenizer: QueryTokenizer,
    index: Box<dyn IndexClient>,
    metadata: Box<dyn MetadataStore>,
    stats: GlobalStats,
    params: Bm25Params,
    default_limit: usize,
    index_live: bool,
    closed: AtomicBool,
}

impl fmt::Debug for RankingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankingEngine")
            .field("index", &self.index.name())
            .field("stats", &self.stats)
            .field("health", &self.health())
            .finish()
    }
}

impl RankingEngine {
    /// Construct an engine from configuration.
    ///
    /// Never fails. If the inverted index cannot be opened the engine
    /// falls back to the built-in stub postings; if the metadata store
    /// cannot be opened all metadata methods degrade to their documented
    /// defaults. Either fallback is reported through [`Self::health`],
    /// and the choice is made exactly once - it is not re-evaluated per
    /// request.
    pub fn open(config: &RankerConfig) -> Self {
        let (index, index_live): (Box<dyn IndexClient>, bool) =
            match StoreIndexClient::open(&config.index_path) {
                Ok(client) => (Box::new(client), true),
                Err(e) => {
                    warn!("{e}; falling back to stub index");
                    (Box::new(StubIndexClient::new()), false)
                }
            };

        let metadata = Box::new(SqliteMetadataStore::open(&config.metadata_path));

        Self::build(index, index_live, metadata, config.bm25, config.default_limit)
    }

    /// Construct an engine from injected collaborators.
    ///
    /// The injected index client is taken to be live; degraded health can
    /// still arise from the metadata store.
    pub fn with_parts(
        index: Box<dyn IndexClient>,
        metadata: Box<dyn MetadataStore>,
        params: Bm25Params,
        default_limit: usize,
    ) -> Self {
        Self::build(index, true, metadata, params, default_limit)
    }

    fn build(
        index: Box<dyn IndexClient>,
        index_live: bool,
        metadata: Box<dyn MetadataStore>,
        params: Bm25Params,
        default_limit: usize,
    ) -> Self {
        let avgdl = metadata.average_document_length();
        let stats = GlobalStats {
            // The avgdl > 0 invariant holds even against a misbehaving
            // injected store.
            avgdl: if avgdl > 0.0 { avgdl } else { DEFAULT_AVGDL },
            total_docs: metadata.total_document_count().max(0),
        };

        let engine = RankingEngine {
            tokenizer: QueryTokenizer::new(),
            index,
            metadata,
            stats,
            params,
            default_limit,
            index_live,
            closed: AtomicBool::new(false),
        };
        info!(
            "ranking engine ready: index={}, avgdl={}, total_docs={}, health={}",
            engine.index.name(),
            engine.stats.avgdl,
            engine.stats.total_docs,
            engine.health()
        );
        engine
    }

    /// Corpus statistics the engine was constructed with.
    pub fn stats(&self) -> GlobalStats {
        self.stats
    }

    /// Name of the index backend actually chosen at construction.
    pub fn index_name(&self) -> &'static str {
        self.index.name()
    }

    /// Rank documents against `query` and return the top `k`.
    ///
    /// Never fails; an empty or unmatched query yields an empty vector.
    pub fn search(&self, query: &str, k: usize) -> Vec<ScoredDocument> {
        self.search_with_request(SearchRequest::new(query).with_limit(k))
    }

    /// Rank documents for a full [`SearchRequest`].
    pub fn search_with_request(&self, request: SearchRequest) -> Vec<ScoredDocument> {
        let limit = request.limit.unwrap_or(self.default_limit);

        // 1. Tokenize; an empty token list short-circuits before any
        //    store is touched.
        let tokens = self.tokenizer.tokenize(&request.query);
        if tokens.is_empty() {
            debug!("query {:?} produced no tokens", request.query);
            return Vec::new();
        }

        // 2. Posting-list retrieval per distinct token. The candidate
        //    vector preserves first-encountered order: token order, then
        //    posting order within a token. That order is the tie-break
        //    contract for equal scores.
        let mut seen_tokens: HashSet<&str> = HashSet::new();
        let mut token_postings: Vec<(usize, Vec<DocId>)> = Vec::new();
        let mut candidates: Vec<DocId> = Vec::new();
        let mut candidate_set: HashSet<DocId> = HashSet::new();

        for token in &tokens {
            if !seen_tokens.insert(token.as_str()) {
                continue;
            }
            if request.expired() {
                debug!("search cancelled during posting retrieval");
                return Vec::new();
            }
            let Some(postings) = self.index.lookup(token) else {
                continue;
            };
            if postings.is_empty() {
                continue;
            }
            for &doc_id in &postings {
                if candidate_set.insert(doc_id) {
                    candidates.push(doc_id);
                }
            }
            token_postings.push((postings.len(), postings));
        }

        // 3. No candidates: done, without touching the metadata store.
        if candidates.is_empty() {
            return Vec::new();
        }

        // 4. Batch-fetch document lengths for the whole candidate set.
        let lengths = self.metadata.batch_document_lengths(&candidates);

        // 5. Accumulate BM25 contributions per (token, document) pair.
        let mut scores: HashMap<DocId, f64> = HashMap::with_capacity(candidates.len());
        for (doc_freq, postings) in &token_postings {
            if request.expired() {
                debug!("search cancelled during scoring");
                return Vec::new();
            }
            let idf = bm25::idf(*doc_freq, self.stats.total_docs);
            for &doc_id in postings {
                let doc_len = match lengths.get(&doc_id) {
                    Some(&len) if len > 0 => len as f64,
                    _ => self.stats.avgdl,
                };
                *scores.entry(doc_id).or_insert(0.0) +=
                    bm25::term_score(idf, doc_len, self.stats.avgdl, &self.params);
            }
        }

        // 6./7. Stable sort by score descending over insertion order,
        //       then truncate to the requested k.
        let mut ranked: Vec<(DocId, f64)> = candidates
            .iter()
            .map(|&doc_id| (doc_id, scores.get(&doc_id).copied().unwrap_or(0.0)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit);

        if request.expired() {
            debug!("search cancelled before enrichment");
            return Vec::new();
        }

        // 8./9. Enrich the survivors with URLs; unresolvable documents
        //       get a clearly synthetic placeholder.
        ranked
            .into_iter()
            .map(|(id, score)| match self.metadata.resolve_url(id) {
                Some(url) => ScoredDocument {
                    id,
                    score,
                    title: url.clone(),
                    url,
                },
                None => ScoredDocument {
                    id,
                    score,
                    url: synthetic_url(id),
                    title: synthetic_title(id),
                },
            })
            .collect()
    }

    /// Current health, answered without touching the query path.
    pub fn health(&self) -> HealthStatus {
        if !self.closed.load(Ordering::Acquire) && self.index_live && self.metadata.is_available()
        {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        }
    }

    /// Release the metadata store connection. Idempotent, and safe to
    /// call even if construction left the engine degraded.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.metadata.close();
            info!("ranking engine closed");
        }
    }
}

impl Drop for RankingEngine {
    fn drop(&mut self) {
        self.close();
    }
}
