//! Read-only access to the persisted inverted index.
//!
//! The index is written offline by an external indexer as a key-value
//! table mapping a UTF-8 token to a UTF-8 comma-separated list of decimal
//! document identifiers. Two client implementations sit behind the
//! [`IndexClient`] trait: a store-backed one over redb and an in-memory
//! stub used as a last-resort fallback when the store cannot be opened.

use log::debug;

pub mod store;
pub mod stub;

pub use store::StoreIndexClient;
pub use stub::StubIndexClient;

/// Document identifier as stored in the inverted index.
pub type DocId = i64;

/// A client for posting-list lookups against the inverted index.
///
/// A lookup miss is `None`. Implementations must treat per-key read
/// errors as misses (logged, never propagated); the scoring loop has no
/// error path by contract.
pub trait IndexClient: Send + Sync + std::fmt::Debug {
    /// Fetch the posting list for a token, or `None` on a miss.
    fn lookup(&self, token: &str) -> Option<Vec<DocId>>;

    /// Get the name of this client (for logging and health reporting).
    fn name(&self) -> &'static str;
}

/// Parse a comma-separated posting-list value into document ids.
///
/// Malformed fragments are skipped rather than voiding the whole list; a
/// single corrupt entry must not abort the query.
pub(crate) fn parse_posting_list(token: &str, value: &str) -> Vec<DocId> {
    value
        .split(',')
        .filter_map(|fragment| {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                return None;
            }
            match fragment.parse::<DocId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    debug!("skipping malformed posting fragment {fragment:?} for token {token:?}");
                    None
                }
            }
        })
        .collect()
}
