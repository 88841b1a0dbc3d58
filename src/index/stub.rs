//! In-memory stub index client.

use std::collections::HashMap;

use crate::index::{DocId, IndexClient};

/// A fixed in-memory [`IndexClient`] used as a last-resort fallback when
/// the persisted index cannot be opened. It covers a handful of seed
/// tokens so the engine stays queryable in degraded mode; it is never
/// preferred over a live store.
#[derive(Debug)]
pub struct StubIndexClient {
    postings: HashMap<&'static str, Vec<DocId>>,
}

impl StubIndexClient {
    /// Create a stub client seeded with the built-in tokens.
    pub fn new() -> Self {
        let mut postings = HashMap::new();
        postings.insert("computer", vec![1, 2]);
        postings.insert("cats", vec![3, 4]);
        StubIndexClient { postings }
    }
}

impl Default for StubIndexClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexClient for StubIndexClient {
    fn lookup(&self, token: &str) -> Option<Vec<DocId>> {
        self.postings.get(token).cloned()
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
