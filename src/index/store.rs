//! Store-backed index client over a persisted redb database.

use std::path::Path;

use log::{debug, warn};
use redb::{Database, ReadableTable, TableDefinition};

use crate::error::{Result, XystonError};
use crate::index::{DocId, IndexClient, parse_posting_list};

/// Table holding token -> comma-separated doc-id postings.
const POSTINGS: TableDefinition<&str, &str> = TableDefinition::new("postings");

/// An [`IndexClient`] backed by a persisted redb database.
///
/// The database is opened once at construction and only ever read from.
/// redb read transactions take no locks against each other, so a single
/// client handle is safe for concurrent lookups.
pub struct StoreIndexClient {
    db: Database,
}

impl std::fmt::Debug for StoreIndexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreIndexClient").finish_non_exhaustive()
    }
}

impl StoreIndexClient {
    /// Open the persisted index at `path`.
    ///
    /// Fails if the file is missing or not a valid database; the caller
    /// decides whether to fall back to the stub client.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let db = Database::open(path)
            .map_err(|e| XystonError::index(format!("failed to open index at {}: {e}", path.display())))?;

        // Probe the postings table up front so a structurally valid file
        // written by something other than the indexer is rejected here,
        // not on the first query.
        let txn = db
            .begin_read()
            .map_err(|e| XystonError::index(format!("failed to read index at {}: {e}", path.display())))?;
        txn.open_table(POSTINGS)
            .map_err(|e| XystonError::index(format!("index at {} has no postings table: {e}", path.display())))?;

        debug!("opened inverted index at {}", path.display());
        Ok(StoreIndexClient { db })
    }
}

impl IndexClient for StoreIndexClient {
    fn lookup(&self, token: &str) -> Option<Vec<DocId>> {
        let txn = match self.db.begin_read() {
            Ok(txn) => txn,
            Err(e) => {
                warn!("index read transaction failed for token {token:?}: {e}");
                return None;
            }
        };
        let table = match txn.open_table(POSTINGS) {
            Ok(table) => table,
            Err(e) => {
                warn!("failed to open postings table for token {token:?}: {e}");
                return None;
            }
        };
        match table.get(token) {
            Ok(Some(value)) => Some(parse_posting_list(token, value.value())),
            Ok(None) => {
                debug!("no postings for token {token:?}");
                None
            }
            Err(e) => {
                // A single-key read error is equivalent to a miss.
                warn!("error fetching postings for token {token:?}: {e}");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "store"
    }
}
