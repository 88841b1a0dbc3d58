//! SQLite-backed metadata store.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info, warn};
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params_from_iter};

use crate::index::DocId;
use crate::metadata::{DEFAULT_AVGDL, DEFAULT_TOTAL_DOCS, MetadataStore};

/// A [`MetadataStore`] over a read-only SQLite database with a
/// `documents (id, length, url)` table.
///
/// SQLite connections are not safe for unsynchronized concurrent use, so
/// the single connection is serialized behind a mutex; each call checks
/// it out for the duration of one statement. A connection that fails to
/// open at construction stays unavailable for the lifetime of the store;
/// there is no per-call reconnect.
#[derive(Debug)]
pub struct SqliteMetadataStore {
    conn: Mutex<Option<Connection>>,
}

impl SqliteMetadataStore {
    /// Open the metadata store at `path`.
    ///
    /// Never fails: on any open or schema-probe error the store is
    /// returned in its unavailable state and every method takes the
    /// documented default path.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_open(path) {
            Ok(conn) => {
                info!("connected to metadata store at {}", path.display());
                SqliteMetadataStore {
                    conn: Mutex::new(Some(conn)),
                }
            }
            Err(e) => {
                warn!("failed to open metadata store at {}: {e}", path.display());
                Self::unavailable()
            }
        }
    }

    /// Create a store with no backing connection.
    pub fn unavailable() -> Self {
        SqliteMetadataStore {
            conn: Mutex::new(None),
        }
    }

    fn try_open(path: &Path) -> rusqlite::Result<Connection> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        // Probe the expected schema so a present-but-foreign file counts
        // as a construction failure, not a surprise on the first query.
        conn.prepare("SELECT id, length, url FROM documents LIMIT 1")?;
        Ok(conn)
    }

    fn query_lengths(
        conn: &Connection,
        ids: &[DocId],
    ) -> rusqlite::Result<HashMap<DocId, i64>> {
        // Single-id requests keep the equality form; the semantics are
        // identical to the IN form either way.
        let sql = if ids.len() == 1 {
            "SELECT id, length FROM documents WHERE id = ?1".to_string()
        } else {
            let placeholders = vec!["?"; ids.len()].join(", ");
            format!("SELECT id, length FROM documents WHERE id IN ({placeholders})")
        };

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(ids.iter().copied()), |row| {
            Ok((row.get::<_, DocId>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut lengths = HashMap::with_capacity(ids.len());
        for row in rows {
            let (id, length) = row?;
            lengths.insert(id, length);
        }
        Ok(lengths)
    }
}

impl MetadataStore for SqliteMetadataStore {
    fn average_document_length(&self) -> f64 {
        let guard = self.conn.lock();
        let Some(conn) = guard.as_ref() else {
            return DEFAULT_AVGDL;
        };
        match conn.query_row("SELECT AVG(length) FROM documents", [], |row| {
            row.get::<_, Option<f64>>(0)
        }) {
            // AVG over an empty table is NULL; avgdl must stay positive.
            Ok(Some(avg)) if avg > 0.0 => avg,
            Ok(_) => DEFAULT_AVGDL,
            Err(e) => {
                warn!("error computing average document length: {e}");
                DEFAULT_AVGDL
            }
        }
    }

    fn total_document_count(&self) -> i64 {
        let guard = self.conn.lock();
        let Some(conn) = guard.as_ref() else {
            return DEFAULT_TOTAL_DOCS;
        };
        match conn.query_row("SELECT COUNT(*) FROM documents", [], |row| {
            row.get::<_, i64>(0)
        }) {
            Ok(count) => count,
            Err(e) => {
                warn!("error counting documents: {e}");
                DEFAULT_TOTAL_DOCS
            }
        }
    }

    fn batch_document_lengths(&self, ids: &[DocId]) -> HashMap<DocId, i64> {
        if ids.is_empty() {
            return HashMap::new();
        }
        let guard = self.conn.lock();
        let Some(conn) = guard.as_ref() else {
            return HashMap::new();
        };
        match Self::query_lengths(conn, ids) {
            Ok(lengths) => lengths,
            Err(e) => {
                warn!("error fetching document lengths: {e}");
                HashMap::new()
            }
        }
    }

    fn resolve_url(&self, id: DocId) -> Option<String> {
        let guard = self.conn.lock();
        let conn = guard.as_ref()?;
        match conn
            .query_row("SELECT url FROM documents WHERE id = ?1", [id], |row| {
                row.get::<_, String>(0)
            })
            .optional()
        {
            Ok(url) => url,
            Err(e) => {
                warn!("error resolving url for document {id}: {e}");
                None
            }
        }
    }

    fn is_available(&self) -> bool {
        self.conn.lock().is_some()
    }

    fn close(&self) {
        if self.conn.lock().take().is_some() {
            debug!("closed metadata store connection");
        }
    }
}
