//! Configuration for the ranking engine.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scoring::bm25::Bm25Params;

/// Default result count for a search request.
pub const DEFAULT_LIMIT: usize = 10;

/// Configuration for constructing a [`crate::engine::RankingEngine`].
///
/// Both backing stores are opened from filesystem paths: the inverted
/// index is a read-only redb database written by an external indexer, and
/// the metadata store is a SQLite database holding per-document lengths
/// and URLs. Either path may point at a missing or unreadable store; the
/// engine then runs in degraded mode for that store instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Path to the persisted inverted index (redb, read-only).
    pub index_path: PathBuf,

    /// Path to the document metadata store (SQLite, read-only).
    pub metadata_path: PathBuf,

    /// Default number of results returned when a request does not set one.
    pub default_limit: usize,

    /// BM25 scoring parameters.
    pub bm25: Bm25Params,
}

impl Default for RankerConfig {
    fn default() -> Self {
        RankerConfig {
            index_path: PathBuf::from("data/search_index.redb"),
            metadata_path: PathBuf::from("data/metadata.sqlite"),
            default_limit: DEFAULT_LIMIT,
            bm25: Bm25Params::default(),
        }
    }
}

impl RankerConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// Recognized variables:
    ///
    /// - `XYSTON_INDEX_PATH` - inverted index location
    /// - `XYSTON_METADATA_PATH` - metadata store location
    /// - `XYSTON_DEFAULT_LIMIT` - default top-k (ignored if unparseable)
    pub fn from_env() -> Self {
        let mut config = RankerConfig::default();

        if let Ok(path) = env::var("XYSTON_INDEX_PATH") {
            config.index_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("XYSTON_METADATA_PATH") {
            config.metadata_path = PathBuf::from(path);
        }
        if let Ok(limit) = env::var("XYSTON_DEFAULT_LIMIT") {
            match limit.parse::<usize>() {
                Ok(n) if n > 0 => config.default_limit = n,
                _ => log::warn!("ignoring invalid XYSTON_DEFAULT_LIMIT: {limit}"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = RankerConfig::default();

        assert_eq!(config.default_limit, 10);
        assert_eq!(config.bm25.k1, 1.5);
        assert_eq!(config.bm25.b, 0.75);
    }
}
