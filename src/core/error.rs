//! Error taxonomy for cache operations

use thiserror::Error;

/// Errors surfaced by the fetcher, mapper and store.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Remote lookup for an ID OpenAlex does not know. Propagated, never retried.
    #[error("entity not found in OpenAlex: {0}")]
    NotFound(String),

    /// Insert hit a parent row that is already cached under the same ID.
    #[error("entity already cached: {0}")]
    AlreadyExists(String),

    /// Parent/child row-count assertions failed during reconstruction.
    /// This is a data-integrity fault, not an empty result.
    #[error("integrity mismatch in table {table}: {detail}")]
    IntegrityMismatch {
        table: &'static str,
        detail: String,
    },

    /// A document does not match its kind's fixed shape, or a persisted
    /// JSON-encoded column no longer parses.
    #[error("malformed {context}: {detail}")]
    Malformed { context: String, detail: String },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("OpenAlex request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;
