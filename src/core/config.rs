//! Runtime configuration
//!
//! Resolved once at CLI startup from flags and environment; the library
//! types take a `Config` instead of reading the environment themselves.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://api.openalex.org";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file backing the cache.
    pub db_path: PathBuf,
    /// OpenAlex API root.
    pub api_base_url: String,
    /// Contact e-mail for the OpenAlex polite pool, sent as `mailto=`.
    pub mailto: Option<String>,
    /// Per-request timeout for remote fetches.
    pub timeout_secs: u64,
}

impl Config {
    /// Resolve the effective configuration from CLI-provided overrides.
    pub fn resolve(db: Option<PathBuf>, mailto: Option<String>) -> Self {
        Self {
            db_path: db.unwrap_or_else(default_db_path),
            mailto,
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            mailto: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Default cache location under the per-user cache directory.
pub fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "oax")
        .map(|dirs| dirs.cache_dir().join("openalex.db"))
        .unwrap_or_else(|| PathBuf::from("openalex.db"))
}
