//! Remote OpenAlex API client
//!
//! The store never talks to the network itself; it consumes the
//! [`RemoteFetcher`] capability. The HTTP client below is the production
//! implementation; tests substitute an in-memory fake.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::core::config::Config;
use crate::core::error::{CacheError, Result};
use crate::core::id::strip_base_url;
use crate::core::kind::EntityKind;
use crate::core::mapper::Document;

/// Resolves an entity ID to its nested document.
pub trait RemoteFetcher {
    /// Fetch one entity. Unknown IDs fail with [`CacheError::NotFound`].
    fn fetch(&self, kind: EntityKind, id: &str) -> Result<Document>;
}

/// Blocking HTTP client for the OpenAlex single-entity endpoints.
pub struct OpenAlexClient {
    http: Client,
    base_url: String,
    mailto: Option<String>,
}

const USER_AGENT: &str = concat!("oax/", env!("CARGO_PKG_VERSION"));

impl OpenAlexClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            mailto: config.mailto.clone(),
        })
    }

    fn entity_url(&self, kind: EntityKind, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind.plural(), strip_base_url(id))
    }
}

impl RemoteFetcher for OpenAlexClient {
    fn fetch(&self, kind: EntityKind, id: &str) -> Result<Document> {
        let mut request = self.http.get(self.entity_url(kind, id));
        if let Some(mailto) = &self.mailto {
            request = request.query(&[("mailto", mailto.as_str())]);
        }

        let response = request.send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(CacheError::NotFound(strip_base_url(id).to_string()));
        }
        let response = response.error_for_status()?;
        Ok(response.json::<Document>()?)
    }
}
