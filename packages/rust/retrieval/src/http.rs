//! HTTP client for a remote vector search service.
//!
//! Protocol: `POST {endpoint}/collections/{collection}/search` with
//! `{"query": ..., "k": ...}`, answered by `{"results": [{"text": ..., "score": ...}]}`
//! in descending similarity order.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use supportdesk_shared::{AppConfig, Result, SupportDeskError};
use tracing::instrument;

use crate::{RetrievedDocument, VectorStore};

/// User-Agent string for search requests.
const USER_AGENT: &str = concat!("SupportDesk/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`HttpVectorStore`].
#[derive(Debug, Clone)]
pub struct HttpVectorStoreOptions {
    pub endpoint: String,
    pub collection: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl HttpVectorStoreOptions {
    /// Build options from the `[vector_store]` config section.
    ///
    /// The bearer token is read from `api_key_env` when that variable is set.
    pub fn from_config(config: &AppConfig) -> Self {
        let api_key = config
            .vector_store
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty());

        Self {
            endpoint: config.vector_store.endpoint.clone(),
            collection: config.vector_store.collection.clone(),
            api_key,
            timeout_secs: config.vector_store.request_timeout_secs,
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    k: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RetrievedDocument>,
}

/// [`VectorStore`] backed by a remote search endpoint.
pub struct HttpVectorStore {
    client: Client,
    search_url: String,
    api_key: Option<String>,
}

impl HttpVectorStore {
    pub fn new(opts: HttpVectorStoreOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| SupportDeskError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            search_url: format!(
                "{}/collections/{}/search",
                opts.endpoint.trim_end_matches('/'),
                opts.collection
            ),
            api_key: opts.api_key,
        })
    }
}

#[async_trait]
impl VectorStore for HttpVectorStore {
    #[instrument(skip_all, fields(url = %self.search_url, k = k))]
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>> {
        let mut request = self
            .client
            .post(&self.search_url)
            .json(&SearchRequest { query, k });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SupportDeskError::Retrieval(format!("{}: {e}", self.search_url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SupportDeskError::Retrieval(format!(
                "{}: HTTP {status}",
                self.search_url
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SupportDeskError::Retrieval(format!("invalid search response: {e}")))?;

        let mut results = parsed.results;
        results.truncate(k);
        Ok(results)
    }
}
