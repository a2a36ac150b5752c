//! Retrieval gateway over a vector-backed document store.
//!
//! [`RetrievalGateway::retrieve`] runs one similarity search with a fixed
//! result cardinality and flattens the hits into a single context string.

mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use supportdesk_shared::Result;
use tracing::{debug, instrument};

pub use http::{HttpVectorStore, HttpVectorStoreOptions};

/// Number of documents requested per query.
pub const TOP_K: usize = 5;

/// Separator placed between documents in the context string.
const DOCUMENT_SEPARATOR: &str = "\n";

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// A similarity search service.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return up to `k` documents, most similar first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>>;
}

/// Wraps a [`VectorStore`] and produces the context for one query.
#[derive(Clone)]
pub struct RetrievalGateway {
    store: Arc<dyn VectorStore>,
}

impl RetrievalGateway {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Search with `k = TOP_K` and concatenate hit texts in rank order.
    ///
    /// No hits yields an empty string. Store failures propagate unchanged.
    #[instrument(skip_all)]
    pub async fn retrieve(&self, query: &str) -> Result<String> {
        let documents = self.store.search(query, TOP_K).await?;
        debug!(hits = documents.len(), "similarity search complete");
        Ok(join_documents(&documents))
    }
}

fn join_documents(documents: &[RetrievedDocument]) -> String {
    documents
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}
