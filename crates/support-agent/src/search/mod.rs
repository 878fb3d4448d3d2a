//! Document store adapter — hybrid search and bulk indexing over two
//! named collections, behind one trait with a live Elasticsearch
//! implementation and an in-process one.

pub mod elastic;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SearchHit;

pub use elastic::ElasticStore;
pub use memory::MemoryStore;

/// Typed failure at the store boundary. The orchestrator absorbs these
/// as an empty result set and continues with reduced context.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store rejected request: {0}")]
    Rejected(String),
}

/// A document as indexed into either collection. Knowledge-base
/// articles fill title/content, tickets fill problem/solution; the
/// embedding is produced by the language adapter before indexing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexDoc {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

/// Core trait for document stores.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Hybrid search: multi-field lexical match (title weighted 2x)
    /// combined disjunctively with cosine vector similarity. Results
    /// come back sorted by descending relevance.
    async fn hybrid_search(
        &self,
        query: &str,
        query_embedding: &[f32],
        collection: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, StoreError>;

    /// Upsert documents by id. Partial failures are logged, not fatal;
    /// returns the number of documents accepted.
    async fn bulk_index(&self, collection: &str, docs: &[IndexDoc]) -> Result<usize, StoreError>;
}

/// Cosine similarity between two equal-width vectors; 0.0 when either
/// is empty or all-zero.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
