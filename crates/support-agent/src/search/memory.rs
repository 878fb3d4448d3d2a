//! In-process document store. Computes the same disjunctive score as
//! the live store: term-frequency lexical matching (title weighted 2x)
//! plus 1.5 x (cosine + 1.0) for embedded documents. Used when no
//! store endpoint is configured, and throughout the tests.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{cosine_similarity, DocumentStore, IndexDoc, StoreError};
use crate::types::{DocSource, SearchHit};

const TITLE_WEIGHT: f32 = 2.0;
const VECTOR_BOOST: f32 = 1.5;

#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<IndexDoc>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc_count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    fn lexical_score(doc: &IndexDoc, tokens: &[String]) -> f32 {
        let mut score = 0.0f32;
        for token in tokens {
            if let Some(title) = &doc.title {
                score += TITLE_WEIGHT * title.to_lowercase().matches(token.as_str()).count() as f32;
            }
            for field in [&doc.content, &doc.problem, &doc.solution] {
                if let Some(text) = field {
                    score += text.to_lowercase().matches(token.as_str()).count() as f32;
                }
            }
        }
        score
    }
}

impl From<&IndexDoc> for DocSource {
    fn from(doc: &IndexDoc) -> Self {
        Self {
            title: doc.title.clone(),
            content: doc.content.clone(),
            problem: doc.problem.clone(),
            solution: doc.solution.clone(),
            category: doc.category.clone(),
            result_type: None,
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn hybrid_search(
        &self,
        query: &str,
        query_embedding: &[f32],
        collection: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, StoreError> {
        let docs = match self.collections.get(collection) {
            Some(docs) => docs,
            None => return Ok(Vec::new()),
        };

        let tokens: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(String::from)
            .collect();

        let mut hits: Vec<SearchHit> = docs
            .iter()
            .filter_map(|doc| {
                let lexical = Self::lexical_score(doc, &tokens);
                // Embedded documents always carry a vector score, the
                // way a match_all script clause scores every document.
                let vector = if doc.embedding.is_empty() || query_embedding.is_empty() {
                    0.0
                } else {
                    VECTOR_BOOST * (cosine_similarity(query_embedding, &doc.embedding) + 1.0)
                };
                let score = lexical + vector;
                if score <= 0.0 {
                    return None;
                }
                Some(SearchHit {
                    id: doc.id.clone(),
                    score,
                    source: DocSource::from(doc),
                })
            })
            .collect();

        // Stable: equal scores keep indexing order.
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn bulk_index(&self, collection: &str, docs: &[IndexDoc]) -> Result<usize, StoreError> {
        let mut entry = self.collections.entry(collection.to_string()).or_default();
        for doc in docs {
            // Upsert by id, keeping the original position on replace.
            match entry.iter_mut().find(|existing| existing.id == doc.id) {
                Some(existing) => *existing = doc.clone(),
                None => entry.push(doc.clone()),
            }
        }
        tracing::debug!(collection, count = docs.len(), "bulk indexed in memory");
        Ok(docs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::heuristic::seeded_embedding;

    fn article(id: &str, title: &str, content: &str) -> IndexDoc {
        IndexDoc {
            id: id.into(),
            title: Some(title.into()),
            content: Some(content.into()),
            category: Some("general".into()),
            embedding: seeded_embedding(&format!("{title} {content}"), 16),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_title_match_outranks_body_match() {
        let store = MemoryStore::new();
        store
            .bulk_index(
                "kb",
                &[
                    article("kb_body", "Exporting data", "password mentioned once here"),
                    article("kb_title", "How to reset your password", "follow the steps"),
                ],
            )
            .await
            .unwrap();

        let hits = store.hybrid_search("password", &[], "kb", 5).await.unwrap();
        assert_eq!(hits[0].id, "kb_title");
    }

    #[tokio::test]
    async fn test_unknown_collection_returns_empty() {
        let store = MemoryStore::new();
        let hits = store
            .hybrid_search("anything", &[], "missing", 5)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_index_upserts_by_id() {
        let store = MemoryStore::new();
        store
            .bulk_index("kb", &[article("kb_001", "First", "v1")])
            .await
            .unwrap();
        store
            .bulk_index("kb", &[article("kb_001", "First", "v2")])
            .await
            .unwrap();

        assert_eq!(store.doc_count("kb"), 1);
        let hits = store.hybrid_search("first", &[], "kb", 5).await.unwrap();
        assert_eq!(hits[0].source.content.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_vector_only_match_is_eligible() {
        // No lexical overlap at all; the embedded doc still scores
        // through the vector clause.
        let store = MemoryStore::new();
        store
            .bulk_index("kb", &[article("kb_001", "Billing cycles", "monthly invoices")])
            .await
            .unwrap();

        let query_embedding = seeded_embedding("unrelated words entirely", 16);
        let hits = store
            .hybrid_search("zzz qqq", &query_embedding, "kb", 5)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].score > 0.0);
    }

    #[tokio::test]
    async fn test_limit_truncates() {
        let store = MemoryStore::new();
        let docs: Vec<IndexDoc> = (0..10)
            .map(|i| article(&format!("kb_{i:03}"), "password help", "reset steps"))
            .collect();
        store.bulk_index("kb", &docs).await.unwrap();

        let hits = store.hybrid_search("password", &[], "kb", 3).await.unwrap();
        assert_eq!(hits.len(), 3);
    }
}
