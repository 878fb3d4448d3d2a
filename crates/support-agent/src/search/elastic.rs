//! Elasticsearch-compatible store client.
//!
//! Builds the same bool/should hybrid query the product has always
//! used: a multi_match over title^2/content/problem/solution plus a
//! script_score cosine clause boosted 1.5x, combined disjunctively so
//! a document matching either signal is eligible and scores add.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::{DocumentStore, IndexDoc, StoreError};
use crate::types::{DocSource, SearchHit};

pub struct ElasticStore {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl ElasticStore {
    pub fn new(endpoint: &str, api_key: Option<String>) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}/{}", self.endpoint, path));
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("ApiKey {key}"));
        }
        builder
    }

    /// The vector field differs per collection: articles embed their
    /// content, tickets embed the problem statement.
    fn vector_field(collection: &str) -> &'static str {
        if collection.contains("ticket") {
            "problem_embedding"
        } else {
            "content_embedding"
        }
    }

    /// Create both collection mappings if missing. The dense_vector
    /// width must match the embedding adapter's output.
    pub async fn ensure_indices(
        &self,
        kb_index: &str,
        tickets_index: &str,
        dimension: usize,
    ) -> Result<(), StoreError> {
        let kb_mapping = json!({
            "mappings": {
                "properties": {
                    "title": { "type": "text", "analyzer": "standard" },
                    "content": { "type": "text", "analyzer": "standard" },
                    "category": { "type": "keyword" },
                    "tags": { "type": "keyword" },
                    "last_updated": { "type": "date" },
                    "confidence_score": { "type": "float" },
                    "content_embedding": {
                        "type": "dense_vector",
                        "dims": dimension,
                        "index": true,
                        "similarity": "cosine"
                    }
                }
            }
        });
        let tickets_mapping = json!({
            "mappings": {
                "properties": {
                    "ticket_id": { "type": "keyword" },
                    "problem": { "type": "text", "analyzer": "standard" },
                    "solution": { "type": "text", "analyzer": "standard" },
                    "category": { "type": "keyword" },
                    "priority": { "type": "keyword" },
                    "resolution_time": { "type": "integer" },
                    "satisfaction_score": { "type": "float" },
                    "created_date": { "type": "date" },
                    "problem_embedding": {
                        "type": "dense_vector",
                        "dims": dimension,
                        "index": true,
                        "similarity": "cosine"
                    }
                }
            }
        });

        for (index, mapping) in [(kb_index, kb_mapping), (tickets_index, tickets_mapping)] {
            let response = self
                .request(reqwest::Method::PUT, index)
                .json(&mapping)
                .send()
                .await?;
            if response.status().is_success() {
                tracing::info!(index, "created index");
            } else {
                // Typically resource_already_exists on restart.
                let body = response.text().await.unwrap_or_default();
                tracing::debug!(index, body = %body, "index not created");
            }
        }
        Ok(())
    }

    /// Count and log per-item rejections in a `_bulk` response body.
    fn count_rejections(collection: &str, value: &Value) -> usize {
        if !value.get("errors").and_then(Value::as_bool).unwrap_or(false) {
            return 0;
        }
        let mut rejected = 0;
        if let Some(items) = value.get("items").and_then(Value::as_array) {
            for item in items {
                if let Some(error) = item.pointer("/index/error") {
                    rejected += 1;
                    tracing::warn!(
                        collection,
                        id = item.pointer("/index/_id").and_then(|v| v.as_str()),
                        error = %error,
                        "document rejected during bulk index"
                    );
                }
            }
        }
        rejected
    }
}

#[async_trait]
impl DocumentStore for ElasticStore {
    async fn hybrid_search(
        &self,
        query: &str,
        query_embedding: &[f32],
        collection: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, StoreError> {
        let body = json!({
            "size": limit,
            "query": {
                "bool": {
                    "should": [
                        {
                            "multi_match": {
                                "query": query,
                                "fields": ["title^2", "content", "problem", "solution"],
                                "type": "best_fields",
                                "boost": 1.0
                            }
                        },
                        {
                            "script_score": {
                                "query": { "match_all": {} },
                                "script": {
                                    "source": format!(
                                        "cosineSimilarity(params.query_vector, '{}') + 1.0",
                                        Self::vector_field(collection)
                                    ),
                                    "params": { "query_vector": query_embedding }
                                },
                                "boost": 1.5
                            }
                        }
                    ]
                }
            },
            "_source": ["title", "content", "category", "confidence_score", "problem", "solution"]
        });

        let response = self
            .request(reqwest::Method::POST, &format!("{collection}/_search"))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let value: Value = response.json().await?;

        if !status.is_success() {
            return Err(StoreError::Rejected(format!(
                "search on {collection} returned HTTP {status}"
            )));
        }

        let hits = value
            .pointer("/hits/hits")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let results = hits
            .into_iter()
            .filter_map(|hit| {
                let id = hit.get("_id")?.as_str()?.to_string();
                let score = hit.get("_score").and_then(Value::as_f64).unwrap_or(0.0) as f32;
                let source: DocSource =
                    serde_json::from_value(hit.get("_source").cloned().unwrap_or(json!({})))
                        .ok()?;
                Some(SearchHit { id, score, source })
            })
            .collect();
        Ok(results)
    }

    async fn bulk_index(&self, collection: &str, docs: &[IndexDoc]) -> Result<usize, StoreError> {
        if docs.is_empty() {
            return Ok(0);
        }

        let vector_field = Self::vector_field(collection);
        let mut ndjson = String::new();
        for doc in docs {
            ndjson.push_str(
                &json!({ "index": { "_index": collection, "_id": doc.id } }).to_string(),
            );
            ndjson.push('\n');
            // Rename the generic embedding field to the per-collection
            // vector field the mapping declares.
            let mut body = serde_json::to_value(doc)
                .map_err(|e| StoreError::Rejected(e.to_string()))?;
            if let Some(map) = body.as_object_mut() {
                if let Some(embedding) = map.remove("embedding") {
                    map.insert(vector_field.to_string(), embedding);
                }
            }
            ndjson.push_str(&body.to_string());
            ndjson.push('\n');
        }

        let response = self
            .request(reqwest::Method::POST, "_bulk")
            .header("Content-Type", "application/x-ndjson")
            .body(ndjson)
            .send()
            .await?;
        let status = response.status();
        let value: Value = response.json().await?;

        if !status.is_success() {
            return Err(StoreError::Rejected(format!(
                "bulk index into {collection} returned HTTP {status}"
            )));
        }

        // Partial failures are logged per item, not fatal.
        let accepted = docs
            .len()
            .saturating_sub(Self::count_rejections(collection, &value));
        tracing::info!(collection, accepted, total = docs.len(), "bulk indexed");
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_field_per_collection() {
        assert_eq!(
            ElasticStore::vector_field("cloudflow_knowledge_base"),
            "content_embedding"
        );
        assert_eq!(
            ElasticStore::vector_field("cloudflow_support_tickets"),
            "problem_embedding"
        );
    }

    #[test]
    fn test_bulk_rejections_counted_per_item() {
        let body = serde_json::json!({
            "errors": true,
            "items": [
                { "index": { "_id": "kb_001", "status": 201 } },
                { "index": { "_id": "kb_002", "status": 400,
                             "error": { "type": "mapper_parsing_exception" } } },
                { "index": { "status": 400,
                             "error": { "type": "version_conflict" } } }
            ]
        });
        assert_eq!(ElasticStore::count_rejections("kb", &body), 2);
    }

    #[test]
    fn test_bulk_without_errors_counts_nothing() {
        let body = serde_json::json!({ "errors": false, "items": [] });
        assert_eq!(ElasticStore::count_rejections("kb", &body), 0);
    }

    #[tokio::test]
    async fn test_unreachable_store_surfaces_error() {
        // Nothing listens here; the adapter must error, not panic or
        // hang, so the orchestrator can continue with empty context.
        let store = ElasticStore::new("http://127.0.0.1:1", None).unwrap();
        let result = store.hybrid_search("query", &[0.0; 4], "kb", 5).await;
        assert!(result.is_err());
    }
}
