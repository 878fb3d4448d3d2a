//! Integration tests for the API layer.
//!
//! These tests spin up a real HTTP server on a random port with the
//! seeded in-memory store and offline language tier, so every endpoint
//! exercises the full pipeline without external services.

use std::sync::Arc;

use async_trait::async_trait;
use support_agent::{
    AgentAnswer, DocumentStore, IndexDoc, IntentClassification, LanguageAdapter, LanguageModel,
    ModelError, SearchHit, SessionStore, StoreError, SupportAgent, SupportConfig, UserContext,
};
use support_api::{create_router, AppState};

/// Spin up a test server on a random port and return the base URL.
async fn start_test_server() -> String {
    let state = Arc::new(
        AppState::from_config(SupportConfig::default())
            .await
            .unwrap(),
    );
    start_with_state(state).await
}

async fn start_with_state(state: Arc<AppState>) -> String {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Helper to GET a URL and return (status, parsed body).
async fn get(base: &str, path: &str) -> (u16, serde_json::Value) {
    let resp = reqwest::get(format!("{}{}", base, path)).await.unwrap();
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap();
    (status, body)
}

/// Helper to POST JSON and return (status, parsed body).
async fn post_json(base: &str, path: &str, json: serde_json::Value) -> (u16, serde_json::Value) {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}{}", base, path))
        .json(&json)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap();
    (status, body)
}

// ============================================================================
// Health endpoint
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let base = start_test_server().await;
    let (status, body) = get(&base, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["message"], "Support agent is operational");
}

// ============================================================================
// Chat endpoint
// ============================================================================

#[tokio::test]
async fn test_chat_password_reset() {
    let base = start_test_server().await;
    let (status, body) = post_json(
        &base,
        "/chat",
        serde_json::json!({ "message": "How do I reset my password?" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["intent"]["intent"], "account");
    assert_eq!(body["escalate"], false);
    assert!(!body["response"].as_str().unwrap().is_empty());
    assert!(!body["sources"].as_array().unwrap().is_empty());
    assert!(body["sources"].as_array().unwrap().len() <= 2);
    // Generated session id comes back for follow-up turns.
    assert!(!body["session_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_accepts_user_context() {
    let base = start_test_server().await;
    let (status, body) = post_json(
        &base,
        "/chat",
        serde_json::json!({
            "message": "Why was I charged twice this month?",
            "user_context": { "subscription_tier": "pro" }
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["intent"]["intent"], "billing");
}

#[tokio::test]
async fn test_conversation_history_accumulates() {
    let base = start_test_server().await;
    post_json(
        &base,
        "/chat",
        serde_json::json!({ "message": "How do I reset my password?", "session_id": "s-42" }),
    )
    .await;
    post_json(
        &base,
        "/chat",
        serde_json::json!({ "message": "Why was I charged twice?", "session_id": "s-42" }),
    )
    .await;

    let (status, body) = get(&base, "/conversation/s-42").await;
    assert_eq!(status, 200);
    assert_eq!(body["session_id"], "s-42");
    let history = body["conversation_history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["user_query"], "How do I reset my password?");
    assert_eq!(history[1]["user_query"], "Why was I charged twice?");
}

#[tokio::test]
async fn test_conversation_empty_for_unseen_session() {
    let base = start_test_server().await;
    let (status, body) = get(&base, "/conversation/never-seen").await;
    assert_eq!(status, 200);
    assert!(body["conversation_history"].as_array().unwrap().is_empty());
}

// ============================================================================
// Analytics endpoint
// ============================================================================

#[tokio::test]
async fn test_analytics_zero_on_fresh_server() {
    let base = start_test_server().await;
    let (status, body) = get(&base, "/analytics").await;
    assert_eq!(status, 200);
    assert_eq!(body["total_conversations"], 0);
    assert_eq!(body["average_confidence"], 0.0);
    assert_eq!(body["escalation_rate"], 0.0);
    assert!(body["top_intents"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_analytics_after_chat() {
    let base = start_test_server().await;
    post_json(
        &base,
        "/chat",
        serde_json::json!({ "message": "How do I reset my password?", "session_id": "a" }),
    )
    .await;

    let (status, body) = get(&base, "/analytics").await;
    assert_eq!(status, 200);
    assert_eq!(body["total_conversations"], 1);
    assert_eq!(body["active_sessions"], 1);
    assert_eq!(body["top_intents"][0][0], "account");
}

// ============================================================================
// Suggestions and demo endpoints
// ============================================================================

#[tokio::test]
async fn test_suggestions_endpoint() {
    let base = start_test_server().await;
    let (status, body) = get(&base, "/suggestions").await;
    assert_eq!(status, 200);
    let suggestions = body["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 8);
    assert_eq!(suggestions[0], "How do I reset my password?");
}

#[tokio::test]
async fn test_demo_endpoint() {
    let base = start_test_server().await;
    let (status, body) = get(&base, "/demo").await;
    assert_eq!(status, 200);
    let scenarios = body["demo_scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 5);
    assert_eq!(scenarios[0]["title"], "Password Reset");
    assert_eq!(scenarios[0]["expected_category"], "account");
}

// ============================================================================
// Degraded service
// ============================================================================

struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn hybrid_search(
        &self,
        _query: &str,
        _query_embedding: &[f32],
        _collection: &str,
        _limit: usize,
    ) -> Result<Vec<SearchHit>, StoreError> {
        Err(StoreError::Rejected("connection refused".into()))
    }
    async fn bulk_index(&self, _collection: &str, _docs: &[IndexDoc]) -> Result<usize, StoreError> {
        Err(StoreError::Rejected("connection refused".into()))
    }
}

struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    async fn classify_intent(&self, _text: &str) -> Result<IntentClassification, ModelError> {
        Err(ModelError::Empty)
    }
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
        Err(ModelError::Empty)
    }
    async fn synthesize(
        &self,
        _query: &str,
        _results: &[SearchHit],
        _user_context: Option<&UserContext>,
    ) -> Result<AgentAnswer, ModelError> {
        Err(ModelError::Empty)
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

#[tokio::test]
async fn test_chat_degrades_gracefully_when_everything_is_down() {
    let config = SupportConfig::default();
    let dimension = config.search.embedding_dimension;
    let agent = SupportAgent::new(
        Arc::new(FailingStore),
        LanguageAdapter::new(Box::new(FailingModel), dimension),
        SessionStore::new(),
        config,
    );
    let base = start_with_state(Arc::new(AppState::new(agent))).await;

    let (status, body) = post_json(
        &base,
        "/chat",
        serde_json::json!({ "message": "my dashboard is slow" }),
    )
    .await;

    // Degraded, not failed: fallbacks answer with low confidence.
    assert_eq!(status, 200);
    assert_eq!(body["escalate"], true);
    assert!(body["confidence"].as_f64().unwrap() <= 0.1);
    assert!(body["sources"].as_array().unwrap().is_empty());
}
