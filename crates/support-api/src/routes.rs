//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use support_agent::UserContext;

use crate::AppState;

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_context: Option<UserContext>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Main chat endpoint. The agent itself never fails; a reply carrying
/// the error flag means the whole pipeline fell over and is reported
/// as a server error with the degraded body attached.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    tracing::debug!(
        preview = %request.message.chars().take(50).collect::<String>(),
        session_id = request.session_id.as_deref(),
        "chat request"
    );

    let reply = state
        .agent
        .process_query(&request.message, request.session_id, request.user_context)
        .await;

    if reply.error {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(reply)).into_response()
    } else {
        Json(reply).into_response()
    }
}

/// Health check: one synthetic query through the full pipeline.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    if state.agent.health_probe().await {
        Json(HealthResponse {
            status: "healthy",
            message: "Support agent is operational",
        })
        .into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                message: "Support agent pipeline is failing",
            }),
        )
            .into_response()
    }
}

pub async fn suggestions(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "suggestions": state.agent.suggested_questions() }))
}

pub async fn conversation(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<serde_json::Value> {
    let history = state.agent.history(&session_id);
    Json(json!({
        "session_id": session_id,
        "conversation_history": history,
    }))
}

pub async fn analytics(State(state): State<Arc<AppState>>) -> Json<support_agent::AnalyticsSnapshot> {
    Json(state.agent.analytics())
}

pub async fn demo(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "demo_scenarios": state.agent.demo_scenarios() }))
}
