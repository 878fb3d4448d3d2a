//! Conversation orchestrator: sequences classification, query
//! enhancement, hybrid retrieval over both collections, fusion, and
//! answer synthesis into one synchronous request cycle, recording
//! every turn in the session store.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::ai::{enhance_query, LanguageAdapter};
use crate::config::SupportConfig;
use crate::fusion;
use crate::search::DocumentStore;
use crate::session::SessionStore;
use crate::types::{
    ChatReply, ConversationEntry, DemoScenario, IntentClassification, SearchHit, UserContext,
};

pub struct SupportAgent {
    store: Arc<dyn DocumentStore>,
    language: LanguageAdapter,
    sessions: SessionStore,
    config: SupportConfig,
}

impl SupportAgent {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        language: LanguageAdapter,
        sessions: SessionStore,
        config: SupportConfig,
    ) -> Self {
        Self {
            store,
            language,
            sessions,
            config,
        }
    }

    /// Run one full request cycle. Adapter-level failures are absorbed
    /// inside the pipeline (degraded answers, empty result sets); only
    /// a failure escaping those produces the fixed error reply, which
    /// is not recorded in the session log.
    pub async fn process_query(
        &self,
        query: &str,
        session_id: Option<String>,
        user_context: Option<UserContext>,
    ) -> ChatReply {
        let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        self.sessions.touch(&session_id);

        match self
            .run_pipeline(query, &session_id, user_context.as_ref())
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!(session_id = %session_id, error = %err, "query pipeline failed");
                self.error_reply(&session_id)
            }
        }
    }

    async fn run_pipeline(
        &self,
        query: &str,
        session_id: &str,
        user_context: Option<&UserContext>,
    ) -> anyhow::Result<ChatReply> {
        let intent = self.language.classify(query).await;
        let enhanced = enhance_query(query, &intent);
        let embedding = self.language.embed(query).await;

        let kb_hits = self
            .search_collection(&enhanced, &embedding, &self.config.store.kb_index, self.config.search.kb_limit)
            .await;
        let ticket_hits = self
            .search_collection(
                &enhanced,
                &embedding,
                &self.config.store.tickets_index,
                self.config.search.ticket_limit,
            )
            .await;

        let fused = fusion::combine(kb_hits, ticket_hits);
        let top = &fused[..fused.len().min(3)];
        let answer = self.language.answer(query, top, user_context).await;

        tracing::info!(
            session_id,
            intent = intent.intent.as_str(),
            urgency = ?intent.urgency,
            results = fused.len(),
            confidence = answer.confidence,
            escalate = answer.escalate,
            "chat turn completed"
        );

        self.sessions.append(
            session_id,
            ConversationEntry {
                timestamp: Utc::now(),
                user_query: query.to_string(),
                intent: intent.clone(),
                response: answer.clone(),
                search_results_count: fused.len(),
            },
        );

        Ok(ChatReply {
            session_id: session_id.to_string(),
            response: answer.response,
            confidence: answer.confidence,
            intent,
            suggested_actions: answer.suggested_actions,
            escalate: answer.escalate,
            follow_up_questions: answer.follow_up_questions,
            sources: fusion::format_sources(&fused[..fused.len().min(2)]),
            timestamp: Utc::now(),
            error: false,
        })
    }

    /// Store unavailability is absorbed as an empty result set; the
    /// pipeline continues with reduced context.
    async fn search_collection(
        &self,
        query: &str,
        embedding: &[f32],
        collection: &str,
        limit: usize,
    ) -> Vec<SearchHit> {
        match self
            .store
            .hybrid_search(query, embedding, collection, limit)
            .await
        {
            Ok(hits) => hits,
            Err(err) => {
                tracing::warn!(collection, error = %err, "search unavailable, continuing without results");
                Vec::new()
            }
        }
    }

    fn error_reply(&self, session_id: &str) -> ChatReply {
        ChatReply {
            session_id: session_id.to_string(),
            response: "I apologize, but I'm experiencing technical difficulties. Please try \
                       rephrasing your question or contact our human support team for \
                       immediate assistance."
                .to_string(),
            confidence: 0.0,
            intent: IntentClassification::unknown(),
            suggested_actions: vec![
                "Contact human support".to_string(),
                "Try rephrasing your question".to_string(),
            ],
            escalate: true,
            follow_up_questions: Vec::new(),
            sources: Vec::new(),
            timestamp: Utc::now(),
            error: true,
        }
    }

    /// One synthetic query through the full pipeline; the health
    /// endpoint reports on the outcome.
    pub async fn health_probe(&self) -> bool {
        let reply = self
            .process_query("test health check", Some("health_check".to_string()), None)
            .await;
        !reply.error
    }

    pub fn history(&self, session_id: &str) -> Vec<ConversationEntry> {
        self.sessions.history(session_id)
    }

    pub fn analytics(&self) -> crate::types::AnalyticsSnapshot {
        self.sessions.snapshot()
    }

    pub fn suggested_questions(&self) -> Vec<&'static str> {
        vec![
            "How do I reset my password?",
            "Why was I charged twice this month?",
            "How can I integrate CloudFlow with Slack?",
            "My dashboard is loading slowly, what should I do?",
            "How do I manage team permissions?",
            "How can I cancel my subscription?",
            "How do I export my project data?",
            "How do I set up two-factor authentication?",
        ]
    }

    pub fn demo_scenarios(&self) -> Vec<DemoScenario> {
        vec![
            DemoScenario {
                title: "Password Reset",
                query: "I can't log into my account, I think I need to reset my password",
                expected_category: "account",
            },
            DemoScenario {
                title: "Billing Issue",
                query: "Why was I charged twice this month? I only have one subscription",
                expected_category: "billing",
            },
            DemoScenario {
                title: "Integration Problem",
                query: "My Slack integration stopped working, notifications aren't coming through",
                expected_category: "integrations",
            },
            DemoScenario {
                title: "Performance Issue",
                query: "The dashboard is really slow, taking forever to load my projects",
                expected_category: "technical",
            },
            DemoScenario {
                title: "Team Management",
                query: "How do I give my team member access to edit our shared project?",
                expected_category: "team_management",
            },
        ]
    }
}
