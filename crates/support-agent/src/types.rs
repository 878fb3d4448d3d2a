use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Intent category assigned to every incoming query.
/// `Unknown` only appears on the top-level error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Billing,
    Technical,
    Account,
    FeatureRequest,
    General,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Billing => "billing",
            Self::Technical => "technical",
            Self::Account => "account",
            Self::FeatureRequest => "feature_request",
            Self::General => "general",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Frustrated,
    #[default]
    Neutral,
    Positive,
    Concerned,
}

/// Structured classification of one user query.
/// Intent and urgency are always present — classifiers supply a safe
/// default rather than omit them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentClassification {
    pub intent: Intent,
    pub urgency: Urgency,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl IntentClassification {
    /// Classification attached to the top-level error reply.
    pub fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            urgency: Urgency::Medium,
            entities: Vec::new(),
            tone: Tone::Neutral,
            keywords: Vec::new(),
        }
    }
}

/// Which collection a fused hit came from. Assigned by result fusion,
/// never by the store itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    KnowledgeBase,
    SupportTicket,
}

/// Document fields returned by the store. Knowledge-base articles fill
/// title/content, tickets fill problem/solution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocSource {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_type: Option<ResultType>,
}

/// One ranked retrieval result. `score` is a non-negative relevance
/// value; equal scores keep their original retrieval order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub source: DocSource,
}

/// Grounded answer produced for one query. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentAnswer {
    pub response: String,
    pub confidence: f32,
    pub suggested_actions: Vec<String>,
    pub escalate: bool,
    pub follow_up_questions: Vec<String>,
}

/// User-facing source reference rendered from a fused hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub category: String,
    pub relevance: String,
}

/// Immutable record appended to a session's log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub timestamp: DateTime<Utc>,
    pub user_query: String,
    pub intent: IntentClassification,
    pub response: AgentAnswer,
    pub search_results_count: usize,
}

/// Optional caller-supplied context forwarded to answer synthesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(default)]
    pub subscription_tier: Option<String>,
    #[serde(default)]
    pub issue_history: Option<String>,
}

/// Full response body for one chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub session_id: String,
    pub response: String,
    pub confidence: f32,
    pub intent: IntentClassification,
    pub suggested_actions: Vec<String>,
    pub escalate: bool,
    pub follow_up_questions: Vec<String>,
    pub sources: Vec<SourceRef>,
    pub timestamp: DateTime<Utc>,
    /// Set only by the top-level error path.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

/// Cross-session analytics, derived on demand and never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_conversations: usize,
    pub average_confidence: f32,
    /// Percentage of conversations that escalated.
    pub escalation_rate: f32,
    /// At most 5 entries, descending by count; ties keep first-seen order.
    pub top_intents: Vec<(String, usize)>,
    pub active_sessions: usize,
}

/// Static demo scenario descriptor served by `/demo`.
#[derive(Debug, Clone, Serialize)]
pub struct DemoScenario {
    pub title: &'static str,
    pub query: &'static str,
    pub expected_category: &'static str,
}
