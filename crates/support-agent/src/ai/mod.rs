//! Language understanding adapter — intent classification, embeddings,
//! and grounded answer synthesis behind one capability trait.
//!
//! Three interchangeable tiers implement the trait: the live Gemini
//! provider, the rule-based heuristic tier, and the fully offline
//! pattern model. The tier is chosen once at startup; callers never
//! special-case availability because `LanguageAdapter` absorbs every
//! provider failure into the documented degraded values.

pub mod gemini;
pub mod heuristic;
pub mod pattern;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SupportConfig;
use crate::types::{AgentAnswer, IntentClassification, SearchHit, UserContext};

pub use gemini::GeminiModel;
pub use heuristic::HeuristicModel;
pub use pattern::PatternModel;

/// Typed failure at the language-model boundary. These never reach the
/// chat caller — the adapter maps each one onto a degraded default.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider response could not be parsed: {0}")]
    Parse(String),
    #[error("provider returned no usable content")]
    Empty,
}

/// Core trait for language-model tiers.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Classify a raw query into intent/urgency/entities/tone/keywords.
    async fn classify_intent(&self, text: &str) -> Result<IntentClassification, ModelError>;

    /// Embed text into the configured fixed-width vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError>;

    /// Produce a grounded answer from the query and the top fused hits.
    async fn synthesize(
        &self,
        query: &str,
        results: &[SearchHit],
        user_context: Option<&UserContext>,
    ) -> Result<AgentAnswer, ModelError>;

    fn name(&self) -> &'static str;
}

/// Wraps the startup-selected tier and exposes the infallible surface
/// the orchestrator consumes. Provider errors become the documented
/// defaults here, at the boundary, instead of being trapped broadly
/// somewhere above.
pub struct LanguageAdapter {
    model: Box<dyn LanguageModel>,
    dimension: usize,
}

impl LanguageAdapter {
    pub fn new(model: Box<dyn LanguageModel>, dimension: usize) -> Self {
        Self { model, dimension }
    }

    /// Select a tier from config: live provider when an api key is
    /// present, otherwise the offline pattern model.
    pub fn from_config(config: &SupportConfig) -> Self {
        let dimension = config.search.embedding_dimension;
        let model: Box<dyn LanguageModel> = match &config.model.api_key {
            Some(key) => match GeminiModel::new(&config.model, key.clone(), dimension) {
                Ok(live) => Box::new(live),
                Err(err) => {
                    tracing::warn!(error = %err, "live provider unavailable, using pattern model");
                    Box::new(PatternModel::new(dimension))
                }
            },
            None => Box::new(PatternModel::new(dimension)),
        };
        tracing::info!(tier = model.name(), dimension, "language adapter ready");
        Self { model, dimension }
    }

    pub fn tier(&self) -> &'static str {
        self.model.name()
    }

    /// Total classification: any provider failure falls back to the
    /// ordered keyword rules, so intent and urgency are always present.
    pub async fn classify(&self, text: &str) -> IntentClassification {
        match self.model.classify_intent(text).await {
            Ok(classification) => classification,
            Err(err) => {
                tracing::warn!(tier = self.model.name(), error = %err, "intent classification degraded to rules");
                heuristic::classify_by_rules(text)
            }
        }
    }

    /// Total embedding: failure falls back to the deterministic seeded
    /// vector so the same text always embeds identically.
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        match self.model.embed(text).await {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!(tier = self.model.name(), error = %err, "embedding degraded to seeded vector");
                heuristic::seeded_embedding(text, self.dimension)
            }
        }
    }

    /// Total answer synthesis: failure yields the fixed low-trust
    /// answer (confidence 0.1, escalate) rather than an error.
    pub async fn answer(
        &self,
        query: &str,
        results: &[SearchHit],
        user_context: Option<&UserContext>,
    ) -> AgentAnswer {
        match self.model.synthesize(query, results, user_context).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(tier = self.model.name(), error = %err, "answer synthesis degraded to human handoff");
                heuristic::degraded_answer()
            }
        }
    }
}

/// Build the enriched search string: set union of the original query,
/// extracted keywords, entities, and the intent label. Insertion order
/// is fixed so the output is deterministic per input.
pub fn enhance_query(original: &str, classification: &IntentClassification) -> String {
    let mut seen = std::collections::HashSet::new();
    let mut terms: Vec<&str> = Vec::new();
    let intent = classification.intent.as_str();

    for term in std::iter::once(original)
        .chain(classification.keywords.iter().map(String::as_str))
        .chain(classification.entities.iter().map(String::as_str))
        .chain(std::iter::once(intent))
    {
        if !term.is_empty() && seen.insert(term) {
            terms.push(term);
        }
    }
    terms.join(" ")
}
