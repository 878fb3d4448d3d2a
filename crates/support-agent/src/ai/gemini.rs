//! Live provider tier backed by the Gemini REST API.
//!
//! Every call carries a hard client timeout so a degraded provider
//! fails into the rule-based tier instead of hanging the pipeline.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::{LanguageModel, ModelError};
use crate::config::ModelConfig;
use crate::types::{AgentAnswer, IntentClassification, SearchHit, UserContext};

pub struct GeminiModel {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    embed_model: String,
    dimension: usize,
}

impl GeminiModel {
    pub fn new(config: &ModelConfig, api_key: String, dimension: usize) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        tracing::info!(
            model = %config.model,
            embed_model = %config.embed_model,
            timeout_secs = config.timeout_secs,
            "creating Gemini provider"
        );

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            embed_model: config.embed_model.clone(),
            dimension,
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let value: Value = response.json().await?;

        if !status.is_success() {
            return Err(ModelError::Parse(format!(
                "generateContent returned HTTP {}: {}",
                status,
                value.to_string().chars().take(200).collect::<String>()
            )));
        }

        value
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ModelError::Empty)
    }

    fn classify_prompt(query: &str) -> String {
        format!(
            "Analyze this customer support query and extract:\n\
             1. Intent category (billing, technical, account, feature_request, general)\n\
             2. Urgency level (low, medium, high, critical)\n\
             3. Key entities mentioned (product names, error codes, etc.)\n\
             4. Emotional tone (frustrated, neutral, positive, concerned)\n\n\
             Query: \"{query}\"\n\n\
             Return as JSON:\n\
             {{\n\
               \"intent\": \"category\",\n\
               \"urgency\": \"level\",\n\
               \"entities\": [\"entity1\", \"entity2\"],\n\
               \"tone\": \"emotional_state\",\n\
               \"keywords\": [\"key1\", \"key2\"]\n\
             }}"
        )
    }

    fn answer_prompt(
        query: &str,
        results: &[SearchHit],
        user_context: Option<&UserContext>,
    ) -> String {
        let context_docs: Vec<String> = results
            .iter()
            .take(3)
            .map(|hit| {
                let source = &hit.source;
                format!(
                    "Title: {}\nContent: {}\nCategory: {}",
                    source.title.as_deref().unwrap_or("N/A"),
                    source
                        .content
                        .as_deref()
                        .or(source.solution.as_deref())
                        .unwrap_or("N/A"),
                    source.category.as_deref().unwrap_or("N/A"),
                )
            })
            .collect();
        let context = context_docs.join("\n\n---\n\n");

        let user_info = user_context
            .map(|ctx| {
                format!(
                    "User context: {} plan, Previous issues: {}",
                    ctx.subscription_tier.as_deref().unwrap_or("Free"),
                    ctx.issue_history.as_deref().unwrap_or("None"),
                )
            })
            .unwrap_or_default();

        format!(
            "You are a helpful customer support agent for CloudFlow, a project management \
             SaaS platform.\n\n\
             Customer Question: \"{query}\"\n\n\
             {user_info}\n\n\
             Relevant Knowledge Base Information:\n{context}\n\n\
             Instructions:\n\
             1. Provide a helpful, accurate response based on the knowledge base\n\
             2. Be conversational and empathetic\n\
             3. If the information isn't sufficient, ask clarifying questions\n\
             4. Suggest next steps or escalation if needed\n\
             5. Keep responses concise but complete\n\n\
             Response format:\n\
             {{\n\
               \"response\": \"Your helpful response here\",\n\
               \"confidence\": 0.95,\n\
               \"suggested_actions\": [\"action1\", \"action2\"],\n\
               \"escalate\": false,\n\
               \"follow_up_questions\": [\"question1\", \"question2\"]\n\
             }}"
        )
    }
}

/// Parse a synthesized answer, keeping a misbehaving model reply
/// inside the documented confidence range [0, 1].
fn parse_answer(raw: &str) -> Result<AgentAnswer, ModelError> {
    let json = extract_json(raw)?;
    let mut answer: AgentAnswer =
        serde_json::from_str(json).map_err(|e| ModelError::Parse(e.to_string()))?;
    answer.confidence = answer.confidence.clamp(0.0, 1.0);
    Ok(answer)
}

/// Pull the JSON object out of a model reply that may be wrapped in
/// markdown fences or surrounded by prose.
fn extract_json(raw: &str) -> Result<&str, ModelError> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed);

    let start = inner.find('{');
    let end = inner.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&inner[start..=end]),
        _ => Err(ModelError::Parse(format!(
            "no JSON object in model reply: {}",
            inner.chars().take(120).collect::<String>()
        ))),
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn classify_intent(&self, text: &str) -> Result<IntentClassification, ModelError> {
        let raw = self.generate(&Self::classify_prompt(text)).await?;
        let json = extract_json(&raw)?;
        serde_json::from_str(json).map_err(|e| ModelError::Parse(e.to_string()))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let url = format!(
            "{}/models/{}:embedContent?key={}",
            self.endpoint, self.embed_model, self.api_key
        );
        let body = json!({
            "content": { "parts": [{ "text": text }] }
        });

        let value: Value = self.client.post(&url).json(&body).send().await?.json().await?;
        let values = value
            .pointer("/embedding/values")
            .and_then(Value::as_array)
            .ok_or(ModelError::Empty)?;

        let vector: Vec<f32> = values
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();

        // The store schemas are fixed-width; a mismatched vector would
        // poison the collections.
        if vector.len() != self.dimension {
            return Err(ModelError::Parse(format!(
                "embedding width {} does not match configured {}",
                vector.len(),
                self.dimension
            )));
        }
        Ok(vector)
    }

    async fn synthesize(
        &self,
        query: &str,
        results: &[SearchHit],
        user_context: Option<&UserContext>,
    ) -> Result<AgentAnswer, ModelError> {
        let prompt = Self::answer_prompt(query, results, user_context);
        let raw = self.generate(&prompt).await?;
        parse_answer(&raw)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
