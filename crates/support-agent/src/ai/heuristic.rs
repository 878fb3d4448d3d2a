//! Rule-based degraded tier: ordered keyword rules for intent, a
//! hash-seeded deterministic embedding, and the fixed human-handoff
//! answer. These same functions back the adapter's failure defaults.

use async_trait::async_trait;

use super::{LanguageModel, ModelError};
use crate::types::{
    AgentAnswer, Intent, IntentClassification, SearchHit, Tone, Urgency, UserContext,
};

// Rule vocabulary. Order is significant — first matching rule wins.
const ACCOUNT_WORDS: &[&str] = &["password", "login", "access", "account"];
const BILLING_WORDS: &[&str] = &["billing", "charge", "payment", "invoice"];
const TECHNICAL_WORDS: &[&str] = &["slow", "loading", "performance", "dashboard"];
const FEATURE_WORDS: &[&str] = &["slack", "integration", "connect"];

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Classify a query with the fixed keyword-membership rules, checked
/// in order. Always returns a value, even for empty input.
pub fn classify_by_rules(text: &str) -> IntentClassification {
    let lower = text.to_lowercase();

    if contains_any(&lower, ACCOUNT_WORDS) {
        IntentClassification {
            intent: Intent::Account,
            urgency: Urgency::High,
            entities: vec!["password".into(), "account".into()],
            tone: Tone::Frustrated,
            keywords: vec!["password".into(), "reset".into(), "login".into()],
        }
    } else if contains_any(&lower, BILLING_WORDS) {
        IntentClassification {
            intent: Intent::Billing,
            urgency: Urgency::Medium,
            entities: vec!["billing".into(), "payment".into()],
            tone: Tone::Concerned,
            keywords: vec!["billing".into(), "charge".into(), "payment".into()],
        }
    } else if contains_any(&lower, TECHNICAL_WORDS) {
        IntentClassification {
            intent: Intent::Technical,
            urgency: Urgency::Medium,
            entities: vec!["dashboard".into(), "performance".into()],
            tone: Tone::Frustrated,
            keywords: vec!["slow".into(), "loading".into(), "performance".into()],
        }
    } else if contains_any(&lower, FEATURE_WORDS) {
        IntentClassification {
            intent: Intent::FeatureRequest,
            urgency: Urgency::Low,
            entities: vec!["slack".into(), "integration".into()],
            tone: Tone::Neutral,
            keywords: vec!["slack".into(), "integration".into(), "connect".into()],
        }
    } else {
        IntentClassification {
            intent: Intent::General,
            urgency: Urgency::Medium,
            entities: Vec::new(),
            tone: Tone::Neutral,
            keywords: text.split_whitespace().take(5).map(String::from).collect(),
        }
    }
}

/// Deterministic pseudo-random embedding seeded from a hash of the
/// text: same text always yields the same vector, components in
/// [-1, 1]. FNV-1a seeds a splitmix64 stream, so the result is also
/// stable across processes and platforms.
pub fn seeded_embedding(text: &str, dimension: usize) -> Vec<f32> {
    let mut state = fnv1a64(text.as_bytes());
    (0..dimension)
        .map(|_| {
            let bits = splitmix64(&mut state);
            // Top 53 bits → uniform f64 in [0, 1), mapped onto [-1, 1].
            let unit = (bits >> 11) as f64 / (1u64 << 53) as f64;
            (unit * 2.0 - 1.0) as f32
        })
        .collect()
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Fixed low-trust answer used whenever synthesis is unavailable.
/// Confidence 0.1 and escalate=true are a deliberate signal of reduced
/// service quality, not an error code.
pub fn degraded_answer() -> AgentAnswer {
    AgentAnswer {
        response: "I understand you need help. Let me connect you with a human agent \
                   who can assist you better."
            .to_string(),
        confidence: 0.1,
        suggested_actions: vec!["Contact human support".to_string()],
        escalate: true,
        follow_up_questions: Vec::new(),
    }
}

/// Degraded tier as a standalone model: rules, seeded vectors, and the
/// human-handoff answer.
pub struct HeuristicModel {
    dimension: usize,
}

impl HeuristicModel {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl LanguageModel for HeuristicModel {
    async fn classify_intent(&self, text: &str) -> Result<IntentClassification, ModelError> {
        Ok(classify_by_rules(text))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        Ok(seeded_embedding(text, self.dimension))
    }

    async fn synthesize(
        &self,
        _query: &str,
        _results: &[SearchHit],
        _user_context: Option<&UserContext>,
    ) -> Result<AgentAnswer, ModelError> {
        Ok(degraded_answer())
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_total_on_empty_input() {
        let c = classify_by_rules("");
        assert_eq!(c.intent, Intent::General);
        assert_eq!(c.urgency, Urgency::Medium);
    }

    #[test]
    fn test_classify_account_rule() {
        let c = classify_by_rules("I can't LOGIN to my account");
        assert_eq!(c.intent, Intent::Account);
        assert_eq!(c.urgency, Urgency::High);
        assert_eq!(c.tone, Tone::Frustrated);
    }

    #[test]
    fn test_rule_order_first_match_wins() {
        // Mentions both account and billing vocabulary; account is
        // checked first.
        let c = classify_by_rules("my account shows a duplicate charge");
        assert_eq!(c.intent, Intent::Account);
    }

    #[test]
    fn test_classify_billing_rule() {
        let c = classify_by_rules("why was my payment declined");
        assert_eq!(c.intent, Intent::Billing);
        assert_eq!(c.tone, Tone::Concerned);
    }

    #[test]
    fn test_general_keywords_are_leading_tokens() {
        let c = classify_by_rules("how do I export all of my project data today");
        assert_eq!(c.intent, Intent::General);
        assert_eq!(c.keywords, vec!["how", "do", "I", "export", "all"]);
    }

    #[test]
    fn test_seeded_embedding_is_deterministic() {
        let a = seeded_embedding("reset my password", 768);
        let b = seeded_embedding("reset my password", 768);
        assert_eq!(a, b);
        assert_eq!(a.len(), 768);
    }

    #[test]
    fn test_seeded_embedding_diverges_per_text() {
        let a = seeded_embedding("reset my password", 768);
        let b = seeded_embedding("dashboard is slow", 768);
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_embedding_range() {
        for value in seeded_embedding("anything at all", 768) {
            assert!((-1.0..=1.0).contains(&value));
        }
    }
}
