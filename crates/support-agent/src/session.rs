//! Process-wide session store and cross-session analytics.
//!
//! Sessions are created lazily, their logs are append-only, and there
//! is no eviction — the map grows for the life of the process. The
//! sharded map means different sessions never contend, while appends
//! to the same session serialize under its shard write lock.

use dashmap::DashMap;

use crate::types::{AnalyticsSnapshot, ConversationEntry};

#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Vec<ConversationEntry>>,
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a session exists. Sessions are registered as soon as a
    /// query arrives, before the pipeline runs.
    pub fn touch(&self, session_id: &str) {
        self.sessions.entry(session_id.to_string()).or_default();
    }

    /// Append one immutable entry to a session's log.
    pub fn append(&self, session_id: &str, entry: ConversationEntry) {
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .push(entry);
    }

    /// Full log for a session, in append order. Empty for unseen ids.
    pub fn history(&self, session_id: &str) -> Vec<ConversationEntry> {
        self.sessions
            .get(session_id)
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Derive analytics by a full scan over every session's entries.
    /// Fine at this scale; an incremental counter would replace this
    /// in a higher-traffic deployment.
    pub fn snapshot(&self) -> AnalyticsSnapshot {
        let mut total = 0usize;
        let mut confidence_sum = 0.0f32;
        let mut escalations = 0usize;
        // Insertion order doubles as the tie-break for top_intents.
        let mut intent_counts: Vec<(String, usize)> = Vec::new();

        for session in self.sessions.iter() {
            for entry in session.value() {
                total += 1;
                confidence_sum += entry.response.confidence;
                if entry.response.escalate {
                    escalations += 1;
                }
                let intent = entry.intent.intent.as_str();
                match intent_counts.iter_mut().find(|(name, _)| name == intent) {
                    Some((_, count)) => *count += 1,
                    None => intent_counts.push((intent.to_string(), 1)),
                }
            }
        }

        if total == 0 {
            return AnalyticsSnapshot {
                total_conversations: 0,
                active_sessions: self.sessions.len(),
                ..Default::default()
            };
        }

        // Stable sort: equal counts keep first-seen order.
        intent_counts.sort_by(|a, b| b.1.cmp(&a.1));
        intent_counts.truncate(5);

        AnalyticsSnapshot {
            total_conversations: total,
            average_confidence: round2(confidence_sum / total as f32),
            escalation_rate: round2(escalations as f32 / total as f32 * 100.0),
            top_intents: intent_counts,
            active_sessions: self.sessions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentAnswer, Intent, IntentClassification};
    use chrono::Utc;

    fn entry(intent: Intent, confidence: f32, escalate: bool) -> ConversationEntry {
        let mut classification = IntentClassification::unknown();
        classification.intent = intent;
        ConversationEntry {
            timestamp: Utc::now(),
            user_query: "q".into(),
            intent: classification,
            response: AgentAnswer {
                response: "a".into(),
                confidence,
                suggested_actions: vec![],
                escalate,
                follow_up_questions: vec![],
            },
            search_results_count: 0,
        }
    }

    #[test]
    fn test_history_preserves_append_order() {
        let store = SessionStore::new();
        store.append("s1", entry(Intent::Account, 0.9, false));
        store.append("s1", entry(Intent::Billing, 0.8, false));

        let history = store.history("s1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].intent.intent, Intent::Account);
        assert_eq!(history[1].intent.intent, Intent::Billing);
    }

    #[test]
    fn test_history_empty_for_unseen_session() {
        assert!(SessionStore::new().history("nope").is_empty());
    }

    #[test]
    fn test_snapshot_zero_conversations() {
        let store = SessionStore::new();
        store.touch("opened_but_empty");
        let snapshot = store.snapshot();
        assert_eq!(snapshot.total_conversations, 0);
        assert_eq!(snapshot.average_confidence, 0.0);
        assert_eq!(snapshot.escalation_rate, 0.0);
        assert_eq!(snapshot.active_sessions, 1);
    }

    #[test]
    fn test_snapshot_metrics() {
        let store = SessionStore::new();
        store.append("s1", entry(Intent::Account, 0.9, false));
        store.append("s1", entry(Intent::Account, 0.7, true));
        store.append("s2", entry(Intent::Billing, 0.5, false));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.total_conversations, 3);
        assert_eq!(snapshot.average_confidence, 0.7);
        assert_eq!(snapshot.escalation_rate, 33.33);
        assert_eq!(snapshot.active_sessions, 2);
        assert_eq!(snapshot.top_intents[0], ("account".to_string(), 2));
    }

    #[test]
    fn test_top_intents_ties_keep_first_seen_order() {
        let store = SessionStore::new();
        store.append("s1", entry(Intent::Technical, 0.9, false));
        store.append("s1", entry(Intent::Billing, 0.9, false));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.top_intents[0].0, "technical");
        assert_eq!(snapshot.top_intents[1].0, "billing");
    }
}
