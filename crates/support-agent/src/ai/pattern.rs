//! Fully offline tier: keyword rules for classification, seeded
//! vectors for embedding, and canned grounded answers for the common
//! query families. Keeps the whole pipeline exercisable with no
//! provider or store credentials at all.

use async_trait::async_trait;

use super::heuristic::{classify_by_rules, seeded_embedding};
use super::{LanguageModel, ModelError};
use crate::types::{AgentAnswer, IntentClassification, SearchHit, UserContext};

pub struct PatternModel {
    dimension: usize,
}

impl PatternModel {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn answer(
    response: &str,
    confidence: f32,
    actions: &[&str],
    follow_ups: &[&str],
) -> AgentAnswer {
    AgentAnswer {
        response: response.to_string(),
        confidence,
        suggested_actions: actions.iter().map(|s| s.to_string()).collect(),
        escalate: false,
        follow_up_questions: follow_ups.iter().map(|s| s.to_string()).collect(),
    }
}

/// Canned answer per query family; the default branch asks for detail
/// instead of guessing.
pub fn canned_answer(query: &str) -> AgentAnswer {
    let lower = query.to_lowercase();

    if contains_any(&lower, &["password", "reset", "login"]) {
        answer(
            "To reset your password: 1) Go to the login page 2) Click 'Forgot Password' \
             3) Enter your email address 4) Check your email for the reset link 5) Follow \
             the instructions to create a new password. If you don't receive the email \
             within 5 minutes, please check your spam folder.",
            0.95,
            &[
                "Try password reset",
                "Check spam folder",
                "Contact support if issues persist",
            ],
            &[
                "Are you receiving the reset email?",
                "Do you need help with two-factor authentication?",
            ],
        )
    } else if contains_any(&lower, &["billing", "charge", "payment"]) {
        answer(
            "I can help with billing questions. If you were charged twice, this usually \
             happens when: 1) Payment method was updated during billing cycle 2) Failed \
             payment retry succeeded after manual retry. I can help you request a refund \
             for any duplicate charges. Would you like me to walk you through the refund \
             process?",
            0.92,
            &[
                "Request refund",
                "Review billing history",
                "Update payment method",
            ],
            &[
                "Would you like to see your billing history?",
                "Do you need help updating your payment method?",
            ],
        )
    } else if contains_any(&lower, &["slow", "loading", "performance"]) {
        answer(
            "Let's troubleshoot the slow loading issue: 1) Clear your browser cache and \
             cookies 2) Disable browser extensions temporarily 3) Try incognito/private \
             browsing mode 4) Check your internet connection speed. If the issue persists, \
             it might be related to your project size or browser compatibility.",
            0.88,
            &[
                "Clear browser cache",
                "Try incognito mode",
                "Test internet speed",
            ],
            &[
                "Which browser are you using?",
                "How large is your current project?",
            ],
        )
    } else if contains_any(&lower, &["slack", "integration"]) {
        answer(
            "Setting up Slack integration is easy! 1) Go to Settings > Integrations \
             2) Click 'Add Slack Integration' 3) Authorize CloudFlow in your Slack \
             workspace 4) Choose which channels should receive notifications 5) Configure \
             your notification preferences. You can get updates for project milestones, \
             task assignments, and due dates.",
            0.94,
            &[
                "Go to Settings > Integrations",
                "Authorize Slack workspace",
                "Configure notifications",
            ],
            &[
                "Which Slack workspace do you want to connect?",
                "What type of notifications do you want?",
            ],
        )
    } else if contains_any(&lower, &["team", "permission", "access", "edit"]) {
        answer(
            "For team permissions, CloudFlow has 4 roles: Admin (full access), Manager \
             (edit projects, manage team), Member (view and edit assigned tasks), Viewer \
             (read-only). To change permissions: 1) Go to Team > Members 2) Click on the \
             team member 3) Select their new role. Note: Only Admins can promote other \
             users to Admin level.",
            0.91,
            &[
                "Go to Team settings",
                "Update member roles",
                "Review permission levels",
            ],
            &[
                "What level of access do they need?",
                "Should they be able to invite new members?",
            ],
        )
    } else {
        answer(
            "I'd be happy to help! Could you provide a bit more detail about what you're \
             trying to do? I can assist with account settings, billing questions, \
             integrations, performance issues, and team management.",
            0.75,
            &["Provide more details", "Browse help articles", "Contact support"],
            &[
                "What specific feature are you having trouble with?",
                "Is this related to a recent change in your account?",
            ],
        )
    }
}

#[async_trait]
impl LanguageModel for PatternModel {
    async fn classify_intent(&self, text: &str) -> Result<IntentClassification, ModelError> {
        Ok(classify_by_rules(text))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        Ok(seeded_embedding(text, self.dimension))
    }

    async fn synthesize(
        &self,
        query: &str,
        _results: &[SearchHit],
        _user_context: Option<&UserContext>,
    ) -> Result<AgentAnswer, ModelError> {
        Ok(canned_answer(query))
    }

    fn name(&self) -> &'static str {
        "pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_family_does_not_escalate() {
        let a = canned_answer("How do I reset my password?");
        assert!(!a.escalate);
        assert!(a.confidence > 0.9);
        assert!(a.response.contains("Forgot Password"));
    }

    #[test]
    fn test_default_family_asks_for_detail() {
        let a = canned_answer("something entirely unrelated");
        assert!(!a.escalate);
        assert!(!a.follow_up_questions.is_empty());
    }

    #[tokio::test]
    async fn test_pattern_model_is_total() {
        let model = PatternModel::new(768);
        let c = model.classify_intent("").await.unwrap();
        assert_eq!(c.intent, crate::types::Intent::General);
        let v = model.embed("").await.unwrap();
        assert_eq!(v.len(), 768);
        let a = model.synthesize("", &[], None).await.unwrap();
        assert!(!a.response.is_empty());
    }
}
