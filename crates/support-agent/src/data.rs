//! Seed corpus for the CloudFlow support domain and the loader that
//! embeds and indexes it. Articles embed "title content", tickets
//! embed the problem statement, and the product catalog is flattened
//! into knowledge-base articles under the "product" category.

use crate::ai::LanguageAdapter;
use crate::config::SupportConfig;
use crate::search::{DocumentStore, IndexDoc};

struct Article {
    id: &'static str,
    title: &'static str,
    content: &'static str,
    category: &'static str,
    tags: [&'static str; 3],
    confidence_score: f32,
}

struct Ticket {
    id: &'static str,
    ticket_id: &'static str,
    problem: &'static str,
    solution: &'static str,
    category: &'static str,
    priority: &'static str,
    resolution_time: u32,
    satisfaction_score: f32,
    created_date: &'static str,
}

struct Product {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    features: &'static [&'static str],
    troubleshooting: &'static str,
    price: &'static str,
}

const ARTICLES: &[Article] = &[
    Article {
        id: "kb_001",
        title: "How to reset your password",
        content: "To reset your password: 1) Go to login page 2) Click 'Forgot Password' 3) Enter your email 4) Check your email for reset link 5) Follow the link and create new password. If you don't receive the email, check spam folder or contact support.",
        category: "account",
        tags: ["password", "login", "account"],
        confidence_score: 0.95,
    },
    Article {
        id: "kb_002",
        title: "Understanding billing cycles",
        content: "CloudFlow bills monthly on the date you signed up. Pro plans are $29/month, Team plans are $99/month. Billing includes all features for that tier. You can upgrade/downgrade anytime. Refunds are prorated for downgrades.",
        category: "billing",
        tags: ["billing", "pricing", "subscription"],
        confidence_score: 0.98,
    },
    Article {
        id: "kb_003",
        title: "Integrating with Slack",
        content: "To integrate with Slack: 1) Go to Settings > Integrations 2) Click 'Add Slack' 3) Authorize CloudFlow in Slack 4) Choose which channels get notifications 5) Configure notification preferences. You can receive updates for project milestones, task assignments, and due dates.",
        category: "integrations",
        tags: ["slack", "integration", "notifications"],
        confidence_score: 0.92,
    },
    Article {
        id: "kb_004",
        title: "Troubleshooting slow dashboard loading",
        content: "If your dashboard loads slowly: 1) Clear browser cache and cookies 2) Disable browser extensions 3) Try incognito/private mode 4) Check your internet connection 5) Try a different browser. For persistent issues, contact support with your browser version and connection speed.",
        category: "technical",
        tags: ["performance", "dashboard", "browser"],
        confidence_score: 0.88,
    },
    Article {
        id: "kb_005",
        title: "Managing team permissions",
        content: "Team permissions in CloudFlow: Admin (full access), Manager (edit projects, manage team), Member (view and edit assigned tasks), Viewer (read-only). To change permissions: Go to Team > Members > Click user > Select role. Only Admins can promote other Admins.",
        category: "team_management",
        tags: ["permissions", "team", "roles"],
        confidence_score: 0.94,
    },
    Article {
        id: "kb_006",
        title: "Canceling your subscription",
        content: "To cancel: 1) Go to Account > Billing 2) Click 'Cancel Subscription' 3) Choose cancellation reason 4) Confirm cancellation. Your account remains active until the end of current billing period. Data is retained for 30 days after cancellation for reactivation.",
        category: "billing",
        tags: ["cancel", "subscription", "billing"],
        confidence_score: 0.96,
    },
    Article {
        id: "kb_007",
        title: "Exporting project data",
        content: "Export options: 1) Go to Project > Settings > Export 2) Choose format (CSV, PDF, JSON) 3) Select date range 4) Click Export. Large exports are emailed as download links. Exports include tasks, comments, time tracking, and file attachments.",
        category: "data_management",
        tags: ["export", "data", "backup"],
        confidence_score: 0.90,
    },
    Article {
        id: "kb_008",
        title: "Setting up two-factor authentication",
        content: "Enable 2FA: 1) Go to Account > Security 2) Click 'Enable 2FA' 3) Scan QR code with authenticator app 4) Enter verification code 5) Save backup codes. Supported apps: Google Authenticator, Authy, 1Password. Contact support if you lose access.",
        category: "security",
        tags: ["2fa", "security", "authentication"],
        confidence_score: 0.97,
    },
];

const TICKETS: &[Ticket] = &[
    Ticket {
        id: "ticket_001",
        ticket_id: "CF-2024-001",
        problem: "Cannot access my account after password reset",
        solution: "User was entering old password. Guided through proper reset process and cleared browser cache. Issue resolved.",
        category: "account",
        priority: "high",
        resolution_time: 15,
        satisfaction_score: 4.5,
        created_date: "2024-01-15T10:30:00Z",
    },
    Ticket {
        id: "ticket_002",
        ticket_id: "CF-2024-002",
        problem: "Charged twice for the same month",
        solution: "Duplicate charge due to payment method update. Refunded duplicate charge within 3-5 business days. Updated billing system to prevent future occurrences.",
        category: "billing",
        priority: "medium",
        resolution_time: 45,
        satisfaction_score: 4.8,
        created_date: "2024-01-16T14:20:00Z",
    },
    Ticket {
        id: "ticket_003",
        ticket_id: "CF-2024-003",
        problem: "Slack integration not working, notifications not appearing",
        solution: "Integration token expired. Re-authorized Slack connection and updated webhook URLs. Tested notifications successfully.",
        category: "integrations",
        priority: "medium",
        resolution_time: 25,
        satisfaction_score: 4.2,
        created_date: "2024-01-17T09:15:00Z",
    },
    Ticket {
        id: "ticket_004",
        ticket_id: "CF-2024-004",
        problem: "Dashboard takes 30+ seconds to load",
        solution: "Large dataset causing performance issues. Implemented pagination for task lists and optimized database queries. Loading time reduced to under 3 seconds.",
        category: "technical",
        priority: "high",
        resolution_time: 120,
        satisfaction_score: 4.7,
        created_date: "2024-01-18T16:45:00Z",
    },
    Ticket {
        id: "ticket_005",
        ticket_id: "CF-2024-005",
        problem: "Team member cannot see shared projects",
        solution: "User had Viewer permissions instead of Member. Updated permissions and explained role differences. User can now access and edit shared projects.",
        category: "team_management",
        priority: "medium",
        resolution_time: 10,
        satisfaction_score: 4.9,
        created_date: "2024-01-19T11:30:00Z",
    },
];

const PRODUCTS: &[Product] = &[
    Product {
        id: "product_001",
        name: "CloudFlow Free",
        description: "Basic project management for individuals and small teams. Up to 3 projects, 5 team members.",
        features: &["Basic task management", "File sharing", "Calendar view", "Mobile app"],
        troubleshooting: "Free accounts have limited storage (1GB). Upgrade to Pro for unlimited storage.",
        price: "$0/month",
    },
    Product {
        id: "product_002",
        name: "CloudFlow Pro",
        description: "Professional project management with advanced features. Unlimited projects and team members.",
        features: &["Advanced task management", "Time tracking", "Custom fields", "API access", "Advanced integrations"],
        troubleshooting: "Pro features may take 24 hours to activate after upgrade. Contact support if delayed.",
        price: "$29/month",
    },
    Product {
        id: "product_003",
        name: "CloudFlow Team",
        description: "Enterprise-grade project management with team collaboration tools and priority support.",
        features: &["Everything in Pro", "White-label options", "Priority support", "Advanced analytics", "SSO integration"],
        troubleshooting: "Enterprise features require admin setup. Dedicated onboarding specialist assigned.",
        price: "$99/month",
    },
];

/// Knowledge-base articles as index documents, without embeddings.
pub fn knowledge_base_docs() -> Vec<IndexDoc> {
    ARTICLES
        .iter()
        .map(|a| IndexDoc {
            id: a.id.to_string(),
            title: Some(a.title.to_string()),
            content: Some(a.content.to_string()),
            category: Some(a.category.to_string()),
            tags: a.tags.iter().map(|t| t.to_string()).collect(),
            confidence_score: Some(a.confidence_score),
            ..Default::default()
        })
        .collect()
}

/// Resolved support tickets as index documents, without embeddings.
pub fn support_ticket_docs() -> Vec<IndexDoc> {
    TICKETS
        .iter()
        .map(|t| IndexDoc {
            id: t.id.to_string(),
            ticket_id: Some(t.ticket_id.to_string()),
            problem: Some(t.problem.to_string()),
            solution: Some(t.solution.to_string()),
            category: Some(t.category.to_string()),
            priority: Some(t.priority.to_string()),
            resolution_time: Some(t.resolution_time),
            satisfaction_score: Some(t.satisfaction_score),
            created_date: Some(t.created_date.to_string()),
            ..Default::default()
        })
        .collect()
}

/// Product catalog flattened into knowledge-base articles. The title
/// carries the price so plan questions surface it directly.
pub fn product_catalog_docs() -> Vec<IndexDoc> {
    PRODUCTS
        .iter()
        .map(|p| IndexDoc {
            id: p.id.to_string(),
            title: Some(format!("{} - {}", p.name, p.price)),
            content: Some(format!(
                "{} Features: {}. {}",
                p.description,
                p.features.join(", "),
                p.troubleshooting
            )),
            category: Some("product".to_string()),
            tags: vec![
                "product".to_string(),
                "pricing".to_string(),
                "features".to_string(),
            ],
            confidence_score: Some(0.95),
            ..Default::default()
        })
        .collect()
}

/// Embed and index the whole seed corpus into both collections.
pub async fn seed_store(
    store: &dyn DocumentStore,
    language: &LanguageAdapter,
    config: &SupportConfig,
) -> anyhow::Result<()> {
    let mut kb_docs = knowledge_base_docs();
    kb_docs.extend(product_catalog_docs());
    for doc in &mut kb_docs {
        let title = doc.title.as_deref().unwrap_or_default();
        let content = doc.content.as_deref().unwrap_or_default();
        doc.embedding = language.embed(&format!("{title} {content}")).await;
    }
    let kb_count = store
        .bulk_index(&config.store.kb_index, &kb_docs)
        .await?;

    let mut ticket_docs = support_ticket_docs();
    for doc in &mut ticket_docs {
        let problem = doc.problem.as_deref().unwrap_or_default();
        doc.embedding = language.embed(problem).await;
    }
    let ticket_count = store
        .bulk_index(&config.store.tickets_index, &ticket_docs)
        .await?;

    tracing::info!(
        articles = kb_count,
        tickets = ticket_count,
        "seed corpus indexed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{LanguageAdapter, PatternModel};
    use crate::search::MemoryStore;

    #[test]
    fn test_corpus_shapes() {
        assert_eq!(knowledge_base_docs().len(), 8);
        assert_eq!(support_ticket_docs().len(), 5);
        assert_eq!(product_catalog_docs().len(), 3);
    }

    #[test]
    fn test_product_docs_carry_price_in_title() {
        let docs = product_catalog_docs();
        assert_eq!(docs[1].title.as_deref(), Some("CloudFlow Pro - $29/month"));
        assert_eq!(docs[1].category.as_deref(), Some("product"));
    }

    #[tokio::test]
    async fn test_seed_store_populates_both_collections() {
        let config = SupportConfig::default();
        let language = LanguageAdapter::new(
            Box::new(PatternModel::new(16)),
            16,
        );
        let store = MemoryStore::new();
        seed_store(&store, &language, &config).await.unwrap();

        // 8 articles + 3 catalog entries share the kb collection.
        assert_eq!(store.doc_count(&config.store.kb_index), 11);
        assert_eq!(store.doc_count(&config.store.tickets_index), 5);
    }

    #[tokio::test]
    async fn test_seeded_docs_are_embedded() {
        let config = SupportConfig::default();
        let language = LanguageAdapter::new(Box::new(PatternModel::new(16)), 16);
        let store = MemoryStore::new();
        seed_store(&store, &language, &config).await.unwrap();

        let embedding = language.embed("password reset").await;
        let hits = store
            .hybrid_search("password", &embedding, &config.store.kb_index, 5)
            .await
            .unwrap();
        assert!(!hits.is_empty());
    }
}
