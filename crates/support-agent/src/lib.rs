pub mod agent;
pub mod ai;
pub mod config;
pub mod data;
pub mod fusion;
pub mod search;
pub mod session;
pub mod types;

// Re-export primary types for convenience
pub use agent::SupportAgent;
pub use ai::{GeminiModel, HeuristicModel, LanguageAdapter, LanguageModel, ModelError, PatternModel};
pub use config::SupportConfig;
pub use search::{DocumentStore, ElasticStore, IndexDoc, MemoryStore, StoreError};
pub use session::SessionStore;
pub use types::{
    AgentAnswer, AnalyticsSnapshot, ChatReply, ConversationEntry, DemoScenario, Intent,
    IntentClassification, SearchHit, SourceRef, UserContext,
};

// Re-export common types
pub use anyhow::{Error, Result};
pub use uuid::Uuid;
