use serde::{Deserialize, Serialize};

pub const KNOWLEDGE_BASE_INDEX: &str = "cloudflow_knowledge_base";
pub const SUPPORT_TICKETS_INDEX: &str = "cloudflow_support_tickets";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportConfig {
    pub store: StoreConfig,
    pub model: ModelConfig,
    pub server: ServerConfig,
    pub search: SearchConfig,
}

/// Document store connection. No endpoint means the in-memory store
/// seeded with the sample corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub kb_index: String,
    pub tickets_index: String,
}

/// Language model provider. No api key means the offline pattern model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub embed_model: String,
    pub endpoint: String,
    /// Hard per-call timeout; after this the live call fails into the
    /// rule-based tier instead of hanging.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub kb_limit: usize,
    pub ticket_limit: usize,
    /// Vector width shared by the embedding model and the store schemas.
    pub embedding_dimension: usize,
}

impl SupportConfig {
    /// Build config from environment variables, keeping defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.store.endpoint = std::env::var("ELASTIC_ENDPOINT").ok();
        config.store.api_key = std::env::var("ELASTIC_API_KEY").ok();
        config.model.api_key = std::env::var("GEMINI_API_KEY").ok();
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model.model = model;
        }
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            if let Ok(port) = port.parse() {
                config.server.port = port;
            }
        }
        config
    }

    /// Validate config values, returning errors for clearly broken
    /// configurations.
    pub fn validate(&self) -> Result<(), String> {
        if self.search.embedding_dimension == 0 {
            return Err("search.embedding_dimension must be > 0".into());
        }
        if self.search.kb_limit == 0 || self.search.ticket_limit == 0 {
            return Err("search limits must be > 0".into());
        }
        if self.model.timeout_secs == 0 {
            return Err("model.timeout_secs must be > 0".into());
        }
        if self.store.kb_index.is_empty() || self.store.tickets_index.is_empty() {
            return Err("store index names must not be empty".into());
        }
        Ok(())
    }
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                endpoint: None,
                api_key: None,
                kb_index: KNOWLEDGE_BASE_INDEX.to_string(),
                tickets_index: SUPPORT_TICKETS_INDEX.to_string(),
            },
            model: ModelConfig {
                api_key: None,
                model: "gemini-1.5-pro-002".to_string(),
                embed_model: "text-embedding-004".to_string(),
                endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                timeout_secs: 30,
            },
            server: ServerConfig {
                host: "localhost".to_string(),
                port: 8000,
            },
            search: SearchConfig {
                kb_limit: 5,
                ticket_limit: 3,
                embedding_dimension: 768,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SupportConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let mut config = SupportConfig::default();
        config.search.embedding_dimension = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = SupportConfig::default();
        config.model.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
