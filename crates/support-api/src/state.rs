//! Application state for the API server.

use std::sync::Arc;

use support_agent::{
    data, DocumentStore, ElasticStore, LanguageAdapter, MemoryStore, SessionStore, SupportAgent,
    SupportConfig,
};

/// Shared application state. The agent is fully built at startup;
/// handlers only ever borrow it.
pub struct AppState {
    pub agent: SupportAgent,
}

impl AppState {
    pub fn new(agent: SupportAgent) -> Self {
        Self { agent }
    }

    /// Build the agent from config: a live document store when an
    /// endpoint is configured, otherwise the seeded in-process store.
    pub async fn from_config(config: SupportConfig) -> anyhow::Result<Self> {
        let language = LanguageAdapter::from_config(&config);

        let store: Arc<dyn DocumentStore> = match &config.store.endpoint {
            Some(endpoint) => {
                let store = ElasticStore::new(endpoint, config.store.api_key.clone())?;
                store
                    .ensure_indices(
                        &config.store.kb_index,
                        &config.store.tickets_index,
                        config.search.embedding_dimension,
                    )
                    .await?;
                tracing::info!(endpoint = %endpoint, "using live document store");
                Arc::new(store)
            }
            None => {
                let store = MemoryStore::new();
                data::seed_store(&store, &language, &config).await?;
                tracing::info!("no store endpoint configured, using seeded in-memory store");
                Arc::new(store)
            }
        };

        Ok(Self {
            agent: SupportAgent::new(store, language, SessionStore::new(), config),
        })
    }
}
