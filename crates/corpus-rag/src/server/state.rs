//! Application state for the query server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::Config;
use crate::conversation::SessionStore;
use crate::error::Result;
use crate::providers::{
    EmbeddingProvider, GeminiEmbedder, GeminiGenerator, LlmProvider, PineconeIndex,
    VectorStoreProvider,
};
use crate::rag::RagEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: Config,
    /// The query engine
    engine: RagEngine,
    /// Live conversation sessions, owned by the server layer
    sessions: SessionStore,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state with the configured live providers.
    pub async fn new(config: Config) -> Result<Self> {
        tracing::info!("Initializing query service...");

        let embedder = Arc::new(GeminiEmbedder::new(&config.gemini)?);
        let llm = Arc::new(GeminiGenerator::new(&config.gemini)?);
        tracing::info!(
            "Gemini clients initialized (embedding: {}, generation: {})",
            config.gemini.embed_model,
            config.gemini.generate_model
        );

        let index = Arc::new(PineconeIndex::connect(&config.pinecone).await?);

        Ok(Self::with_providers(config, embedder, index, llm))
    }

    /// Create application state around explicit providers.
    pub fn with_providers(
        config: Config,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let engine = RagEngine::new(embedder, store, llm, &config.retrieval);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                engine,
                sessions: SessionStore::new(),
                ready: RwLock::new(false),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the query engine
    pub fn engine(&self) -> &RagEngine {
        &self.inner.engine
    }

    /// Get the session store
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
