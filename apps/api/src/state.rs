use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::analysis::text::TextExtractor;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::storage::StorageGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub storage: Arc<dyn StorageGateway>,
    pub text_extractor: Arc<dyn TextExtractor>,
    /// Pooled HTTP client handed to every `LlmClient` built for a run.
    pub http: reqwest::Client,
    /// LLM API key. Seeded from `LLM_API_KEY`, replaceable at runtime.
    pub llm_api_key: Arc<RwLock<Option<String>>>,
    pub config: Config,
}

impl AppState {
    /// Builds a client for the current key, or `None` when no key has been set.
    pub async fn llm_client(&self) -> Option<LlmClient> {
        let key = self.llm_api_key.read().await;
        key.as_deref().map(|api_key| {
            LlmClient::new(
                self.http.clone(),
                &self.config.llm_api_url,
                api_key,
                &self.config.llm_model,
            )
        })
    }
}
