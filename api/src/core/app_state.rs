use std::sync::Arc;

use embedding_service::OpenAiService;
use tracing::info;
use vector_index::{EmbeddingsProvider, OpenAiEmbedder, PineconeFacade, VectorSearch};

use crate::{core::config::GatewayConfig, error_handler::AppError};

/// Shared state for all HTTP handlers.
///
/// Built once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Secret expected after `Bearer ` in the `Authorization` header.
    pub api_token: String,
    /// Neighbors requested from the index per query.
    pub top_k: u64,
    /// Turns query text into a vector.
    pub embedder: Arc<dyn EmbeddingsProvider>,
    /// Nearest-neighbor search over the configured index.
    pub index: Arc<dyn VectorSearch>,
}

impl AppState {
    /// Creates the provider clients and makes sure the index exists.
    pub async fn bootstrap(cfg: &GatewayConfig) -> Result<Self, AppError> {
        let openai = Arc::new(OpenAiService::new(cfg.embedding.clone())?);
        let embedder = OpenAiEmbedder::new(openai, cfg.index_spec.dimension);

        let facade = PineconeFacade::new(&cfg.index)?;
        let provisioned = facade.ensure_index(&cfg.index_spec).await?;
        let index = facade.index().await?;

        info!(
            index = %cfg.index.index_name,
            ?provisioned,
            top_k = cfg.top_k,
            "providers ready"
        );

        Ok(Self {
            api_token: cfg.api_token.clone(),
            top_k: cfg.top_k,
            embedder: Arc::new(embedder),
            index: Arc::new(index),
        })
    }
}
