//! Embedding provider client used by the gateway.
//!
//! - [`services::open_ai_service::OpenAiService`] talks to `POST {endpoint}/v1/embeddings`.
//! - [`config`] builds the embedding profile strictly from environment variables.
//! - [`error_handler`] holds the unified [`AiEmbeddingError`] and env helpers.

pub mod config;
pub mod error_handler;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::AiEmbeddingError;
pub use services::open_ai_service::OpenAiService;
