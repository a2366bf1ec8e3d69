//! Process configuration read from the environment.
//!
//! Required: `OPENAI_API_KEY`, `PINECONE_API_KEY`, `PINECONE_INDEX`, `RENDER_API_TOKEN`.
//! Optional: `API_ADDRESS`, `RAG_TOP_K`, `PINECONE_CONTROLLER_URL`,
//! `PINECONE_CLOUD`, `PINECONE_REGION`, `PINECONE_METRIC`,
//! `PINECONE_READY_POLL_MS`, `PINECONE_READY_ATTEMPTS` plus the embedding
//! variables read by [`config_openai_embedding`].

use embedding_service::{
    AiEmbeddingError, LlmModelConfig, config::default_config::config_openai_embedding,
};
use thiserror::Error;
use vector_index::{DistanceKind, IndexConfig, IndexSpec};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_TOP_K: u64 = 6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value in {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Embedding(#[from] AiEmbeddingError),
}

/// Everything the gateway needs at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listen address, e.g. `0.0.0.0:8000`.
    pub api_address: String,
    /// Shared bearer secret callers must present.
    pub api_token: String,
    /// Neighbors requested per query.
    pub top_k: u64,
    pub embedding: LlmModelConfig,
    pub index: IndexConfig,
    /// Shape used if the index has to be created.
    pub index_spec: IndexSpec,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let embedding = config_openai_embedding()?;

        let mut index = IndexConfig::new_default(
            required("PINECONE_API_KEY")?,
            required("PINECONE_INDEX")?,
        );
        if let Some(url) = optional("PINECONE_CONTROLLER_URL") {
            index.controller_url = url;
        }
        if let Some(v) = optional("PINECONE_READY_POLL_MS") {
            index.ready_poll_ms = parse_number("PINECONE_READY_POLL_MS", &v)?;
        }
        if let Some(v) = optional("PINECONE_READY_ATTEMPTS") {
            index.ready_attempts = parse_number("PINECONE_READY_ATTEMPTS", &v)?;
        }

        let defaults = IndexSpec::default();
        let index_spec = IndexSpec {
            dimension: embedding.dimension,
            metric: match optional("PINECONE_METRIC") {
                Some(v) => parse_metric(&v)?,
                None => defaults.metric,
            },
            cloud: optional("PINECONE_CLOUD").unwrap_or(defaults.cloud),
            region: optional("PINECONE_REGION").unwrap_or(defaults.region),
        };

        let top_k = match optional("RAG_TOP_K") {
            Some(v) => parse_top_k(&v)?,
            None => DEFAULT_TOP_K,
        };

        Ok(Self {
            api_address: optional("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.into()),
            api_token: required("RENDER_API_TOKEN")?,
            top_k,
            embedding,
            index,
            index_spec,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::MissingVar(name))
}

fn optional(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_top_k(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(k) if k > 0 => Ok(k),
        _ => Err(ConfigError::InvalidValue {
            var: "RAG_TOP_K",
            reason: "expected a positive integer",
        }),
    }
}

fn parse_metric(raw: &str) -> Result<DistanceKind, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        var: "PINECONE_METRIC",
        reason: "expected cosine, dotproduct or euclidean",
    })
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        reason: "expected a non-negative integer",
    })
}
