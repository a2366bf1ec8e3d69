//! Unified error types for the crate.

use embedding_service::AiEmbeddingError;
use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error for vector-index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The embedding provider failed.
    #[error(transparent)]
    Embedding(#[from] AiEmbeddingError),

    /// Embedding length differs from the index dimension.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// HTTP transport errors talking to Pinecone.
    #[error("pinecone transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Pinecone answered with a non-success status.
    #[error("pinecone HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Pinecone response could not be decoded.
    #[error("pinecone decode error: {0}")]
    Decode(String),

    /// The index did not report `ready` within the configured attempts.
    #[error("index '{name}' not ready (state: {state})")]
    NotReady { name: String, state: String },

    /// A match came back without a string `text` field in its metadata.
    #[error("match #{position} (id={id}) has no `text` in metadata")]
    MissingText { position: usize, id: String },
}
