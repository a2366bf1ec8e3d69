//! OpenAI embedding provider implementation.
//!
//! Wraps [`OpenAiService`] and enforces the index dimensionality.

use std::{future::Future, pin::Pin, sync::Arc};

use embedding_service::OpenAiService;
use tracing::warn;

use crate::{EmbeddingsProvider, IndexError};

/// OpenAI embedding provider (async).
#[derive(Clone)]
pub struct OpenAiEmbedder {
    svc: Arc<OpenAiService>,
    dim: usize,
}

impl OpenAiEmbedder {
    /// `dim` is the vector length the index expects.
    pub fn new(svc: Arc<OpenAiService>, dim: usize) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for OpenAiEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
        Box::pin(async move {
            let v = self.svc.embeddings(text).await?;

            if v.len() != self.dim {
                warn!(got = v.len(), want = self.dim, "embedding dimension mismatch");
                return Err(IndexError::VectorSizeMismatch {
                    got: v.len(),
                    want: self.dim,
                });
            }

            Ok(v)
        })
    }
}
