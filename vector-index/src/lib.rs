//! Retrieval over a managed Pinecone index.
//!
//! This crate provides:
//! - One-time, idempotent index provisioning at startup ([`PineconeFacade::ensure_index`])
//! - Top‑K nearest-neighbor search with metadata ([`PineconeIndex`])
//! - Shaping matches into the ordered list of `metadata.text` snippets ([`retrieve`])
//!
//! The embedding and search backends sit behind the [`EmbeddingsProvider`] and
//! [`VectorSearch`] traits so callers can inject fakes.

mod config;
mod embed;
mod errors;
mod pinecone_facade;
mod record;
pub mod retrieve;
mod search;

pub use config::{DistanceKind, IndexConfig, IndexSpec};
pub use embed::{EmbeddingsProvider, openai::OpenAiEmbedder};
pub use errors::IndexError;
pub use pinecone_facade::{PineconeFacade, PineconeIndex, Provisioned};
pub use record::{IndexMatch, RagQuery};
pub use search::VectorSearch;
