use crate::{errors::IndexError, record::IndexMatch};
use std::{future::Future, pin::Pin};

/// Nearest-neighbor search over an index.
///
/// Implementations must return matches best-first and include metadata.
pub trait VectorSearch: Send + Sync {
    fn query<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<IndexMatch>, IndexError>> + Send + 'a>>;
}
