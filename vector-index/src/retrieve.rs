//! Retrieval helpers: shaping matches and the embed → search → shape chain.

use crate::embed::EmbeddingsProvider;
use crate::errors::IndexError;
use crate::record::{IndexMatch, RagQuery};
use crate::search::VectorSearch;

use tracing::trace;

/// Extracts `metadata.text` from every match, keeping the provider's order.
///
/// # Errors
/// Returns `IndexError::MissingText` for the first match without a string
/// `text` field. Matches are never skipped.
pub fn extract_texts(matches: Vec<IndexMatch>) -> Result<Vec<String>, IndexError> {
    matches
        .into_iter()
        .enumerate()
        .map(|(position, m)| {
            m.text()
                .map(str::to_string)
                .ok_or_else(|| IndexError::MissingText {
                    position,
                    id: m.id.clone(),
                })
        })
        .collect()
}

/// Embeds the query text, searches the index and returns the text snippets.
///
/// # Errors
/// Returns embedding errors, index failures, or `MissingText`.
pub async fn rag_context(
    provider: &dyn EmbeddingsProvider,
    search: &dyn VectorSearch,
    query: RagQuery<'_>,
) -> Result<Vec<String>, IndexError> {
    trace!("retrieve::rag_context top_k={}", query.top_k);

    let qv = provider.embed(query.text).await?;
    let matches = search.query(qv, query.top_k).await?;
    let out = extract_texts(matches)?;

    trace!("retrieve::rag_context hits={}", out.len());
    Ok(out)
}
