//! Core data models used by the library.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A single nearest-neighbor match as returned by the index.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct IndexMatch {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl IndexMatch {
    /// Returns `metadata.text` when present and a string.
    pub fn text(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("text")?.as_str()
    }
}

/// Query parameters for retrieval.
pub struct RagQuery<'a> {
    pub text: &'a str,
    pub top_k: u64,
}
