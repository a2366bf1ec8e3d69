use serde::Deserialize;

/// Request payload for `POST /`.
#[derive(Debug, Deserialize)]
pub struct GetContextRequest {
    /// Natural language query, forwarded verbatim to the embedder.
    pub query: String,
}
