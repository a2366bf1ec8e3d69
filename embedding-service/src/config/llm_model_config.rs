use crate::error_handler::{ConfigError, Result, validate_http_endpoint};

/// Configuration for an embedding model invocation.
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"text-embedding-ada-002"`).
/// - `endpoint`: API base URL, without the `/v1/...` suffix.
/// - `api_key`: Bearer credential for the provider.
/// - `dimension`: Expected embedding length returned by `model`.
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use embedding_service::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "text-embedding-ada-002".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     dimension: 1536,
///     timeout_secs: Some(60),
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// Inference endpoint (remote API base URL).
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// Number of floats in each returned vector.
    pub dimension: usize,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Validates model name and endpoint scheme.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyModel`] if `model` is blank
    /// - [`ConfigError::InvalidFormat`] if `endpoint` is not http/https
    /// - [`ConfigError::InvalidNumber`] if `dimension` is zero
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        if self.dimension == 0 {
            return Err(ConfigError::InvalidNumber {
                var: "dimension",
                reason: "must be > 0",
            }
            .into());
        }
        validate_http_endpoint("OPENAI_URL", self.endpoint.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            model: "text-embedding-ada-002".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: Some("k".into()),
            dimension: 1536,
            timeout_secs: None,
        }
    }

    #[test]
    fn rejects_blank_model() {
        let mut c = cfg();
        c.model = "  ".into();
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_dimension() {
        let mut c = cfg();
        c.dimension = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn accepts_defaults() {
        assert!(cfg().validate().is_ok());
    }
}
