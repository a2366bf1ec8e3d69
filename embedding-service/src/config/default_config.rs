//! Default embedding config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`      = provider credential (mandatory)
//! - `OPENAI_URL`          = API base, default `https://api.openai.com`
//! - `EMBEDDING_MODEL`     = model id, default `text-embedding-ada-002`
//! - `EMBEDDING_DIM`       = vector length of the model, default 1536
//! - `OPENAI_TIMEOUT_SECS` = request timeout, default 60

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{Result, env_opt_u64, env_or, must_env},
};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
/// Output length of `text-embedding-ada-002`.
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Constructs the **embedding** OpenAI profile.
///
/// # Errors
/// - [`crate::error_handler::ConfigError::MissingVar`] if `OPENAI_API_KEY` is unset
/// - [`crate::error_handler::ConfigError::InvalidNumber`] if the timeout is not a number
/// - any validation error from [`LlmModelConfig::validate`]
pub fn config_openai_embedding() -> Result<LlmModelConfig> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let cfg = LlmModelConfig {
        model: env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
        endpoint: env_or("OPENAI_URL", DEFAULT_OPENAI_URL),
        api_key: Some(api_key),
        dimension: env_opt_u64("EMBEDDING_DIM")?
            .map(|d| d as usize)
            .unwrap_or(DEFAULT_EMBEDDING_DIM),
        timeout_secs: Some(env_opt_u64("OPENAI_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    };
    cfg.validate()?;
    Ok(cfg)
}
