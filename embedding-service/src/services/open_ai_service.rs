//! Query embedding through OpenAI's `/v1/embeddings`.
//!
//! The gateway embeds exactly one string per request, so the client sends a
//! one-element `input` array and hands back a single `Vec<f32>` whose length
//! has already been checked against [`LlmModelConfig::dimension`].

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiEmbeddingError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

const PROVIDER: &str = "OpenAI";
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

fn provider_err(kind: ProviderErrorKind) -> AiEmbeddingError {
    ProviderError::new(PROVIDER, kind).into()
}

/// Embeddings client bound to one model.
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` pools
/// connections across concurrent requests.
#[derive(Debug)]
pub struct OpenAiService {
    http: reqwest::Client,
    url: String,
    model: String,
    dimension: usize,
}

impl OpenAiService {
    /// Builds the client. Fails on a missing key, a non-http(s) endpoint, or a
    /// key that cannot be sent as a header value.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiEmbeddingError> {
        let key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| provider_err(ProviderErrorKind::MissingApiKey))?;

        let base = cfg.endpoint.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(provider_err(ProviderErrorKind::InvalidEndpoint(
                cfg.endpoint.clone(),
            )));
        }

        let bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
            provider_err(ProviderErrorKind::Decode(format!(
                "OPENAI_API_KEY is not a valid header value: {e}"
            )))
        })?;
        let headers = HeaderMap::from_iter([
            (AUTHORIZATION, bearer),
            (CONTENT_TYPE, HeaderValue::from_static("application/json")),
        ]);

        let timeout = cfg
            .timeout_secs
            .map_or(FALLBACK_TIMEOUT, Duration::from_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url = format!("{base}/v1/embeddings");
        info!(
            model = %cfg.model,
            %url,
            dimension = cfg.dimension,
            timeout_secs = timeout.as_secs(),
            "embedding client ready"
        );

        Ok(Self {
            http,
            url,
            model: cfg.model,
            dimension: cfg.dimension,
        })
    }

    /// Embeds `input` exactly as given.
    ///
    /// # Errors
    /// - `Timeout` if the configured deadline passes
    /// - `HttpTransport` for connection failures
    /// - `Provider` with `HttpStatus`, `Decode` or `DimensionMismatch`
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiEmbeddingError> {
        let started = Instant::now();
        debug!(model = %self.model, chars = input.chars().count(), "embedding query");

        let resp = self
            .http
            .post(&self.url)
            .json(&EmbeddingsRequest {
                model: &self.model,
                input: [input],
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!(
                        elapsed_ms = started.elapsed().as_millis(),
                        "embedding request timed out"
                    );
                    AiEmbeddingError::Timeout(started.elapsed())
                } else {
                    AiEmbeddingError::HttpTransport(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            error!(
                %status,
                %snippet,
                model = %self.model,
                "embedding provider rejected the request"
            );
            return Err(provider_err(ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: self.url.clone(),
                snippet,
            })));
        }

        let payload: EmbeddingsResponse = resp.json().await.map_err(|e| {
            error!(error = %e, model = %self.model, "embedding response is not valid JSON");
            provider_err(ProviderErrorKind::Decode(e.to_string()))
        })?;

        let vector = self.pick_vector(payload)?;
        info!(
            model = %self.model,
            dimension = vector.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "query embedded"
        );
        Ok(vector)
    }

    /// Takes the entry for input #0 and checks its length.
    fn pick_vector(&self, payload: EmbeddingsResponse) -> Result<Vec<f32>, AiEmbeddingError> {
        let mut data = payload.data;
        let pos = data
            .iter()
            .position(|d| d.index == Some(0))
            .or_else(|| (!data.is_empty()).then_some(0))
            .ok_or_else(|| {
                provider_err(ProviderErrorKind::Decode("response has no embeddings".into()))
            })?;
        let vector = data.swap_remove(pos).embedding;

        if vector.len() != self.dimension {
            error!(
                got = vector.len(),
                want = self.dimension,
                "embedding length differs from model dimension"
            );
            return Err(provider_err(ProviderErrorKind::DimensionMismatch {
                got: vector.len(),
                want: self.dimension,
            }));
        }
        Ok(vector)
    }
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    data: Vec<EmbeddingEntry>,
}

#[derive(Deserialize)]
struct EmbeddingEntry {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}
