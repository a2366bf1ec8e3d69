//! Thin adapter around the Pinecone REST API.
//!
//! Two handles:
//! - [`PineconeFacade`] talks to the control plane (`{controller}/indexes`):
//!   listing, creating and describing indexes.
//! - [`PineconeIndex`] talks to one index's data plane (`https://{host}/query`).
//!
//! Both share one preconfigured `reqwest::Client` carrying `Api-Key` and
//! `X-Pinecone-API-Version` headers.
//!
//! A freshly created index reports `status.ready = false` while it
//! initializes; queries against it fail until then.

use std::{future::Future, pin::Pin, time::Duration};

use embedding_service::error_handler::make_snippet;
use reqwest::{StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::{DistanceKind, IndexConfig, IndexSpec};
use crate::errors::IndexError;
use crate::record::IndexMatch;
use crate::search::VectorSearch;

/// Outcome of [`PineconeFacade::ensure_index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provisioned {
    /// Index was already listed; nothing was created.
    Existing,
    /// Index was created by this call.
    Created,
    /// Create returned 409: another process created it in between.
    CreatedConcurrently,
}

/// Control-plane facade over the Pinecone account.
pub struct PineconeFacade {
    client: reqwest::Client,
    controller: String,
    index_name: String,
    ready_poll: Duration,
    ready_attempts: u32,
}

impl PineconeFacade {
    /// Creates a new facade from the given configuration.
    pub fn new(cfg: &IndexConfig) -> Result<Self, IndexError> {
        cfg.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "api-key",
            header::HeaderValue::from_str(cfg.api_key.trim())
                .map_err(|e| IndexError::Config(format!("invalid api key header: {e}")))?,
        );
        headers.insert(
            "x-pinecone-api-version",
            header::HeaderValue::from_str(&cfg.api_version)
                .map_err(|e| IndexError::Config(format!("invalid api version header: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            controller: cfg.controller_url.trim().trim_end_matches('/').to_string(),
            index_name: cfg.index_name.clone(),
            ready_poll: Duration::from_millis(cfg.ready_poll_ms),
            ready_attempts: cfg.ready_attempts,
        })
    }

    /// Ensures that the configured index exists and can serve queries.
    ///
    /// - If the index is listed → no-op, no create call.
    /// - If missing → creates it with `spec`.
    /// - A 409 from create counts as success.
    ///
    /// After a create (409 included) this waits until Pinecone reports the
    /// index as ready, see [`Self::wait_until_ready`].
    pub async fn ensure_index(&self, spec: &IndexSpec) -> Result<Provisioned, IndexError> {
        info!(
            index = %self.index_name,
            dimension = spec.dimension,
            metric = ?spec.metric,
            "ensuring index"
        );

        let names = self.list_index_names().await?;
        if names.iter().any(|n| n == &self.index_name) {
            debug!(index = %self.index_name, "index already listed");
            return Ok(Provisioned::Existing);
        }

        warn!(index = %self.index_name, "index not found, creating");

        let url = format!("{}/indexes", self.controller);
        let body = CreateIndexRequest {
            name: &self.index_name,
            dimension: spec.dimension,
            metric: spec.metric,
            spec: ServerlessSpecWrapper {
                serverless: ServerlessSpec {
                    cloud: &spec.cloud,
                    region: &spec.region,
                },
            },
        };

        let resp = self.client.post(&url).json(&body).send().await?;
        let status = resp.status();

        let outcome = if status == StatusCode::CONFLICT {
            info!(index = %self.index_name, "index created concurrently by another process");
            Provisioned::CreatedConcurrently
        } else if status.is_success() {
            info!(index = %self.index_name, "index create accepted");
            Provisioned::Created
        } else {
            return Err(status_error(status, url, resp).await);
        };

        self.wait_until_ready().await?;
        Ok(outcome)
    }

    /// Polls the index description until `status.ready` is true.
    ///
    /// Sleeps `ready_poll_ms` between checks and gives up with
    /// [`IndexError::NotReady`] after `ready_attempts` checks.
    pub async fn wait_until_ready(&self) -> Result<(), IndexError> {
        let mut state = String::from("unknown");

        for attempt in 1..=self.ready_attempts {
            let desc = self.describe().await?;
            if desc.is_ready() {
                info!(index = %self.index_name, attempt, "index ready");
                return Ok(());
            }

            state = desc.state().to_string();
            debug!(index = %self.index_name, attempt, %state, "index not ready yet");

            if attempt < self.ready_attempts {
                tokio::time::sleep(self.ready_poll).await;
            }
        }

        error!(
            index = %self.index_name,
            attempts = self.ready_attempts,
            %state,
            "gave up waiting for index"
        );
        Err(IndexError::NotReady {
            name: self.index_name.clone(),
            state,
        })
    }

    /// Lists index names in the account.
    pub async fn list_index_names(&self) -> Result<Vec<String>, IndexError> {
        let url = format!("{}/indexes", self.controller);
        debug!(%url, "listing indexes");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status(), url, resp).await);
        }

        let list: IndexList = resp
            .json()
            .await
            .map_err(|e| IndexError::Decode(format!("{e}; expected `indexes[].name`")))?;

        Ok(list.indexes.into_iter().map(|d| d.name).collect())
    }

    /// Resolves the data-plane host of the configured index and returns a query handle.
    ///
    /// Fails with [`IndexError::NotReady`] while the index still initializes.
    pub async fn index(&self) -> Result<PineconeIndex, IndexError> {
        let desc = self.describe().await?;

        if !desc.is_ready() {
            return Err(IndexError::NotReady {
                name: self.index_name.clone(),
                state: desc.state().to_string(),
            });
        }

        let host = desc
            .host
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| IndexError::Decode(format!("index '{}' has no host", desc.name)))?;

        let base = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host.trim_end_matches('/'))
        };

        info!(index = %self.index_name, host = %base, "index handle ready");

        Ok(PineconeIndex {
            client: self.client.clone(),
            url_query: format!("{base}/query"),
            name: self.index_name.clone(),
        })
    }

    async fn describe(&self) -> Result<IndexDescription, IndexError> {
        let url = format!("{}/indexes/{}", self.controller, self.index_name);
        debug!(%url, "describing index");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status(), url, resp).await);
        }

        resp.json()
            .await
            .map_err(|e| IndexError::Decode(format!("{e}; expected `name`, `host`, `status`")))
    }
}

/// Data-plane handle for one index.
#[derive(Clone)]
pub struct PineconeIndex {
    client: reqwest::Client,
    url_query: String,
    name: String,
}

impl PineconeIndex {
    /// Performs a similarity search.
    ///
    /// Returns matches in the order Pinecone ranked them, metadata included.
    pub async fn search(&self, vector: Vec<f32>, top_k: u64) -> Result<Vec<IndexMatch>, IndexError> {
        debug!(index = %self.name, url = %self.url_query, top_k, dim = vector.len(), "querying index");

        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
        };

        let resp = self.client.post(&self.url_query).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status(), self.url_query.clone(), resp).await);
        }

        let out: QueryResponse = resp
            .json()
            .await
            .map_err(|e| IndexError::Decode(format!("{e}; expected `matches[]`")))?;

        debug!(index = %self.name, hits = out.matches.len(), "query completed");
        Ok(out.matches)
    }
}

impl VectorSearch for PineconeIndex {
    fn query<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<IndexMatch>, IndexError>> + Send + 'a>> {
        Box::pin(self.search(vector, top_k))
    }
}

async fn status_error(status: StatusCode, url: String, resp: reqwest::Response) -> IndexError {
    let text = resp.text().await.unwrap_or_default();
    let snippet = make_snippet(&text);
    error!(%status, %url, %snippet, "Pinecone returned non-success status");
    IndexError::HttpStatus {
        status,
        url,
        snippet,
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: DistanceKind,
    spec: ServerlessSpecWrapper<'a>,
}

#[derive(Debug, Serialize)]
struct ServerlessSpecWrapper<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Debug, Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    name: String,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    status: Option<IndexStatus>,
}

#[derive(Debug, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
    #[serde(default)]
    state: Option<String>,
}

impl IndexDescription {
    /// Descriptions without `status` (e.g. older API versions) count as ready.
    fn is_ready(&self) -> bool {
        self.status.as_ref().is_none_or(|s| s.ready)
    }

    fn state(&self) -> &str {
        self.status
            .as_ref()
            .and_then(|s| s.state.as_deref())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    vector: Vec<f32>,
    top_k: u64,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}
