//! Index connection and provisioning configuration.

use std::str::FromStr;

use serde::Serialize;

use crate::errors::IndexError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceKind {
    /// Cosine similarity.
    Cosine,
    /// Dot product (useful for normalized vectors).
    DotProduct,
    /// Euclidean distance (L2).
    Euclidean,
}

impl FromStr for DistanceKind {
    type Err = IndexError;

    /// Accepts Pinecone's metric names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "dotproduct" => Ok(Self::DotProduct),
            "euclidean" => Ok(Self::Euclidean),
            other => Err(IndexError::Config(format!(
                "unknown metric '{other}', expected cosine, dotproduct or euclidean"
            ))),
        }
    }
}

/// Shape of the index created when it does not exist yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexSpec {
    /// Dimensionality of vectors.
    pub dimension: usize,
    /// Distance function.
    pub metric: DistanceKind,
    /// Serverless cloud provider, e.g. `aws`.
    pub cloud: String,
    /// Serverless region, e.g. `us-west-2`.
    pub region: String,
}

impl Default for IndexSpec {
    fn default() -> Self {
        Self {
            dimension: 1536,
            metric: DistanceKind::Euclidean,
            cloud: "aws".into(),
            region: "us-west-2".into(),
        }
    }
}

/// Connection settings for the Pinecone account and target index.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Control-plane base URL, e.g. `https://api.pinecone.io`.
    pub controller_url: String,
    /// Pinecone API key.
    pub api_key: String,
    /// Target index name.
    pub index_name: String,
    /// Value of the `X-Pinecone-API-Version` header.
    pub api_version: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Pause between readiness checks after a create.
    pub ready_poll_ms: u64,
    /// Readiness checks before giving up.
    pub ready_attempts: u32,
}

impl IndexConfig {
    pub const DEFAULT_CONTROLLER_URL: &'static str = "https://api.pinecone.io";
    pub const DEFAULT_API_VERSION: &'static str = "2024-07";
    pub const DEFAULT_READY_POLL_MS: u64 = 1_000;
    pub const DEFAULT_READY_ATTEMPTS: u32 = 120;

    /// Creates a config with default controller URL, API version, timeout and
    /// readiness wait (about two minutes).
    pub fn new_default(api_key: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            controller_url: Self::DEFAULT_CONTROLLER_URL.into(),
            api_key: api_key.into(),
            index_name: index_name.into(),
            api_version: Self::DEFAULT_API_VERSION.into(),
            timeout_secs: 30,
            ready_poll_ms: Self::DEFAULT_READY_POLL_MS,
            ready_attempts: Self::DEFAULT_READY_ATTEMPTS,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), IndexError> {
        let url = self.controller_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(IndexError::Config(
                "controller_url must start with http:// or https://".into(),
            ));
        }
        if self.api_key.trim().is_empty() {
            return Err(IndexError::Config("api_key is empty".into()));
        }
        if self.index_name.trim().is_empty() {
            return Err(IndexError::Config("index_name is empty".into()));
        }
        if self.ready_attempts == 0 {
            return Err(IndexError::Config("ready_attempts must be at least 1".into()));
        }
        Ok(())
    }
}
