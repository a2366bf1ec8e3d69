use std::{sync::Arc, time::Instant};

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use tracing::{debug, error, info};
use vector_index::{RagQuery, retrieve::rag_context};

use crate::{
    core::{app_state::AppState, auth::BearerAuth},
    error_handler::{AppError, AppResult},
    routes::context::get_context_request::GetContextRequest,
};

/// POST /
///
/// Embeds the query, searches the index and returns the `text` of every
/// match, best first.
pub async fn get_context(
    State(state): State<Arc<AppState>>,
    _auth: BearerAuth,
    headers: HeaderMap,
    payload: Result<Json<GetContextRequest>, JsonRejection>,
) -> AppResult<Json<Vec<String>>> {
    let request_id = headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    let Json(p) = payload?;
    // Forwarded verbatim, surrounding whitespace included.
    if p.query.is_empty() {
        return Err(AppError::Unprocessable("query must not be empty".into()));
    }

    debug!(
        request_id = %request_id,
        query_len = p.query.len(),
        "get_context: start"
    );

    let started = Instant::now();
    let query = RagQuery {
        text: &p.query,
        top_k: state.top_k,
    };

    match rag_context(state.embedder.as_ref(), state.index.as_ref(), query).await {
        Ok(context) => {
            info!(
                request_id = %request_id,
                hits = context.len(),
                latency_ms = started.elapsed().as_millis(),
                "get_context: success"
            );
            Ok(Json(context))
        }
        Err(err) => {
            error!(
                request_id = %request_id,
                error = %err,
                latency_ms = started.elapsed().as_millis(),
                "get_context: retrieval failed"
            );
            Err(err.into())
        }
    }
}
