use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use embedding_service::AiEmbeddingError;
use serde::Serialize;
use thiserror::Error;
use vector_index::IndexError;

use crate::core::{auth::AuthError, config::ConfigError};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("embedding client setup failed: {0}")]
    EmbeddingSetup(#[from] AiEmbeddingError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("{0}")]
    Forbidden(#[from] AuthError),

    #[error("{0}")]
    Unprocessable(String),

    /// Embedding, index or response-shape failure.
    #[error(transparent)]
    Retrieval(#[from] IndexError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::EmbeddingSetup(_)
            | AppError::Bind(_)
            | AppError::Server(_)
            | AppError::Retrieval(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `detail` field. Server-side causes are not exposed.
    fn detail(&self) -> String {
        match self {
            AppError::Forbidden(e) => e.to_string(),
            AppError::Unprocessable(msg) => msg.clone(),
            _ => "Internal Server Error".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            detail: self.detail(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Body rejections become 422 with the extractor's message.
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::Unprocessable(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_are_forbidden_with_their_message() {
        let err = AppError::from(AuthError::InvalidScheme);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.detail(), "Invalid authentication scheme");
    }

    #[test]
    fn retrieval_errors_hide_the_cause() {
        let err = AppError::from(IndexError::MissingText {
            position: 0,
            id: "x".into(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), "Internal Server Error");
    }
}
