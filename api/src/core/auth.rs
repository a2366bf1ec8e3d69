//! Static bearer-token authentication.
//!
//! `Authorization: <scheme> <credentials>` is accepted only when the scheme is
//! `Bearer` (any case) and the credentials equal the configured secret.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::{core::app_state::AppState, error_handler::AppError};

/// Why a request was refused. The message is sent back as `detail`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid authentication scheme")]
    InvalidScheme,

    #[error("Invalid token")]
    InvalidToken,
}

/// Checks a raw `Authorization` header value against `expected`.
pub fn validate_token(header: Option<&str>, expected: &str) -> Result<(), AuthError> {
    let (scheme, credentials) = header
        .and_then(|h| h.split_once(' '))
        .ok_or(AuthError::NotAuthenticated)?;

    if scheme.is_empty() || credentials.is_empty() {
        return Err(AuthError::NotAuthenticated);
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidScheme);
    }
    if !bool::from(credentials.as_bytes().ct_eq(expected.as_bytes())) {
        return Err(AuthError::InvalidToken);
    }
    Ok(())
}

/// Extractor guarding a handler. Place it before any body extractor so the
/// token is checked first.
#[derive(Debug, Clone, Copy)]
pub struct BearerAuth;

impl FromRequestParts<Arc<AppState>> for BearerAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        validate_token(header, &state.api_token)?;
        Ok(BearerAuth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "secret123";

    #[test]
    fn accepts_exact_bearer_token() {
        assert_eq!(validate_token(Some("Bearer secret123"), TOKEN), Ok(()));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(validate_token(Some("bearer secret123"), TOKEN), Ok(()));
        assert_eq!(validate_token(Some("BEARER secret123"), TOKEN), Ok(()));
    }

    #[test]
    fn other_scheme_is_rejected() {
        assert_eq!(
            validate_token(Some("Basic secret123"), TOKEN),
            Err(AuthError::InvalidScheme)
        );
    }

    #[test]
    fn wrong_token_is_rejected() {
        assert_eq!(
            validate_token(Some("Bearer secret124"), TOKEN),
            Err(AuthError::InvalidToken)
        );
        assert_eq!(
            validate_token(Some("Bearer secret1234"), TOKEN),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn token_comparison_is_case_sensitive() {
        assert_eq!(
            validate_token(Some("Bearer SECRET123"), TOKEN),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn missing_or_incomplete_header_is_not_authenticated() {
        assert_eq!(validate_token(None, TOKEN), Err(AuthError::NotAuthenticated));
        assert_eq!(validate_token(Some(""), TOKEN), Err(AuthError::NotAuthenticated));
        assert_eq!(
            validate_token(Some("Bearer"), TOKEN),
            Err(AuthError::NotAuthenticated)
        );
        assert_eq!(
            validate_token(Some("Bearer "), TOKEN),
            Err(AuthError::NotAuthenticated)
        );
    }
}
