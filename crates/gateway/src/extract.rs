//! Request extractors

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use docsage_common::DEFAULT_SESSION_ID;
use std::convert::Infallible;

/// Header carrying session identity on every API request
pub const SESSION_HEADER: &str = "x-session-id";

/// Client-supplied session identifier, falling back to a shared default
/// when the header is absent.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_SESSION_ID)
            .to_string();

        Ok(SessionId(id))
    }
}
