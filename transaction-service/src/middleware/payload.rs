//! Request body extractor for JSON or URL-encoded form posts.
//!
//! Payment pages post forms, API clients post JSON; both land on the same
//! handlers. An empty body deserializes as `{}` so that every field falls
//! back to its default instead of failing the request.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use service_core::error::AppError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Body decoded from JSON or `application/x-www-form-urlencoded`.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with(FORM_CONTENT_TYPE))
            .unwrap_or(false);

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Failed to read body: {}", e)))?;

        decode(&body, is_form).map(Payload)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8], is_form: bool) -> Result<T, AppError> {
    if is_form {
        return serde_urlencoded::from_bytes(body)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid form body: {}", e)));
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_slice(b"{}")
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid JSON body: {}", e)));
    }

    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid JSON body: {}", e)))
}
