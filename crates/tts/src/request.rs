use axum::body::Body;
use secrecy::SecretString;
use serde::de::DeserializeOwned;

use crate::error::TtsError;

/// Header carrying a caller-supplied Fish Audio key
const PROVIDER_API_KEY_HEADER: &str = "X-Provider-API-Key";

/// Body limit for synthesis requests (1 MiB)
const BODY_LIMIT_BYTES: usize = 1 << 20;

/// Per-request data handed to the provider alongside the payload
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// User-provided API key that overrides the configured key
    pub api_key: Option<SecretString>,
}

impl RequestContext {
    /// Context for calls that do not originate from an HTTP request
    pub const fn detached() -> Self {
        Self { api_key: None }
    }
}

/// Extractor for JSON request bodies
pub struct ExtractPayload<T>(pub RequestContext, pub T);

impl<S, T: DeserializeOwned> axum::extract::FromRequest<S> for ExtractPayload<T>
where
    S: Send + Sync,
{
    type Rejection = TtsError;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        let is_json = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if !is_json {
            return Err(TtsError::UnsupportedMediaType);
        }

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
            if std::error::Error::source(&err).is_some_and(|source| source.is::<http_body_util::LengthLimitError>()) {
                TtsError::PayloadTooLarge(BODY_LIMIT_BYTES)
            } else {
                TtsError::InvalidRequest(format!("Failed to read request body: {err}"))
            }
        })?;

        let payload = serde_json::from_slice::<T>(&bytes)
            .map_err(|e| TtsError::Unprocessable(format!("Failed to parse request body: {e}")))?;

        let api_key = parts
            .headers
            .get(PROVIDER_API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| SecretString::from(value.to_string()));

        Ok(Self(RequestContext { api_key }, payload))
    }
}
