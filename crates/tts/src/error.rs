use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TtsError>;

/// Synthesis proxy errors with their HTTP status codes
#[derive(Debug, Error)]
pub enum TtsError {
    /// Request body could not be read
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request body was read but does not match the expected schema
    #[error("Unprocessable request: {0}")]
    Unprocessable(String),

    #[error("Unsupported Content-Type, expected: 'Content-Type: application/json'")]
    UnsupportedMediaType,

    #[error("Request body is too large, limit is {0} bytes")]
    PayloadTooLarge(usize),

    /// No usable Fish Audio API key
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Fish Audio answered with a non-success status
    #[error("Provider API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// Network or connection error reaching Fish Audio
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal failure whose details are never shown to the caller
    #[error("Internal server error")]
    InternalError,
}

impl TtsError {
    /// Get the appropriate HTTP status code for this error
    ///
    /// Upstream 400, 401, 402, 403, 404 and 429 answers keep their status so
    /// callers can tell a bad key or an exhausted quota apart. Any other
    /// upstream failure is reported as 502 Bad Gateway rather than 500, since
    /// the fault lies with Fish Audio and not with this service.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            Self::ConnectionError(_) => StatusCode::BAD_GATEWAY,
            Self::ProviderApiError { status, .. } => match *status {
                400 => StatusCode::BAD_REQUEST,
                401 => StatusCode::UNAUTHORIZED,
                402 => StatusCode::PAYMENT_REQUIRED,
                403 => StatusCode::FORBIDDEN,
                404 => StatusCode::NOT_FOUND,
                429 => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::ConfigError(_) | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string for the response
    pub const fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) | Self::Unprocessable(_) | Self::UnsupportedMediaType | Self::PayloadTooLarge(_) => {
                "invalid_request_error"
            }
            Self::AuthenticationFailed(_) => "authentication_error",
            Self::ConnectionError(_) | Self::ProviderApiError { .. } => "api_error",
            Self::ConfigError(_) | Self::InternalError => "internal_error",
        }
    }

    /// Message that is safe to expose to API consumers
    pub fn client_message(&self) -> String {
        match self {
            Self::InternalError | Self::ConfigError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    message: String,
    r#type: String,
    code: u16,
}

impl IntoResponse for TtsError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(%status, "synthesis request failed: {self}");
        } else {
            tracing::debug!(%status, "synthesis request rejected: {self}");
        }

        let error_response = ErrorResponse {
            error: ErrorDetails {
                message: self.client_message(),
                r#type: self.error_type().to_string(),
                code: status.as_u16(),
            },
        };

        (status, Json(error_response)).into_response()
    }
}
