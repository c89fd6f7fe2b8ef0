use axum::response::IntoResponse;
use http::StatusCode;

/// Liveness check
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
