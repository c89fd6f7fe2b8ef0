#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Fish Audio synthesis proxy
//!
//! Accepts JSON speech requests, forwards them to Fish Audio as MessagePack
//! with a server-held key, and returns the audio as a download

mod error;
mod http_client;
mod provider;
mod request;
mod server;
mod types;

use std::sync::Arc;

use axum::{Router, extract::State, response::IntoResponse, routing::post};

pub use error::{Result, TtsError};
pub use provider::TtsProvider;
pub use request::RequestContext;
pub use server::{Server, TtsServerBuilder};
pub use types::{AudioFormat, Mp3Bitrate, Sampling, SpeechRequest, SpeechResponse, V1SpeechRequest, V2SpeechRequest};
use request::ExtractPayload;

/// Path of the legacy route
pub const V1_PATH: &str = "/tts/fishaudio/v1/";

/// Path of the route used by the testing workflow
pub const V2_PATH: &str = "/tts/fishaudio/v2/";

/// Build the synthesis proxy from configuration
pub fn build_server(config: &voiss_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        TtsServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize TTS server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for the synthesis proxy
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route(V1_PATH, post(synthesize_v1))
        .route(V2_PATH, post(synthesize_v2))
}

async fn synthesize_v1(
    State(server): State<Arc<Server>>,
    ExtractPayload(context, request): ExtractPayload<V1SpeechRequest>,
) -> Result<axum::response::Response> {
    tracing::debug!("v1 speech handler called for reference: {}", request.reference_id);

    let response = server.synthesize(request.into(), &context).await?;

    Ok(response.into_response())
}

async fn synthesize_v2(
    State(server): State<Arc<Server>>,
    ExtractPayload(context, request): ExtractPayload<V2SpeechRequest>,
) -> Result<axum::response::Response> {
    tracing::debug!("v2 speech handler called for reference: {}", request.model);

    let response = server.synthesize(request.into(), &context).await?;

    Ok(response.into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use bytes::Bytes;
    use http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    /// Provider that records what it was asked and returns canned audio
    #[derive(Default)]
    struct RecordingProvider {
        seen: Arc<Mutex<Vec<(SpeechRequest, bool)>>>,
    }

    #[async_trait]
    impl TtsProvider for RecordingProvider {
        async fn synthesize(&self, request: SpeechRequest, context: &RequestContext) -> Result<SpeechResponse> {
            let format = request.format;
            self.seen.lock().unwrap().push((request, context.api_key.is_some()));
            Ok(SpeechResponse {
                audio: Bytes::from_static(b"audio"),
                format,
            })
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn router() -> (Router, Arc<Mutex<Vec<(SpeechRequest, bool)>>>) {
        let provider = RecordingProvider::default();
        let seen = Arc::clone(&provider.seen);
        let server = Arc::new(Server::with_provider(Box::new(provider)));
        (endpoint_router().with_state(server), seen)
    }

    fn post_json(path: &str, body: &serde_json::Value) -> Request<Body> {
        Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn v1_returns_attachment() {
        let (router, seen) = router();

        let response = router
            .oneshot(post_json(
                V1_PATH,
                &serde_json::json!({ "text": "Hello world", "reference_id": "ref_123", "format": "wav" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=output.wav"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"audio");
        assert_eq!(seen.lock().unwrap()[0].0.reference_id, "ref_123");
    }

    #[tokio::test]
    async fn v2_forwards_provider_key_header() {
        let (router, seen) = router();

        let mut request = post_json(V2_PATH, &serde_json::json!({ "input": "hi", "model": "voice-1" }));
        request
            .headers_mut()
            .insert("x-provider-api-key", "caller".parse().unwrap());

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mp3");
        assert!(seen.lock().unwrap()[0].1);
    }

    #[tokio::test]
    async fn missing_field_is_unprocessable() {
        let (router, seen) = router();

        let response = router
            .oneshot(post_json(V1_PATH, &serde_json::json!({ "reference_id": "ref_123" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_bitrate_is_unprocessable() {
        let (router, _) = router();

        let response = router
            .oneshot(post_json(
                V1_PATH,
                &serde_json::json!({ "text": "a", "reference_id": "r", "mp3_bitrate": 256 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value =
            serde_json::from_slice(&response.into_body().collect().await.unwrap().to_bytes()).unwrap();
        assert_eq!(body["error"]["code"], 422);
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn non_json_body_is_rejected() {
        let (router, _) = router();

        let request = Request::post(V2_PATH)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("hello"))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn empty_text_is_forwarded() {
        let (router, seen) = router();

        let response = router
            .oneshot(post_json(V1_PATH, &serde_json::json!({ "text": "", "reference_id": "ref_123" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
