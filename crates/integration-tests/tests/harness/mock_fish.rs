//! Mock Fish Audio backend for integration tests
//!
//! Serves `/v1/tts` (MessagePack in, audio out), `POST /model` and
//! `GET /model/{id}`, recording what it receives

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bytes::Bytes;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Audio returned by the mock synthesis endpoint
pub const MOCK_AUDIO: &[u8] = b"ID3-mock-audio";

/// Mock Fish Audio backend
pub struct MockFish {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockFishState>,
}

#[derive(Default)]
struct MockFishState {
    /// Status the synthesis endpoint answers with (200 when unset)
    tts_status: AtomicU16,
    tts_requests: Mutex<Vec<RecordedTts>>,
    training_requests: Mutex<Vec<RecordedUpload>>,
    lookup_authorizations: Mutex<Vec<Option<String>>>,
}

/// A decoded synthesis request
#[derive(Debug, Clone)]
pub struct RecordedTts {
    pub payload: TtsPayload,
    pub authorization: Option<String>,
    pub model: Option<String>,
    pub content_type: Option<String>,
}

/// A raw training upload
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RecordedUpload {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// MessagePack body of a `/v1/tts` call
#[derive(Debug, Clone, Deserialize)]
pub struct TtsPayload {
    pub text: String,
    pub chunk_length: u32,
    pub format: String,
    pub mp3_bitrate: Option<u16>,
    pub references: Vec<serde_json::Value>,
    pub reference_id: String,
    pub normalize: bool,
    pub latency: String,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub prosody: Option<Prosody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Prosody {
    pub speed: f32,
    pub volume: f32,
}

impl MockFish {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(MockFishState::default());

        let app = Router::new()
            .route("/v1/tts", routing::post(handle_tts))
            .route("/model", routing::post(handle_train))
            .route("/model/{id}", routing::get(handle_lookup))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make the synthesis endpoint fail with `status`
    pub fn fail_tts_with(&self, status: u16) {
        self.state.tts_status.store(status, Ordering::Relaxed);
    }

    pub fn tts_requests(&self) -> Vec<RecordedTts> {
        self.state.tts_requests.lock().unwrap().clone()
    }

    pub fn training_requests(&self) -> Vec<RecordedUpload> {
        self.state.training_requests.lock().unwrap().clone()
    }

    pub fn lookup_authorizations(&self) -> Vec<Option<String>> {
        self.state.lookup_authorizations.lock().unwrap().clone()
    }
}

impl Drop for MockFish {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

async fn handle_tts(State(state): State<Arc<MockFishState>>, headers: HeaderMap, body: Bytes) -> Response {
    let payload: TtsPayload = match rmp_serde::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => return (StatusCode::BAD_REQUEST, format!("invalid msgpack: {e}")).into_response(),
    };

    state.tts_requests.lock().unwrap().push(RecordedTts {
        payload,
        authorization: header_value(&headers, "authorization"),
        model: header_value(&headers, "model"),
        content_type: header_value(&headers, "content-type"),
    });

    match state.tts_status.load(Ordering::Relaxed) {
        0 | 200 => ([(header::CONTENT_TYPE, "audio/mpeg")], MOCK_AUDIO).into_response(),
        status => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, "upstream rejected the request").into_response()
        }
    }
}

async fn handle_train(State(state): State<Arc<MockFishState>>, headers: HeaderMap, body: Bytes) -> Response {
    let authorization = header_value(&headers, "authorization");

    state.training_requests.lock().unwrap().push(RecordedUpload {
        authorization: authorization.clone(),
        content_type: header_value(&headers, "content-type"),
        body,
    });

    if authorization.as_deref() != Some("Bearer user-token") {
        return (StatusCode::UNAUTHORIZED, "invalid token").into_response();
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "_id": "model-42",
            "type": "tts",
            "title": "Narrator",
            "description": "",
            "cover_image": "",
            "train_mode": "fast",
            "state": "created",
            "tags": [],
            "samples": [],
            "created_at": "2026-10-16T00:00:00Z",
            "updated_at": "2026-10-16T00:00:00Z",
            "languages": ["en"],
            "visibility": "private",
            "lock_visibility": false,
            "default_text": "",
            "like_count": 0,
            "mark_count": 0,
            "shared_count": 0,
            "task_count": 0,
            "unliked": false,
            "liked": false,
            "marked": false,
            "author": { "_id": "author-1", "nickname": "Mei", "avatar": "avatars/author-1" },
        })),
    )
        .into_response()
}

async fn handle_lookup(
    State(state): State<Arc<MockFishState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    state
        .lookup_authorizations
        .lock()
        .unwrap()
        .push(header_value(&headers, "authorization"));

    if id != "model-42" {
        return (StatusCode::NOT_FOUND, "model not found").into_response();
    }

    Json(serde_json::json!({
        "_id": "model-42",
        "type": "tts",
        "title": "Narrator",
        "description": "Warm and slow",
        "cover_image": "coverimage/model-42",
        "author": { "_id": "author-1", "nickname": "Mei", "avatar": "avatars/author-1" },
    }))
    .into_response()
}
