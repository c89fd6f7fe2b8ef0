use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use url::Url;
use voiss_config::{FishConfig, Latency};

use crate::{
    error::TtsError,
    http_client::http_client,
    request::RequestContext,
    types::{AudioFormat, Mp3Bitrate, SpeechRequest, SpeechResponse},
};

use super::TtsProvider;

const MSGPACK_CONTENT_TYPE: &str = "application/msgpack";

/// Fish Audio `/v1/tts` provider
///
/// Requests are MessagePack-encoded; the base model travels in the `model`
/// header rather than the body.
pub struct FishAudioProvider {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    default_model: String,
    chunk_length: u32,
    latency: Latency,
    name: String,
}

impl FishAudioProvider {
    pub fn new(name: String, config: &FishConfig) -> crate::error::Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            default_model: config.default_model.clone(),
            chunk_length: config.chunk_length,
            latency: config.latency,
            name,
        })
    }

    fn endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path("/v1/tts");
        url
    }

    /// Caller-supplied key first, then the configured one
    fn api_key<'a>(&'a self, context: &'a RequestContext) -> crate::error::Result<&'a SecretString> {
        context
            .api_key
            .as_ref()
            .or(self.api_key.as_ref())
            .ok_or_else(|| TtsError::AuthenticationFailed("no Fish Audio API key configured".to_string()))
    }
}

#[derive(Serialize)]
struct FishTtsPayload<'a> {
    text: &'a str,
    chunk_length: u32,
    format: AudioFormat,
    mp3_bitrate: Option<Mp3Bitrate>,
    references: &'a [String],
    reference_id: &'a str,
    normalize: bool,
    latency: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prosody: Option<FishProsody>,
}

#[derive(Serialize)]
struct FishProsody {
    speed: f32,
    volume: f32,
}

#[async_trait]
impl TtsProvider for FishAudioProvider {
    async fn synthesize(
        &self,
        request: SpeechRequest,
        context: &RequestContext,
    ) -> crate::error::Result<SpeechResponse> {
        let api_key = self.api_key(context)?;
        let model = request.base_model.as_deref().unwrap_or(&self.default_model);

        tracing::debug!(
            reference_id = %request.reference_id,
            format = %request.format,
            model,
            input_len = request.text.len(),
            "Fish Audio TTS request",
        );

        let payload = FishTtsPayload {
            text: &request.text,
            chunk_length: self.chunk_length,
            format: request.format,
            mp3_bitrate: request.mp3_bitrate,
            references: &[],
            reference_id: &request.reference_id,
            normalize: true,
            latency: self.latency.as_str(),
            temperature: request.sampling.map(|s| s.temperature),
            top_p: request.sampling.map(|s| s.top_p),
            prosody: request.sampling.map(|s| FishProsody {
                speed: s.speed,
                volume: s.volume,
            }),
        };

        let body = rmp_serde::to_vec_named(&payload).map_err(|e| {
            tracing::error!("Failed to encode Fish Audio payload: {e}");
            TtsError::InternalError
        })?;

        let response = self
            .client
            .post(self.endpoint())
            .header(http::header::AUTHORIZATION, format!("Bearer {}", api_key.expose_secret()))
            .header(http::header::CONTENT_TYPE, MSGPACK_CONTENT_TYPE)
            .header("model", model)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Fish Audio request failed: {e}");
                TtsError::ConnectionError(format!("Failed to send request to Fish Audio: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("Fish Audio API error ({status}): {error_text}");

            return Err(TtsError::ProviderApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let audio = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read Fish Audio response body: {e}");
            TtsError::ConnectionError(format!("Failed to read Fish Audio response: {e}"))
        })?;

        tracing::debug!("Fish Audio synthesis complete, {} bytes", audio.len());

        Ok(SpeechResponse {
            audio,
            format: request.format,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
