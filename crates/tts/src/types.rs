use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::{HeaderValue, header};
use serde::{Deserialize, Serialize};

/// Output audio container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, strum::AsRefStr, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Pcm,
}

impl AudioFormat {
    /// Content type sent back to the caller
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mp3",
            Self::Wav => "audio/wav",
            Self::Pcm => "audio/pcm",
        }
    }

    pub const fn content_disposition(self) -> &'static str {
        match self {
            Self::Mp3 => "attachment; filename=output.mp3",
            Self::Wav => "attachment; filename=output.wav",
            Self::Pcm => "attachment; filename=output.pcm",
        }
    }
}

/// MP3 bitrate in kbps; only 64, 128 and 192 are accepted upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Mp3Bitrate {
    #[default]
    Kbps64,
    Kbps128,
    Kbps192,
}

impl TryFrom<u16> for Mp3Bitrate {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            64 => Ok(Self::Kbps64),
            128 => Ok(Self::Kbps128),
            192 => Ok(Self::Kbps192),
            other => Err(format!("unsupported mp3_bitrate {other}, expected 64, 128 or 192")),
        }
    }
}

impl From<Mp3Bitrate> for u16 {
    fn from(bitrate: Mp3Bitrate) -> Self {
        match bitrate {
            Mp3Bitrate::Kbps64 => 64,
            Mp3Bitrate::Kbps128 => 128,
            Mp3Bitrate::Kbps192 => 192,
        }
    }
}

/// Body of `POST /tts/fishaudio/v1/`
#[derive(Debug, Deserialize)]
pub struct V1SpeechRequest {
    pub text: String,
    pub reference_id: String,
    #[serde(default)]
    pub format: AudioFormat,
    #[serde(default)]
    pub mp3_bitrate: Mp3Bitrate,
}

/// Body of `POST /tts/fishaudio/v2/`
///
/// Follows the `OpenAI` speech request shape: `model` carries the Fish Audio
/// reference id and `base_model` the synthesis engine. Unknown fields such as
/// `references` or `prosody` are ignored.
#[derive(Debug, Deserialize)]
pub struct V2SpeechRequest {
    pub input: String,
    pub model: String,
    #[serde(default)]
    pub response_format: AudioFormat,
    #[serde(default)]
    pub base_model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub top_p: Option<f32>,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub volume: Option<f32>,
}

/// Sampling settings only the v2 route forwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub top_p: f32,
    pub speed: f32,
    pub volume: f32,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.7,
            speed: 1.0,
            volume: 0.0,
        }
    }
}

/// Route-independent synthesis request handed to a provider
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub reference_id: String,
    pub format: AudioFormat,
    /// `None` is forwarded as an explicit nil
    pub mp3_bitrate: Option<Mp3Bitrate>,
    pub base_model: Option<String>,
    pub sampling: Option<Sampling>,
}

impl From<V1SpeechRequest> for SpeechRequest {
    fn from(request: V1SpeechRequest) -> Self {
        Self {
            text: request.text,
            reference_id: request.reference_id,
            format: request.format,
            mp3_bitrate: Some(request.mp3_bitrate),
            base_model: None,
            sampling: None,
        }
    }
}

impl From<V2SpeechRequest> for SpeechRequest {
    fn from(request: V2SpeechRequest) -> Self {
        let defaults = Sampling::default();
        let mp3_bitrate = (request.response_format == AudioFormat::Mp3).then_some(Mp3Bitrate::Kbps64);

        Self {
            text: request.input,
            reference_id: request.model,
            format: request.response_format,
            mp3_bitrate,
            base_model: request.base_model.filter(|model| !model.trim().is_empty()),
            sampling: Some(Sampling {
                temperature: nonzero_or(request.temperature, defaults.temperature),
                top_p: nonzero_or(request.top_p, defaults.top_p),
                speed: nonzero_or(request.speed, defaults.speed),
                volume: request.volume.unwrap_or(defaults.volume),
            }),
        }
    }
}

/// Missing and zero values both take the default
fn nonzero_or(value: Option<f32>, default: f32) -> f32 {
    value.filter(|v| *v != 0.0).unwrap_or(default)
}

/// Raw audio returned by a provider
#[derive(Debug)]
pub struct SpeechResponse {
    pub audio: Bytes,
    pub format: AudioFormat,
}

impl IntoResponse for SpeechResponse {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(self.format.content_type())),
                (
                    header::CONTENT_DISPOSITION,
                    HeaderValue::from_static(self.format.content_disposition()),
                ),
            ],
            self.audio,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_defaults() {
        let request: V1SpeechRequest =
            serde_json::from_value(serde_json::json!({ "text": "Hello world", "reference_id": "ref_123" })).unwrap();

        assert_eq!(request.format, AudioFormat::Mp3);
        assert_eq!(u16::from(request.mp3_bitrate), 64);
    }

    #[test]
    fn v1_rejects_unknown_format_and_bitrate() {
        let bad_format = serde_json::json!({ "text": "a", "reference_id": "r", "format": "ogg" });
        assert!(serde_json::from_value::<V1SpeechRequest>(bad_format).is_err());

        let bad_bitrate = serde_json::json!({ "text": "a", "reference_id": "r", "mp3_bitrate": 256 });
        let err = serde_json::from_value::<V1SpeechRequest>(bad_bitrate).unwrap_err();
        assert!(err.to_string().contains("mp3_bitrate 256"));
    }

    #[test]
    fn v2_fills_sampling_defaults_and_ignores_extra_fields() {
        let request: V2SpeechRequest = serde_json::from_value(serde_json::json!({
            "input": "hi",
            "model": "voice-1",
            "references": [{ "reference_id": "voice-1" }],
            "prosody": "calm",
        }))
        .unwrap();

        let speech = SpeechRequest::from(request);
        assert_eq!(speech.reference_id, "voice-1");
        assert_eq!(speech.mp3_bitrate, Some(Mp3Bitrate::Kbps64));
        assert_eq!(speech.sampling, Some(Sampling::default()));
        assert!(speech.base_model.is_none());
    }

    #[test]
    fn v2_zero_sampling_takes_defaults() {
        let request: V2SpeechRequest = serde_json::from_value(serde_json::json!({
            "input": "hi",
            "model": "voice-1",
            "response_format": "wav",
            "temperature": 0.0,
            "top_p": 0.0,
            "speed": 0.0,
            "volume": 0.0,
            "base_model": "speech-1.5",
        }))
        .unwrap();

        let speech = SpeechRequest::from(request);
        assert_eq!(speech.sampling, Some(Sampling::default()));
        assert!(speech.mp3_bitrate.is_none());
        assert_eq!(speech.base_model.as_deref(), Some("speech-1.5"));
    }

    #[test]
    fn v2_keeps_nonzero_sampling() {
        let request: V2SpeechRequest = serde_json::from_value(serde_json::json!({
            "input": "hi",
            "model": "voice-1",
            "temperature": 0.2,
            "speed": 1.5,
            "volume": -3.0,
        }))
        .unwrap();

        let sampling = SpeechRequest::from(request).sampling.unwrap();
        assert!((sampling.temperature - 0.2).abs() < f32::EPSILON);
        assert!((sampling.top_p - 0.7).abs() < f32::EPSILON);
        assert!((sampling.speed - 1.5).abs() < f32::EPSILON);
        assert!((sampling.volume + 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn response_headers() {
        let response = SpeechResponse {
            audio: Bytes::from_static(b"RIFF"),
            format: AudioFormat::Wav,
        }
        .into_response();

        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=output.wav"
        );
    }
}
