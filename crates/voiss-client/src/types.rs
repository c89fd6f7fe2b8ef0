use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

// -- Enumerated form choices --

/// Who can see a trained model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::EnumString, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Unlist,
    Private,
}

/// Kind of model to train
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::EnumString, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Tts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::EnumString, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum TrainMode {
    #[default]
    Fast,
    Full,
}

// -- Model records --

/// Author descriptor attached to a model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
}

/// Model metadata returned by `GET /model/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub author: Author,
}

/// Full record returned after submitting a training job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainedModel {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub train_mode: String,
    /// e.g. `created`, `training`, `trained`, `failed`
    pub state: String,
    pub tags: Vec<String>,
    pub samples: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub languages: Vec<String>,
    pub visibility: String,
    pub lock_visibility: bool,
    pub default_text: String,
    pub like_count: u64,
    pub mark_count: u64,
    pub shared_count: u64,
    pub task_count: u64,
    pub unliked: bool,
    pub liked: bool,
    pub marked: bool,
    pub author: Author,
}

impl TrainedModel {
    pub fn is_trained(&self) -> bool {
        self.state == "trained"
    }

    /// Public Fish Audio page for this model
    pub fn fish_audio_url(&self) -> String {
        format!("https://fish.audio/zh-CN/m/{}/", self.id)
    }
}

// -- Synthesis wire types --

/// Reference voice entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceVoice {
    pub reference_id: String,
}

/// JSON body sent to the synthesis proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub input: String,
    /// Reference voice id
    pub model: String,
    pub base_model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub speed: f32,
    pub volume: f32,
    pub references: Vec<ReferenceVoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prosody: Option<String>,
}

/// Audio produced by a synthesis submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub bytes: Bytes,
    pub content_type: String,
}

impl SynthesizedAudio {
    /// Suggested download name
    pub fn file_name(&self) -> String {
        let extension = match self.content_type.split(';').next().map(str::trim) {
            Some("audio/wav" | "audio/x-wav" | "audio/wave") => "wav",
            Some("audio/pcm" | "audio/l16") => "pcm",
            _ => "mp3",
        };
        format!("generated_speech.{extension}")
    }

    /// Write the audio to disk
    pub async fn save(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::write(path, &self.bytes).await
    }
}

// -- Uploads --

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file, guessing its content type from the extension
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());

        Ok(Self::new(file_name, guess_content_type(path), bytes))
    }
}

fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "3gp" => "audio/3gpp",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
