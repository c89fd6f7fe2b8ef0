use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

const DEFAULT_FISH_API_URL: &str = "https://api.fish.audio";

/// Upstream Fish Audio settings for the synthesis proxy
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FishConfig {
    /// Server-held API key; callers may override it per request
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Base model sent in the `model` header when a request names none
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Text chunk length forwarded to the synthesis endpoint
    #[serde(default = "default_chunk_length")]
    pub chunk_length: u32,
    #[serde(default)]
    pub latency: Latency,
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            default_model: default_model(),
            chunk_length: default_chunk_length(),
            latency: Latency::default(),
        }
    }
}

/// Upstream latency mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Latency {
    Normal,
    #[default]
    Balanced,
}

impl Latency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Balanced => "balanced",
        }
    }
}

pub(crate) fn default_base_url() -> Url {
    Url::parse(DEFAULT_FISH_API_URL).expect("default Fish Audio URL must parse")
}

fn default_model() -> String {
    "speech-s1".to_string()
}

const fn default_chunk_length() -> u32 {
    200
}
