use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Endpoints used by the training and testing workflows
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Fish Audio API used for training and model lookup
    #[serde(default = "crate::fish::default_base_url")]
    pub fish_api_url: Url,
    /// Synthesis proxy serving `/tts/fishaudio/v2/`
    #[serde(default = "default_proxy_url")]
    pub proxy_url: Url,
    /// Front-end origin used to build testing links after training
    #[serde(default = "default_app_url")]
    pub app_url: Url,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fish_api_url: crate::fish::default_base_url(),
            proxy_url: default_proxy_url(),
            app_url: default_app_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_proxy_url() -> Url {
    Url::parse("https://voiss-models.zeabur.app").expect("default proxy URL must parse")
}

fn default_app_url() -> Url {
    Url::parse("http://localhost:3001").expect("default app URL must parse")
}

const fn default_timeout_secs() -> u64 {
    120
}
