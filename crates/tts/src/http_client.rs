use std::time::Duration;

use reqwest::Client;

use crate::error::TtsError;

/// Upstream synthesis of long texts can take minutes
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(300);

/// Build the client used for Fish Audio calls
pub fn http_client() -> crate::error::Result<Client> {
    Client::builder()
        .user_agent(concat!("voiss-tts/", env!("CARGO_PKG_VERSION")))
        .timeout(UPSTREAM_TIMEOUT)
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .build()
        .map_err(|e| TtsError::ConfigError(format!("failed to build HTTP client: {e}")))
}
