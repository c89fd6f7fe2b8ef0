#![allow(clippy::must_use_candidate)]

pub mod client;
pub mod cors;
mod env;
pub mod fish;
pub mod health;
mod loader;
pub mod logging;
pub mod server;

use serde::Deserialize;

pub use client::*;
pub use cors::*;
pub use fish::*;
pub use health::*;
pub use logging::*;
pub use server::*;

/// Top-level voiss configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Proxy server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream Fish Audio settings used by the synthesis proxy
    #[serde(default)]
    pub fish: FishConfig,
    /// Endpoints used by the training and testing workflows
    #[serde(default)]
    pub client: ClientConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.server.listen_address.is_none());
        assert!(config.server.health.enabled);
        assert!(config.server.cors.is_none());
        assert!(config.fish.api_key.is_none());
        assert_eq!(config.fish.default_model, "speech-s1");
        assert_eq!(config.client.proxy_url.as_str(), "https://voiss-models.zeabur.app/");
        assert_eq!(config.client.app_url.as_str(), "http://localhost:3001/");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn unknown_section_is_rejected() {
        let err = toml::from_str::<Config>("[llm]\nproviders = {}").unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn full_document() {
        let toml = r#"
            [server]
            listen_address = "127.0.0.1:8080"

            [server.health]
            path = "/healthz"

            [server.cors]
            origins = ["http://localhost:3001"]

            [fish]
            api_key = "fish-key"
            base_url = "http://localhost:9000"
            default_model = "speech-1.6"

            [client]
            proxy_url = "http://localhost:8080"
            timeout_secs = 30

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.server.listen_address.unwrap().port(), 8080);
        assert_eq!(config.server.health.path, "/healthz");
        assert_eq!(config.fish.base_url.as_str(), "http://localhost:9000/");
        assert_eq!(config.fish.default_model, "speech-1.6");
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.logging.format, LogFormat::Json);
    }
}
