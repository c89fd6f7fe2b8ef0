//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use secrecy::SecretString;
use voiss_config::{Config, CorsConfig, FishConfig, HealthConfig, ServerConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Point the proxy at a mock Fish Audio backend with a server-held key
    pub fn with_fish_backend(mut self, base_url: &str) -> Self {
        self.config.fish = FishConfig {
            api_key: Some(SecretString::from("test-key")),
            base_url: base_url.parse().expect("valid URL"),
            ..FishConfig::default()
        };
        self
    }

    /// Drop the server-held key so callers must bring their own
    pub fn without_api_key(mut self) -> Self {
        self.config.fish.api_key = None;
        self
    }

    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
