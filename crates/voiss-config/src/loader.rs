use std::path::Path;

use url::Url;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    ///
    /// The client subcommands need no server settings, so a missing file is
    /// not an error for them.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a URL uses an unsupported scheme or a numeric
    /// setting is out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_urls()?;
        self.validate_limits()?;
        self.validate_health()?;
        Ok(())
    }

    fn validate_urls(&self) -> anyhow::Result<()> {
        let urls = [
            ("fish.base_url", &self.fish.base_url),
            ("client.fish_api_url", &self.client.fish_api_url),
            ("client.proxy_url", &self.client.proxy_url),
            ("client.app_url", &self.client.app_url),
        ];

        for (name, url) in urls {
            ensure_http(name, url)?;
        }

        Ok(())
    }

    fn validate_limits(&self) -> anyhow::Result<()> {
        if self.fish.chunk_length == 0 {
            anyhow::bail!("fish.chunk_length must be greater than 0");
        }

        if self.fish.default_model.trim().is_empty() {
            anyhow::bail!("fish.default_model must not be empty");
        }

        if self.client.timeout_secs == 0 {
            anyhow::bail!("client.timeout_secs must be greater than 0");
        }

        Ok(())
    }

    fn validate_health(&self) -> anyhow::Result<()> {
        let health = &self.server.health;

        if health.enabled && !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/': `{}`", health.path);
        }

        Ok(())
    }
}

fn ensure_http(name: &str, url: &Url) -> anyhow::Result<()> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!("{name} must use http or https, got `{other}`"),
    }
}
