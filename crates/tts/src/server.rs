use crate::{
    provider::{TtsProvider, fish_audio::FishAudioProvider},
    request::RequestContext,
    types::{SpeechRequest, SpeechResponse},
};

/// Synthesis proxy state shared by the route handlers
pub struct Server {
    provider: Box<dyn TtsProvider>,
}

impl Server {
    /// Wrap an already constructed provider
    pub fn with_provider(provider: Box<dyn TtsProvider>) -> Self {
        Self { provider }
    }

    /// Synthesize text to speech with the configured provider
    pub async fn synthesize(
        &self,
        request: SpeechRequest,
        context: &RequestContext,
    ) -> crate::error::Result<SpeechResponse> {
        tracing::debug!(provider = self.provider.name(), "dispatching synthesis request");

        self.provider.synthesize(request, context).await
    }
}

/// Builder for constructing the synthesis proxy from configuration
pub struct TtsServerBuilder<'a> {
    config: &'a voiss_config::Config,
}

impl<'a> TtsServerBuilder<'a> {
    pub const fn new(config: &'a voiss_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> crate::error::Result<Server> {
        let fish = &self.config.fish;

        if fish.api_key.is_none() {
            tracing::warn!("no Fish Audio API key configured, callers must send X-Provider-API-Key");
        }

        let provider = FishAudioProvider::new("fishaudio".to_string(), fish)?;

        tracing::debug!(base_url = %fish.base_url, model = %fish.default_model, "synthesis proxy initialized");

        Ok(Server::with_provider(Box::new(provider)))
    }
}
