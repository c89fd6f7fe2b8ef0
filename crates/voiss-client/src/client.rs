use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use url::Url;
use voiss_config::ClientConfig;

use crate::error::{ClientError, Result};
use crate::types::{FileUpload, ModelInfo, SynthesisRequest, SynthesizedAudio, TrainedModel};
use crate::training::TrainingRequest;

const SYNTHESIS_PATH: &str = "/tts/fishaudio/v2/";

/// Content type assumed when the proxy sends none
const DEFAULT_AUDIO_TYPE: &str = "audio/mpeg";

/// Typed client for Fish Audio and the synthesis proxy
#[derive(Debug, Clone)]
pub struct FishClient {
    fish_api_url: Url,
    proxy_url: Url,
    http: reqwest::Client,
}

impl FishClient {
    /// Create a client with default transport settings
    ///
    /// # Errors
    ///
    /// Returns an error if either URL is invalid
    pub fn new(fish_api_url: &str, proxy_url: &str) -> Result<Self> {
        Ok(Self {
            fish_api_url: parse_base(fish_api_url)?,
            proxy_url: parse_base(proxy_url)?,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client from configuration, applying the request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("voiss-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            fish_api_url: config.fish_api_url.clone(),
            proxy_url: config.proxy_url.clone(),
            http,
        })
    }

    pub const fn fish_api_url(&self) -> &Url {
        &self.fish_api_url
    }

    pub const fn proxy_url(&self) -> &Url {
        &self.proxy_url
    }

    // -- Training --

    /// Upload a voice sample and create a model
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the record cannot be decoded
    pub async fn train_model(&self, request: TrainingRequest) -> Result<TrainedModel> {
        let url = make_url(&self.fish_api_url, &["model"])?;
        let credential = request.credential.clone();

        tracing::debug!(
            title = %request.title,
            audio_bytes = request.voices.bytes.len(),
            has_cover = request.cover_image.is_some(),
            "submitting training request",
        );

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, bearer(&credential))
            .multipart(training_form(request)?)
            .send()
            .await?;

        let model: TrainedModel = handle_error(response).await?.json().await?;

        tracing::debug!(model_id = %model.id, state = %model.state, "training request accepted");

        Ok(model)
    }

    // -- Lookup --

    /// Fetch metadata for a model
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the record cannot be decoded
    pub async fn get_model(&self, id: &str, credential: &SecretString) -> Result<ModelInfo> {
        let url = make_url(&self.fish_api_url, &["model", id])?;

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, bearer(credential))
            .send()
            .await?;

        handle_error(response).await?.json().await.map_err(Into::into)
    }

    // -- Synthesis --

    /// Synthesize speech through the proxy
    ///
    /// Returns raw audio bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the proxy answers with a
    /// non-success status
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesizedAudio> {
        let mut url = self.proxy_url.clone();
        url.set_path(SYNTHESIS_PATH);

        tracing::debug!(reference_id = %request.model, base_model = %request.base_model, "submitting synthesis request");

        let response = self.http.post(url).json(request).send().await?;
        let response = handle_error(response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_AUDIO_TYPE)
            .to_string();

        let bytes = response.bytes().await?;

        tracing::debug!(bytes = bytes.len(), %content_type, "synthesis complete");

        Ok(SynthesizedAudio { bytes, content_type })
    }
}

fn parse_base(url: &str) -> Result<Url> {
    let url = Url::parse(url).map_err(|e| ClientError::Config(format!("invalid base URL `{url}`: {e}")))?;

    if url.cannot_be_a_base() {
        return Err(ClientError::Config(format!("`{url}` cannot be used as a base URL")));
    }

    Ok(url)
}

/// Replace the path of `base` with the given segments, percent-encoding each
fn make_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();

    url.path_segments_mut()
        .map_err(|()| ClientError::Config(format!("`{base}` cannot be used as a base URL")))?
        .clear()
        .extend(segments);

    Ok(url)
}

/// Authorization header value; a pasted `Bearer ` prefix is not doubled
fn bearer(credential: &SecretString) -> String {
    let token = credential.expose_secret().trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token);
    format!("Bearer {token}")
}

fn file_part(upload: FileUpload) -> Result<Part> {
    Part::bytes(upload.bytes.to_vec())
        .file_name(upload.file_name)
        .mime_str(&upload.content_type)
        .map_err(|e| ClientError::Config(format!("invalid content type `{}`: {e}", upload.content_type)))
}

fn training_form(request: TrainingRequest) -> Result<Form> {
    let mut form = Form::new()
        .part("voices", file_part(request.voices)?)
        .text("visibility", request.visibility.to_string())
        .text("type", request.kind.to_string())
        .text("train_mode", request.train_mode.to_string())
        .text("enhance_audio_quality", request.enhance_audio_quality.to_string())
        .text("texts", request.texts)
        .text("title", request.title);

    if let Some(cover) = request.cover_image {
        form = form.part("cover_image", file_part(cover)?);
    }

    Ok(form)
}

/// Check an HTTP response for errors
async fn handle_error(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
