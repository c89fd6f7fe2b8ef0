//! Testing workflow: synthesize speech with a trained voice

use secrecy::{ExposeSecret, SecretString};

use crate::client::FishClient;
use crate::entry::EntryContext;
use crate::error::{FormError, ValidationError};
use crate::lookup::{LookupOutcome, ModelLookup};
use crate::submission::{Failure, SubmissionState, Submitted, Submitter};
use crate::types::{ModelInfo, ReferenceVoice, SynthesisRequest, SynthesizedAudio};

pub const DEFAULT_BASE_MODEL: &str = "speech-1.5";

/// Fields of the synthesis form
#[derive(Debug, Clone)]
pub struct SynthesisForm {
    pub text: String,
    pub authorization: SecretString,
    /// Model to look up
    pub model_id: String,
    pub base_model: String,
    pub temperature: f32,
    pub top_p: f32,
    /// Voice used for synthesis
    pub reference_id: String,
    pub prosody: String,
    pub speed: f32,
    pub volume: f32,
}

impl Default for SynthesisForm {
    fn default() -> Self {
        Self {
            text: String::new(),
            authorization: SecretString::from(String::new()),
            model_id: String::new(),
            base_model: DEFAULT_BASE_MODEL.to_string(),
            temperature: 0.0,
            top_p: 0.9,
            reference_id: String::new(),
            prosody: String::new(),
            speed: 1.0,
            volume: 0.0,
        }
    }
}

impl SynthesisForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a field-update event
    ///
    /// On error the form is left unchanged.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "text" => self.text = value.to_string(),
            "authorization" | "token" => self.authorization = SecretString::from(value.to_string()),
            "model_id" | "modelId" => self.model_id = value.to_string(),
            "base_model" | "model" => self.base_model = value.to_string(),
            "temperature" => self.temperature = parse_number("temperature", value)?,
            "top_p" => self.top_p = parse_number("top_p", value)?,
            "reference_id" => self.reference_id = value.to_string(),
            "prosody" => self.prosody = value.to_string(),
            "speed" => self.speed = parse_number("speed", value)?,
            "volume" => self.volume = parse_number("volume", value)?,
            _ => return Err(FormError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    /// Take the model id and credential from an entry link
    pub fn apply_entry(&mut self, entry: &EntryContext) {
        if let Some(model_id) = &entry.model_id {
            self.model_id.clone_from(model_id);
            self.reference_id.clone_from(model_id);
        }
        if let Some(token) = &entry.token {
            self.authorization = token.clone();
        }
    }

    fn has_credential(&self) -> bool {
        !self.authorization.expose_secret().trim().is_empty()
    }

    /// Validate the form and assemble the proxy request
    pub fn build_request(&self) -> Result<SynthesisRequest, ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::MissingText);
        }
        if !self.has_credential() {
            return Err(ValidationError::MissingCredential);
        }

        let reference_id = self.reference_id.trim();
        if reference_id.is_empty() {
            return Err(ValidationError::MissingReference);
        }

        let prosody = self.prosody.trim();

        Ok(SynthesisRequest {
            input: self.text.clone(),
            model: reference_id.to_string(),
            base_model: self.base_model.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            speed: self.speed,
            volume: self.volume,
            references: vec![ReferenceVoice {
                reference_id: reference_id.to_string(),
            }],
            prosody: (!prosody.is_empty()).then(|| prosody.to_string()),
        })
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<f32, FormError> {
    let number: f32 = value.trim().parse().map_err(|e| FormError::invalid(field, value, e))?;

    if !number.is_finite() {
        return Err(FormError::invalid(field, value, "must be a finite number"));
    }

    Ok(number)
}

/// Synthesis submissions plus the model lookup that feeds them
#[derive(Debug)]
pub struct SynthesisWorkflow {
    client: FishClient,
    submitter: Submitter<SynthesizedAudio>,
    lookup: ModelLookup,
}

impl SynthesisWorkflow {
    pub fn new(client: FishClient) -> Self {
        Self {
            lookup: ModelLookup::new(client.clone()),
            client,
            submitter: Submitter::new(),
        }
    }

    /// Validate the form and synthesize speech
    pub async fn submit(&self, form: &SynthesisForm) -> Submitted {
        self.submitter
            .submit(
                || form.build_request(),
                |request| async move { self.client.synthesize(&request).await },
            )
            .await
    }

    pub fn state(&self) -> SubmissionState<SynthesizedAudio> {
        self.submitter.state()
    }

    pub fn is_in_flight(&self) -> bool {
        self.submitter.is_in_flight()
    }

    pub fn audio(&self) -> Option<SynthesizedAudio> {
        self.submitter.result()
    }

    pub fn error(&self) -> Option<Failure> {
        self.submitter.error()
    }

    pub const fn lookup(&self) -> &ModelLookup {
        &self.lookup
    }

    pub fn model_info(&self) -> Option<ModelInfo> {
        self.lookup.info()
    }

    /// Explicit load action: use the model id as the voice and fetch its record
    pub async fn load_model(&self, form: &mut SynthesisForm) -> Result<LookupOutcome, ValidationError> {
        let model_id = form.model_id.trim().to_string();
        if model_id.is_empty() {
            return Err(ValidationError::MissingReference);
        }
        if !form.has_credential() {
            return Err(ValidationError::MissingCredential);
        }

        form.reference_id.clone_from(&model_id);

        Ok(self.lookup.load(&model_id, &form.authorization).await)
    }

    /// Fetch the model record once both the id and credential are known
    ///
    /// Returns `None` when there is nothing to do.
    pub async fn autoload_model(&self, form: &SynthesisForm) -> Option<LookupOutcome> {
        let model_id = form.model_id.trim();
        if model_id.is_empty() || !form.has_credential() || self.lookup.info().is_some() {
            return None;
        }

        Some(self.lookup.load(model_id, &form.authorization).await)
    }
}
