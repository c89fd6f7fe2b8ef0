//! Training workflow: upload a voice sample and create a model

use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};

use crate::client::FishClient;
use crate::entry::EntryContext;
use crate::error::{FormError, ValidationError};
use crate::submission::{Failure, SubmissionState, Submitted, Submitter};
use crate::types::{FileUpload, ModelKind, TrainMode, TrainedModel, Visibility};

/// Fields of the training form
#[derive(Debug, Clone)]
pub struct TrainingForm {
    pub title: String,
    /// Transcript of the voice sample
    pub texts: String,
    pub authorization: SecretString,
    pub visibility: Visibility,
    pub kind: ModelKind,
    pub train_mode: TrainMode,
    pub enhance_audio_quality: bool,
    pub audio: Option<FileUpload>,
    pub cover_image: Option<FileUpload>,
}

impl Default for TrainingForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            texts: String::new(),
            authorization: SecretString::from(String::new()),
            visibility: Visibility::default(),
            kind: ModelKind::default(),
            train_mode: TrainMode::default(),
            enhance_audio_quality: true,
            audio: None,
            cover_image: None,
        }
    }
}

/// Multipart training submission, validated and ready to send
#[derive(Debug, Clone)]
pub struct TrainingRequest {
    pub credential: SecretString,
    pub voices: FileUpload,
    pub cover_image: Option<FileUpload>,
    pub visibility: Visibility,
    pub kind: ModelKind,
    pub train_mode: TrainMode,
    pub enhance_audio_quality: bool,
    pub texts: String,
    pub title: String,
}

impl TrainingForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a field-update event for a text or choice field
    ///
    /// On error the form is left unchanged.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "title" => self.title = value.to_string(),
            "texts" => self.texts = value.to_string(),
            "authorization" | "token" => self.authorization = SecretString::from(value.to_string()),
            "visibility" => self.visibility = parse_choice("visibility", value)?,
            "type" => self.kind = parse_choice("type", value)?,
            "train_mode" => self.train_mode = parse_choice("train_mode", value)?,
            "enhance_audio_quality" => {
                self.enhance_audio_quality = value
                    .trim()
                    .parse()
                    .map_err(|e| FormError::invalid("enhance_audio_quality", value, e))?;
            }
            _ => return Err(FormError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    pub fn set_audio(&mut self, audio: Option<FileUpload>) {
        self.audio = audio;
    }

    pub fn set_cover_image(&mut self, cover_image: Option<FileUpload>) {
        self.cover_image = cover_image;
    }

    /// Take the credential from an entry link
    pub fn apply_entry(&mut self, entry: &EntryContext) {
        if let Some(token) = &entry.token {
            self.authorization = token.clone();
        }
    }

    /// Validate the form and assemble the multipart request
    pub fn build_request(&self) -> Result<TrainingRequest, ValidationError> {
        let voices = self.audio.clone().ok_or(ValidationError::MissingAudio)?;

        if self.authorization.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingCredential);
        }

        Ok(TrainingRequest {
            credential: self.authorization.clone(),
            voices,
            cover_image: self.cover_image.clone(),
            visibility: self.visibility,
            kind: self.kind,
            train_mode: self.train_mode,
            enhance_audio_quality: self.enhance_audio_quality,
            texts: self.texts.clone(),
            title: self.title.clone(),
        })
    }
}

fn parse_choice<T>(field: &'static str, value: &str) -> Result<T, FormError>
where
    T: FromStr,
    T::Err: ToString,
{
    value.trim().parse().map_err(|e| FormError::invalid(field, value, e))
}

/// Training submissions
#[derive(Debug)]
pub struct TrainingWorkflow {
    client: FishClient,
    submitter: Submitter<TrainedModel>,
}

impl TrainingWorkflow {
    pub fn new(client: FishClient) -> Self {
        Self {
            client,
            submitter: Submitter::new(),
        }
    }

    /// Validate the form and upload it
    pub async fn submit(&self, form: &TrainingForm) -> Submitted {
        self.submitter
            .submit(
                || form.build_request(),
                |request| self.client.train_model(request),
            )
            .await
    }

    pub fn state(&self) -> SubmissionState<TrainedModel> {
        self.submitter.state()
    }

    pub fn is_in_flight(&self) -> bool {
        self.submitter.is_in_flight()
    }

    pub fn model(&self) -> Option<TrainedModel> {
        self.submitter.result()
    }

    pub fn error(&self) -> Option<Failure> {
        self.submitter.error()
    }
}
