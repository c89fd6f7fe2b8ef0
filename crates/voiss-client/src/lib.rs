#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Training and testing workflows for Fish Audio voice models
//!
//! Each workflow pairs a form with a submission executor that allows one
//! request in flight at a time and records the latest result or error.

mod client;
mod entry;
mod error;
mod lookup;
mod submission;
mod synthesis;
mod training;
mod types;

pub use client::FishClient;
pub use entry::{EntryContext, TESTING_PATH, testing_link};
pub use error::{ClientError, FormError, Result, ValidationError};
pub use lookup::{LookupOutcome, ModelLookup};
pub use submission::{Failure, SubmissionState, Submitted, Submitter};
pub use synthesis::{DEFAULT_BASE_MODEL, SynthesisForm, SynthesisWorkflow};
pub use training::{TrainingForm, TrainingRequest, TrainingWorkflow};
pub use types::{
    Author, FileUpload, ModelInfo, ModelKind, ReferenceVoice, SynthesisRequest, SynthesizedAudio, TrainMode,
    TrainedModel, Visibility,
};
