use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use secrecy::SecretString;

use crate::client::FishClient;
use crate::types::ModelInfo;

/// Result of a [`ModelLookup::load`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// A lookup was already running
    Skipped,
    Loaded(ModelInfo),
    /// The lookup failed; the reason was logged
    Failed,
}

/// On-demand model metadata fetch with its own loading flag
#[derive(Debug)]
pub struct ModelLookup {
    client: FishClient,
    loading: AtomicBool,
    info: Mutex<Option<ModelInfo>>,
}

impl ModelLookup {
    pub fn new(client: FishClient) -> Self {
        Self {
            client,
            loading: AtomicBool::new(false),
            info: Mutex::new(None),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Most recently fetched record
    pub fn info(&self) -> Option<ModelInfo> {
        self.info.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Fetch the model record
    ///
    /// Failures are not surfaced to the user: they are logged and the
    /// record is left absent.
    pub async fn load(&self, id: &str, credential: &SecretString) -> LookupOutcome {
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(model_id = id, "model lookup already running");
            return LookupOutcome::Skipped;
        }

        let _loading = LoadingGuard(&self.loading);

        let fetched = match self.client.get_model(id, credential).await {
            Ok(info) => {
                tracing::debug!(model_id = id, title = %info.title, "model loaded");
                Some(info)
            }
            Err(err) => {
                tracing::warn!(model_id = id, error = %err, "failed to load model");
                None
            }
        };

        let outcome = fetched.clone().map_or(LookupOutcome::Failed, LookupOutcome::Loaded);
        *self.info.lock().unwrap_or_else(PoisonError::into_inner) = fetched;

        outcome
    }
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
