//! Single in-flight submission lifecycle shared by both workflows

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{ClientError, ValidationError};

/// Lifecycle of the most recent submission
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState<T> {
    #[default]
    Idle,
    InFlight,
    Success(T),
    Failure(Failure),
}

/// A user-visible failure message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    /// Set when the server answered with a non-success status
    pub status: Option<u16>,
}

impl From<ValidationError> for Failure {
    fn from(err: ValidationError) -> Self {
        Self {
            message: err.to_string(),
            status: None,
        }
    }
}

impl From<ClientError> for Failure {
    fn from(err: ClientError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// What a call to [`Submitter::submit`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    /// Another submission was in flight, nothing happened
    Skipped,
    /// Validation failed, no request was sent
    Rejected,
    Succeeded,
    Failed,
}

/// Runs at most one outbound call at a time and records its outcome
#[derive(Debug)]
pub struct Submitter<T> {
    state: Mutex<SubmissionState<T>>,
}

impl<T: Clone> Default for Submitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Submitter<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SubmissionState<T> {
        self.lock().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(*self.lock(), SubmissionState::InFlight)
    }

    /// Payload of the last successful submission
    pub fn result(&self) -> Option<T> {
        match &*self.lock() {
            SubmissionState::Success(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<Failure> {
        match &*self.lock() {
            SubmissionState::Failure(failure) => Some(failure.clone()),
            _ => None,
        }
    }

    /// Validate with `prepare`, then perform `call` with the prepared request
    ///
    /// The previous outcome is replaced. If the returned future is dropped
    /// before the call finishes the state goes back to idle.
    pub async fn submit<R, P, C, Fut>(&self, prepare: P, call: C) -> Submitted
    where
        P: FnOnce() -> Result<R, ValidationError>,
        C: FnOnce(R) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let request = {
            let mut state = self.lock();

            if matches!(*state, SubmissionState::InFlight) {
                tracing::debug!("submission already in flight, ignoring");
                return Submitted::Skipped;
            }

            match prepare() {
                Ok(request) => {
                    *state = SubmissionState::InFlight;
                    request
                }
                Err(err) => {
                    tracing::debug!(error = %err, "submission rejected");
                    *state = SubmissionState::Failure(err.into());
                    return Submitted::Rejected;
                }
            }
        };

        let mut guard = InFlightGuard { submitter: self, armed: true };
        let outcome = call(request).await;
        guard.armed = false;

        let (next, submitted) = match outcome {
            Ok(value) => (SubmissionState::Success(value), Submitted::Succeeded),
            Err(err) => {
                tracing::warn!(error = %err, "submission failed");
                (SubmissionState::Failure(err.into()), Submitted::Failed)
            }
        };

        *self.lock() = next;
        submitted
    }
}

/// Returns the submitter to idle when a call is abandoned mid-flight
struct InFlightGuard<'a, T> {
    submitter: &'a Submitter<T>,
    armed: bool,
}

impl<T> Drop for InFlightGuard<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut state = self.submitter.state.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*state, SubmissionState::InFlight) {
            *state = SubmissionState::Idle;
        }
    }
}
