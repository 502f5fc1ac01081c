//! Submission state machine.
//!
//! One dispatch moves Idle -> Validating -> Submitting -> Success or
//! Failed. A blocked draft fails during Validating and never reaches the
//! network. Failed is recoverable: [`Dispatcher::reset`] returns to Idle
//! and the draft is untouched, so the citizen edits and tries again.

use samadhan_client::reports::NewReport;
use samadhan_client::{ApiClient, ApiError};
use samadhan_report_models::Complaint;
use thiserror::Error;

use crate::{ReportDraft, ValidationIssue};

/// Where a dispatch currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DispatchState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Checking the draft.
    Validating,
    /// Request in flight.
    Submitting,
    /// The backend accepted the report.
    Success {
        /// Backend id of the created complaint.
        complaint_id: i64,
    },
    /// Validation or submission failed.
    Failed {
        /// Human-readable reason.
        message: String,
    },
}

/// Why a dispatch failed.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The draft is incomplete; nothing was sent.
    #[error("report is incomplete: {}", issues_summary(.0))]
    Blocked(Vec<ValidationIssue>),

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn issues_summary(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drives one report submission at a time.
#[derive(Debug, Default)]
pub struct Dispatcher {
    state: DispatchState,
}

impl Dispatcher {
    /// Creates an idle dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &DispatchState {
        &self.state
    }

    /// Validates `draft` and submits it through `client`.
    ///
    /// On success the created [`Complaint`] is returned and the state is
    /// [`DispatchState::Success`]. On any failure the state is
    /// [`DispatchState::Failed`] and the draft is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Blocked`] for an incomplete draft (no
    /// network call is made) or [`DispatchError::Api`] if the backend
    /// rejects the submission.
    pub async fn submit(
        &mut self,
        client: &ApiClient,
        draft: &ReportDraft,
    ) -> Result<Complaint, DispatchError> {
        self.state = DispatchState::Validating;

        let issues = draft.validate();
        if !issues.is_empty() {
            let message = issues_summary(&issues);
            log::debug!("Dispatch of draft {} blocked: {message}", draft.id());
            self.state = DispatchState::Failed { message };
            return Err(DispatchError::Blocked(issues));
        }

        // Validation guarantees these are present.
        let (Some(category), Some(coordinates)) = (draft.category, draft.coordinates) else {
            let message = "draft changed during validation".to_string();
            self.state = DispatchState::Failed {
                message: message.clone(),
            };
            return Err(DispatchError::Blocked(vec![
                ValidationIssue::MissingCategory,
            ]));
        };

        self.state = DispatchState::Submitting;
        let report = NewReport {
            category,
            description: draft.description.trim(),
            coordinates,
            address: draft.address.as_deref(),
            image: draft.attachment.image(),
        };

        match client.submit_report(&report).await {
            Ok(complaint) => {
                log::info!("Draft {} filed as report #{}", draft.id(), complaint.id);
                self.state = DispatchState::Success {
                    complaint_id: complaint.id,
                };
                Ok(complaint)
            }
            Err(e) => {
                self.state = DispatchState::Failed {
                    message: e.to_string(),
                };
                Err(DispatchError::Api(e))
            }
        }
    }

    /// Returns a terminal dispatcher to [`DispatchState::Idle`] so the
    /// same draft can be edited and resubmitted.
    pub fn reset(&mut self) {
        self.state = DispatchState::Idle;
    }
}
