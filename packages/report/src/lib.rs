#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report draft lifecycle and submission dispatch.
//!
//! A [`ReportDraft`] accumulates the form fields a citizen fills in. The
//! [`dispatch::Dispatcher`] validates the draft and submits it to the
//! backend; validation failures never produce a network call, and a
//! failed submission leaves the draft intact so the citizen can fix and
//! resubmit.

pub mod dispatch;

use samadhan_media::attachment::AttachmentSlot;
use samadhan_report_models::{Coordinates, MAX_DESCRIPTION_LEN, ReportCategory};
use thiserror::Error;
use uuid::Uuid;

/// One reason a draft cannot be submitted yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    /// No category picked.
    #[error("pick a category")]
    MissingCategory,

    /// Description is empty or whitespace.
    #[error("describe the issue")]
    EmptyDescription,

    /// Description exceeds [`MAX_DESCRIPTION_LEN`].
    #[error("description is {len} characters, maximum is {MAX_DESCRIPTION_LEN}")]
    DescriptionTooLong {
        /// Actual character count.
        len: usize,
    },

    /// No location fix or manual override yet.
    #[error("waiting for a location")]
    MissingCoordinates,
}

/// An in-progress complaint, not yet filed.
#[derive(Debug)]
pub struct ReportDraft {
    id: Uuid,
    /// Picked grievance category.
    pub category: Option<ReportCategory>,
    /// Issue description.
    pub description: String,
    /// Location fix or manual override.
    pub coordinates: Option<Coordinates>,
    /// Resolved display address for the coordinates, when known.
    pub address: Option<String>,
    /// Photo evidence slot.
    pub attachment: AttachmentSlot,
}

impl Default for ReportDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportDraft {
    /// Creates an empty draft with a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            category: None,
            description: String::new(),
            coordinates: None,
            address: None,
            attachment: AttachmentSlot::default(),
        }
    }

    /// Stable identifier for this draft, used to correlate dispatch logs.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Collects everything blocking submission. Empty means submittable.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.category.is_none() {
            issues.push(ValidationIssue::MissingCategory);
        }

        let len = self.description.trim().chars().count();
        if len == 0 {
            issues.push(ValidationIssue::EmptyDescription);
        } else if len > MAX_DESCRIPTION_LEN {
            issues.push(ValidationIssue::DescriptionTooLong { len });
        }

        if self.coordinates.is_none() {
            issues.push(ValidationIssue::MissingCoordinates);
        }

        issues
    }

    /// Whether submission is currently blocked.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use samadhan_media::{CapturedImage, ImageKind};

    use super::*;

    fn filled_draft() -> ReportDraft {
        ReportDraft {
            category: Some(ReportCategory::Infra),
            description: "Streetlight out at the main crossing.".to_string(),
            coordinates: Some(Coordinates {
                lat: 18.5204,
                lng: 73.8567,
            }),
            ..ReportDraft::new()
        }
    }

    #[test]
    fn empty_draft_reports_every_gap() {
        let issues = ReportDraft::new().validate();
        assert_eq!(
            issues,
            vec![
                ValidationIssue::MissingCategory,
                ValidationIssue::EmptyDescription,
                ValidationIssue::MissingCoordinates,
            ],
        );
    }

    #[test]
    fn filled_draft_is_submittable() {
        assert!(!filled_draft().is_blocked());
    }

    #[test]
    fn whitespace_description_counts_as_empty() {
        let mut draft = filled_draft();
        draft.description = "   \n\t ".to_string();
        assert_eq!(draft.validate(), vec![ValidationIssue::EmptyDescription]);
    }

    #[test]
    fn description_length_boundary() {
        let mut draft = filled_draft();

        draft.description = "x".repeat(MAX_DESCRIPTION_LEN);
        assert!(draft.validate().is_empty());

        draft.description = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        assert_eq!(
            draft.validate(),
            vec![ValidationIssue::DescriptionTooLong {
                len: MAX_DESCRIPTION_LEN + 1
            }],
        );
    }

    #[test]
    fn attachment_is_never_required() {
        let mut draft = filled_draft();
        assert!(!draft.is_blocked());

        draft
            .attachment
            .attach(CapturedImage {
                bytes: tiny_jpeg(),
                kind: ImageKind::Jpeg,
                file_name: "evidence.jpg".to_string(),
            })
            .unwrap();
        assert!(!draft.is_blocked());
        draft.attachment.clear();
    }

    #[test]
    fn draft_ids_are_stable_and_distinct() {
        let draft = ReportDraft::new();
        assert_eq!(draft.id(), draft.id());
        assert_ne!(draft.id(), ReportDraft::new().id());
    }

    fn tiny_jpeg() -> Vec<u8> {
        let mut bytes = Vec::new();
        image::codecs::jpeg::JpegEncoder::new(&mut bytes)
            .encode(&[128; 12], 2, 2, image::ExtendedColorType::Rgb8)
            .unwrap();
        bytes
    }
}
