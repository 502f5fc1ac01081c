//! Complaint endpoints.
//!
//! Citizens POST new complaints as multipart forms (the photo rides along
//! as a file part) and list their own; the backend scopes the listing to
//! the signed-in account. District leaders PATCH `status` to triage.

use samadhan_media::CapturedImage;
use samadhan_report_models::{Complaint, Coordinates, ReportCategory, ReportStatus};

use crate::transport::{ApiRequest, FormPart, FormValue};
use crate::{ApiClient, ApiError};

pub(crate) const REPORTS_PATH: &str = "/api/reports/";

/// A complaint ready for submission.
#[derive(Debug, Clone)]
pub struct NewReport<'a> {
    /// Grievance category.
    pub category: ReportCategory,
    /// Issue description.
    pub description: &'a str,
    /// Reported location.
    pub coordinates: Coordinates,
    /// Resolved human-readable address, when known.
    pub address: Option<&'a str>,
    /// Photo evidence, when attached.
    pub image: Option<&'a CapturedImage>,
}

impl NewReport<'_> {
    /// Multipart form fields for this report. Optional fields produce no
    /// part at all rather than an empty one.
    pub(crate) fn parts(&self) -> Vec<FormPart> {
        let mut parts = vec![
            FormPart {
                name: "category".to_string(),
                value: FormValue::Text(self.category.as_ref().to_string()),
            },
            FormPart {
                name: "description".to_string(),
                value: FormValue::Text(self.description.to_string()),
            },
            FormPart {
                name: "latitude".to_string(),
                value: FormValue::Text(self.coordinates.lat.to_string()),
            },
            FormPart {
                name: "longitude".to_string(),
                value: FormValue::Text(self.coordinates.lng.to_string()),
            },
        ];

        if let Some(address) = self.address {
            parts.push(FormPart {
                name: "address".to_string(),
                value: FormValue::Text(address.to_string()),
            });
        }

        if let Some(image) = self.image {
            parts.push(FormPart {
                name: "image".to_string(),
                value: FormValue::File {
                    bytes: image.bytes.clone(),
                    file_name: image.file_name.clone(),
                    mime: image.kind.mime().to_string(),
                },
            });
        }

        parts
    }
}

impl ApiClient {
    /// Files a new complaint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if not signed in, the backend rejects the
    /// report, or the created record cannot be decoded.
    pub async fn submit_report(&self, report: &NewReport<'_>) -> Result<Complaint, ApiError> {
        log::info!(
            "Submitting {} report{}",
            report.category.as_ref(),
            if report.image.is_some() {
                " with photo evidence"
            } else {
                ""
            },
        );
        let response = self
            .send_authed(ApiRequest::post_multipart(REPORTS_PATH, report.parts()))
            .await?;
        response.parse()
    }

    /// Lists complaints visible to the signed-in account.
    ///
    /// The backend scopes the result: citizens see their own reports,
    /// district leaders see everything.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if not signed in or the listing fails.
    pub async fn list_reports(&self) -> Result<Vec<Complaint>, ApiError> {
        let response = self.send_authed(ApiRequest::get(REPORTS_PATH)).await?;
        response.parse()
    }

    /// Fetches one complaint by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with 404 for an unknown id.
    pub async fn get_report(&self, id: i64) -> Result<Complaint, ApiError> {
        let response = self
            .send_authed(ApiRequest::get(format!("{REPORTS_PATH}{id}/")))
            .await?;
        response.parse()
    }

    /// Moves a complaint to `status` (district leaders only).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] if the backend refuses the change.
    pub async fn update_status(
        &self,
        id: i64,
        status: ReportStatus,
    ) -> Result<Complaint, ApiError> {
        log::info!("Moving report #{id} to {status}");
        let response = self
            .send_authed(ApiRequest::patch_json(
                format!("{REPORTS_PATH}{id}/"),
                serde_json::json!({ "status": status }),
            ))
            .await?;
        response.parse()
    }
}
