#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Formal grievance letter generation.
//!
//! [`compose`] renders the complaint as the portal's municipal-office
//! letter text; [`pdf::render`] lays that text out as a PDF with the
//! photo evidence, when present, on its own page. The exported artifact
//! is conventionally named [`ARTIFACT_FILE_NAME`].

pub mod pdf;

use chrono::NaiveDate;
use samadhan_report_models::{Coordinates, ReportCategory};
use thiserror::Error;

/// Default file name for the exported letter.
pub const ARTIFACT_FILE_NAME: &str = "complaint_letter.pdf";

/// Errors from letter PDF generation.
#[derive(Debug, Error)]
pub enum LetterError {
    /// PDF assembly or serialization failed.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The attached evidence could not be decoded for embedding.
    #[error("Invalid evidence image: {message}")]
    Image {
        /// Description of the decode failure.
        message: String,
    },

    /// Writing the output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the letter template needs.
#[derive(Debug, Clone)]
pub struct LetterInput<'a> {
    /// Name signed under "Yours sincerely"; `None` signs as "Citizen".
    pub citizen_name: Option<&'a str>,
    /// Complaint category, named in the subject line.
    pub category: ReportCategory,
    /// Complaint description, quoted verbatim in the body.
    pub description: &'a str,
    /// Resolved district, addressed in the header when known.
    pub district: &'a str,
    /// Resolved state, addressed in the header when known.
    pub state: &'a str,
    /// Reported location, printed to six decimal places; the location
    /// block is omitted when unknown.
    pub coordinates: Option<Coordinates>,
    /// Filing date.
    pub date: NaiveDate,
}

/// Renders the complaint as the formal letter text.
///
/// Unknown fields collapse rather than printing placeholders: the region
/// line is dropped when neither district nor state is known, and the
/// location block is dropped when no coordinates were recorded.
#[must_use]
pub fn compose(input: &LetterInput<'_>) -> String {
    let mut letter = String::from("To,\nMunicipal Office,\n");

    let region: Vec<&str> = [input.district, input.state]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect();
    if !region.is_empty() {
        letter.push_str(&region.join(", "));
        letter.push('\n');
    }

    letter.push_str(&format!(
        "\nSubject: Complaint Regarding {}\n\n\
         Respected Sir/Madam,\n\n\
         I am writing to formally lodge a complaint regarding the following issue:\n\n\
         {}\n\n",
        input.category.label(),
        input.description,
    ));

    if let Some(coordinates) = input.coordinates {
        letter.push_str(&format!(
            "The issue has been observed at the following location:\n\
             Latitude: {:.6}, Longitude: {:.6}\n\n",
            coordinates.lat, coordinates.lng,
        ));
    }

    letter.push_str(&format!(
        "I kindly request your immediate attention and necessary action in resolving this matter.\n\n\
         Yours sincerely,\n\
         {}\n\
         Date: {}\n",
        input.citizen_name.unwrap_or("Citizen"),
        input.date.format("%d/%m/%Y"),
    ));

    letter
}
