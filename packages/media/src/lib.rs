#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Photo evidence handling for grievance reports.
//!
//! Two acquisition paths feed one output slot:
//!
//! - **File path**: a picked file is validated as a decodable image and
//!   attached as-is ([`attachment::AttachmentSlot::attach_file`]).
//! - **Camera path**: a live [`capture::FrameSource`] yields a raw frame
//!   that is encoded to JPEG and attached
//!   ([`attachment::AttachmentSlot::attach_snapshot`]).
//!
//! A report carries at most one image. Attaching replaces the previous
//! image and releases its preview resource, so there is never more than
//! one outstanding preview handle. The camera source is owned exclusively
//! by one [`capture::CameraSession`] at a time and is released after every
//! snapshot attempt, successful or not.

pub mod attachment;
pub mod capture;

use thiserror::Error;

/// Errors from media acquisition and attachment.
#[derive(Debug, Error)]
pub enum MediaError {
    /// File read or preview write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The picked file is not a usable image.
    #[error("Invalid image: {message}")]
    InvalidImage {
        /// Description of the validation failure.
        message: String,
    },

    /// The camera source was denied or failed to produce a frame.
    #[error("Capture failed: {message}")]
    Capture {
        /// Description of the capture failure.
        message: String,
    },
}

/// Supported attachment encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// JPEG, the camera-path output and most picked files.
    Jpeg,
    /// PNG, accepted on the file path.
    Png,
}

impl ImageKind {
    /// MIME type for multipart submission.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Canonical file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// An in-memory image ready to be attached or submitted.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Encoding of `bytes`.
    pub kind: ImageKind,
    /// File name used for the multipart part and preview.
    pub file_name: String,
}
