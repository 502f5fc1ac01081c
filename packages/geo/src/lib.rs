#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location services for grievance reports.
//!
//! Two concerns, joined by [`session::LocationSession`]:
//!
//! 1. **Position resolution** — obtaining a coordinate pair from whatever
//!    device position source is available, with a bounded timeout and a
//!    documented fallback (the country centroid) when the source is denied
//!    or unavailable. The source is abstracted behind
//!    [`resolver::LocationProvider`].
//! 2. **Reverse geocoding** — converting a coordinate pair into a
//!    human-readable address via Nominatim, best-effort: any failure
//!    degrades to empty address fields instead of an error.
//!
//! The session guarantees the core invariant: every coordinate change
//! re-resolves the address exactly once, and identical (rounded)
//! coordinates are served from an in-process cache instead of re-querying
//! the service.

pub mod resolver;
pub mod reverse;
pub mod service_registry;
pub mod session;

use thiserror::Error;

/// Tri-state (plus idle) lifecycle of a position acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoStatus {
    /// No acquisition attempted yet.
    Idle,
    /// Waiting on the position source.
    Loading,
    /// Device position obtained.
    Ready,
    /// Position denied, unsupported, or timed out; fallback in effect.
    Error,
}

impl GeoStatus {
    /// Whether acquisition has finished (successfully or not).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }
}

/// Best-effort address parts resolved from a coordinate pair.
///
/// All fields are plain strings; a failed or partial lookup yields empty
/// strings, never an absent field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedAddress {
    /// City, town, or village name.
    pub city: String,
    /// District (county / state district).
    pub district: String,
    /// State name.
    pub state: String,
    /// Full display address line.
    pub display_address: String,
}

impl ResolvedAddress {
    /// Placeholder used when the lookup service fails entirely.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            display_address: "Unknown location".to_string(),
            ..Self::default()
        }
    }
}

/// Errors from reverse geocoding operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Errors from the device position source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    /// The user or platform denied access to the position source.
    #[error("Position access denied")]
    Denied,

    /// No position source exists on this device.
    #[error("No position source available")]
    Unsupported,

    /// The source exists but failed to produce a fix.
    #[error("Position unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}
