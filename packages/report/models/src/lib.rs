#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Grievance report taxonomy types and API projections.
//!
//! This crate defines the canonical report category and status vocabulary
//! shared across the whole toolkit, the coordinate type with its documented
//! fallback, and the read-only projections (`Complaint`, [`Announcement`])
//! returned by the portal backend. The backend owns these records; this
//! layer only reads them and, for officers, patches `status`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Maximum length of a report description, enforced before submission.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Grievance category a citizen files a report under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportCategory {
    /// Land and revenue disputes.
    Land,
    /// Law and order / public safety.
    Law,
    /// Basic services and infrastructure.
    Infra,
    /// Anything that doesn't fit the above.
    Other,
}

impl ReportCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Land, Self::Law, Self::Infra, Self::Other]
    }

    /// Human-readable label as shown in the portal's category picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Land => "land and revenue",
            Self::Law => "law and order / public safety",
            Self::Infra => "basic services and infra",
            Self::Other => "other",
        }
    }
}

/// Lifecycle status of a filed complaint.
///
/// `resolved` appears in older backend revisions as a synonym for
/// `approved`; it is accepted on deserialization but never emitted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportStatus {
    /// Filed, not yet triaged.
    Pending,
    /// An officer is working on it.
    InProgress,
    /// Accepted and acted upon.
    #[serde(alias = "resolved")]
    #[strum(to_string = "approved", serialize = "resolved")]
    Approved,
    /// Declined.
    #[serde(alias = "completed")]
    #[strum(to_string = "rejected", serialize = "completed")]
    Rejected,
}

impl ReportStatus {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pending, Self::InProgress, Self::Approved, Self::Rejected]
    }

    /// CSS badge classes for this status, matching the portal's styling.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Pending => "bg-yellow-100 text-yellow-700",
            Self::InProgress => "bg-blue-100 text-blue-700",
            Self::Approved => "bg-green-100 text-green-700",
            Self::Rejected => "bg-gray-100 text-gray-700",
        }
    }

    /// Whether an officer may move a complaint from `self` to `next`.
    ///
    /// Triage only moves forward: pending complaints can be picked up or
    /// decided, in-progress complaints can be decided, and decided
    /// complaints are final.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Pending => matches!(next, Self::InProgress | Self::Approved | Self::Rejected),
            Self::InProgress => matches!(next, Self::Approved | Self::Rejected),
            Self::Approved | Self::Rejected => false,
        }
    }

    /// Whether this status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// Priority of an officer announcement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum AnnouncementPriority {
    /// Urgent, surfaced first.
    High,
    /// Default priority.
    Medium,
    /// Informational.
    Low,
}

impl AnnouncementPriority {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::High, Self::Medium, Self::Low]
    }
}

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl Coordinates {
    /// Fallback coordinate used when device position is denied or
    /// unavailable: the centroid of India, matching the portal.
    pub const FALLBACK: Self = Self {
        lat: 20.5937,
        lng: 78.9629,
    };

    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Formats as `"lat, lng"` with six decimal places, the precision the
    /// portal displays and embeds in letters.
    #[must_use]
    pub fn to_fixed6(self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_fixed6())
    }
}

/// A filed complaint as returned by the backend.
///
/// Read-only projection; the backend is authoritative. Officers may PATCH
/// `status`, nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    /// Backend primary key.
    pub id: i64,
    /// Free-text issue description.
    pub description: String,
    /// Grievance category.
    pub category: ReportCategory,
    /// Current triage status.
    pub status: ReportStatus,
    /// Citizen who filed the report, when the backend exposes it.
    #[serde(default)]
    pub citizen: Option<String>,
    /// Resolved street address, if reverse geocoding succeeded at file time.
    #[serde(default)]
    pub address: Option<String>,
    /// Latitude of the reported location.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude of the reported location.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// URL of the attached photo evidence, if any.
    #[serde(default)]
    pub image: Option<String>,
    /// When the report was filed.
    pub created_at: DateTime<Utc>,
}

impl Complaint {
    /// Coordinates of the reported location, when both components exist.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}

/// An officer announcement as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    /// Backend primary key.
    pub id: i64,
    /// Headline.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Publication timestamp.
    pub date: DateTime<Utc>,
    /// Priority.
    pub priority: AnnouncementPriority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_names() {
        assert_eq!(
            serde_json::to_string(&ReportCategory::Infra).unwrap(),
            "\"infra\""
        );
        assert_eq!(ReportCategory::Land.to_string(), "land");
        assert_eq!(
            "law".parse::<ReportCategory>().unwrap(),
            ReportCategory::Law
        );
    }

    #[test]
    fn status_accepts_legacy_resolved() {
        let status: ReportStatus = serde_json::from_str("\"resolved\"").unwrap();
        assert_eq!(status, ReportStatus::Approved);
        // But we always emit the canonical name.
        assert_eq!(
            serde_json::to_string(&ReportStatus::Approved).unwrap(),
            "\"approved\""
        );
    }

    #[test]
    fn status_transitions_move_forward_only() {
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Approved));
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::InProgress));
        assert!(ReportStatus::InProgress.can_transition_to(ReportStatus::Rejected));
        assert!(!ReportStatus::Approved.can_transition_to(ReportStatus::Pending));
        assert!(!ReportStatus::Rejected.can_transition_to(ReportStatus::InProgress));
        for status in ReportStatus::all() {
            assert!(!status.can_transition_to(*status));
        }
    }

    #[test]
    fn approved_badge_is_green() {
        assert_eq!(
            ReportStatus::Approved.badge_class(),
            "bg-green-100 text-green-700"
        );
        assert_eq!(
            ReportStatus::Pending.badge_class(),
            "bg-yellow-100 text-yellow-700"
        );
    }

    #[test]
    fn fallback_is_country_centroid() {
        assert!((Coordinates::FALLBACK.lat - 20.5937).abs() < 1e-9);
        assert!((Coordinates::FALLBACK.lng - 78.9629).abs() < 1e-9);
    }

    #[test]
    fn coordinates_format_six_decimals() {
        let c = Coordinates::new(20.59, 78.96);
        assert_eq!(c.to_fixed6(), "20.590000, 78.960000");
    }

    #[test]
    fn complaint_round_trips_snake_case() {
        let json = serde_json::json!({
            "id": 7,
            "description": "Streetlight broken",
            "category": "infra",
            "status": "pending",
            "citizen": "Arjun",
            "address": "Oak Avenue",
            "latitude": 20.59,
            "longitude": 78.96,
            "image": null,
            "created_at": "2025-09-09T10:30:00Z"
        });
        let complaint: Complaint = serde_json::from_value(json).unwrap();
        assert_eq!(complaint.category, ReportCategory::Infra);
        assert_eq!(complaint.status, ReportStatus::Pending);
        let coords = complaint.coordinates().unwrap();
        assert!((coords.lat - 20.59).abs() < 1e-9);
    }
}
