//! Compile-time registry of reverse-geocoding service configurations.
//!
//! Each provider is defined in a TOML file under `services/` and embedded
//! at compile time. Only Nominatim ships today; the registry shape leaves
//! room for self-hosted instances.

use std::time::Duration;

use serde::Deserialize;

/// A reverse-geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"nominatim"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether this service is active.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Reverse endpoint base URL.
    pub base_url: String,
    /// Minimum delay between requests in milliseconds.
    pub rate_limit_ms: u64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl GeocodingService {
    /// Minimum delay between live requests.
    #[must_use]
    pub const fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

const fn default_true() -> bool {
    true
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[("nominatim", include_str!("../services/nominatim.toml"))];

/// Returns all reverse-geocoding service configurations.
///
/// # Panics
///
/// Panics if any embedded TOML config is malformed (a compile-time
/// guarantee in practice, exercised by the tests below).
#[must_use]
pub fn all_services() -> Vec<GeocodingService> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse geocoding service '{name}': {e}"))
        })
        .collect()
}

/// Returns the first enabled service, if any.
#[must_use]
pub fn primary_service() -> Option<GeocodingService> {
    all_services().into_iter().find(|s| s.enabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_configs_parse() {
        let services = all_services();
        assert_eq!(services.len(), SERVICE_TOMLS.len());
    }

    #[test]
    fn primary_is_nominatim() {
        let service = primary_service().expect("no enabled service");
        assert_eq!(service.id, "nominatim");
        assert!(service.base_url.ends_with("/reverse"));
        assert_eq!(service.rate_limit(), Duration::from_millis(1000));
        assert_eq!(service.timeout(), Duration::from_secs(15));
    }
}
