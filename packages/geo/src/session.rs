//! Shared location state for one report form instance.
//!
//! [`LocationSession`] owns the current coordinate pair and its resolved
//! address, and enforces the invariant that any coordinate change triggers
//! exactly one address re-resolution. Lookups for a coordinate already
//! resolved in this session (keyed at six decimal places) are served from
//! an in-process cache — both hits and failures are cached, so a marker
//! nudged back to a previous spot never re-queries the service.

use std::collections::HashMap;
use std::time::Instant;

use samadhan_report_models::Coordinates;

use crate::resolver::{self, LocationProvider, POSITION_TIMEOUT};
use crate::service_registry::{self, GeocodingService};
use crate::{GeoError, GeoStatus, ResolvedAddress, reverse};

/// Location state for a single mounted report form.
pub struct LocationSession {
    client: reqwest::Client,
    service: GeocodingService,
    coords: Option<Coordinates>,
    status: GeoStatus,
    address: Option<ResolvedAddress>,
    cache: HashMap<String, ResolvedAddress>,
    last_query: Option<Instant>,
}

impl LocationSession {
    /// Creates a session backed by the primary configured geocoding service.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if no service is enabled or the HTTP client
    /// cannot be constructed.
    pub fn new() -> Result<Self, GeoError> {
        let service = service_registry::primary_service().ok_or_else(|| GeoError::Parse {
            message: "no enabled reverse-geocoding service".to_string(),
        })?;
        Self::with_service(service)
    }

    /// Creates a session backed by an explicit service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the HTTP client cannot be constructed.
    pub fn with_service(service: GeocodingService) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("samadhan/", env!("CARGO_PKG_VERSION")))
            .timeout(service.timeout())
            .build()?;

        Ok(Self {
            client,
            service,
            coords: None,
            status: GeoStatus::Idle,
            address: None,
            cache: HashMap::new(),
            last_query: None,
        })
    }

    /// Acquires the device position and resolves its address.
    ///
    /// On denial, absence, or timeout the session ends in
    /// [`GeoStatus::Error`] holding [`Coordinates::FALLBACK`], and the
    /// fallback coordinate is still reverse geocoded so the form always has
    /// an address line to show.
    pub async fn acquire(&mut self, provider: &dyn LocationProvider) -> GeoStatus {
        self.status = GeoStatus::Loading;
        let fix = resolver::acquire(provider, POSITION_TIMEOUT).await;
        self.status = fix.status;
        self.coords = Some(fix.coordinates);
        self.refresh_address(fix.coordinates).await;
        self.status
    }

    /// Overrides the coordinates (the marker-drag path) and re-resolves
    /// the address exactly once.
    ///
    /// A user-supplied position counts as known, so the status becomes
    /// [`GeoStatus::Ready`] even after an earlier acquisition error.
    pub async fn set_coordinates(&mut self, coords: Coordinates) {
        self.coords = Some(coords);
        self.status = GeoStatus::Ready;
        self.address = None;
        self.refresh_address(coords).await;
    }

    /// Current coordinates, if any acquisition or override happened.
    #[must_use]
    pub const fn coordinates(&self) -> Option<Coordinates> {
        self.coords
    }

    /// Address resolved for the current coordinates.
    #[must_use]
    pub const fn address(&self) -> Option<&ResolvedAddress> {
        self.address.as_ref()
    }

    /// Current acquisition status.
    #[must_use]
    pub const fn status(&self) -> GeoStatus {
        self.status
    }

    /// Resolves the address for `coords`, consulting the cache first.
    async fn refresh_address(&mut self, coords: Coordinates) {
        let key = cache_key(coords);

        if let Some(cached) = self.cache.get(&key) {
            log::debug!("Reverse geocode cache hit for {key}");
            self.address = Some(cached.clone());
            return;
        }

        self.throttle().await;

        let resolved = match reverse::reverse_geocode(&self.client, &self.service.base_url, coords)
            .await
        {
            Ok(addr) => addr,
            Err(e) => {
                log::warn!("Reverse geocoding failed for {key}: {e}");
                ResolvedAddress::unknown()
            }
        };
        self.last_query = Some(Instant::now());

        // Failures are cached too, matching the lookup-once rule.
        self.cache.insert(key, resolved.clone());
        self.address = Some(resolved);
    }

    /// Sleeps out the remainder of the service's rate-limit window.
    async fn throttle(&self) {
        if let Some(last) = self.last_query {
            let elapsed = last.elapsed();
            let limit = self.service.rate_limit();
            if elapsed < limit {
                tokio::time::sleep(limit - elapsed).await;
            }
        }
    }

    #[cfg(test)]
    fn seed_cache(&mut self, coords: Coordinates, address: ResolvedAddress) {
        self.cache.insert(cache_key(coords), address);
    }
}

/// Cache key for a coordinate pair, rounded to six decimal places (the
/// precision the portal displays). Drags that don't move the rounded key
/// are treated as the same location.
fn cache_key(coords: Coordinates) -> String {
    format!("{:.6}:{:.6}", coords.lat, coords.lng)
}
