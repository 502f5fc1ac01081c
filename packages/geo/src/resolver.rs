//! Device position acquisition with a bounded timeout and fixed fallback.
//!
//! The position source is abstracted behind [`LocationProvider`] so the
//! acquisition logic (and everything downstream of it) can be exercised
//! without device access. Whatever the outcome — granted, denied,
//! unsupported, or timed out — acquisition terminates within the timeout
//! bound and always yields usable coordinates.

use std::time::Duration;

use async_trait::async_trait;
use samadhan_report_models::Coordinates;

use crate::{GeoStatus, PositionError};

/// Upper bound on a single position acquisition.
pub const POSITION_TIMEOUT: Duration = Duration::from_secs(10);

/// A source of device coordinates.
///
/// Implementations should return promptly with [`PositionError`] when the
/// capability is missing or denied; the timeout in [`acquire`] only guards
/// against sources that hang.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Obtains the current device position, high accuracy preferred.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] if access is denied, no source exists, or
    /// the source fails to produce a fix.
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}

/// Outcome of a position acquisition: always has coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    /// Device coordinates, or [`Coordinates::FALLBACK`] on error.
    pub coordinates: Coordinates,
    /// [`GeoStatus::Ready`] for a real fix, [`GeoStatus::Error`] otherwise.
    pub status: GeoStatus,
}

/// Acquires the device position, falling back to [`Coordinates::FALLBACK`]
/// on denial, absence, failure, or timeout.
///
/// Never returns an error and never hangs past `timeout`: every outcome is
/// a terminal [`PositionFix`].
pub async fn acquire(provider: &dyn LocationProvider, timeout: Duration) -> PositionFix {
    match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(Ok(coordinates)) => PositionFix {
            coordinates,
            status: GeoStatus::Ready,
        },
        Ok(Err(e)) => {
            log::warn!("Position source failed ({e}), using fallback coordinates");
            fallback_fix()
        }
        Err(_) => {
            log::warn!(
                "Position source timed out after {}s, using fallback coordinates",
                timeout.as_secs()
            );
            fallback_fix()
        }
    }
}

const fn fallback_fix() -> PositionFix {
    PositionFix {
        coordinates: Coordinates::FALLBACK,
        status: GeoStatus::Error,
    }
}

/// A provider for devices with no position source at all.
///
/// Always reports [`PositionError::Unsupported`], so acquisition resolves
/// immediately to the fallback coordinate.
pub struct UnsupportedProvider;

#[async_trait]
impl LocationProvider for UnsupportedProvider {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Err(PositionError::Unsupported)
    }
}

/// A provider that returns a fixed coordinate, for manual entry and tests.
pub struct FixedProvider(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedProvider {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DeniedProvider;

    #[async_trait]
    impl LocationProvider for DeniedProvider {
        async fn current_position(&self) -> Result<Coordinates, PositionError> {
            Err(PositionError::Denied)
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl LocationProvider for HangingProvider {
        async fn current_position(&self) -> Result<Coordinates, PositionError> {
            // Far longer than any acquisition timeout.
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Coordinates::new(0.0, 0.0))
        }
    }

    #[tokio::test]
    async fn granted_yields_ready() {
        let provider = FixedProvider(Coordinates::new(12.9716, 77.5946));
        let fix = acquire(&provider, POSITION_TIMEOUT).await;
        assert_eq!(fix.status, GeoStatus::Ready);
        assert!((fix.coordinates.lat - 12.9716).abs() < 1e-9);
    }

    #[tokio::test]
    async fn denied_yields_error_with_fallback() {
        let fix = acquire(&DeniedProvider, POSITION_TIMEOUT).await;
        assert_eq!(fix.status, GeoStatus::Error);
        assert_eq!(fix.coordinates, Coordinates::FALLBACK);
    }

    #[tokio::test]
    async fn unsupported_yields_error_with_fallback() {
        let fix = acquire(&UnsupportedProvider, POSITION_TIMEOUT).await;
        assert_eq!(fix.status, GeoStatus::Error);
        assert_eq!(fix.coordinates, Coordinates::FALLBACK);
    }

    #[tokio::test(start_paused = true)]
    async fn hang_resolves_to_error_within_bound() {
        let fix = acquire(&HangingProvider, POSITION_TIMEOUT).await;
        assert_eq!(fix.status, GeoStatus::Error);
        assert_eq!(fix.coordinates, Coordinates::FALLBACK);
    }

    #[test]
    fn terminal_statuses() {
        assert!(GeoStatus::Ready.is_terminal());
        assert!(GeoStatus::Error.is_terminal());
        assert!(!GeoStatus::Idle.is_terminal());
        assert!(!GeoStatus::Loading.is_terminal());
    }
}
