//! Device geolocation.
//!
//! This crate defines the [`GeolocationProvider`] seam used by the location
//! service, and [`SystemGeolocation`], which reads the position from GeoClue2
//! on Linux and the WinRT geolocator on Windows.

#![warn(missing_docs)]

/// Platform-specific implementations.
pub mod sys;

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;
use serde::{Deserialize, Serialize};

pub use venuekit_permission::{Permission, PermissionStatus};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A position fix reported by a [`GeolocationProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Where the device is.
    pub coordinates: Coordinates,
    /// Horizontal accuracy in meters, if available.
    pub accuracy_meters: Option<f64>,
    /// Timestamp as Unix epoch milliseconds.
    pub timestamp: u64,
}

impl Position {
    /// Creates a position without accuracy information, stamped with the current time.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinates: Coordinates::new(latitude, longitude),
            accuracy_meters: None,
            timestamp: timestamp_now(),
        }
    }
}

/// Accuracy/power tradeoff requested for a fresh fix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accuracy {
    /// Country level.
    Lowest,
    /// City level.
    Low,
    /// Neighborhood level, the usual choice for listing nearby venues.
    #[default]
    Balanced,
    /// Street level.
    High,
    /// Best the hardware can do.
    Highest,
}

/// Errors that can occur when accessing location.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    /// Location permission was not granted.
    #[error("location permission denied")]
    PermissionDenied,
    /// Location services are disabled on the device.
    #[error("location services disabled")]
    ServiceDisabled,
    /// Location is not available.
    #[error("location not available")]
    NotAvailable,
    /// An unknown error occurred.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Source of device positions.
///
/// Implementations decide how long a fresh fix may take; callers impose no
/// timeout of their own.
pub trait GeolocationProvider: Send + Sync {
    /// Ask for permission to read the location while the app is in the foreground.
    fn request_foreground_permission(
        &self,
    ) -> impl Future<Output = Result<PermissionStatus, LocationError>> + Send;

    /// Return a previously obtained fix without starting a new one.
    fn last_known_position(
        &self,
    ) -> impl Future<Output = Result<Option<Position>, LocationError>> + Send;

    /// Obtain a fresh fix.
    fn current_position(
        &self,
        accuracy: Accuracy,
    ) -> impl Future<Output = Result<Position, LocationError>> + Send;
}

impl<T: GeolocationProvider> GeolocationProvider for Arc<T> {
    fn request_foreground_permission(
        &self,
    ) -> impl Future<Output = Result<PermissionStatus, LocationError>> + Send {
        (**self).request_foreground_permission()
    }

    fn last_known_position(
        &self,
    ) -> impl Future<Output = Result<Option<Position>, LocationError>> + Send {
        (**self).last_known_position()
    }

    fn current_position(
        &self,
        accuracy: Accuracy,
    ) -> impl Future<Output = Result<Position, LocationError>> + Send {
        (**self).current_position(accuracy)
    }
}

/// Geolocation backed by the operating system.
///
/// The platform APIs have no "last known" query, so the most recent fix this
/// instance produced is kept in memory and served from
/// [`GeolocationProvider::last_known_position`].
#[derive(Debug, Default)]
pub struct SystemGeolocation {
    last_fix: Mutex<Option<Position>>,
}

impl SystemGeolocation {
    /// Creates a provider with no remembered fix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl GeolocationProvider for SystemGeolocation {
    async fn request_foreground_permission(&self) -> Result<PermissionStatus, LocationError> {
        venuekit_permission::request(Permission::ForegroundLocation)
            .await
            .map_err(|e| LocationError::Unknown(e.to_string()))
    }

    async fn last_known_position(&self) -> Result<Option<Position>, LocationError> {
        Ok(self
            .last_fix
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn current_position(&self, accuracy: Accuracy) -> Result<Position, LocationError> {
        let position = sys::get_position(accuracy).await?;
        debug!(
            "system fix at {:.4},{:.4} (accuracy {:?})",
            position.coordinates.latitude, position.coordinates.longitude, position.accuracy_meters
        );
        *self
            .last_fix
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(position.clone());
        Ok(position)
    }
}

pub(crate) fn timestamp_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
