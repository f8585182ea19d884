//! Location acquisition for the venue booking app.
//!
//! [`LocationService`] resolves the device position and a human-readable city,
//! caches both in a [`KeyValueStore`](venuekit_storage::KeyValueStore), and calls
//! the reverse geocoder at most once per process unless the user explicitly asks
//! for a fresh detection ("use current location").
//!
//! ```ignore
//! let service = LocationService::new(store, SystemGeolocation::new(), geocoder);
//! service.start().await;
//!
//! let updates = service.subscribe();
//! while let Ok(snapshot) = updates.recv().await {
//!     render(snapshot.display_city());
//! }
//! ```
//!
//! Failures never escape the service: permission denial and a missing fix are
//! reported through [`LocationSnapshot::error_msg`], everything else degrades to
//! the last known state.

#![warn(missing_docs)]

mod cache;
mod config;
mod geocoding;
mod reactive;
mod service;
mod state;

use serde::{Deserialize, Serialize};

pub use config::LocatorConfig;
pub use geocoding::{UNKNOWN_CITY, resolve_city};
pub use service::LocationService;
pub use venuekit_location::{Accuracy, Coordinates};

/// Best-known location of the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Human-readable city name.
    pub city: Option<String>,
    /// State or region name.
    pub state: Option<String>,
}

impl UserLocation {
    /// Whether the coordinates come from a real fix.
    ///
    /// A manually chosen city before any GPS fix is stored at `(0, 0)`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn has_fix(&self) -> bool {
        !(self.latitude == 0.0 && self.longitude == 0.0)
    }

    /// The coordinate pair.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Read-only view of the service state handed to UI consumers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationSnapshot {
    /// Last resolved location.
    pub location: Option<UserLocation>,
    /// Description of the last surfaced failure.
    pub error_msg: Option<String>,
    /// Whether a detection is in flight.
    pub loading: bool,
    /// City explicitly chosen by the user.
    pub manual_city: Option<String>,
}

impl LocationSnapshot {
    /// The city to show: the manual choice wins over the GPS-derived one.
    #[must_use]
    pub fn display_city(&self) -> Option<&str> {
        self.manual_city
            .as_deref()
            .or_else(|| self.location.as_ref().and_then(|l| l.city.as_deref()))
    }
}

/// Failures surfaced to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DetectError {
    /// The user refused location access.
    #[error("Permission to access location was denied")]
    PermissionDenied,
    /// Neither a cached nor a fresh fix could be obtained.
    #[error("Failed to get current location")]
    PositionUnavailable,
}

/// Outcome of a single [`LocationService::detect`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Another detection was in flight; nothing happened.
    AlreadyRunning,
    /// The detection failed; the previous location is kept.
    Failed(DetectError),
    /// A fresh fix was merged into the state.
    Updated(UserLocation),
}
