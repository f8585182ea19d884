//! # Venuekit
//!
//! Client-side location services for the venue booking app.
//!
//! Venuekit resolves the device position and a human-readable city label, caches
//! both across sessions and keeps the expensive reverse-geocoding call to at most
//! once per process unless the user explicitly asks for a fresh detection.
//!
//! ## Features
//!
//! Each concern lives in its own crate and is re-exported behind a feature:
//!
//! - `permission`: Foreground/background location permission handling.
//! - `location`: GPS positions and the system geolocation provider.
//! - `geocode`: Reverse geocoding (coordinates to address records).
//! - `storage`: Persistent key-value storage.
//! - `locator`: The location acquisition service that ties the above together.
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! venuekit = { version = "0.1", features = ["locator"] }
//! ```
//!
//! ```rust,ignore
//! use venuekit::geocode::NominatimGeocoder;
//! use venuekit::location::SystemGeolocation;
//! use venuekit::locator::LocationService;
//! use venuekit::storage::FileStore;
//!
//! async fn boot() {
//!     let store = FileStore::for_app("venuekit").unwrap();
//!     let geocoder = NominatimGeocoder::new(Default::default()).unwrap();
//!     let service = LocationService::new(store, SystemGeolocation::new(), geocoder);
//!     service.start().await;
//!     println!("City: {:?}", service.display_city());
//! }
//! ```

#[cfg(feature = "geocode")]
pub use venuekit_geocode as geocode;

#[cfg(feature = "location")]
pub use venuekit_location as location;

#[cfg(feature = "locator")]
pub use venuekit_locator as locator;

#[cfg(feature = "permission")]
pub use venuekit_permission as permission;

#[cfg(feature = "storage")]
pub use venuekit_storage as storage;
