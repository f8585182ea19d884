//! Reverse geocoding.
//!
//! Turns coordinates into [`Address`] records. The [`ReverseGeocoder`] trait is
//! the seam the location service depends on; [`NominatimGeocoder`] is an HTTP
//! implementation against any Nominatim-compatible endpoint.

#![warn(missing_docs)]

mod nominatim;

use std::future::Future;
use std::sync::Arc;

pub use nominatim::{NominatimConfig, NominatimGeocoder};

/// One address record returned by a reverse geocode.
///
/// Every field is optional because providers fill in different subsets
/// depending on the area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// City, town or village.
    pub city: Option<String>,
    /// District within a city.
    pub district: Option<String>,
    /// County or similar administrative area below the region.
    pub subregion: Option<String>,
    /// Name of the place itself (building, landmark, street).
    pub name: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// State or region.
    pub region: Option<String>,
    /// Country.
    pub country: Option<String>,
}

/// Errors that can occur while reverse geocoding.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The request could not be sent or the body could not be read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The provider answered with a non-success status.
    #[error("geocoder responded with status {0}")]
    Status(u16),
    /// The response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Resolves coordinates into address records.
pub trait ReverseGeocoder: Send + Sync {
    /// Look up the addresses at the given coordinates.
    ///
    /// An empty list means the provider knows nothing about the location.
    fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<Vec<Address>, GeocodeError>> + Send;
}

impl<T: ReverseGeocoder> ReverseGeocoder for Arc<T> {
    fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<Vec<Address>, GeocodeError>> + Send {
        (**self).reverse_geocode(latitude, longitude)
    }
}
