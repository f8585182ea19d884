use serde::{Deserialize, Serialize};
use venuekit_location::Accuracy;

/// Settings for [`LocationService`](crate::LocationService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Storage key of the cached city name.
    pub city_key: String,
    /// Storage key of the cached coordinate pair (JSON object).
    pub coordinates_key: String,
    /// Accuracy requested when a fresh fix is needed.
    pub accuracy: Accuracy,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            city_key: "userCity".to_owned(),
            coordinates_key: "userLocation".to_owned(),
            accuracy: Accuracy::Balanced,
        }
    }
}
