//! Typed access to the two persisted values.
//!
//! The city and the coordinates live under separate keys and either may be
//! present without the other.

use venuekit_location::Coordinates;
use venuekit_storage::{KeyValueStore, StorageError};

use crate::LocatorConfig;

#[derive(Debug)]
pub(crate) struct LocationCache<S> {
    store: S,
    city_key: String,
    coordinates_key: String,
}

impl<S: KeyValueStore> LocationCache<S> {
    pub(crate) fn new(store: S, config: &LocatorConfig) -> Self {
        Self {
            store,
            city_key: config.city_key.clone(),
            coordinates_key: config.coordinates_key.clone(),
        }
    }

    pub(crate) async fn read_city(&self) -> Result<Option<String>, StorageError> {
        let city = self.store.get(&self.city_key).await?;
        Ok(city.filter(|c| !c.trim().is_empty()))
    }

    pub(crate) async fn write_city(&self, city: &str) -> Result<(), StorageError> {
        self.store.set(&self.city_key, city).await
    }

    pub(crate) async fn read_coordinates(&self) -> Result<Option<Coordinates>, StorageError> {
        match self.store.get(&self.coordinates_key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn write_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&coordinates)?;
        self.store.set(&self.coordinates_key, &raw).await
    }
}
