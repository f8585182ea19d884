use std::fmt;

use async_channel::Receiver;
use log::{debug, info, warn};
use venuekit_geocode::ReverseGeocoder;
use venuekit_location::{Coordinates, GeolocationProvider, PermissionStatus};
use venuekit_storage::{KeyValueStore, StorageError};

use crate::cache::LocationCache;
use crate::geocoding::ResolvedPlace;
use crate::state::{LocationState, Shared};
use crate::{DetectError, Detection, LocationSnapshot, LocatorConfig, UserLocation};

/// Resolves and caches the user's location.
///
/// One instance is created at startup and shared with every screen. All
/// collaborators are injected, so tests can build a fresh service with mocks.
///
/// Only one detection runs at a time: a call made while another is in flight
/// returns [`Detection::AlreadyRunning`] without touching anything.
pub struct LocationService<S, G, R> {
    cache: LocationCache<S>,
    gps: G,
    geocoder: R,
    config: LocatorConfig,
    shared: Shared,
}

impl<S, G, R> fmt::Debug for LocationService<S, G, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationService")
            .field("config", &self.config)
            .field("shared", &self.shared)
            .finish_non_exhaustive()
    }
}

impl<S, G, R> LocationService<S, G, R>
where
    S: KeyValueStore,
    G: GeolocationProvider,
    R: ReverseGeocoder,
{
    /// Creates a service with the default storage keys and accuracy.
    pub fn new(store: S, gps: G, geocoder: R) -> Self {
        Self::with_config(store, gps, geocoder, LocatorConfig::default())
    }

    /// Creates a service with explicit settings.
    pub fn with_config(store: S, gps: G, geocoder: R, config: LocatorConfig) -> Self {
        Self {
            cache: LocationCache::new(store, &config),
            gps,
            geocoder,
            config,
            shared: Shared::default(),
        }
    }

    /// The settings this service was built with.
    #[must_use]
    pub const fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Runs the startup sequence: seed the state from the cache, then detect.
    ///
    /// Detection runs even when the cache was populated, so coordinates stay
    /// fresh across sessions.
    pub async fn start(&self) -> Detection {
        self.restore_cache().await;
        self.detect(false).await
    }

    /// Loads the cached city and coordinates into the state.
    ///
    /// Read failures are logged and ignored.
    pub async fn restore_cache(&self) {
        let city = absorb("read cached city", self.cache.read_city().await);
        let coordinates = absorb(
            "read cached coordinates",
            self.cache.read_coordinates().await,
        );
        if city.is_none() && coordinates.is_none() {
            debug!("no cached location");
            return;
        }
        debug!("restored cached location (city: {city:?}, coordinates: {coordinates:?})");
        self.shared.update(|state| state.restore(city, coordinates));
    }

    /// Detects the current location.
    ///
    /// With `forced`, the reverse geocoder is called even if it already ran in
    /// this process, and a resolved city becomes the manual override.
    pub async fn detect(&self, forced: bool) -> Detection {
        let Some(_in_flight) = self.shared.begin() else {
            debug!("location detection already running, ignoring request");
            return Detection::AlreadyRunning;
        };

        match self.acquire(forced).await {
            Ok(location) => Detection::Updated(location),
            Err(err) => {
                warn!("location detection failed: {err}");
                self.shared.update(|state| state.error = Some(err));
                Detection::Failed(err)
            }
        }
    }

    /// Passive detection, as run at startup.
    pub async fn detect_location(&self) -> Detection {
        self.detect(false).await
    }

    /// Forced detection behind the "use current location" action.
    pub async fn detect_and_set_to_current_city(&self) -> Detection {
        self.detect(true).await
    }

    /// Same as [`detect_and_set_to_current_city`](Self::detect_and_set_to_current_city).
    pub async fn detect_and_force_refresh(&self) -> Detection {
        self.detect(true).await
    }

    /// Records a city chosen by the user. No GPS or network call is made.
    ///
    /// Without a prior fix the location becomes `(0, 0)` with this city; see
    /// [`UserLocation::has_fix`].
    pub async fn set_city_manually(&self, city: impl Into<String>) {
        let city = city.into();
        info!("city set manually to {city}");
        self.shared
            .update(|state| state.set_manual_city(city.clone()));
        if let Err(err) = self.cache.write_city(&city).await {
            warn!("failed to persist manual city: {err}");
        }
    }

    /// Current state as one value.
    #[must_use]
    pub fn snapshot(&self) -> LocationSnapshot {
        self.shared.read(LocationState::snapshot)
    }

    /// Last resolved location.
    #[must_use]
    pub fn location(&self) -> Option<UserLocation> {
        self.shared.read(|state| state.current.clone())
    }

    /// Last surfaced failure, cleared when a new detection starts.
    #[must_use]
    pub fn error(&self) -> Option<DetectError> {
        self.shared.read(|state| state.error)
    }

    /// Last surfaced failure as display text.
    #[must_use]
    pub fn error_msg(&self) -> Option<String> {
        self.error().map(|e| e.to_string())
    }

    /// Whether a detection is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.shared.read(|state| state.loading)
    }

    /// City explicitly chosen by the user (or confirmed by a forced detection).
    #[must_use]
    pub fn manual_city(&self) -> Option<String> {
        self.shared.read(|state| state.manual_city.clone())
    }

    /// City to display: the manual choice first, then the GPS-derived city.
    #[must_use]
    pub fn display_city(&self) -> Option<String> {
        self.snapshot().display_city().map(ToOwned::to_owned)
    }

    /// Whether the reverse geocoder has succeeded in this process.
    ///
    /// There is no way to reset this short of restarting the process.
    #[must_use]
    pub fn has_geocoded_this_session(&self) -> bool {
        self.shared.read(|state| state.has_geocoded)
    }

    /// Streams a snapshot after every state change, starting with the current one.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> Receiver<LocationSnapshot> {
        self.shared.subscribe()
    }

    async fn acquire(&self, forced: bool) -> Result<UserLocation, DetectError> {
        let status = self
            .gps
            .request_foreground_permission()
            .await
            .unwrap_or_else(|err| {
                warn!("location permission request failed: {err}");
                PermissionStatus::Denied
            });
        if !status.is_granted() {
            return Err(DetectError::PermissionDenied);
        }

        let coordinates = self
            .acquire_position()
            .await
            .ok_or(DetectError::PositionUnavailable)?;

        if let Err(err) = self.cache.write_coordinates(coordinates).await {
            warn!("failed to persist coordinates: {err}");
        }

        let place = self.reverse_geocode(coordinates, forced).await;
        let cached_city = match place {
            Some(_) => None,
            None => absorb("re-read cached city", self.cache.read_city().await),
        };

        let (location, persist) = self.shared.update(|state| {
            let persist = state.apply_fix(coordinates, place, cached_city, forced);
            (state.current.clone(), persist)
        });

        if let Some(city) = persist {
            if let Err(err) = self.cache.write_city(&city).await {
                warn!("failed to persist detected city: {err}");
            }
        }

        let location = location.ok_or(DetectError::PositionUnavailable)?;
        info!(
            "location updated to {:.4},{:.4} ({:?})",
            location.latitude, location.longitude, location.city
        );
        Ok(location)
    }

    /// Last known fix first, then a fresh one.
    async fn acquire_position(&self) -> Option<Coordinates> {
        match self.gps.last_known_position().await {
            Ok(Some(position)) => return Some(position.coordinates),
            Ok(None) => debug!("no last known position, requesting a fresh fix"),
            Err(err) => debug!("last known position unavailable ({err}), requesting a fresh fix"),
        }

        match self.gps.current_position(self.config.accuracy).await {
            Ok(position) => Some(position.coordinates),
            Err(err) => {
                warn!("failed to get a fresh position: {err}");
                None
            }
        }
    }

    /// Calls the geocoder unless it already succeeded this session and the
    /// detection is not forced.
    async fn reverse_geocode(
        &self,
        coordinates: Coordinates,
        forced: bool,
    ) -> Option<ResolvedPlace> {
        let latched = self.shared.read(|state| state.has_geocoded);
        if latched && !forced {
            debug!("already geocoded this session, skipping reverse geocode");
            return None;
        }

        let addresses = match self
            .geocoder
            .reverse_geocode(coordinates.latitude, coordinates.longitude)
            .await
        {
            Ok(addresses) => addresses,
            Err(err) => {
                warn!("reverse geocoding failed: {err}");
                return None;
            }
        };

        let Some(address) = addresses.first() else {
            debug!("reverse geocoder returned no addresses");
            return None;
        };

        let place = ResolvedPlace::from_address(address);
        self.shared.update(|state| state.has_geocoded = true);
        debug!("reverse geocoded to {} ({:?})", place.city, place.state);
        Some(place)
    }
}

/// Maps a failed cache read to "nothing cached".
fn absorb<T>(what: &str, result: Result<Option<T>, StorageError>) -> Option<T> {
    result.unwrap_or_else(|err| {
        warn!("failed to {what}: {err}");
        None
    })
}
