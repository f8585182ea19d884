use std::sync::{Mutex, MutexGuard, PoisonError};

use venuekit_location::Coordinates;

use crate::geocoding::ResolvedPlace;
use crate::reactive::Subscribers;
use crate::{DetectError, LocationSnapshot, UserLocation};

/// Process-wide location state.
#[derive(Debug, Default)]
pub(crate) struct LocationState {
    pub(crate) current: Option<UserLocation>,
    pub(crate) manual_city: Option<String>,
    pub(crate) loading: bool,
    pub(crate) error: Option<DetectError>,
    /// Set by the first successful reverse geocode; never cleared.
    pub(crate) has_geocoded: bool,
}

impl LocationState {
    pub(crate) fn snapshot(&self) -> LocationSnapshot {
        LocationSnapshot {
            location: self.current.clone(),
            error_msg: self.error.map(|e| e.to_string()),
            loading: self.loading,
            manual_city: self.manual_city.clone(),
        }
    }

    /// Seeds the state from persisted values without overwriting anything
    /// already set in this session.
    pub(crate) fn restore(&mut self, city: Option<String>, coordinates: Option<Coordinates>) {
        if self.manual_city.is_none() {
            self.manual_city.clone_from(&city);
        }
        if self.current.is_some() {
            return;
        }
        if let Some(coordinates) = coordinates {
            self.current = Some(UserLocation {
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
                city,
                state: None,
            });
        }
    }

    pub(crate) fn set_manual_city(&mut self, city: String) {
        match &mut self.current {
            Some(current) => current.city = Some(city.clone()),
            None => {
                self.current = Some(UserLocation {
                    latitude: 0.0,
                    longitude: 0.0,
                    city: Some(city.clone()),
                    state: None,
                });
            }
        }
        self.manual_city = Some(city);
    }

    /// Merges a fresh fix and the geocoding outcome into `current`.
    ///
    /// `cached_city` is only consulted when there is no geocoding result.
    /// Returns the city to persist as the manual override, if any.
    pub(crate) fn apply_fix(
        &mut self,
        coordinates: Coordinates,
        place: Option<ResolvedPlace>,
        cached_city: Option<String>,
        forced: bool,
    ) -> Option<String> {
        let previous = self.current.take();
        let mut persist = None;

        let (city, state) = match place {
            None => {
                let (previous_city, previous_state) =
                    previous.map_or((None, None), |p| (p.city, p.state));
                (cached_city.or(previous_city), previous_state)
            }
            Some(place) if place.is_unknown() => (self.manual_city.clone(), place.state),
            Some(place) => {
                if forced {
                    self.manual_city = Some(place.city.clone());
                    persist = Some(place.city.clone());
                }
                (Some(place.city), place.state)
            }
        };

        self.current = Some(UserLocation {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            city,
            state,
        });
        persist
    }
}

/// State plus the subscribers that observe it.
///
/// Snapshots are published while the state lock is held, so subscribers see
/// them in the order the mutations happened. Lock order is state, then
/// subscribers.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    state: Mutex<LocationState>,
    subscribers: Subscribers,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, LocationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn read<T>(&self, f: impl FnOnce(&LocationState) -> T) -> T {
        f(&self.lock())
    }

    /// Applies `f` and publishes the resulting snapshot.
    pub(crate) fn update<T>(&self, f: impl FnOnce(&mut LocationState) -> T) -> T {
        let mut state = self.lock();
        let result = f(&mut state);
        self.subscribers.publish(&state.snapshot());
        result
    }

    pub(crate) fn subscribe(&self) -> async_channel::Receiver<LocationSnapshot> {
        let state = self.lock();
        self.subscribers.subscribe(state.snapshot())
    }

    /// Claims the in-flight slot. Returns `None` if a detection is already running.
    pub(crate) fn begin(&self) -> Option<InFlight<'_>> {
        let mut state = self.lock();
        if state.loading {
            return None;
        }
        state.loading = true;
        state.error = None;
        self.subscribers.publish(&state.snapshot());
        drop(state);
        Some(InFlight { shared: self })
    }
}

/// Clears `loading` when the detection finishes, including when its future is dropped.
#[derive(Debug)]
pub(crate) struct InFlight<'a> {
    shared: &'a Shared,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.shared.update(|state| state.loading = false);
    }
}
