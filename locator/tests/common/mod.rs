#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use venuekit_geocode::{Address, GeocodeError, ReverseGeocoder};
use venuekit_location::{Accuracy, GeolocationProvider, LocationError, PermissionStatus, Position};
use venuekit_locator::LocationService;
use venuekit_storage::{KeyValueStore, MemoryStore, StorageError};

pub type Service = LocationService<Arc<MockStore>, Arc<MockGps>, Arc<MockGeocoder>>;

pub struct Harness {
    pub store: Arc<MockStore>,
    pub gps: Arc<MockGps>,
    pub geocoder: Arc<MockGeocoder>,
    pub service: Service,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(MockStore::default())
    }

    pub fn with_store(store: MockStore) -> Self {
        let store = Arc::new(store);
        let gps = Arc::new(MockGps::default());
        let geocoder = Arc::new(MockGeocoder::default());
        let service = LocationService::new(store.clone(), gps.clone(), geocoder.clone());
        Self {
            store,
            gps,
            geocoder,
            service,
        }
    }
}

pub fn address(city: &str, region: &str) -> Address {
    Address {
        city: Some(city.to_owned()),
        region: Some(region.to_owned()),
        ..Address::default()
    }
}

pub struct MockGps {
    pub permission: Mutex<Result<PermissionStatus, LocationError>>,
    pub last_known: Mutex<Option<Position>>,
    pub fresh: Mutex<Option<Position>>,
    pub permission_calls: AtomicUsize,
    pub last_known_calls: AtomicUsize,
    pub fresh_calls: AtomicUsize,
    pub requested_accuracy: Mutex<Option<Accuracy>>,
}

impl Default for MockGps {
    fn default() -> Self {
        Self {
            permission: Mutex::new(Ok(PermissionStatus::Granted)),
            last_known: Mutex::new(None),
            fresh: Mutex::new(Some(Position::new(19.07, 72.87))),
            permission_calls: AtomicUsize::new(0),
            last_known_calls: AtomicUsize::new(0),
            fresh_calls: AtomicUsize::new(0),
            requested_accuracy: Mutex::new(None),
        }
    }
}

impl MockGps {
    pub fn deny(&self) {
        *self.permission.lock().unwrap() = Ok(PermissionStatus::Denied);
    }

    pub fn fail_permission_request(&self) {
        *self.permission.lock().unwrap() = Err(LocationError::Unknown("prompt crashed".into()));
    }

    pub fn set_fresh(&self, position: Option<Position>) {
        *self.fresh.lock().unwrap() = position;
    }

    pub fn set_last_known(&self, position: Option<Position>) {
        *self.last_known.lock().unwrap() = position;
    }

    pub fn permission_calls(&self) -> usize {
        self.permission_calls.load(Ordering::SeqCst)
    }

    pub fn position_calls(&self) -> usize {
        self.last_known_calls.load(Ordering::SeqCst) + self.fresh_calls.load(Ordering::SeqCst)
    }
}

impl GeolocationProvider for MockGps {
    async fn request_foreground_permission(&self) -> Result<PermissionStatus, LocationError> {
        self.permission_calls.fetch_add(1, Ordering::SeqCst);
        // Suspend like a real prompt so concurrent callers interleave.
        tokio::task::yield_now().await;
        self.permission.lock().unwrap().clone()
    }

    async fn last_known_position(&self) -> Result<Option<Position>, LocationError> {
        self.last_known_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.last_known.lock().unwrap().clone())
    }

    async fn current_position(&self, accuracy: Accuracy) -> Result<Position, LocationError> {
        self.fresh_calls.fetch_add(1, Ordering::SeqCst);
        *self.requested_accuracy.lock().unwrap() = Some(accuracy);
        tokio::task::yield_now().await;
        self.fresh
            .lock()
            .unwrap()
            .clone()
            .ok_or(LocationError::NotAvailable)
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Addresses(Vec<Address>),
    Status(u16),
}

pub struct MockGeocoder {
    pub reply: Mutex<Reply>,
    pub calls: AtomicUsize,
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self {
            reply: Mutex::new(Reply::Addresses(vec![address("Mumbai", "Maharashtra")])),
            calls: AtomicUsize::new(0),
        }
    }
}

impl MockGeocoder {
    pub fn reply_with(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReverseGeocoder for MockGeocoder {
    async fn reverse_geocode(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Vec<Address>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match self.reply.lock().unwrap().clone() {
            Reply::Addresses(addresses) => Ok(addresses),
            Reply::Status(code) => Err(GeocodeError::Status(code)),
        }
    }
}

/// Memory store that records writes and can be switched to fail every call.
#[derive(Default)]
pub struct MockStore {
    pub inner: MemoryStore,
    pub writes: Mutex<Vec<(String, String)>>,
    pub broken: AtomicBool,
}

impl MockStore {
    pub fn seeded(entries: &[(&str, &str)]) -> Self {
        Self {
            inner: entries.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn broken() -> Self {
        let store = Self::default();
        store.broken.store(true, Ordering::SeqCst);
        store
    }

    pub async fn value(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.unwrap()
    }

    pub fn writes_to(&self, key: &str) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("disk on fire")));
        }
        Ok(())
    }
}

impl KeyValueStore for MockStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.writes
            .lock()
            .unwrap()
            .push((key.to_owned(), value.to_owned()));
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner.remove(key).await
    }
}
