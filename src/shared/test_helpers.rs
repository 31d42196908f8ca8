use async_trait::async_trait;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::features::spots::handlers::SpotsState;
use crate::features::spots::services::{BookingService, ListingService, SpotRepository};
use crate::modules::geocoder::{GeocodeOutcome, Geocoder};
use crate::modules::store::{InMemorySpotStore, SpotRow};
use crate::shared::cache::TtlCache;
use crate::shared::geo::{Coordinates, GeoFence};

pub fn spot_row(
    id: i64,
    address: &str,
    price: i64,
    lat: Option<f64>,
    lng: Option<f64>,
    is_available: bool,
) -> SpotRow {
    SpotRow {
        id,
        owner_name: Name().fake(),
        address: address.to_string(),
        price: Some(Decimal::from(price)),
        lat,
        lng,
        is_available: Some(is_available),
        created_at: None,
    }
}

/// Row with coordinates inside the Bangalore fence, spread a little by id
pub fn bangalore_row(id: i64, address: &str, price: i64, is_available: bool) -> SpotRow {
    let offset = (id % 10) as f64 * 0.01;
    spot_row(
        id,
        address,
        price,
        Some(12.95 + offset),
        Some(77.55 + offset),
        is_available,
    )
}

/// Geocoder that always answers the same way and records what it was asked
pub struct StubGeocoder {
    outcome: GeocodeOutcome,
    calls: AtomicUsize,
    last_query: Mutex<Option<String>>,
}

impl StubGeocoder {
    fn with_outcome(outcome: GeocodeOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn found(lat: f64, lon: f64) -> Self {
        Self::with_outcome(GeocodeOutcome::Found(Coordinates::new(lat, lon)))
    }

    pub fn not_found() -> Self {
        Self::with_outcome(GeocodeOutcome::NotFound)
    }

    pub fn failing() -> Self {
        Self::with_outcome(GeocodeOutcome::Failed("connection refused".to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, address: &str) -> GeocodeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(address.to_string());
        self.outcome.clone()
    }
}

/// Fully wired spot feature over an in-memory store
pub struct TestApp {
    pub store: Arc<InMemorySpotStore>,
    pub geocoder: Arc<StubGeocoder>,
    pub repository: Arc<SpotRepository>,
    pub listing: Arc<ListingService>,
    pub booking: Arc<BookingService>,
}

impl TestApp {
    pub fn state(&self) -> SpotsState {
        SpotsState {
            repository: Arc::clone(&self.repository),
            listing: Arc::clone(&self.listing),
            booking: Arc::clone(&self.booking),
        }
    }
}

pub fn test_app(rows: Vec<SpotRow>, geocoder: StubGeocoder) -> TestApp {
    test_app_with_store(Arc::new(InMemorySpotStore::with_rows(rows)), geocoder)
}

pub fn test_app_with_store(store: Arc<InMemorySpotStore>, geocoder: StubGeocoder) -> TestApp {
    let geocoder = Arc::new(geocoder);
    let repository = Arc::new(SpotRepository::new(
        store.clone(),
        Arc::new(TtlCache::new(Duration::from_secs(10))),
        GeoFence::BANGALORE,
    ));
    let listing = Arc::new(ListingService::new(
        Arc::clone(&repository),
        geocoder.clone(),
    ));
    let booking = Arc::new(BookingService::new(Arc::clone(&repository)));

    TestApp {
        store,
        geocoder,
        repository,
        listing,
        booking,
    }
}
