use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::{BookingOutcome, NewSpot, SpotRow, SpotStore, StoreError};

struct Table {
    rows: Vec<SpotRow>,
    next_id: i64,
}

/// Process-local `parking_spots` table.
///
/// Keeps insertion order, assigns ids the way an identity column would, and
/// counts full-table reads so callers can observe caching.
pub struct InMemorySpotStore {
    table: RwLock<Table>,
    select_count: AtomicUsize,
    offline: AtomicBool,
}

impl InMemorySpotStore {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    /// Seed with rows as they would already exist in storage
    pub fn with_rows(rows: Vec<SpotRow>) -> Self {
        let next_id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            table: RwLock::new(Table { rows, next_id }),
            select_count: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        }
    }

    #[cfg(test)]
    /// Number of `select_all` calls served so far
    pub fn select_count(&self) -> usize {
        self.select_count.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    /// Make every operation fail with a connection error, as if the store were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub async fn row(&self, id: i64) -> Option<SpotRow> {
        self.table
            .read()
            .await
            .rows
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Connection(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemorySpotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpotStore for InMemorySpotStore {
    async fn select_all(&self) -> Result<Vec<SpotRow>, StoreError> {
        self.check_online()?;
        self.select_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.table.read().await.rows.clone())
    }

    async fn insert(&self, spot: &NewSpot) -> Result<SpotRow, StoreError> {
        self.check_online()?;
        let mut table = self.table.write().await;

        let row = SpotRow {
            id: table.next_id,
            owner_name: spot.owner_name.clone(),
            address: spot.address.clone(),
            price: Some(spot.price),
            lat: Some(spot.lat),
            lng: Some(spot.lng),
            is_available: Some(spot.is_available),
            created_at: Some(Utc::now()),
        };
        table.next_id += 1;
        table.rows.push(row.clone());

        Ok(row)
    }

    async fn mark_booked(&self, id: i64) -> Result<BookingOutcome, StoreError> {
        self.check_online()?;
        let mut table = self.table.write().await;

        match table.rows.iter_mut().find(|r| r.id == id) {
            None => Ok(BookingOutcome::NotFound),
            Some(row) if row.is_available != Some(true) => Ok(BookingOutcome::AlreadyBooked),
            Some(row) => {
                row.is_available = Some(false);
                Ok(BookingOutcome::Booked(row.clone()))
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
