use std::sync::Arc;

use crate::features::spots::models::ParkingSpot;
use crate::modules::store::{SpotRow, SpotStore};
use crate::shared::cache::{CacheLookup, TtlCache};
use crate::shared::geo::GeoFence;

/// Shown to renters when the full-table read fails
pub const CONNECTIVITY_WARNING: &str = "Network Error: Could not connect to the spot store.";

pub type SpotCache = TtlCache<Arc<Vec<ParkingSpot>>>;

/// Result of a repository read
#[derive(Debug, Clone, Default)]
pub struct SpotSnapshot {
    pub spots: Arc<Vec<ParkingSpot>>,
    /// Set when the store could not be read; `spots` is then empty
    pub warning: Option<String>,
}

/// Read path for parking spots: fetch, clean, geofence, cache.
pub struct SpotRepository {
    store: Arc<dyn SpotStore>,
    cache: Arc<SpotCache>,
    fence: GeoFence,
}

impl SpotRepository {
    pub fn new(store: Arc<dyn SpotStore>, cache: Arc<SpotCache>, fence: GeoFence) -> Self {
        Self {
            store,
            cache,
            fence,
        }
    }

    pub fn store(&self) -> Arc<dyn SpotStore> {
        Arc::clone(&self.store)
    }

    /// All displayable spots, served from cache while the TTL window is open.
    ///
    /// A store failure is not an error here: the snapshot is empty and carries
    /// a warning. Failed reads are not cached, and neither are reads that an
    /// invalidation overtook while they were in flight.
    pub async fn fetch_spots(&self) -> SpotSnapshot {
        let generation = match self.cache.lookup().await {
            CacheLookup::Hit(spots) => {
                tracing::debug!("Serving {} spots from cache", spots.len());
                return SpotSnapshot {
                    spots,
                    warning: None,
                };
            }
            CacheLookup::Miss(generation) => generation,
        };

        let rows = match self.store.select_all().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch spots from {} store: {}",
                    self.store.backend_name(),
                    e
                );
                return SpotSnapshot {
                    spots: Arc::new(Vec::new()),
                    warning: Some(CONNECTIVITY_WARNING.to_string()),
                };
            }
        };

        let spots = Arc::new(Self::clean_rows(rows, &self.fence));
        self.cache.put(generation, Arc::clone(&spots)).await;

        SpotSnapshot {
            spots,
            warning: None,
        }
    }

    /// Drop the cached entry so the next read hits the store
    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }

    /// Drop incomplete rows (either coordinate, the price or the availability
    /// flag missing), rename `lng` to `lon`, then keep only rows inside the
    /// fence. Order is preserved.
    pub fn clean_rows(rows: Vec<SpotRow>, fence: &GeoFence) -> Vec<ParkingSpot> {
        let fetched = rows.len();

        let complete: Vec<ParkingSpot> = rows
            .into_iter()
            .filter_map(ParkingSpot::from_row)
            .collect();
        let complete_count = complete.len();

        let spots: Vec<ParkingSpot> = complete
            .into_iter()
            .filter(|s| fence.contains(s.lat, s.lon))
            .collect();

        tracing::debug!(
            "Cleaned spots: fetched={}, incomplete={}, outside_fence={}, kept={}",
            fetched,
            fetched - complete_count,
            complete_count - spots.len(),
            spots.len()
        );

        spots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::{BookingOutcome, InMemorySpotStore, NewSpot, StoreError};
    use crate::shared::test_helpers::{bangalore_row, spot_row};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Store whose first `select_all` pauses after reading, until released
    struct GatedStore {
        inner: Arc<InMemorySpotStore>,
        gated: AtomicBool,
        fetched: Notify,
        release: Notify,
    }

    impl GatedStore {
        fn new(inner: Arc<InMemorySpotStore>) -> Self {
            Self {
                inner,
                gated: AtomicBool::new(true),
                fetched: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl SpotStore for GatedStore {
        async fn select_all(&self) -> Result<Vec<SpotRow>, StoreError> {
            let rows = self.inner.select_all().await?;
            if self.gated.swap(false, Ordering::SeqCst) {
                self.fetched.notify_one();
                self.release.notified().await;
            }
            Ok(rows)
        }

        async fn insert(&self, spot: &NewSpot) -> Result<SpotRow, StoreError> {
            self.inner.insert(spot).await
        }

        async fn mark_booked(&self, id: i64) -> Result<BookingOutcome, StoreError> {
            self.inner.mark_booked(id).await
        }

        fn backend_name(&self) -> &'static str {
            "gated"
        }
    }

    fn repository(store: Arc<InMemorySpotStore>, ttl: Duration) -> SpotRepository {
        SpotRepository::new(store, Arc::new(TtlCache::new(ttl)), GeoFence::BANGALORE)
    }

    #[test]
    fn test_clean_rows_drops_null_coordinates() {
        let rows = vec![
            spot_row(1, "A", 40, None, Some(77.6), true),
            spot_row(2, "B", 40, Some(12.97), None, true),
            spot_row(3, "C", 40, Some(12.97), Some(77.6), true),
        ];

        let spots = SpotRepository::clean_rows(rows, &GeoFence::BANGALORE);
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].id, 3);
        assert_eq!(spots[0].lon, 77.6);
    }

    #[test]
    fn test_clean_rows_applies_fence() {
        let rows = vec![
            spot_row(1, "Mumbai", 40, Some(19.07), Some(72.87), true),
            spot_row(2, "Edge", 40, Some(12.8), Some(77.6), true),
            spot_row(3, "Inside", 40, Some(12.95), Some(77.55), true),
            spot_row(4, "East", 40, Some(12.95), Some(77.85), true),
        ];

        let spots = SpotRepository::clean_rows(rows, &GeoFence::BANGALORE);
        let ids: Vec<i64> = spots.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3]);

        for spot in &spots {
            assert!(spot.lat > 12.8 && spot.lat < 13.3);
            assert!(spot.lon > 77.4 && spot.lon < 77.8);
        }
    }

    #[test]
    fn test_clean_rows_drops_rows_without_price_or_availability() {
        let mut no_price = bangalore_row(1, "No price", 40, true);
        no_price.price = None;
        let mut no_flag = bangalore_row(2, "No flag", 40, true);
        no_flag.is_available = None;
        let rows = vec![no_price, no_flag, bangalore_row(3, "Complete", 40, true)];

        let spots = SpotRepository::clean_rows(rows, &GeoFence::BANGALORE);
        let ids: Vec<i64> = spots.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[tokio::test]
    async fn test_fetch_within_ttl_hits_store_once() {
        let store = Arc::new(InMemorySpotStore::with_rows(vec![
            bangalore_row(1, "Indiranagar", 40, true),
            bangalore_row(2, "MG Road", 80, true),
        ]));
        let repo = repository(Arc::clone(&store), Duration::from_secs(10));

        let first = repo.fetch_spots().await;
        let second = repo.fetch_spots().await;

        assert_eq!(first.spots, second.spots);
        assert_eq!(first.spots.len(), 2);
        assert_eq!(store.select_count(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let store = Arc::new(InMemorySpotStore::with_rows(vec![bangalore_row(
            1, "A", 40, true,
        )]));
        let repo = repository(Arc::clone(&store), Duration::ZERO);

        repo.fetch_spots().await;
        repo.fetch_spots().await;
        assert_eq!(store.select_count(), 2);
    }

    #[tokio::test]
    async fn test_cache_serves_stale_data_until_invalidated() {
        let store = Arc::new(InMemorySpotStore::with_rows(vec![bangalore_row(
            1, "A", 40, true,
        )]));
        let repo = repository(Arc::clone(&store), Duration::from_secs(10));

        assert!(repo.fetch_spots().await.spots[0].is_available);

        // Mutate behind the repository's back
        store.mark_booked(1).await.unwrap();
        assert!(repo.fetch_spots().await.spots[0].is_available);

        repo.invalidate().await;
        assert!(!repo.fetch_spots().await.spots[0].is_available);
        assert_eq!(store.select_count(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_yields_empty_snapshot_with_warning() {
        let store = Arc::new(InMemorySpotStore::with_rows(vec![bangalore_row(
            1, "A", 40, true,
        )]));
        store.set_offline(true);
        let repo = repository(Arc::clone(&store), Duration::from_secs(10));

        let snapshot = repo.fetch_spots().await;
        assert!(snapshot.spots.is_empty());
        assert_eq!(snapshot.warning.as_deref(), Some(CONNECTIVITY_WARNING));

        // The failure was not cached
        store.set_offline(false);
        let snapshot = repo.fetch_spots().await;
        assert_eq!(snapshot.spots.len(), 1);
        assert!(snapshot.warning.is_none());
    }

    #[tokio::test]
    async fn test_read_overtaken_by_invalidation_is_not_cached() {
        let inner = Arc::new(InMemorySpotStore::with_rows(vec![bangalore_row(
            1, "A", 40, true,
        )]));
        let store = Arc::new(GatedStore::new(Arc::clone(&inner)));
        let repo = Arc::new(SpotRepository::new(
            store.clone(),
            Arc::new(TtlCache::new(Duration::from_secs(10))),
            GeoFence::BANGALORE,
        ));

        let reader = tokio::spawn({
            let repo = Arc::clone(&repo);
            async move { repo.fetch_spots().await }
        });

        // The reader holds rows from before the booking
        store.fetched.notified().await;
        inner.mark_booked(1).await.unwrap();
        repo.invalidate().await;
        store.release.notify_one();

        let in_flight = reader.await.unwrap();
        assert!(in_flight.spots[0].is_available);

        let after = repo.fetch_spots().await;
        assert!(!after.spots[0].is_available);
        assert_eq!(inner.select_count(), 2);
    }
}
