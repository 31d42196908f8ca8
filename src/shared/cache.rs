use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

struct CacheState<T> {
    entry: Option<CacheEntry<T>>,
    /// Bumped on every invalidation
    generation: u64,
}

/// Result of [`TtlCache::lookup`]
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Hit(T),
    /// Nothing fresh; pass the generation back to [`TtlCache::put`]
    Miss(u64),
}

/// Single-entry cache whose value expires `ttl` after it was stored.
///
/// There is no key: the entry is either fresh, stale, or absent. Writers that
/// change the underlying data must call [`TtlCache::invalidate`] so the next
/// read refetches instead of serving a stale value for the rest of the window.
///
/// A value fetched before an invalidation is never stored after it: `put`
/// only accepts values tagged with the generation observed at the miss.
pub struct TtlCache<T> {
    state: RwLock<CacheState<T>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entry: None,
                generation: 0,
            }),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value if it is still within the TTL window, otherwise the
    /// current generation
    pub async fn lookup(&self) -> CacheLookup<T> {
        let state = self.state.read().await;
        match state.entry {
            Some(ref cached) if cached.stored_at.elapsed() < self.ttl => {
                CacheLookup::Hit(cached.value.clone())
            }
            _ => CacheLookup::Miss(state.generation),
        }
    }

    /// Store `value` unless the cache was invalidated since `generation` was
    /// read. Returns whether the value was stored.
    pub async fn put(&self, generation: u64, value: T) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(
                "Discarding value fetched at generation {} (now {})",
                generation,
                state.generation
            );
            return false;
        }

        state.entry = Some(CacheEntry {
            value,
            stored_at: Instant::now(),
        });
        true
    }

    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.generation = state.generation.wrapping_add(1);
        if state.entry.take().is_some() {
            tracing::debug!("Cache entry invalidated");
        }
    }
}
