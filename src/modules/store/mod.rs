//! Data store client for the `parking_spots` table.
//!
//! Three operations are used by the application: select every row, insert one
//! row, and flip availability on one row. [`SpotStore`] abstracts over where
//! the table lives:
//!
//! | Backend | Type | Selected by |
//! |---------|------|-------------|
//! | Supabase / PostgREST | [`PostgrestSpotStore`] | `SPOT_STORE_BACKEND=supabase` (default) |
//! | Postgres | [`PgSpotStore`] | `SPOT_STORE_BACKEND=postgres` |
//! | In-process | [`InMemorySpotStore`] | `SPOT_STORE_BACKEND=memory` |

mod memory;
mod postgres;
mod postgrest;
mod types;

pub use memory::InMemorySpotStore;
pub use postgres::PgSpotStore;
pub use postgrest::PostgrestSpotStore;
pub use types::{BookingOutcome, NewSpot, SpotRow};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not reach the spot store: {0}")]
    Connection(String),

    #[error("Spot store returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode spot store response: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Remote table operations used by the application.
///
/// Ids are assigned by the store; callers never generate them.
#[async_trait]
pub trait SpotStore: Send + Sync {
    /// Full-table read, in the store's native order
    async fn select_all(&self) -> Result<Vec<SpotRow>, StoreError>;

    /// Insert one row and return it as stored (with its id)
    async fn insert(&self, spot: &NewSpot) -> Result<SpotRow, StoreError>;

    /// Set `is_available = false` on `id`, only if it is still available.
    ///
    /// Zero affected rows is not an error: the outcome says whether the spot
    /// was already booked or does not exist.
    async fn mark_booked(&self, id: i64) -> Result<BookingOutcome, StoreError>;

    /// Short name used in logs
    fn backend_name(&self) -> &'static str;
}
