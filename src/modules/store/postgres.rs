use async_trait::async_trait;
use sqlx::PgPool;

use super::{BookingOutcome, NewSpot, SpotRow, SpotStore, StoreError};

/// `parking_spots` accessed directly over a Postgres connection pool
pub struct PgSpotStore {
    pool: PgPool,
}

impl PgSpotStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpotStore for PgSpotStore {
    async fn select_all(&self) -> Result<Vec<SpotRow>, StoreError> {
        let rows = sqlx::query_as::<_, SpotRow>(
            r#"
            SELECT id, owner_name, address, price, lat, lng, is_available, created_at
            FROM parking_spots
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list parking spots: {:?}", e);
            StoreError::Database(e)
        })?;

        Ok(rows)
    }

    async fn insert(&self, spot: &NewSpot) -> Result<SpotRow, StoreError> {
        let row = sqlx::query_as::<_, SpotRow>(
            r#"
            INSERT INTO parking_spots (owner_name, address, price, lat, lng, is_available)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_name, address, price, lat, lng, is_available, created_at
            "#,
        )
        .bind(&spot.owner_name)
        .bind(&spot.address)
        .bind(spot.price)
        .bind(spot.lat)
        .bind(spot.lng)
        .bind(spot.is_available)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert parking spot: {:?}", e);
            StoreError::Database(e)
        })?;

        Ok(row)
    }

    async fn mark_booked(&self, id: i64) -> Result<BookingOutcome, StoreError> {
        let updated = sqlx::query_as::<_, SpotRow>(
            r#"
            UPDATE parking_spots
            SET is_available = FALSE
            WHERE id = $1 AND is_available = TRUE
            RETURNING id, owner_name, address, price, lat, lng, is_available, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to book parking spot {}: {:?}", id, e);
            StoreError::Database(e)
        })?;

        if let Some(row) = updated {
            return Ok(BookingOutcome::Booked(row));
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM parking_spots WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if exists {
            Ok(BookingOutcome::AlreadyBooked)
        } else {
            Ok(BookingOutcome::NotFound)
        }
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
