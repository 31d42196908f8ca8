use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::spots::dtos::BookingResponseDto;
use crate::features::spots::services::SpotRepository;
use crate::modules::store::BookingOutcome;

/// Renter-side flow: flip a spot to booked, at most once
pub struct BookingService {
    repository: Arc<SpotRepository>,
}

impl BookingService {
    pub fn new(repository: Arc<SpotRepository>) -> Self {
        Self { repository }
    }

    /// Book `id` if it is still available.
    ///
    /// The cache is invalidated whenever the store answered, including when
    /// someone else won the race, so the next read shows the real state.
    pub async fn book_spot(&self, id: i64) -> Result<BookingResponseDto> {
        let store = self.repository.store();

        let outcome = store.mark_booked(id).await.map_err(|e| {
            tracing::error!("Failed to book spot {}: {}", id, e);
            AppError::ExternalServiceError(format!("Booking failed: {}", e))
        })?;

        self.repository.invalidate().await;

        match outcome {
            BookingOutcome::Booked(row) => {
                tracing::info!("Spot booked: id={}, address='{}'", row.id, row.address);
                Ok(BookingResponseDto {
                    id: row.id,
                    is_available: row.is_available.unwrap_or(false),
                })
            }
            BookingOutcome::AlreadyBooked => {
                tracing::info!("Spot {} was already booked", id);
                Err(AppError::Conflict(format!(
                    "Spot {} has already been booked",
                    id
                )))
            }
            BookingOutcome::NotFound => Err(AppError::NotFound(format!("Spot {} not found", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{bangalore_row, test_app, StubGeocoder};

    #[tokio::test]
    async fn test_booking_is_visible_within_ttl() {
        let app = test_app(
            vec![bangalore_row(1, "Indiranagar", 40, true)],
            StubGeocoder::not_found(),
        );

        // Warm the cache
        assert!(app.repository.fetch_spots().await.spots[0].is_available);

        let booked = app.booking.book_spot(1).await.unwrap();
        assert_eq!(booked.id, 1);
        assert!(!booked.is_available);

        let snapshot = app.repository.fetch_spots().await;
        assert!(!snapshot.spots[0].is_available);
        assert_eq!(app.store.select_count(), 2);
    }

    #[tokio::test]
    async fn test_second_booking_conflicts() {
        let app = test_app(
            vec![bangalore_row(1, "Indiranagar", 40, true)],
            StubGeocoder::not_found(),
        );

        tokio_test::assert_ok!(app.booking.book_spot(1).await);
        let err = tokio_test::assert_err!(app.booking.book_spot(1).await);
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unknown_spot_is_not_found() {
        let app = test_app(vec![], StubGeocoder::not_found());
        let err = app.booking.book_spot(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced_not_panicked() {
        let app = test_app(
            vec![bangalore_row(1, "Indiranagar", 40, true)],
            StubGeocoder::not_found(),
        );
        app.store.set_offline(true);

        let err = app.booking.book_spot(1).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));

        app.store.set_offline(false);
        assert_eq!(app.store.row(1).await.unwrap().is_available, Some(true));
    }

    #[tokio::test]
    async fn test_concurrent_bookings_have_one_winner() {
        let app = test_app(
            vec![bangalore_row(1, "Indiranagar", 40, true)],
            StubGeocoder::not_found(),
        );

        let (a, b) = tokio::join!(app.booking.book_spot(1), app.booking.book_spot(1));
        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    }
}
