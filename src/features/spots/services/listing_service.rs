use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::spots::dtos::{
    AddressResolutionDto, CreateSpotDto, ResolutionStatus, SpotResponseDto,
};
use crate::features::spots::models::ParkingSpot;
use crate::features::spots::services::SpotRepository;
use crate::modules::geocoder::{GeocodeOutcome, Geocoder};
use crate::shared::constants::{DEFAULT_LISTING_LAT, DEFAULT_LISTING_LON};
use crate::shared::geo::Coordinates;

/// Coordinates to pre-fill the listing form with, and how they were obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddressResolution {
    pub coordinates: Coordinates,
    pub status: ResolutionStatus,
}

impl AddressResolution {
    pub fn message(&self) -> &'static str {
        match self.status {
            ResolutionStatus::Found => "Location found! Coordinates updated.",
            ResolutionStatus::NotFound | ResolutionStatus::Error => {
                "Could not find address. Please adjust manually below."
            }
        }
    }
}

impl From<AddressResolution> for AddressResolutionDto {
    fn from(r: AddressResolution) -> Self {
        Self {
            lat: r.coordinates.lat,
            lon: r.coordinates.lon,
            status: r.status,
            message: r.message().to_string(),
        }
    }
}

/// Owner-side flow: resolve an address (advisory) and submit a listing
pub struct ListingService {
    repository: Arc<SpotRepository>,
    geocoder: Arc<dyn Geocoder>,
}

impl ListingService {
    pub fn new(repository: Arc<SpotRepository>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            repository,
            geocoder,
        }
    }

    /// Coordinates used when nothing better is known (MG Road)
    pub fn default_coordinates() -> Coordinates {
        Coordinates::new(DEFAULT_LISTING_LAT, DEFAULT_LISTING_LON)
    }

    /// Look the address up, falling back to the default coordinates on a miss
    /// or a failure. Never fails.
    pub async fn resolve_address(&self, address: &str) -> AddressResolution {
        if address.trim().is_empty() {
            return AddressResolution {
                coordinates: Self::default_coordinates(),
                status: ResolutionStatus::NotFound,
            };
        }

        let outcome = self.geocoder.geocode(address).await;
        let status = match outcome {
            GeocodeOutcome::Found(_) => ResolutionStatus::Found,
            GeocodeOutcome::NotFound => ResolutionStatus::NotFound,
            GeocodeOutcome::Failed(_) => ResolutionStatus::Error,
        };

        AddressResolution {
            coordinates: outcome
                .coordinates()
                .unwrap_or_else(Self::default_coordinates),
            status,
        }
    }

    /// Insert a new, available spot and invalidate the read cache.
    ///
    /// Store failures surface with the store's own error text.
    pub async fn submit(&self, dto: CreateSpotDto) -> Result<SpotResponseDto> {
        let new_spot = dto.into_new_spot()?;
        let store = self.repository.store();

        let row = store.insert(&new_spot).await.map_err(|e| {
            tracing::error!("Failed to list spot at '{}': {}", new_spot.address, e);
            AppError::ExternalServiceError(e.to_string())
        })?;

        self.repository.invalidate().await;

        tracing::info!(
            "Spot listed: id={}, address='{}', price={}",
            row.id,
            row.address,
            new_spot.price
        );

        let spot = ParkingSpot::from_row(row).ok_or_else(|| {
            AppError::Internal("Stored spot came back without coordinates".to_string())
        })?;

        Ok(SpotResponseDto::from(&spot))
    }
}
