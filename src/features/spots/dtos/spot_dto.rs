use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::spots::models::ParkingSpot;
use crate::modules::store::NewSpot;
use crate::shared::constants::{DEFAULT_PRICE_CEILING, MAX_PRICE_CEILING, MIN_PRICE_CEILING};

/// Response DTO for a parking spot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpotResponseDto {
    pub id: i64,
    pub owner_name: String,
    pub address: String,
    /// Price per hour
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub lat: f64,
    pub lon: f64,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&ParkingSpot> for SpotResponseDto {
    fn from(s: &ParkingSpot) -> Self {
        Self {
            id: s.id,
            owner_name: s.owner_name.clone(),
            address: s.address.clone(),
            price: s.price,
            lat: s.lat,
            lon: s.lon,
            is_available: s.is_available,
            created_at: s.created_at,
        }
    }
}

/// Request DTO for listing a new spot.
///
/// Accepted both as JSON (`/api/spots`) and as an urlencoded form (`/listings`).
/// Coordinates are whatever the owner settled on: geocoded, default, or typed in.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSpotDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub owner_name: String,

    #[validate(length(min = 1, max = 500, message = "Address must be 1-500 characters"))]
    pub address: String,

    /// Price per hour
    #[validate(range(min = 0.0, max = 100000.0, message = "Price must be between 0 and 100000"))]
    pub price: f64,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lon: f64,
}

impl CreateSpotDto {
    /// Validate and build the insert payload. New listings are always available.
    pub fn into_new_spot(self) -> Result<NewSpot> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let price = Decimal::try_from(self.price)
            .map_err(|_| AppError::Validation("Price must be a finite number".to_string()))?
            .round_dp(2);

        Ok(NewSpot {
            owner_name: self.owner_name.trim().to_string(),
            address: self.address.trim().to_string(),
            price,
            lat: self.lat,
            lng: self.lon,
            is_available: true,
        })
    }
}

/// Query params for the renter search
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct SearchQueryDto {
    /// Case-insensitive substring matched against the address
    pub search: Option<String>,

    /// Price ceiling per hour (10-500, default: 100)
    #[serde(default = "default_max_price")]
    #[validate(range(min = 10, max = 500, message = "max_price must be between 10 and 500"))]
    #[param(minimum = 10, maximum = 500)]
    pub max_price: u32,
}

pub fn default_max_price() -> u32 {
    DEFAULT_PRICE_CEILING
}

impl Default for SearchQueryDto {
    fn default() -> Self {
        Self {
            search: None,
            max_price: DEFAULT_PRICE_CEILING,
        }
    }
}

impl SearchQueryDto {
    /// Clamp the ceiling into the slider range instead of rejecting it
    pub fn clamped(mut self) -> Self {
        self.max_price = self.max_price.clamp(MIN_PRICE_CEILING, MAX_PRICE_CEILING);
        self
    }

    /// Encode as a query string, so page actions can come back to the same search
    pub fn to_query_string(&self) -> String {
        let mut query = format!("max_price={}", self.max_price);
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query.push_str("&search=");
            query.push_str(&urlencoding::encode(search));
        }
        query
    }
}

/// Query params for address resolution
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct GeocodeQueryDto {
    /// Free-text address; the city is appended automatically
    #[validate(length(min = 1, max = 500, message = "Address must be 1-500 characters"))]
    pub address: String,
}

/// How an address lookup ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Found,
    NotFound,
    Error,
}

/// Coordinates to pre-fill the listing form with
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressResolutionDto {
    pub lat: f64,
    pub lon: f64,
    pub status: ResolutionStatus,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingResponseDto {
    pub id: i64,
    pub is_available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> CreateSpotDto {
        CreateSpotDto {
            owner_name: "Asha".to_string(),
            address: "Indiranagar Cross".to_string(),
            price: 40.0,
            lat: 12.9784,
            lon: 77.6408,
        }
    }

    #[test]
    fn test_into_new_spot_is_available() {
        let spot = dto().into_new_spot().unwrap();
        assert!(spot.is_available);
        assert_eq!(spot.price, Decimal::from(40));
        assert_eq!(spot.lng, 77.6408);
    }

    #[test]
    fn test_into_new_spot_rounds_price_to_paise() {
        let spot = CreateSpotDto {
            price: 39.999,
            ..dto()
        }
        .into_new_spot()
        .unwrap();
        assert_eq!(spot.price, Decimal::from(40));
    }

    #[test]
    fn test_into_new_spot_rejects_bad_input() {
        let empty_name = CreateSpotDto {
            owner_name: String::new(),
            ..dto()
        };
        assert!(matches!(
            empty_name.into_new_spot(),
            Err(AppError::Validation(_))
        ));

        let negative_price = CreateSpotDto {
            price: -1.0,
            ..dto()
        };
        assert!(negative_price.into_new_spot().is_err());

        let bad_lat = CreateSpotDto {
            lat: 123.0,
            ..dto()
        };
        assert!(bad_lat.into_new_spot().is_err());

        let nan_price = CreateSpotDto {
            price: f64::NAN,
            ..dto()
        };
        assert!(nan_price.into_new_spot().is_err());
    }

    #[test]
    fn test_out_of_region_coordinates_are_still_accepted() {
        // Persisted, just never displayed by the read path
        let mumbai = CreateSpotDto {
            lat: 19.076,
            lon: 72.8777,
            ..dto()
        };
        assert!(mumbai.into_new_spot().is_ok());
    }

    #[test]
    fn test_search_query_validation() {
        let query = SearchQueryDto {
            search: None,
            max_price: 5,
        };
        assert!(query.validate().is_err());
        assert_eq!(query.clamped().max_price, 10);

        let query = SearchQueryDto {
            search: None,
            max_price: 900,
        };
        assert_eq!(query.clamped().max_price, 500);

        assert!(SearchQueryDto::default().validate().is_ok());
    }

    #[test]
    fn test_search_query_string() {
        assert_eq!(SearchQueryDto::default().to_query_string(), "max_price=100");

        let query = SearchQueryDto {
            search: Some("MG Road & Co".to_string()),
            max_price: 250,
        };
        assert_eq!(
            query.to_query_string(),
            "max_price=250&search=MG%20Road%20%26%20Co"
        );
    }
}
