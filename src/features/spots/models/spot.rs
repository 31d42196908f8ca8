use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::modules::store::SpotRow;

/// A displayable parking spot.
///
/// Unlike [`SpotRow`], both coordinates are present and longitude uses the
/// canonical `lon` name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingSpot {
    pub id: i64,
    pub owner_name: String,
    pub address: String,
    pub price: Decimal,
    pub lat: f64,
    pub lon: f64,
    pub is_available: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl ParkingSpot {
    /// Normalize a stored row, or `None` if it is missing either coordinate,
    /// its price or its availability flag
    pub fn from_row(row: SpotRow) -> Option<Self> {
        let (Some(lat), Some(lon)) = (row.lat, row.lng) else {
            return None;
        };
        let (Some(price), Some(is_available)) = (row.price, row.is_available) else {
            return None;
        };

        Some(Self {
            id: row.id,
            owner_name: row.owner_name,
            address: row.address,
            price,
            lat,
            lon,
            is_available,
            created_at: row.created_at,
        })
    }
}
