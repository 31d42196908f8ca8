use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One row of `parking_spots`, exactly as the store returns it.
///
/// Coordinates, price and availability are optional here; rows missing any of
/// them are filtered out on read but stay in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SpotRow {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub owner_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a new listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSpot {
    pub owner_name: String,
    pub address: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub lat: f64,
    pub lng: f64,
    pub is_available: bool,
}

/// Result of a conditional availability flip
#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    /// The row was available and is now booked
    Booked(SpotRow),
    /// The row exists but someone booked it first
    AlreadyBooked,
    NotFound,
}
