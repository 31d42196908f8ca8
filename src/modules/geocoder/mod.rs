//! Address to coordinate lookup.
//!
//! Geocoding is advisory: a miss or a failed request must never block a
//! listing. [`GeocodeOutcome`] keeps the two apart for logging, while
//! [`GeocodeOutcome::coordinates`] gives callers the collapsed view.

mod nominatim;

pub use nominatim::NominatimGeocoder;

use async_trait::async_trait;

use crate::shared::geo::Coordinates;

#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Found(Coordinates),
    /// The service answered but had no match
    NotFound,
    /// The lookup itself failed (network, status, or unparseable body)
    Failed(String),
}

impl GeocodeOutcome {
    /// `None` for both a miss and a failure
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            GeocodeOutcome::Found(coords) => Some(*coords),
            GeocodeOutcome::NotFound | GeocodeOutcome::Failed(_) => None,
        }
    }
}

/// Single-attempt, uncached address lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> GeocodeOutcome;
}
