use rust_decimal::Decimal;

use crate::features::spots::dtos::SearchQueryDto;
use crate::features::spots::models::ParkingSpot;

/// Renter-facing filter over the cached spots.
///
/// A spot is visible when it is available, its price is at most the ceiling,
/// and (if a search term is set) its address contains the term ignoring case.
/// Store order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotFilter {
    pub max_price: Decimal,
    /// Lowercased search term; `None` when the search box is empty
    search: Option<String>,
}

impl SpotFilter {
    pub fn new(max_price: Decimal, search: Option<&str>) -> Self {
        let search = search
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase());

        Self { max_price, search }
    }

    pub fn matches(&self, spot: &ParkingSpot) -> bool {
        if !spot.is_available || spot.price > self.max_price {
            return false;
        }

        match self.search {
            Some(ref term) => spot.address.to_lowercase().contains(term.as_str()),
            None => true,
        }
    }

    pub fn apply<'a>(&self, spots: &'a [ParkingSpot]) -> Vec<&'a ParkingSpot> {
        spots.iter().filter(|spot| self.matches(spot)).collect()
    }
}

impl From<&SearchQueryDto> for SpotFilter {
    fn from(query: &SearchQueryDto) -> Self {
        Self::new(Decimal::from(query.max_price), query.search.as_deref())
    }
}
