use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Rectangular lat/lon range used to discard out-of-region rows.
///
/// Bounds are exclusive on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFence {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoFence {
    /// Greater Bangalore, roughly. Keeps the map from zooming out to the whole world.
    pub const BANGALORE: GeoFence = GeoFence {
        min_lat: 12.8,
        max_lat: 13.3,
        min_lon: 77.4,
        max_lon: 77.8,
    };

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat > self.min_lat && lat < self.max_lat && lon > self.min_lon && lon < self.max_lon
    }

    /// Midpoint of the fence, used to centre the map
    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

impl Default for GeoFence {
    fn default() -> Self {
        Self::BANGALORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_contains_city_centre() {
        assert!(GeoFence::BANGALORE.contains(12.9716, 77.5946));
    }

    #[test]
    fn test_fence_bounds_are_exclusive() {
        let fence = GeoFence::BANGALORE;
        assert!(!fence.contains(12.8, 77.6));
        assert!(!fence.contains(13.3, 77.6));
        assert!(!fence.contains(13.0, 77.4));
        assert!(!fence.contains(13.0, 77.8));
    }

    #[test]
    fn test_fence_rejects_other_cities() {
        // Mumbai
        assert!(!GeoFence::BANGALORE.contains(19.0760, 72.8777));
        // Null island
        assert!(!GeoFence::BANGALORE.contains(0.0, 0.0));
    }
}
