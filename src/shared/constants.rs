/// Latitude pre-filled in the listing form when no address has been resolved (MG Road)
pub const DEFAULT_LISTING_LAT: f64 = 12.9716;

/// Longitude pre-filled in the listing form when no address has been resolved (MG Road)
pub const DEFAULT_LISTING_LON: f64 = 77.5946;

/// Price pre-filled in the listing form (per hour)
pub const DEFAULT_LISTING_PRICE: u32 = 50;

// =============================================================================
// PRICE FILTER
// =============================================================================

/// Lower bound of the renter price slider
pub const MIN_PRICE_CEILING: u32 = 10;

/// Upper bound of the renter price slider
pub const MAX_PRICE_CEILING: u32 = 500;

/// Price ceiling applied when the renter has not moved the slider
pub const DEFAULT_PRICE_CEILING: u32 = 100;

// =============================================================================
// STORE
// =============================================================================

/// Name of the hosted table holding parking spot listings
pub const SPOTS_TABLE: &str = "parking_spots";
