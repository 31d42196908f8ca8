pub mod booking_service;
pub mod listing_service;
pub mod spot_filter;
pub mod spot_repository;

pub use booking_service::BookingService;
pub use listing_service::{AddressResolution, ListingService};
pub use spot_filter::SpotFilter;
pub use spot_repository::{SpotCache, SpotRepository, SpotSnapshot};
