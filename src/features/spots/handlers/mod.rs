pub mod page_handler;
pub mod spot_handler;

use std::sync::Arc;

use crate::features::spots::services::{BookingService, ListingService, SpotRepository};

pub use page_handler::{book_from_page, create_listing, index};
pub use spot_handler::{
    __path_book_spot, __path_create_spot, __path_geocode_address, __path_list_spots, book_spot,
    create_spot, geocode_address, list_spots,
};

/// Shared state for every spot route
#[derive(Clone)]
pub struct SpotsState {
    pub repository: Arc<SpotRepository>,
    pub listing: Arc<ListingService>,
    pub booking: Arc<BookingService>,
}
