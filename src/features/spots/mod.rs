//! Parking spot marketplace: owners list spots, renters search and book them.
//!
//! Served both as a server-rendered page and as a JSON API over the same
//! services, so the two surfaces always agree on what is visible.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/` | No | Listing form, search, map and results |
//! | POST | `/listings` | No | List a spot from the page form |
//! | POST | `/spots/{id}/book` | No | Book a spot from the page |
//! | GET | `/api/spots` | No | Visible spots, filtered |
//! | POST | `/api/spots` | No | List a spot |
//! | POST | `/api/spots/{id}/book` | No | Book a spot |
//! | GET | `/api/geocode` | No | Resolve an address to coordinates |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod view;

pub use handlers::SpotsState;
pub use services::{BookingService, ListingService, SpotCache, SpotRepository};
