use axum::{
    routing::{get, post},
    Router,
};

use crate::features::spots::handlers::{self, SpotsState};

/// Create routes for the spots feature: the HTML page and the JSON API
///
/// Note: This feature is public (no authentication required)
pub fn routes(state: SpotsState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/listings", post(handlers::create_listing))
        .route("/spots/{id}/book", post(handlers::book_from_page))
        .route(
            "/api/spots",
            get(handlers::list_spots).post(handlers::create_spot),
        )
        .route("/api/spots/{id}/book", post(handlers::book_spot))
        .route("/api/geocode", get(handlers::geocode_address))
        .with_state(state)
}
