use utoipa::{Modify, OpenApi};

use crate::features::spots::{dtos as spots_dtos, handlers as spots_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Spots
        spots_handlers::list_spots,
        spots_handlers::create_spot,
        spots_handlers::book_spot,
        // Geocoding
        spots_handlers::geocode_address,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Spots
            spots_dtos::SpotResponseDto,
            spots_dtos::CreateSpotDto,
            spots_dtos::BookingResponseDto,
            spots_dtos::AddressResolutionDto,
            spots_dtos::ResolutionStatus,
            ApiResponse<Vec<spots_dtos::SpotResponseDto>>,
            ApiResponse<spots_dtos::SpotResponseDto>,
            ApiResponse<spots_dtos::BookingResponseDto>,
            ApiResponse<spots_dtos::AddressResolutionDto>,
        )
    ),
    tags(
        (name = "spots", description = "Parking spot listings and bookings (public)"),
        (name = "geocoding", description = "Address to coordinate resolution (public)"),
    ),
    info(
        title = "ParkPal API",
        version = "0.1.0",
        description = "API documentation for ParkPal",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_lists_spot_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/spots", "/api/spots/{id}/book", "/api/geocode"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_swagger_info_modifier_overrides_info() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Staging".to_string(),
            version: "9.9.9".to_string(),
            description: "staging docs".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Staging");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("staging docs"));
    }
}
