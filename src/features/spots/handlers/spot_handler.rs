use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::spots::dtos::{
    AddressResolutionDto, BookingResponseDto, CreateSpotDto, GeocodeQueryDto, SearchQueryDto,
    SpotResponseDto,
};
use crate::features::spots::handlers::SpotsState;
use crate::features::spots::services::SpotFilter;
use crate::shared::types::{ApiResponse, Meta};

/// List available spots
///
/// Returns available spots inside the service area priced at or below `max_price`,
/// optionally narrowed by a case-insensitive address search. When the store is
/// unreachable the list is empty and `message` carries the warning.
#[utoipa::path(
    get,
    path = "/api/spots",
    params(SearchQueryDto),
    responses(
        (status = 200, description = "Visible spots", body = ApiResponse<Vec<SpotResponseDto>>),
        (status = 400, description = "Invalid price ceiling")
    ),
    tag = "spots"
)]
pub async fn list_spots(
    State(state): State<SpotsState>,
    Query(query): Query<SearchQueryDto>,
) -> Result<Json<ApiResponse<Vec<SpotResponseDto>>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let snapshot = state.repository.fetch_spots().await;
    let filter = SpotFilter::from(&query);

    let spots: Vec<SpotResponseDto> = filter
        .apply(&snapshot.spots)
        .into_iter()
        .map(SpotResponseDto::from)
        .collect();
    let total = spots.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(spots),
        snapshot.warning,
        Some(Meta { total }),
    )))
}

/// List a new spot
#[utoipa::path(
    post,
    path = "/api/spots",
    request_body = CreateSpotDto,
    responses(
        (status = 201, description = "Spot listed", body = ApiResponse<SpotResponseDto>),
        (status = 400, description = "Invalid listing"),
        (status = 502, description = "Spot store rejected the insert")
    ),
    tag = "spots"
)]
pub async fn create_spot(
    State(state): State<SpotsState>,
    AppJson(dto): AppJson<CreateSpotDto>,
) -> Result<(StatusCode, Json<ApiResponse<SpotResponseDto>>)> {
    let spot = state.listing.submit(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(spot),
            Some("Spot listed successfully!".to_string()),
            None,
        )),
    ))
}

/// Book a spot
#[utoipa::path(
    post,
    path = "/api/spots/{id}/book",
    params(
        ("id" = i64, Path, description = "Spot ID")
    ),
    responses(
        (status = 200, description = "Spot booked", body = ApiResponse<BookingResponseDto>),
        (status = 404, description = "Spot not found"),
        (status = 409, description = "Spot already booked"),
        (status = 502, description = "Spot store unreachable")
    ),
    tag = "spots"
)]
pub async fn book_spot(
    State(state): State<SpotsState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BookingResponseDto>>> {
    let booking = state.booking.book_spot(id).await?;
    Ok(Json(ApiResponse::success(
        Some(booking),
        Some("Booked!".to_string()),
        None,
    )))
}

/// Resolve an address to coordinates
///
/// Advisory only: a miss or a geocoder failure still answers 200 with the
/// default city-center coordinates and `status` saying what happened.
#[utoipa::path(
    get,
    path = "/api/geocode",
    params(GeocodeQueryDto),
    responses(
        (status = 200, description = "Coordinates to pre-fill", body = ApiResponse<AddressResolutionDto>),
        (status = 400, description = "Missing address")
    ),
    tag = "geocoding"
)]
pub async fn geocode_address(
    State(state): State<SpotsState>,
    Query(query): Query<GeocodeQueryDto>,
) -> Result<Json<ApiResponse<AddressResolutionDto>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let resolution = state.listing.resolve_address(&query.address).await;
    let dto = AddressResolutionDto::from(resolution);
    let message = dto.message.clone();

    Ok(Json(ApiResponse::success(Some(dto), Some(message), None)))
}
