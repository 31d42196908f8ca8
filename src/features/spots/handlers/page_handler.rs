//! Server-rendered page. Successful actions redirect back to `/` with a
//! notice code; failures re-render the page in place with the error shown.
//! Either way the renter's search rides along in the action's query string.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppForm;
use crate::features::spots::dtos::{default_max_price, CreateSpotDto, SearchQueryDto};
use crate::features::spots::handlers::SpotsState;
use crate::features::spots::view::{self, Flash, ListingFormState, Notice, ViewState};
use crate::shared::templates::render_page;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub search: Option<String>,
    #[serde(default = "default_max_price")]
    pub max_price: u32,
    /// Address to look up for the listing form
    pub address: Option<String>,
    pub notice: Option<String>,
}

async fn render_view(
    state: &SpotsState,
    status: StatusCode,
    query: SearchQueryDto,
    form: ListingFormState,
    notices: Vec<Notice>,
) -> Result<Response> {
    let view_state = ViewState {
        snapshot: state.repository.fetch_spots().await,
        query,
        form,
        notices,
    };

    let html = render_page("index.html", &view::render(&view_state))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((status, Html(html)).into_response())
}

fn redirect_with(flash: Flash, query: &SearchQueryDto) -> Response {
    Redirect::to(&format!(
        "/?notice={}&{}",
        flash.as_str(),
        query.to_query_string()
    ))
    .into_response()
}

async fn render_failure(
    state: &SpotsState,
    err: AppError,
    query: SearchQueryDto,
    form: ListingFormState,
) -> Result<Response> {
    err.log();
    let notice = Notice::error(format!("Error: {}", err.user_message()));
    render_view(state, err.status_code(), query, form, vec![notice]).await
}

pub async fn index(
    State(state): State<SpotsState>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    // An empty lookup box is the same as no lookup
    let address = query.address.as_deref().filter(|a| !a.trim().is_empty());
    let form = match address {
        Some(address) => {
            let resolution = state.listing.resolve_address(address).await;
            ListingFormState::resolved(address, resolution)
        }
        None => ListingFormState::default(),
    };

    let notices = query
        .notice
        .as_deref()
        .and_then(Flash::from_code)
        .map(Flash::notice)
        .into_iter()
        .collect();

    let search = SearchQueryDto {
        search: query.search,
        max_price: query.max_price,
    }
    .clamped();

    render_view(&state, StatusCode::OK, search, form, notices).await
}

pub async fn create_listing(
    State(state): State<SpotsState>,
    Query(query): Query<SearchQueryDto>,
    AppForm(dto): AppForm<CreateSpotDto>,
) -> Result<Response> {
    let query = query.clamped();
    let form = ListingFormState::from_submission(&dto);

    match state.listing.submit(dto).await {
        Ok(_) => Ok(redirect_with(Flash::Listed, &query)),
        Err(err) => render_failure(&state, err, query, form).await,
    }
}

pub async fn book_from_page(
    State(state): State<SpotsState>,
    Path(id): Path<i64>,
    Query(query): Query<SearchQueryDto>,
) -> Result<Response> {
    let query = query.clamped();

    match state.booking.book_spot(id).await {
        Ok(_) => Ok(redirect_with(Flash::Booked, &query)),
        Err(err) => render_failure(&state, err, query, ListingFormState::default()).await,
    }
}
