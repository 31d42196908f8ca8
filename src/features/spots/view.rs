//! Page state and its pure rendering.
//!
//! Every request builds a [`ViewState`] from the current data and user input,
//! then [`render`] turns it into a [`PageView`] that the template only formats.
//! Re-rendering after an action is simply building a fresh state.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::features::spots::dtos::{CreateSpotDto, ResolutionStatus, SearchQueryDto};
use crate::features::spots::models::ParkingSpot;
use crate::features::spots::services::{AddressResolution, SpotFilter, SpotSnapshot};
use crate::shared::constants::{
    DEFAULT_LISTING_LAT, DEFAULT_LISTING_LON, DEFAULT_LISTING_PRICE, MAX_PRICE_CEILING,
    MIN_PRICE_CEILING,
};
use crate::shared::geo::{Coordinates, GeoFence};

pub const PAGE_TITLE: &str = "ParkPal: Find a Spot in Bangalore";
pub const EMPTY_STORE_MESSAGE: &str = "No spots available right now. Be the first to list one!";
pub const NO_MATCH_MESSAGE: &str = "No spots match your search. Try changing the price or location.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Outcome carried across the redirect that follows a successful action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Listed,
    Booked,
}

impl Flash {
    /// Unknown codes are ignored rather than rejected
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "listed" => Some(Flash::Listed),
            "booked" => Some(Flash::Booked),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Flash::Listed => "listed",
            Flash::Booked => "booked",
        }
    }

    pub fn notice(self) -> Notice {
        match self {
            Flash::Listed => Notice::success("Spot listed successfully!"),
            Flash::Booked => Notice::success("Booked!"),
        }
    }
}

/// What the owner currently has in the listing form
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFormState {
    pub owner_name: String,
    pub address: String,
    pub price: f64,
    pub coordinates: Coordinates,
    pub resolution: Option<AddressResolution>,
}

impl Default for ListingFormState {
    fn default() -> Self {
        Self {
            owner_name: String::new(),
            address: String::new(),
            price: f64::from(DEFAULT_LISTING_PRICE),
            coordinates: Coordinates::new(DEFAULT_LISTING_LAT, DEFAULT_LISTING_LON),
            resolution: None,
        }
    }
}

impl ListingFormState {
    /// Form pre-filled from an address lookup
    pub fn resolved(address: &str, resolution: AddressResolution) -> Self {
        Self {
            address: address.to_string(),
            coordinates: resolution.coordinates,
            resolution: Some(resolution),
            ..Self::default()
        }
    }

    /// Form refilled with a rejected submission so the owner can resubmit
    pub fn from_submission(dto: &CreateSpotDto) -> Self {
        Self {
            owner_name: dto.owner_name.clone(),
            address: dto.address.clone(),
            price: dto.price,
            coordinates: Coordinates::new(dto.lat, dto.lon),
            resolution: None,
        }
    }
}

/// Everything the page depends on
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub snapshot: SpotSnapshot,
    pub query: SearchQueryDto,
    pub form: ListingFormState,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub title: &'static str,
    pub notices: Vec<Notice>,
    /// Appended to page actions so they land back on the current search
    pub return_query: String,
    pub form: ListingFormView,
    /// Absent when there is nothing at all to search
    pub renter: Option<RenterPanel>,
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingFormView {
    pub owner_name: String,
    pub address: String,
    pub price: f64,
    pub lat: String,
    pub lon: String,
    pub resolution: Option<Notice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenterPanel {
    pub search: String,
    pub max_price: u32,
    pub price_min: u32,
    pub price_max: u32,
    pub caption: String,
    pub map: MapView,
    pub rows: Vec<SpotRowView>,
    pub no_match_message: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpotRowView {
    pub id: i64,
    pub address: String,
    pub owner_name: String,
    pub price: String,
}

fn format_price(price: Decimal) -> String {
    format!("₹{}", price.normalize())
}

fn render_form(form: &ListingFormState) -> ListingFormView {
    let resolution = form.resolution.map(|r| match r.status {
        ResolutionStatus::Found => Notice::success(r.message()),
        ResolutionStatus::NotFound | ResolutionStatus::Error => Notice::warning(r.message()),
    });

    ListingFormView {
        owner_name: form.owner_name.clone(),
        address: form.address.clone(),
        price: form.price,
        lat: format!("{:.4}", form.coordinates.lat),
        lon: format!("{:.4}", form.coordinates.lon),
        resolution,
    }
}

fn render_map(visible: &[&ParkingSpot]) -> MapView {
    let markers: Vec<MapMarker> = visible
        .iter()
        .map(|s| MapMarker {
            lat: s.lat,
            lon: s.lon,
            label: format!("{} ({}/hr)", s.address, format_price(s.price)),
        })
        .collect();

    let center = if markers.is_empty() {
        GeoFence::BANGALORE.center()
    } else {
        let n = markers.len() as f64;
        Coordinates::new(
            markers.iter().map(|m| m.lat).sum::<f64>() / n,
            markers.iter().map(|m| m.lon).sum::<f64>() / n,
        )
    };

    MapView { center, markers }
}

fn render_renter(state: &ViewState) -> RenterPanel {
    let filter = SpotFilter::from(&state.query);
    let visible = filter.apply(&state.snapshot.spots);

    let rows = visible
        .iter()
        .map(|s| SpotRowView {
            id: s.id,
            address: s.address.clone(),
            owner_name: s.owner_name.clone(),
            price: format_price(s.price),
        })
        .collect();

    RenterPanel {
        search: state.query.search.clone().unwrap_or_default(),
        max_price: state.query.max_price,
        price_min: MIN_PRICE_CEILING,
        price_max: MAX_PRICE_CEILING,
        caption: format!("Found {} spots matching your criteria.", visible.len()),
        map: render_map(&visible),
        rows,
        no_match_message: visible.is_empty().then_some(NO_MATCH_MESSAGE),
    }
}

/// Compute the page from state. No I/O.
pub fn render(state: &ViewState) -> PageView {
    let mut notices = state.notices.clone();
    if let Some(ref warning) = state.snapshot.warning {
        notices.push(Notice::error(warning.clone()));
    }

    let has_spots = !state.snapshot.spots.is_empty();

    PageView {
        title: PAGE_TITLE,
        notices,
        return_query: state.query.to_query_string(),
        form: render_form(&state.form),
        renter: has_spots.then(|| render_renter(state)),
        empty_message: (!has_spots).then_some(EMPTY_STORE_MESSAGE),
    }
}
