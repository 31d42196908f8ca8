mod spot_dto;

pub use spot_dto::{
    default_max_price, AddressResolutionDto, BookingResponseDto, CreateSpotDto, GeocodeQueryDto,
    ResolutionStatus, SearchQueryDto, SpotResponseDto,
};
