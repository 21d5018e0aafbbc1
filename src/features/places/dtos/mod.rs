mod place_dto;

pub use place_dto::{PlaceResponseDto, PlaceSearchQuery, PlaceSearchResponseDto, SearchStatus};
