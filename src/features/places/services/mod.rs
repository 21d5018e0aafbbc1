mod place_index;
mod place_search_service;

pub use place_index::{LoadError, PlaceIndex, TableEncoding};
pub use place_search_service::{PlaceSearchService, SearchOutcome};
