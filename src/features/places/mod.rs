//! Commune lookup feature.
//!
//! Serves searches over the static commune / postal-code reference table
//! loaded at startup.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/places/search?q=` | Search communes by name or postal code prefix |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{PlaceIndex, PlaceSearchService};
