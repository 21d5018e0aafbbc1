//! STIX incident creation feature.
//!
//! Builds an incident, the commune it happened in and the `located-at`
//! relationship between them, then pushes the three as a single STIX 2.1
//! bundle to the threat-intelligence repository.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/incidents` | Build and push an incident bundle |
//! | GET | `/api/incidents/categories` | List incident categories |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{IncidentService, RecordBuilder, SubmissionService, SystemClock};
