//! Browser form for analysts.
//!
//! Server-rendered page that searches a commune, collects the incident
//! fields and submits them through the incidents feature. The search runs as
//! a GET on the same page so the typed values survive every round trip.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/` | Render the form, with search results for `?search=` |
//! | POST | `/` | Create the incident and render the outcome |

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::FormContext;
