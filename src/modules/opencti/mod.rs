//! OpenCTI repository adapter.
//!
//! Implements the bundle import seam used by the incident feature on top of
//! the OpenCTI GraphQL API.

mod client;

pub use client::OpenCtiClient;
