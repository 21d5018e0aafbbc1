//! Server-side HTML templates.

pub mod engine;

pub use engine::{TemplateError, TemplateRenderer};
