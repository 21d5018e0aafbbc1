mod incident_service;
mod record_builder;
mod submission_service;

pub use incident_service::{IncidentError, IncidentReceipt, IncidentService};
pub use record_builder::{Clock, RecordBuildError, RecordBuilder, SystemClock};
pub use submission_service::{BundleImporter, SubmissionError, SubmissionResult, SubmissionService};
