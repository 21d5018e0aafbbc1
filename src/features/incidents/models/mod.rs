mod category;
mod incident_draft;
mod stix;

pub use category::IncidentCategory;
pub use incident_draft::IncidentDraft;
pub(crate) use stix::spec_version;
pub use stix::{Bundle, Incident, LinkedRecords, Location, Relationship, StixId, StixObject};
