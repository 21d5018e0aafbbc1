use crate::features::incidents::models::IncidentCategory;

/// Analyst input for a new incident, before a place is attached
///
/// Content is taken as typed; blank strings are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentDraft {
    pub title: String,
    pub category: IncidentCategory,
    pub description: String,
    pub point_of_contact: String,
}
