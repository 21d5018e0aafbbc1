use crate::features::incidents::services::{IncidentError, IncidentReceipt, RecordBuildError};
use crate::features::places::models::Place;
use crate::features::places::services::SearchOutcome;

/// Where an analyst is in the incident form
///
/// `Idle → Searching → Selected → Submitting → {Succeeded, Failed}`, with
/// `Failed → Idle` so the same or edited inputs can be sent again.
#[derive(Debug, Clone)]
pub enum FormState {
    Idle,
    Searching(SearchOutcome),
    Selected(Place),
    Submitting(Place),
    Succeeded(IncidentReceipt),
    Failed(String),
}

impl FormState {
    pub fn name(&self) -> &'static str {
        match self {
            FormState::Idle => "idle",
            FormState::Searching(_) => "searching",
            FormState::Selected(_) => "selected",
            FormState::Submitting(_) => "submitting",
            FormState::Succeeded(_) => "succeeded",
            FormState::Failed(_) => "failed",
        }
    }

    /// A search was typed. An empty query leaves the form idle.
    pub fn search(self, query: &str, outcome: SearchOutcome) -> Self {
        match self {
            FormState::Idle | FormState::Searching(_) | FormState::Selected(_) => {
                if query.is_empty() {
                    FormState::Idle
                } else {
                    FormState::Searching(outcome)
                }
            }
            other => other,
        }
    }

    /// A place was picked from the search results
    pub fn select(self, place: Option<Place>) -> Self {
        match (self, place) {
            (FormState::Searching(SearchOutcome::Results(_)), Some(place))
            | (FormState::Selected(_), Some(place)) => FormState::Selected(place),
            (state, _) => state,
        }
    }

    /// Start submitting; only a selected place can be submitted
    pub fn submit(self) -> Result<Self, RecordBuildError> {
        match self {
            FormState::Selected(place) => Ok(FormState::Submitting(place)),
            _ => Err(RecordBuildError::MissingSelection),
        }
    }

    /// Record the repository's answer for an in-flight submission
    pub fn complete(self, result: Result<IncidentReceipt, IncidentError>) -> Self {
        match self {
            FormState::Submitting(_) => match result {
                Ok(receipt) => FormState::Succeeded(receipt),
                Err(e) => FormState::Failed(e.to_string()),
            },
            other => other,
        }
    }

    /// Leave a failed submission so the analyst can try again
    pub fn reset(self) -> Self {
        match self {
            FormState::Failed(_) => FormState::Idle,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::incidents::models::StixId;
    use crate::features::incidents::services::{SubmissionError, SubmissionResult};
    use crate::features::places::models::PlaceId;
    use serde_json::json;

    fn paris() -> Place {
        Place {
            id: PlaceId(0),
            name: "Paris".to_string(),
            postal_code: "75001".to_string(),
        }
    }

    fn receipt() -> IncidentReceipt {
        IncidentReceipt {
            incident_id: StixId::generate("incident"),
            location_id: StixId::generate("location"),
            relationship_id: StixId::generate("relationship"),
            submission: SubmissionResult {
                bundle_id: "bundle--1".to_string(),
                result: json!({"ok": true}),
            },
        }
    }

    #[test]
    fn test_happy_path() {
        let state = FormState::Idle
            .search("Par", SearchOutcome::Results(vec![paris()]))
            .select(Some(paris()));
        assert_eq!(state.name(), "selected");

        let state = state.submit().unwrap();
        assert_eq!(state.name(), "submitting");

        let state = state.complete(Ok(receipt()));
        assert_eq!(state.name(), "succeeded");
    }

    #[test]
    fn test_submit_without_selection_fails() {
        for state in [
            FormState::Idle,
            FormState::Searching(SearchOutcome::TypeMore),
            FormState::Searching(SearchOutcome::NoResults),
        ] {
            assert!(matches!(
                state.submit(),
                Err(RecordBuildError::MissingSelection)
            ));
        }
    }

    #[test]
    fn test_cannot_select_without_results() {
        let state = FormState::Idle
            .search("zz", SearchOutcome::NoResults)
            .select(Some(paris()));
        assert_eq!(state.name(), "searching");
    }

    #[test]
    fn test_empty_query_stays_idle() {
        let state = FormState::Idle.search("", SearchOutcome::TypeMore);
        assert_eq!(state.name(), "idle");
    }

    #[test]
    fn test_failure_returns_to_idle() {
        let failed = FormState::Selected(paris())
            .submit()
            .unwrap()
            .complete(Err(SubmissionError::new("timeout").into()));

        match &failed {
            FormState::Failed(message) => assert_eq!(message, "timeout"),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(failed.reset().name(), "idle");
    }
}
