use serde::{Deserialize, Serialize};

use crate::core::error::AppError;
use crate::features::form::models::FormState;
use crate::features::incidents::models::{IncidentCategory, IncidentDraft};
use crate::features::places::models::{Place, PlaceId};
use crate::features::places::services::SearchOutcome;

/// Raw fields posted by the page (or carried in the query string by "search")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub point_of_contact: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub place_id: Option<String>,
}

impl FormInput {
    /// Selected category; the first one when the field was never sent
    pub fn category(&self) -> Result<IncidentCategory, AppError> {
        match self.category.as_deref().filter(|c| !c.is_empty()) {
            None => Ok(IncidentCategory::Cyber),
            Some(raw) => IncidentCategory::parse(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown category '{}'", raw))),
        }
    }

    pub fn place_id(&self) -> Option<PlaceId> {
        self.place_id
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .map(PlaceId)
    }

    pub fn draft(&self) -> Result<IncidentDraft, AppError> {
        Ok(IncidentDraft {
            title: self.title.clone(),
            category: self.category()?,
            description: self.description.clone(),
            point_of_contact: self.point_of_contact.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct PlaceOption {
    pub id: usize,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct SuccessView {
    pub bundle_id: String,
    pub incident_id: String,
    pub location_id: String,
    pub relationship_id: String,
    /// Pretty-printed repository answer
    pub result: String,
}

/// Everything the page template needs
#[derive(Debug, Serialize)]
pub struct FormPage {
    pub state: &'static str,
    pub values: FormInput,
    pub categories: Vec<CategoryOption>,
    pub places: Vec<PlaceOption>,
    pub notice: Option<&'static str>,
    pub notice_level: &'static str,
    pub error: Option<String>,
    pub success: Option<SuccessView>,
}

impl FormPage {
    pub fn new(
        state: &FormState,
        values: FormInput,
        outcome: &SearchOutcome,
        error: Option<String>,
    ) -> Self {
        let selected_category = values.category().unwrap_or(IncidentCategory::Cyber);
        let categories = IncidentCategory::ALL
            .into_iter()
            .map(|c| CategoryOption {
                value: c.label(),
                label: c.display_name(),
                selected: c == selected_category,
            })
            .collect();

        let selected_place = match state {
            FormState::Selected(place) | FormState::Submitting(place) => Some(place.id),
            _ => values.place_id(),
        };
        let places = match outcome {
            SearchOutcome::Results(places) => places
                .iter()
                .map(|p: &Place| PlaceOption {
                    id: p.id.0,
                    label: p.label(),
                    selected: Some(p.id) == selected_place,
                })
                .collect(),
            _ => Vec::new(),
        };

        let notice = match state {
            FormState::Succeeded(_) => None,
            _ => outcome.notice(),
        };
        let notice_level = match outcome {
            SearchOutcome::NoResults => "warning",
            _ => "info",
        };

        let success = match state {
            FormState::Succeeded(receipt) => Some(SuccessView {
                bundle_id: receipt.submission.bundle_id.clone(),
                incident_id: receipt.incident_id.to_string(),
                location_id: receipt.location_id.to_string(),
                relationship_id: receipt.relationship_id.to_string(),
                result: serde_json::to_string_pretty(&receipt.submission.result)
                    .unwrap_or_else(|_| receipt.submission.result.to_string()),
            }),
            _ => None,
        };

        Self {
            state: state.name(),
            values,
            categories,
            places,
            notice,
            notice_level,
            error,
            success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_id_parsing_is_lenient() {
        let mut input = FormInput {
            place_id: Some(" 12 ".to_string()),
            ..Default::default()
        };
        assert_eq!(input.place_id(), Some(PlaceId(12)));

        input.place_id = Some(String::new());
        assert_eq!(input.place_id(), None);

        input.place_id = Some("abc".to_string());
        assert_eq!(input.place_id(), None);
    }

    #[test]
    fn test_category_defaults_and_rejects_unknown() {
        let mut input = FormInput::default();
        assert_eq!(input.category().unwrap(), IncidentCategory::Cyber);

        input.category = Some("Physique".to_string());
        assert_eq!(input.category().unwrap(), IncidentCategory::Physical);

        input.category = Some("Other".to_string());
        assert!(matches!(input.category(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_page_marks_selected_place() {
        let places = vec![
            Place {
                id: PlaceId(4),
                name: "Paris".to_string(),
                postal_code: "75001".to_string(),
            },
            Place {
                id: PlaceId(7),
                name: "Parthenay".to_string(),
                postal_code: "79200".to_string(),
            },
        ];
        let outcome = SearchOutcome::Results(places.clone());
        let state = FormState::Idle
            .search("Par", outcome.clone())
            .select(Some(places[1].clone()));
        let values = FormInput {
            search: "Par".to_string(),
            ..Default::default()
        };

        let page = FormPage::new(&state, values, &outcome, None);

        assert_eq!(page.state, "selected");
        let selected: Vec<usize> = page.places.iter().filter(|p| p.selected).map(|p| p.id).collect();
        assert_eq!(selected, vec![7]);
        assert!(page.notice.is_none());
    }
}
