use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
};

use crate::core::error::Result;
use crate::core::extractor::AppForm;
use crate::features::form::models::{FormInput, FormPage, FormState};
use crate::features::incidents::services::IncidentService;
use crate::features::places::services::{PlaceSearchService, SearchOutcome};
use crate::shared::templates::TemplateRenderer;

const FORM_TEMPLATE: &str = "form/index.html.jinja";

/// Services the incident page talks to
#[derive(Clone)]
pub struct FormContext {
    pub places: Arc<PlaceSearchService>,
    pub incidents: Arc<IncidentService>,
    pub templates: Arc<TemplateRenderer>,
}

impl FormContext {
    /// Run the search typed into the page and pick up the selected place
    fn locate(&self, start: FormState, input: &FormInput) -> (FormState, SearchOutcome) {
        let outcome = self.places.search(&input.search);
        let selected = input.place_id().and_then(|id| self.places.resolve(id));
        let state = start
            .search(&input.search, outcome.clone())
            .select(selected);
        (state, outcome)
    }

    fn render(
        &self,
        state: &FormState,
        input: FormInput,
        outcome: &SearchOutcome,
        error: Option<String>,
    ) -> Result<Html<String>> {
        let page = FormPage::new(state, input, outcome, error);
        Ok(Html(self.templates.render(FORM_TEMPLATE, &page)?))
    }
}

/// Render the incident page, running the commune search carried in the query string
pub async fn show_form(
    State(context): State<FormContext>,
    Query(input): Query<FormInput>,
) -> Result<Html<String>> {
    let (state, outcome) = context.locate(FormState::Idle, &input);
    context.render(&state, input, &outcome, None)
}

/// Create the incident from the posted page and show the outcome
pub async fn submit_form(
    State(context): State<FormContext>,
    AppForm(input): AppForm<FormInput>,
) -> Result<Html<String>> {
    let draft = input.draft()?;
    let (state, outcome) = context.locate(FormState::Idle, &input);

    let submitting = match state.clone().submit() {
        Ok(submitting) => submitting,
        Err(e) => return context.render(&state, input, &outcome, Some(e.to_string())),
    };

    let result = context.incidents.create(&draft, input.place_id()).await;
    let completed = submitting.complete(result);
    let message = match &completed {
        FormState::Failed(message) => message.clone(),
        _ => return context.render(&completed, input, &outcome, None),
    };

    tracing::warn!("Incident submission failed: {}", message);
    // Back to an editable form with the same inputs
    let (state, outcome) = context.locate(completed.reset(), &input);
    context.render(&state, input, &outcome, Some(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::form::routes;
    use crate::features::incidents::services::{RecordBuilder, SubmissionService};
    use crate::features::places::services::PlaceIndex;
    use crate::shared::test_helpers::{FixedClock, StubImporter};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::Utc;
    use serde_json::json;

    fn server(importer: StubImporter) -> (TestServer, Arc<StubImporter>) {
        let index = PlaceIndex::from_rows(vec![
            ("Paris".to_string(), "75001".to_string()),
            ("Parthenay".to_string(), "79200".to_string()),
            ("Lyon".to_string(), "69001".to_string()),
        ]);
        let places = Arc::new(PlaceSearchService::new(Arc::new(index)));
        let importer = Arc::new(importer);
        let incidents = Arc::new(IncidentService::new(
            places.clone(),
            RecordBuilder::new(Arc::new(FixedClock(Utc::now()))),
            SubmissionService::new(importer.clone()),
        ));
        let context = FormContext {
            places,
            incidents,
            templates: Arc::new(TemplateRenderer::new().unwrap()),
        };
        (TestServer::new(routes::routes(context)).unwrap(), importer)
    }

    fn filled(place_id: Option<&str>) -> FormInput {
        FormInput {
            title: "Phishing <campaign>".to_string(),
            category: Some("Cyber".to_string()),
            description: "Mails impersonating the town hall".to_string(),
            point_of_contact: "soc@example.org".to_string(),
            search: "Par".to_string(),
            place_id: place_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_blank_page_asks_for_more_characters() {
        let (server, _) = server(StubImporter::succeeding(json!({})));

        let response = server.get("/").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Tapez au moins 2 caractères"));
        assert!(html.contains("Organisationnel"));
    }

    #[tokio::test]
    async fn test_search_lists_matching_places() {
        let (server, _) = server(StubImporter::succeeding(json!({})));

        let html = server.get("/").add_query_param("search", "par").await.text();

        assert!(html.contains("Paris (75001)"));
        assert!(html.contains("Parthenay (79200)"));
        assert!(!html.contains("Lyon (69001)"));
    }

    #[tokio::test]
    async fn test_search_without_match_shows_notice() {
        let (server, _) = server(StubImporter::succeeding(json!({})));

        let html = server.get("/").add_query_param("search", "zz").await.text();

        assert!(html.contains("Aucun résultat trouvé"));
    }

    #[tokio::test]
    async fn test_submit_without_place_shows_error_and_sends_nothing() {
        let (server, importer) = server(StubImporter::succeeding(json!({})));

        let html = server.post("/").form(&filled(None)).await.text();

        assert!(html.contains("Veuillez sélectionner une ville"));
        assert!(importer.received().is_empty());
    }

    #[tokio::test]
    async fn test_submit_pushes_bundle_and_shows_result() {
        let (server, importer) = server(StubImporter::succeeding(json!({"stixBundlePush": true})));

        let response = server.post("/").form(&filled(Some("1"))).await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Incident et localisation créés avec succès"));
        assert!(html.contains("stixBundlePush"));
        assert!(html.contains("incident--"));

        let sent = importer.received();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Parthenay"));
    }

    #[tokio::test]
    async fn test_submitted_labels_match_chosen_category() {
        let (server, importer) = server(StubImporter::succeeding(json!({})));
        let mut input = filled(Some("0"));
        input.category = Some("Physique".to_string());

        server.post("/").form(&input).await.assert_status_ok();

        let sent = importer.received();
        let bundle: serde_json::Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(bundle["objects"][0]["labels"], json!(["Physique"]));
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_inputs() {
        let (server, _) = server(StubImporter::failing("Connection refused"));

        let html = server.post("/").form(&filled(Some("0"))).await.text();

        assert!(html.contains("Connection refused"));
        assert!(html.contains("Mails impersonating the town hall"));
        assert!(html.contains("Phishing &lt;campaign&gt;"));
        assert!(html.contains(r#"data-state="selected""#));
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let (server, _) = server(StubImporter::succeeding(json!({})));
        let mut input = filled(Some("0"));
        input.category = Some("Volcanic".to_string());

        let response = server.post("/").form(&input).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
