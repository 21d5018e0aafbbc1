use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::features::incidents::models::Bundle;

/// Repository operation that imports one serialized STIX bundle
#[async_trait]
pub trait BundleImporter: Send + Sync {
    /// Import `bundle_json` and return the repository's raw answer
    async fn import_bundle(&self, bundle_json: String) -> anyhow::Result<Value>;
}

/// Any failure while pushing a bundle, carrying the underlying message
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SubmissionError {
    message: String,
}

impl SubmissionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Raw structured result returned by the repository
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    pub bundle_id: String,
    pub result: Value,
}

/// Sends bundles to the repository, one call per bundle, no retry
pub struct SubmissionService {
    importer: Arc<dyn BundleImporter>,
}

impl SubmissionService {
    pub fn new(importer: Arc<dyn BundleImporter>) -> Self {
        Self { importer }
    }

    pub async fn submit(&self, bundle: &Bundle) -> Result<SubmissionResult, SubmissionError> {
        let bundle_json = bundle.to_json().map_err(|e| {
            tracing::error!("Failed to serialize bundle {}: {:?}", bundle.id, e);
            SubmissionError::new(e.to_string())
        })?;

        tracing::info!(
            "Submitting bundle {} ({} objects, {} bytes)",
            bundle.id,
            bundle.objects.len(),
            bundle_json.len()
        );

        let result = self.importer.import_bundle(bundle_json).await.map_err(|e| {
            tracing::warn!("Bundle {} rejected: {}", bundle.id, e);
            SubmissionError::new(e.to_string())
        })?;

        tracing::info!("Bundle {} imported", bundle.id);

        Ok(SubmissionResult {
            bundle_id: bundle.id.to_string(),
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::incidents::models::{IncidentCategory, IncidentDraft};
    use crate::features::incidents::services::RecordBuilder;
    use crate::features::places::models::{Place, PlaceId};
    use crate::shared::test_helpers::{FixedClock, StubImporter};
    use chrono::Utc;
    use serde_json::json;

    fn bundle() -> Bundle {
        let builder = RecordBuilder::new(Arc::new(FixedClock(Utc::now())));
        let draft = IncidentDraft {
            title: "Power cut".to_string(),
            category: IncidentCategory::Physical,
            description: "Substation sabotage".to_string(),
            point_of_contact: String::new(),
        };
        let place = Place {
            id: PlaceId(0),
            name: "Parthenay".to_string(),
            postal_code: "79200".to_string(),
        };
        builder.build(&draft, Some(&place)).unwrap().into_bundle()
    }

    #[tokio::test]
    async fn test_submit_returns_importer_result() {
        let importer = Arc::new(StubImporter::succeeding(json!({"stixBundlePush": true})));
        let service = SubmissionService::new(importer.clone());
        let bundle = bundle();

        let outcome = service.submit(&bundle).await.unwrap();

        assert_eq!(outcome.result, json!({"stixBundlePush": true}));
        assert_eq!(outcome.bundle_id, bundle.id.to_string());

        let sent = importer.received();
        assert_eq!(sent.len(), 1);
        let sent: Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(sent["id"], bundle.id.as_str());
        assert_eq!(sent["objects"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_message_verbatim() {
        let importer = Arc::new(StubImporter::failing("Access denied for this token"));
        let service = SubmissionService::new(importer.clone());

        let err = service.submit(&bundle()).await.unwrap_err();

        assert_eq!(err.message(), "Access denied for this token");
        assert_eq!(err.to_string(), "Access denied for this token");
        // no retry
        assert_eq!(importer.received().len(), 1);
    }
}
