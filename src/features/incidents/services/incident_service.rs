use std::sync::Arc;

use thiserror::Error;

use crate::core::error::AppError;
use crate::features::incidents::models::{IncidentDraft, StixId};
use crate::features::incidents::services::{
    RecordBuildError, RecordBuilder, SubmissionError, SubmissionResult, SubmissionService,
};
use crate::features::places::models::PlaceId;
use crate::features::places::services::PlaceSearchService;

#[derive(Debug, Error)]
pub enum IncidentError {
    #[error(transparent)]
    Build(#[from] RecordBuildError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl From<IncidentError> for AppError {
    fn from(err: IncidentError) -> Self {
        match err {
            IncidentError::Build(e) => e.into(),
            IncidentError::Submission(e) => e.into(),
        }
    }
}

/// Identifiers of the pushed records together with the repository's answer
#[derive(Debug, Clone)]
pub struct IncidentReceipt {
    pub incident_id: StixId,
    pub location_id: StixId,
    pub relationship_id: StixId,
    pub submission: SubmissionResult,
}

/// Turns a form submission into a pushed STIX bundle
pub struct IncidentService {
    places: Arc<PlaceSearchService>,
    builder: RecordBuilder,
    submission: SubmissionService,
}

impl IncidentService {
    pub fn new(
        places: Arc<PlaceSearchService>,
        builder: RecordBuilder,
        submission: SubmissionService,
    ) -> Self {
        Self {
            places,
            builder,
            submission,
        }
    }

    /// Build the incident, location and relationship, then push them as one bundle.
    ///
    /// An absent or unknown `place_id` is treated as no selection.
    pub async fn create(
        &self,
        draft: &IncidentDraft,
        place_id: Option<PlaceId>,
    ) -> Result<IncidentReceipt, IncidentError> {
        let place = place_id.and_then(|id| self.places.resolve(id));
        if place.is_none() {
            tracing::debug!("Incident submitted without a resolvable place: {:?}", place_id);
        }

        let records = self.builder.build(draft, place.as_ref())?;

        let incident_id = records.incident.id.clone();
        let location_id = records.location.id.clone();
        let relationship_id = records.relationship.id.clone();

        let bundle = records.into_bundle();
        debug_assert!(bundle.references_resolve());

        let submission = self.submission.submit(&bundle).await?;

        tracing::info!(
            "Incident {} located at {} pushed in bundle {}",
            incident_id,
            location_id,
            submission.bundle_id
        );

        Ok(IncidentReceipt {
            incident_id,
            location_id,
            relationship_id,
            submission,
        })
    }
}
