use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::features::incidents::models::{
    spec_version, Incident, IncidentDraft, LinkedRecords, Location, Relationship, StixId,
};
use crate::features::places::models::Place;
use crate::shared::constants::{LOCATED_AT, LOCATION_COUNTRY};

/// Source of the creation timestamp
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, UTC
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Error)]
pub enum RecordBuildError {
    #[error("Veuillez sélectionner une ville avant de créer l'incident")]
    MissingSelection,
}

/// Assembles the incident, its location and the `located-at` relationship
pub struct RecordBuilder {
    clock: Arc<dyn Clock>,
}

impl RecordBuilder {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn build(
        &self,
        draft: &IncidentDraft,
        place: Option<&Place>,
    ) -> Result<LinkedRecords, RecordBuildError> {
        let place = place.ok_or(RecordBuildError::MissingSelection)?;
        let now = self.clock.now();

        let incident = Incident {
            spec_version: spec_version(),
            id: StixId::generate("incident"),
            created: now,
            modified: now,
            name: draft.title.clone(),
            description: draft.description.clone(),
            labels: vec![draft.category.display_name().to_string()],
            x_point_of_contact: (!draft.point_of_contact.trim().is_empty())
                .then(|| draft.point_of_contact.clone()),
        };

        let location = Location {
            spec_version: spec_version(),
            id: StixId::generate("location"),
            name: place.name.clone(),
            description: format!("Code postal : {}", place.postal_code),
            country: LOCATION_COUNTRY.to_string(),
        };

        let relationship = Relationship {
            spec_version: spec_version(),
            id: StixId::generate("relationship"),
            created: now,
            modified: now,
            relationship_type: LOCATED_AT.to_string(),
            source_ref: incident.id.clone(),
            target_ref: location.id.clone(),
        };

        Ok(LinkedRecords {
            incident,
            location,
            relationship,
        })
    }
}
