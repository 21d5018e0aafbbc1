//! STIX 2.1 objects produced by the incident form.
//!
//! Only the three object kinds the form creates are modelled, plus the bundle
//! that carries them to the repository.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::shared::constants::STIX_SPEC_VERSION;

/// STIX identifier, `<object-type>--<uuid>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StixId(String);

impl StixId {
    /// Fresh random identifier for an object of the given type
    pub fn generate(object_type: &str) -> Self {
        Self(format!("{}--{}", object_type, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn object_type(&self) -> &str {
        self.0.split("--").next().unwrap_or_default()
    }
}

impl std::fmt::Display for StixId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// STIX timestamps: UTC, millisecond precision, `Z` suffix
mod stix_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
    pub spec_version: String,
    pub id: StixId,
    #[serde(serialize_with = "stix_timestamp::serialize")]
    pub created: DateTime<Utc>,
    #[serde(serialize_with = "stix_timestamp::serialize")]
    pub modified: DateTime<Utc>,
    pub name: String,
    pub description: String,
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_point_of_contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub spec_version: String,
    pub id: StixId,
    pub name: String,
    pub description: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub spec_version: String,
    pub id: StixId,
    #[serde(serialize_with = "stix_timestamp::serialize")]
    pub created: DateTime<Utc>,
    #[serde(serialize_with = "stix_timestamp::serialize")]
    pub modified: DateTime<Utc>,
    pub relationship_type: String,
    pub source_ref: StixId,
    pub target_ref: StixId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StixObject {
    Incident(Incident),
    Location(Location),
    Relationship(Relationship),
}

impl StixObject {
    pub fn id(&self) -> &StixId {
        match self {
            StixObject::Incident(o) => &o.id,
            StixObject::Location(o) => &o.id,
            StixObject::Relationship(o) => &o.id,
        }
    }
}

/// An incident, where it happened, and the `located-at` edge between them
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedRecords {
    pub incident: Incident,
    pub location: Location,
    pub relationship: Relationship,
}

impl LinkedRecords {
    /// Bundle the records in the order incident, location, relationship
    pub fn into_bundle(self) -> Bundle {
        Bundle {
            id: StixId::generate("bundle"),
            objects: vec![
                StixObject::Incident(self.incident),
                StixObject::Location(self.location),
                StixObject::Relationship(self.relationship),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "bundle")]
pub struct Bundle {
    pub id: StixId,
    pub objects: Vec<StixObject>,
}

impl Bundle {
    /// Canonical JSON form sent to the repository
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Whether every relationship points at objects carried in this bundle
    pub fn references_resolve(&self) -> bool {
        self.objects.iter().all(|object| match object {
            StixObject::Relationship(rel) => [&rel.source_ref, &rel.target_ref]
                .into_iter()
                .all(|target| self.objects.iter().any(|o| o.id() == target)),
            _ => true,
        })
    }
}

pub(crate) fn spec_version() -> String {
    STIX_SPEC_VERSION.to_string()
}
