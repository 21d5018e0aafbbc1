use std::sync::Arc;

use crate::features::places::models::{Place, PlaceId};
use crate::features::places::services::PlaceIndex;
use crate::shared::constants::MIN_SEARCH_QUERY_CHARS;

/// Outcome of a place search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Query too short to run a search
    TypeMore,
    /// Search ran and nothing matched
    NoResults,
    /// Matching places, sorted by name
    Results(Vec<Place>),
}

impl SearchOutcome {
    /// Notice shown to the user when there is no list to pick from
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            SearchOutcome::TypeMore => {
                Some("Tapez au moins 2 caractères pour rechercher une ville")
            }
            SearchOutcome::NoResults => Some("Aucun résultat trouvé"),
            SearchOutcome::Results(_) => None,
        }
    }
}

/// Search over the commune reference table
pub struct PlaceSearchService {
    index: Arc<PlaceIndex>,
}

impl PlaceSearchService {
    pub fn new(index: Arc<PlaceIndex>) -> Self {
        Self { index }
    }

    /// Find places whose name contains `query` (case-insensitive) or whose
    /// postal code starts with `query`.
    pub fn search(&self, query: &str) -> SearchOutcome {
        if query.chars().count() < MIN_SEARCH_QUERY_CHARS {
            return SearchOutcome::TypeMore;
        }

        let needle = query.to_lowercase();
        let mut places: Vec<Place> = self.index.scan(&needle, query).cloned().collect();

        tracing::debug!("Place search '{}' matched {} rows", query, places.len());

        if places.is_empty() {
            return SearchOutcome::NoResults;
        }

        places.sort_by(|a, b| a.name.cmp(&b.name));
        SearchOutcome::Results(places)
    }

    /// Look a selected place back up by its id
    pub fn resolve(&self, id: PlaceId) -> Option<Place> {
        self.index.get(id).cloned()
    }
}
