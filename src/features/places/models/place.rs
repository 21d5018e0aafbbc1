use serde::{Deserialize, Serialize};

/// Row position of a place in the loaded reference table.
///
/// Used as the selection token between a search and a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(pub usize);

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A commune from the reference table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub postal_code: String,
}

impl Place {
    /// Human-readable label, e.g. `Paris (75001)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.postal_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_includes_postal_code() {
        let place = Place {
            id: PlaceId(3),
            name: "Parthenay".to_string(),
            postal_code: "79200".to_string(),
        };
        assert_eq!(place.label(), "Parthenay (79200)");
    }
}
