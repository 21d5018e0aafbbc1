// =============================================================================
// REFERENCE TABLE
// =============================================================================

/// Header of the commune name column in the La Poste "HexaSmal" table
pub const PLACE_NAME_COLUMN: &str = "Nom_de_la_commune";

/// Header of the postal code column in the La Poste "HexaSmal" table
pub const POSTAL_CODE_COLUMN: &str = "Code_postal";

/// Field separator of the reference table
pub const PLACE_TABLE_SEPARATOR: u8 = b';';

/// Minimum number of characters before a place search runs
pub const MIN_SEARCH_QUERY_CHARS: usize = 2;

// =============================================================================
// STIX
// =============================================================================

pub const STIX_SPEC_VERSION: &str = "2.1";

/// Relationship type binding an incident to where it happened
pub const LOCATED_AT: &str = "located-at";

/// Every location produced by this service is in France
pub const LOCATION_COUNTRY: &str = "France";
