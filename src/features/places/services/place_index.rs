//! In-memory reference table of French communes.
//!
//! The table is loaded once at startup from a `;`-separated file (the La Poste
//! "HexaSmal" export) and then shared read-only between requests. Files are
//! decoded as UTF-8 first and re-decoded as Latin-1 when that fails, since both
//! encodings circulate for this export.

use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;
use thiserror::Error;

use crate::features::places::models::{Place, PlaceId};
use crate::shared::constants::{PLACE_NAME_COLUMN, PLACE_TABLE_SEPARATOR, POSTAL_CODE_COLUMN};

/// Errors raised while loading the reference table
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read place table '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse place table: {0}")]
    Parse(#[from] PolarsError),

    #[error("Place table needs at least two columns, found {0}")]
    MissingColumns(usize),

    #[error("Place table has no '{0}' column")]
    MissingColumn(String),
}

/// Text encoding the table was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEncoding {
    Utf8,
    Latin1,
}

#[derive(Debug, Clone)]
struct IndexedPlace {
    place: Place,
    /// Lowercased name, precomputed for case-insensitive matching
    name_key: String,
}

/// Read-only handle over the loaded places
#[derive(Debug, Clone)]
pub struct PlaceIndex {
    entries: Vec<IndexedPlace>,
    encoding: TableEncoding,
}

impl PlaceIndex {
    /// Load the reference table from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let (text, encoding) = decode_table_text(bytes);
        if encoding == TableEncoding::Latin1 {
            tracing::warn!(
                "Place table {} is not valid UTF-8, decoded as Latin-1",
                path.display()
            );
        }

        let mut index = Self::from_csv_text(&text)?;
        index.encoding = encoding;

        tracing::info!(
            "Loaded {} places from {} ({:?})",
            index.len(),
            path.display(),
            encoding
        );
        Ok(index)
    }

    /// Parse an already-decoded table
    pub fn from_csv_text(text: &str) -> Result<Self, LoadError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        // No type inference: every cell stays text so postal codes keep leading zeros
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|opts| opts.with_separator(PLACE_TABLE_SEPARATOR))
            .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
            .finish()?;

        if df.width() < 2 {
            return Err(LoadError::MissingColumns(df.width()));
        }

        let (names, postal_codes) = place_columns(&df)?;

        let rows = names.into_iter().zip(postal_codes).map(|(name, code)| {
            (
                name.unwrap_or_default().to_string(),
                code.unwrap_or_default().to_string(),
            )
        });

        Ok(Self::from_rows(rows))
    }

    /// Build an index from (name, postal code) pairs, in row order
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(row, (name, postal_code))| IndexedPlace {
                name_key: name.to_lowercase(),
                place: Place {
                    id: PlaceId(row),
                    name,
                    postal_code,
                },
            })
            .collect();

        Self {
            entries,
            encoding: TableEncoding::Utf8,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn encoding(&self) -> TableEncoding {
        self.encoding
    }

    pub fn get(&self, id: PlaceId) -> Option<&Place> {
        self.entries.get(id.0).map(|entry| &entry.place)
    }

    /// Places whose lowercased name contains `needle_lower` or whose postal
    /// code starts with `prefix`, in table order
    pub fn scan<'a>(
        &'a self,
        needle_lower: &'a str,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a Place> + 'a {
        self.entries
            .iter()
            .filter(move |entry| {
                entry.name_key.contains(needle_lower) || entry.place.postal_code.starts_with(prefix)
            })
            .map(|entry| &entry.place)
    }
}

/// Decode raw bytes as UTF-8, falling back to Latin-1
fn decode_table_text(bytes: Vec<u8>) -> (String, TableEncoding) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, TableEncoding::Utf8),
        Err(err) => {
            // Latin-1 maps every byte to the code point of the same value
            let text = err.into_bytes().into_iter().map(char::from).collect();
            (text, TableEncoding::Latin1)
        }
    }
}

/// Name and postal-code columns, by header when both are present, by
/// position (first two columns) when neither is
fn place_columns(df: &DataFrame) -> Result<(&StringChunked, &StringChunked), LoadError> {
    let (names, postal_codes) = match (df.column(PLACE_NAME_COLUMN), df.column(POSTAL_CODE_COLUMN)) {
        (Ok(names), Ok(postal_codes)) => (names, postal_codes),
        (Err(_), Err(_)) => {
            let columns = df.get_columns();
            match (columns.first(), columns.get(1)) {
                (Some(names), Some(postal_codes)) => (names, postal_codes),
                _ => return Err(LoadError::MissingColumns(df.width())),
            }
        }
        (Ok(_), Err(_)) => return Err(LoadError::MissingColumn(POSTAL_CODE_COLUMN.to_string())),
        (Err(_), Ok(_)) => return Err(LoadError::MissingColumn(PLACE_NAME_COLUMN.to_string())),
    };
    Ok((names.str()?, postal_codes.str()?))
}
