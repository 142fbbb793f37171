//! Structural extractors: turn a dictionary result page into entries.
//!
//! Each source has its own markup conventions and two page shapes. A
//! multi-entry page yields [`Extraction::Entries`]; an exact-match page
//! without the tabular structure yields [`Extraction::Single`], which
//! serializes as one flat triple instead of a list of triples.
pub mod bkrs;
pub mod zhonga;

use serde::{Serialize, Serializer};

/// One normalized dictionary record.
///
/// Serializes as `[original, pronunciation, translation]`, each a list of
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub original: Vec<String>,
    pub pronunciation: Vec<String>,
    pub translation: Vec<String>,
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.original, &self.pronunciation, &self.translation).serialize(serializer)
    }
}

/// What an extractor found on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Extraction {
    /// Multi-entry layout, in document order.
    Entries(Vec<Entry>),
    /// Single-entry fallback layout.
    Single(Entry),
}

impl Extraction {
    /// Number of entries found (a single-entry page counts as one).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Extraction::Entries(entries) => entries.len(),
            Extraction::Single(_) => 1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
