//! Opening lookup by position.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::builtin::builtin_openings;
use crate::opening::{placement, Opening};

/// Errors that can occur when loading an opening book.
#[derive(Debug, Error)]
pub enum BookError {
    /// Failed to read the opening book file.
    #[error("failed to read opening book: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// An entry had an empty placement.
    #[error("opening '{0}' has no placement")]
    MissingPlacement(String),
}

/// Openings indexed by piece placement.
///
/// When two openings share a placement the one inserted last wins, so a
/// custom book loaded over [`OpeningBook::builtin`] overrides its names.
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    by_placement: HashMap<String, Opening>,
}

impl OpeningBook {
    /// Creates a new empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a book from the given openings.
    #[must_use]
    pub fn with_openings(openings: impl IntoIterator<Item = Opening>) -> Self {
        let mut book = Self::new();
        book.extend(openings);
        book
    }

    /// The compiled-in table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::with_openings(builtin_openings())
    }

    /// Parses a JSON array of openings (`eco`, `name`, `moves`, `placement`
    /// or `fen`).
    pub fn from_json_str(json: &str) -> Result<Self, BookError> {
        let openings: Vec<Opening> = serde_json::from_str(json)?;
        let mut book = Self::new();
        for mut opening in openings {
            let trimmed = placement(&opening.placement).to_string();
            if trimmed.is_empty() {
                return Err(BookError::MissingPlacement(opening.name));
            }
            opening.placement = trimmed;
            book.insert(opening);
        }
        Ok(book)
    }

    /// Reads a JSON opening book from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Returns the number of openings in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_placement.len()
    }

    /// Returns true if the book contains no openings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_placement.is_empty()
    }

    /// Adds an opening, replacing any opening with the same placement.
    pub fn insert(&mut self, opening: Opening) {
        self.by_placement.insert(opening.placement.clone(), opening);
    }

    /// Adds several openings.
    pub fn extend(&mut self, openings: impl IntoIterator<Item = Opening>) {
        for opening in openings {
            self.insert(opening);
        }
    }

    /// Finds the opening whose placement matches this FEN.
    #[must_use]
    pub fn lookup(&self, fen: &str) -> Option<&Opening> {
        self.by_placement.get(placement(fen))
    }

    /// Searches for openings by name (case-insensitive substring match).
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Opening> {
        let query_lower = query.to_lowercase();
        let mut found: Vec<&Opening> = self
            .by_placement
            .values()
            .filter(|o| o.name.to_lowercase().contains(&query_lower))
            .collect();
        found.sort_by(|a, b| a.eco.cmp(&b.eco).then_with(|| a.name.cmp(&b.name)));
        found
    }
}
