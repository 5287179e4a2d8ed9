//! Core opening types.

use serde::{Deserialize, Serialize};

/// A named opening and the position it reaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    /// The ECO code for this opening (e.g., "B20", "C44").
    pub eco: String,
    /// The name of the opening.
    pub name: String,
    /// The sequence of moves in UCI notation.
    #[serde(default)]
    pub moves: Vec<String>,
    /// Piece placement (first FEN field) after the moves.
    #[serde(alias = "fen")]
    pub placement: String,
}

impl Opening {
    /// Creates a new opening. `position` may be a full FEN or a bare placement.
    #[must_use]
    pub fn new(
        eco: impl Into<String>,
        name: impl Into<String>,
        moves: Vec<String>,
        position: &str,
    ) -> Self {
        Self {
            eco: eco.into(),
            name: name.into(),
            moves,
            placement: placement(position).to_string(),
        }
    }
}

/// Returns the piece-placement field of a FEN.
#[must_use]
pub fn placement(fen: &str) -> &str {
    fen.split_whitespace().next().unwrap_or("")
}
