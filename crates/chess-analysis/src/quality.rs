//! Move quality tags and per-side summaries of a reviewed game.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::evaluation::GameEvaluation;

/// Quality tag attached to a played move.
///
/// This is a closed set rather than a linear scale: `Book` and `MissedWin`
/// sit outside the best-to-blunder ordering. Variants are declared in
/// display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveClassification {
    /// A winning sacrifice that was hard to find
    Brilliant,
    /// The only good move in the position
    Great,
    /// The engine's top choice
    Best,
    Excellent,
    Good,
    /// The resulting position is a known opening
    Book,
    Inaccuracy,
    Mistake,
    Blunder,
    /// A forced mate was available and not played
    MissedWin,
}

impl MoveClassification {
    /// All tags in display order.
    pub const ALL: [MoveClassification; 10] = [
        MoveClassification::Brilliant,
        MoveClassification::Great,
        MoveClassification::Best,
        MoveClassification::Excellent,
        MoveClassification::Good,
        MoveClassification::Book,
        MoveClassification::Inaccuracy,
        MoveClassification::Mistake,
        MoveClassification::Blunder,
        MoveClassification::MissedWin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MoveClassification::Brilliant => "Brilliant",
            MoveClassification::Great => "Great",
            MoveClassification::Best => "Best",
            MoveClassification::Excellent => "Excellent",
            MoveClassification::Good => "Good",
            MoveClassification::Book => "Book",
            MoveClassification::Inaccuracy => "Inaccuracy",
            MoveClassification::Mistake => "Mistake",
            MoveClassification::Blunder => "Blunder",
            MoveClassification::MissedWin => "Missed Win",
        }
    }
}

impl fmt::Display for MoveClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One side's classification counts and accuracy.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub color: Color,
    pub accuracy: f64,
    pub counts: BTreeMap<MoveClassification, usize>,
}

impl PlayerSummary {
    /// Summarizes the moves `color` played in `game`.
    ///
    /// `first_mover` is the side to move in the game's first position; the
    /// move leading to `positions[i]` was played by `first_mover` when `i`
    /// is odd.
    pub fn for_side(game: &GameEvaluation, color: Color, first_mover: Color) -> Self {
        let offset = if color == first_mover { 1 } else { 0 };
        let mut counts = BTreeMap::new();
        for position in game.positions.iter().skip(1).skip(1 - offset).step_by(2) {
            if let Some(tag) = position.classification {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }

        let accuracy = match color {
            Color::White => game.accuracy.white,
            Color::Black => game.accuracy.black,
        };

        Self {
            color,
            accuracy,
            counts,
        }
    }

    pub fn count(&self, tag: MoveClassification) -> usize {
        self.counts.get(&tag).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{Accuracy, EngineSettings, PositionEvaluation};
    use chrono::Utc;

    fn game(tags: &[MoveClassification]) -> GameEvaluation {
        let mut positions = vec![PositionEvaluation::default()];
        positions.extend(tags.iter().map(|&tag| PositionEvaluation {
            classification: Some(tag),
            ..PositionEvaluation::default()
        }));
        GameEvaluation {
            positions,
            accuracy: Accuracy {
                white: 91.5,
                black: 64.0,
            },
            settings: EngineSettings {
                engine: "Test".to_string(),
                depth: 12,
                multi_pv: 3,
                timestamp: Utc::now(),
            },
        }
    }

    #[test]
    fn test_serializes_in_snake_case() {
        let json = serde_json::to_string(&MoveClassification::MissedWin).unwrap();
        assert_eq!(json, "\"missed_win\"");
        let back: MoveClassification = serde_json::from_str("\"inaccuracy\"").unwrap();
        assert_eq!(back, MoveClassification::Inaccuracy);
    }

    #[test]
    fn test_display_order_matches_declaration() {
        let mut sorted = MoveClassification::ALL;
        sorted.sort();
        assert_eq!(sorted, MoveClassification::ALL);
        assert_eq!(MoveClassification::ALL[0], MoveClassification::Brilliant);
        assert_eq!(MoveClassification::ALL[9], MoveClassification::MissedWin);
    }

    #[test]
    fn test_summary_splits_moves_by_side() {
        use MoveClassification::*;
        let game = game(&[Book, Book, Best, Blunder, Mistake]);

        let white = PlayerSummary::for_side(&game, Color::White, Color::White);
        assert_eq!(white.count(Book), 1);
        assert_eq!(white.count(Best), 1);
        assert_eq!(white.count(Mistake), 1);
        assert_eq!(white.total(), 3);
        assert_eq!(white.accuracy, 91.5);

        let black = PlayerSummary::for_side(&game, Color::Black, Color::White);
        assert_eq!(black.count(Book), 1);
        assert_eq!(black.count(Blunder), 1);
        assert_eq!(black.total(), 2);
        assert_eq!(black.accuracy, 64.0);
    }

    #[test]
    fn test_summary_when_black_moves_first() {
        use MoveClassification::*;
        let game = game(&[Good, Excellent]);

        let black = PlayerSummary::for_side(&game, Color::Black, Color::Black);
        assert_eq!(black.count(Good), 1);
        assert_eq!(black.total(), 1);

        let white = PlayerSummary::for_side(&game, Color::White, Color::Black);
        assert_eq!(white.count(Excellent), 1);
    }
}
