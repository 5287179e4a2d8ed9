//! Chess position evaluation types.
//!
//! Every score stored here is from White's point of view: positive values
//! favour White no matter which side was to move when the engine searched.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quality::MoveClassification;

/// Errors raised when an evaluation lacks the data a computation needs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// The position at this index has no engine lines.
    #[error("position {0} has no evaluation lines")]
    MissingLines(usize),
}

/// A search score, White-relative.
///
/// Serializes as `{"cp": 35}` or `{"mate": -2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    /// Centipawn evaluation (positive = white advantage)
    #[serde(rename = "cp")]
    Centipawns(i32),
    /// Mate in N moves (positive = white mates, negative = black mates)
    #[serde(rename = "mate")]
    Mate(i32),
}

impl Score {
    /// Converts an engine score (relative to the side to move) to White's
    /// point of view.
    ///
    /// `mate 0` means the side to move is already mated and is stored as
    /// mate in -1 for that side.
    pub fn from_engine(score: uci::Score, white_to_move: bool) -> Self {
        let sign = if white_to_move { 1 } else { -1 };
        match score {
            uci::Score::Cp(cp) => Score::Centipawns(cp * sign),
            uci::Score::Mate(0) => Score::Mate(-sign),
            uci::Score::Mate(m) => Score::Mate(m * sign),
        }
    }

    /// Returns the centipawn value, if this is not a mate score.
    pub fn centipawns(self) -> Option<i32> {
        match self {
            Score::Centipawns(cp) => Some(cp),
            Score::Mate(_) => None,
        }
    }

    /// Returns the mate distance, if this is a mate score.
    pub fn mate(self) -> Option<i32> {
        match self {
            Score::Mate(m) => Some(m),
            Score::Centipawns(_) => None,
        }
    }

    /// Human label: `+0.35`, `-1.20`, `+M3`, `-M2`.
    pub fn label(self) -> String {
        match self {
            Score::Centipawns(cp) => {
                let sign = if cp > 0 { "+" } else { "" };
                format!("{}{:.2}", sign, cp as f64 / 100.0)
            }
            Score::Mate(m) => {
                let sign = if m > 0 { "+" } else { "-" };
                format!("{}M{}", sign, m.unsigned_abs())
            }
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One candidate line from a multi-PV search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationLine {
    /// Principal variation in UCI notation.
    pub pv: Vec<String>,
    /// Search depth the line was reported at.
    pub depth: u32,
    /// 1-based rank among the candidate lines (1 = best).
    pub multi_pv: u32,
    #[serde(flatten)]
    pub score: Score,
}

impl EvaluationLine {
    /// First move of the principal variation.
    pub fn first_move(&self) -> Option<&str> {
        self.pv.first().map(String::as_str)
    }
}

/// Evaluation of one position, optionally annotated by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionEvaluation {
    /// Candidate lines, best first.
    pub lines: Vec<EvaluationLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_move: Option<String>,
    /// Name of the last opening reached up to this position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening: Option<String>,
    /// Quality of the move that led to this position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<MoveClassification>,
}

impl PositionEvaluation {
    /// A single depth-0 line with no moves, used for positions the engine
    /// is never asked about (checkmate, stalemate).
    pub fn terminal(score: Score) -> Self {
        Self {
            lines: vec![EvaluationLine {
                pv: Vec::new(),
                depth: 0,
                multi_pv: 1,
                score,
            }],
            ..Self::default()
        }
    }

    pub fn top_line(&self) -> Option<&EvaluationLine> {
        self.lines.first()
    }

    /// Depth of the top line, 0 when there are no lines.
    pub fn depth(&self) -> u32 {
        self.top_line().map_or(0, |l| l.depth)
    }

    /// The engine's best move, falling back to the first move of the top line.
    pub fn suggested_move(&self) -> Option<&str> {
        self.best_move
            .as_deref()
            .or_else(|| self.top_line().and_then(EvaluationLine::first_move))
    }
}

/// Result of an evaluation attempt that may run out of time.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    Resolved(PositionEvaluation),
    /// No line was produced within the time budget.
    Unresolved,
}

impl EvaluationOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, EvaluationOutcome::Resolved(_))
    }

    pub fn as_resolved(&self) -> Option<&PositionEvaluation> {
        match self {
            EvaluationOutcome::Resolved(eval) => Some(eval),
            EvaluationOutcome::Unresolved => None,
        }
    }

    pub fn into_resolved(self) -> Option<PositionEvaluation> {
        match self {
            EvaluationOutcome::Resolved(eval) => Some(eval),
            EvaluationOutcome::Unresolved => None,
        }
    }
}

/// Accuracy percentages (0-100) for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accuracy {
    pub white: f64,
    pub black: f64,
}

/// Settings a game evaluation was produced with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Engine name as reported by `id name`.
    pub engine: String,
    pub depth: u32,
    pub multi_pv: u32,
    pub timestamp: DateTime<Utc>,
}

/// A complete reviewed game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvaluation {
    /// One entry per position; `positions[0]` is the starting position and
    /// is never classified.
    pub positions: Vec<PositionEvaluation>,
    pub accuracy: Accuracy,
    pub settings: EngineSettings,
}
