//! Conversion from engine scores to White's winning chances.
//!
//! A logistic curve fitted on rated games maps centipawns to a percentage.
//! Mate scores sit at the clamp boundary.

use crate::evaluation::{EvaluationLine, PositionEvaluation, Score};

const MULTIPLIER: f64 = -0.00368208;
const CP_CLAMP: i32 = 1000;

/// White win percentage (0-100) for a centipawn score.
pub fn cp_win_percentage(cp: i32) -> f64 {
    let cp = cp.clamp(-CP_CLAMP, CP_CLAMP) as f64;
    50.0 + 50.0 * (2.0 / (1.0 + (MULTIPLIER * cp).exp()) - 1.0)
}

/// White win percentage for any score; a mate counts as the clamped maximum
/// in its direction.
pub fn score_win_percentage(score: Score) -> f64 {
    match score {
        Score::Centipawns(cp) => cp_win_percentage(cp),
        Score::Mate(m) if m > 0 => cp_win_percentage(CP_CLAMP),
        Score::Mate(_) => cp_win_percentage(-CP_CLAMP),
    }
}

pub fn line_win_percentage(line: &EvaluationLine) -> f64 {
    score_win_percentage(line.score)
}

/// Win percentage of the top line, `None` when the evaluation has no lines.
pub fn position_win_percentage(eval: &PositionEvaluation) -> Option<f64> {
    eval.top_line().map(line_win_percentage)
}

/// Fill level and caption of an evaluation bar.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationBar {
    /// Share of the bar belonging to White, 0-100.
    pub white_percentage: f64,
    pub label: String,
}

impl EvaluationBar {
    pub fn from_evaluation(eval: &PositionEvaluation) -> Option<Self> {
        let line = eval.top_line()?;
        let label = match line.score {
            Score::Mate(m) => format!("M{}", m.unsigned_abs()),
            Score::Centipawns(0) => "0.0".to_string(),
            Score::Centipawns(cp) => {
                let pawns = (cp as f64 / 100.0).abs();
                let label = format!("{pawns:.1}");
                if label.len() > 3 {
                    format!("{pawns:.0}")
                } else {
                    label
                }
            }
        };

        Some(Self {
            white_percentage: line_win_percentage(line),
            label,
        })
    }
}
