//! Folding a stream of `info` lines into ranked evaluation lines.

use std::collections::BTreeMap;

use uci::{EngineInfo, EngineMessage};

use crate::evaluation::{EvaluationLine, PositionEvaluation, Score};

/// Collects the lines reported during one search.
///
/// Per `multipv` rank only the deepest line is kept; a line at equal depth
/// replaces the stored one.
#[derive(Debug, Clone)]
pub struct LineAccumulator {
    white_to_move: bool,
    lines: BTreeMap<u32, EvaluationLine>,
    best_move: Option<String>,
}

impl LineAccumulator {
    pub fn new(white_to_move: bool) -> Self {
        Self {
            white_to_move,
            lines: BTreeMap::new(),
            best_move: None,
        }
    }

    /// Records one `info` line. Returns `true` if it changed a stored line.
    ///
    /// Lines without depth or score, and bound-only scores, are ignored.
    pub fn push(&mut self, info: &EngineInfo) -> bool {
        if info.bound.is_some() {
            return false;
        }
        let (Some(depth), Some(score)) = (info.depth, info.score) else {
            return false;
        };
        let rank = info.multipv.unwrap_or(1);

        if let Some(existing) = self.lines.get(&rank) {
            if existing.depth > depth {
                return false;
            }
        }

        self.lines.insert(
            rank,
            EvaluationLine {
                pv: info.pv.clone(),
                depth,
                multi_pv: rank,
                score: Score::from_engine(score, self.white_to_move),
            },
        );
        true
    }

    pub fn set_best_move(&mut self, mv: Option<String>) {
        self.best_move = mv;
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Current lines ordered by rank.
    pub fn snapshot(&self) -> PositionEvaluation {
        PositionEvaluation {
            lines: self.lines.values().cloned().collect(),
            best_move: self.best_move.clone(),
            ..PositionEvaluation::default()
        }
    }

    pub fn finish(self) -> PositionEvaluation {
        PositionEvaluation {
            lines: self.lines.into_values().collect(),
            best_move: self.best_move,
            ..PositionEvaluation::default()
        }
    }
}

/// Parses a complete captured search transcript.
pub fn parse_output<'a>(
    output: impl IntoIterator<Item = &'a str>,
    white_to_move: bool,
) -> PositionEvaluation {
    let mut acc = LineAccumulator::new(white_to_move);
    for line in output {
        match EngineMessage::parse(line) {
            Some(EngineMessage::Info(info)) => {
                acc.push(&info);
            }
            Some(EngineMessage::BestMove { mv, .. }) => acc.set_best_move(mv),
            _ => {}
        }
    }
    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uci::{Bound, InfoBuilder};

    #[test]
    fn test_lines_are_ordered_by_rank() {
        let output = [
            "info depth 10 multipv 2 score cp 12 pv d2d4 d7d5",
            "info depth 10 multipv 1 score cp 30 pv e2e4 e7e5",
            "info depth 10 multipv 3 score cp -5 pv g1f3",
            "bestmove e2e4 ponder e7e5",
        ];
        let eval = parse_output(output, true);

        let ranks: Vec<u32> = eval.lines.iter().map(|l| l.multi_pv).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(eval.lines[0].pv, vec!["e2e4", "e7e5"]);
        assert_eq!(eval.best_move.as_deref(), Some("e2e4"));
    }

    #[test]
    fn test_deeper_line_wins() {
        let mut acc = LineAccumulator::new(true);
        assert!(acc.push(&InfoBuilder::new().depth(12).score_cp(40).pv(["e2e4"]).build()));
        assert!(!acc.push(&InfoBuilder::new().depth(11).score_cp(-10).pv(["a2a3"]).build()));
        assert!(acc.push(&InfoBuilder::new().depth(12).score_cp(45).pv(["d2d4"]).build()));

        let eval = acc.finish();
        assert_eq!(eval.lines.len(), 1);
        assert_eq!(eval.lines[0].score, Score::Centipawns(45));
        assert_eq!(eval.lines[0].pv, vec!["d2d4"]);
    }

    #[test]
    fn test_incomplete_and_bound_lines_are_dropped() {
        let mut acc = LineAccumulator::new(true);
        assert!(!acc.push(&InfoBuilder::new().depth(5).build()));
        assert!(!acc.push(&InfoBuilder::new().score_cp(10).build()));
        assert!(!acc.push(&InfoBuilder::new().depth(5).score_cp(10).bound(Bound::Lower).build()));
        assert!(acc.is_empty());
    }

    #[test]
    fn test_scores_are_white_relative_when_black_moves() {
        let eval = parse_output(
            [
                "info depth 8 multipv 1 score cp 50 pv e7e5",
                "info depth 8 multipv 2 score mate 3 pv d8h4",
            ],
            false,
        );
        assert_eq!(eval.lines[0].score, Score::Centipawns(-50));
        assert_eq!(eval.lines[1].score, Score::Mate(-3));
    }

    #[test]
    fn test_bestmove_none_and_chatter() {
        let eval = parse_output(
            [
                "Stockfish 16 by the Stockfish developers",
                "info string NNUE evaluation enabled",
                "info depth 0 score mate 0",
                "bestmove (none)",
            ],
            true,
        );
        assert_eq!(eval.best_move, None);
        assert_eq!(eval.lines.len(), 1);
        assert_eq!(eval.lines[0].score, Score::Mate(-1));
    }

    #[test]
    fn test_snapshot_does_not_consume() {
        let mut acc = LineAccumulator::new(true);
        acc.push(&InfoBuilder::new().depth(3).score_cp(20).pv(["e2e4"]).build());
        let first = acc.snapshot();
        acc.push(&InfoBuilder::new().depth(4).score_cp(25).pv(["e2e4"]).build());
        assert_eq!(first.depth(), 3);
        assert_eq!(acc.snapshot().depth(), 4);
    }
}
