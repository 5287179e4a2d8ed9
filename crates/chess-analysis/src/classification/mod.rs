//! Move classification.
//!
//! Each played move is run through an ordered list of
//! [`ClassificationRule`]s; the first rule that matches decides the tag.
//! Moves no rule claims are tiered by how much winning chance they gave up.
//!
//! Default order:
//!
//! 1. [`BookRule`] - the resulting position is a known opening
//! 2. [`MissedWinRule`] - a mate in one was available and not played
//! 3. [`BrilliantRule`] - a sound sacrifice
//! 4. [`GreatRule`] - the only move that keeps the advantage
//! 5. [`BestRule`] - the engine's first choice
//! 6. [`basic_classification`] - Excellent down to Blunder

mod sacrifice;

pub use sacrifice::is_piece_sacrifice;

use chess_openings::OpeningBook;
use shakmaty::{Chess, Color, Move, Position, Role, Square};
use thiserror::Error;
use tracing::trace;

use crate::board::{
    self, is_central_square, is_passed_pawn, line_mobility, opponent_mobility,
    parse_move, parse_position, piece_value, BoardError,
};
use crate::evaluation::{EvaluationLine, PositionEvaluation};
use crate::quality::MoveClassification;
use crate::win_probability::{line_win_percentage, position_win_percentage};

/// Centipawn gap separating a forced move from its alternatives.
const DISADVANTAGE_THRESHOLD: i32 = 100;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("mismatched lengths: {positions} positions, {moves} moves, {fens} fens")]
    LengthMismatch {
        positions: usize,
        moves: usize,
        fens: usize,
    },
    #[error("position {0} has no evaluation lines")]
    MissingLines(usize),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Everything the rules may look at for one played move.
pub struct MoveContext<'a> {
    /// Index of the position the move leads to.
    pub ply: usize,
    /// Evaluation before the move; its lines are the candidates.
    pub previous: &'a PositionEvaluation,
    pub current: &'a PositionEvaluation,
    /// The move in UCI notation.
    pub played: &'a str,
    pub fen_after: &'a str,
    pub board_before: Chess,
    pub board_after: Chess,
    pub played_move: Move,
    pub mover: Color,
    /// White win percentages before and after the move.
    pub win_before: f64,
    pub win_after: f64,
    /// Square the opponent captured on with the move just before this one.
    recaptured_square: Option<Square>,
}

impl<'a> MoveContext<'a> {
    pub fn new(
        ply: usize,
        previous: &'a PositionEvaluation,
        current: &'a PositionEvaluation,
        played: &'a str,
        fen_before: &str,
        fen_after: &'a str,
    ) -> Result<Self, ClassificationError> {
        let win_before = position_win_percentage(previous)
            .ok_or(ClassificationError::MissingLines(ply.saturating_sub(1)))?;
        let win_after =
            position_win_percentage(current).ok_or(ClassificationError::MissingLines(ply))?;

        let board_before = parse_position(fen_before)?;
        let played_move = parse_move(&board_before, played)?;
        let board_after = parse_position(fen_after)?;

        Ok(Self {
            ply,
            previous,
            current,
            played,
            fen_after,
            mover: board_before.turn(),
            board_before,
            board_after,
            played_move,
            win_before,
            win_after,
            recaptured_square: None,
        })
    }

    /// Supplies the move before this one, needed to recognise recaptures.
    pub fn with_previous_move(
        mut self,
        fen_two_back: &str,
        previous_move: &str,
    ) -> Result<Self, ClassificationError> {
        let board = parse_position(fen_two_back)?;
        let mv = parse_move(&board, previous_move)?;
        self.recaptured_square = (!mv.is_castle() && board.board().piece_at(mv.to()).is_some())
            .then(|| mv.to());
        Ok(self)
    }

    /// Change in winning chances from the mover's side; negative is worse.
    pub fn delta(&self) -> f64 {
        self.for_mover(self.win_after) - self.for_mover(self.win_before)
    }

    /// Converts a White win percentage to the mover's side.
    pub fn for_mover(&self, white_win: f64) -> f64 {
        match self.mover {
            Color::White => white_win,
            Color::Black => 100.0 - white_win,
        }
    }

    /// First candidate line that does not start with the played move.
    pub fn alternative_line(&self) -> Option<&'a EvaluationLine> {
        self.previous
            .lines
            .iter()
            .find(|line| line.first_move() != Some(self.played))
    }

    /// The mover is worse off after the move, or the alternative was
    /// already a runaway win.
    fn losing_or_alternative_winning(&self, alternative: &EvaluationLine) -> bool {
        self.for_mover(self.win_after) < 50.0
            || self.for_mover(line_win_percentage(alternative)) > 97.0
    }

    fn is_simple_recapture(&self) -> bool {
        self.recaptured_square == Some(self.played_move.to())
    }

    fn captured_role(&self) -> Option<Role> {
        if self.played_move.is_castle() {
            return None;
        }
        self.board_before
            .board()
            .piece_at(self.played_move.to())
            .map(|p| p.role)
    }
}

pub trait ClassificationRule {
    fn classification(&self) -> MoveClassification;
    fn matches(&self, ctx: &MoveContext<'_>) -> bool;
}

/// The position after the move is in the opening table.
pub struct BookRule<'a> {
    pub book: &'a OpeningBook,
}

impl ClassificationRule for BookRule<'_> {
    fn classification(&self) -> MoveClassification {
        MoveClassification::Book
    }

    fn matches(&self, ctx: &MoveContext<'_>) -> bool {
        self.book.lookup(ctx.fen_after).is_some()
    }
}

pub struct MissedWinRule;

impl ClassificationRule for MissedWinRule {
    fn classification(&self) -> MoveClassification {
        MoveClassification::MissedWin
    }

    fn matches(&self, ctx: &MoveContext<'_>) -> bool {
        if ctx.board_before.is_checkmate() || ctx.board_after.is_checkmate() {
            return false;
        }
        let Some(line) = ctx
            .previous
            .lines
            .iter()
            .find(|line| line.score.mate().is_some() && line.pv.len() <= 1)
        else {
            return false;
        };
        let favours_mover = match (ctx.mover, line.score.mate()) {
            (Color::White, Some(m)) => m > 0,
            (Color::Black, Some(m)) => m < 0,
            _ => false,
        };
        favours_mover && line.first_move() != Some(ctx.played)
    }
}

pub struct BrilliantRule;

impl ClassificationRule for BrilliantRule {
    fn classification(&self) -> MoveClassification {
        MoveClassification::Brilliant
    }

    fn matches(&self, ctx: &MoveContext<'_>) -> bool {
        if ctx.board_before.is_check() {
            return false;
        }
        if ctx.delta() <= -50.0
            && !is_move_significant(&ctx.previous.lines, ctx.played, ctx.mover)
        {
            return false;
        }
        let Some(alternative) = ctx.alternative_line() else {
            return false;
        };
        if ctx.losing_or_alternative_winning(alternative) {
            return false;
        }
        is_piece_sacrifice(&ctx.board_before, &ctx.played_move)
    }
}

pub struct GreatRule;

impl ClassificationRule for GreatRule {
    fn classification(&self) -> MoveClassification {
        MoveClassification::Great
    }

    fn matches(&self, ctx: &MoveContext<'_>) -> bool {
        let Some(alternative) = ctx.alternative_line() else {
            return false;
        };
        if ctx.losing_or_alternative_winning(alternative) {
            return false;
        }

        let moved = ctx.played_move.role();
        let captured = ctx.captured_role();

        if moved == Role::King && captured.is_some() && !ctx.board_after.is_check() {
            return false;
        }
        if moved == Role::Pawn {
            if captured.is_some_and(|c| piece_value(Role::Pawn) < piece_value(c)) {
                return false;
            }
            if !is_strategic_pawn_move(ctx) {
                return false;
            }
        }
        if captured.is_some_and(|c| piece_value(moved) >= piece_value(c)) {
            return false;
        }
        if ctx.is_simple_recapture() {
            return false;
        }

        is_move_significant(&ctx.previous.lines, ctx.played, ctx.mover)
    }
}

/// The played move is the engine's choice.
pub struct BestRule;

impl ClassificationRule for BestRule {
    fn classification(&self) -> MoveClassification {
        MoveClassification::Best
    }

    fn matches(&self, ctx: &MoveContext<'_>) -> bool {
        ctx.previous.suggested_move() == Some(ctx.played)
    }
}

/// Fallback tiers by the mover's win-percentage change.
pub fn basic_classification(delta: f64) -> MoveClassification {
    if delta < -20.0 {
        MoveClassification::Blunder
    } else if delta < -10.0 {
        MoveClassification::Mistake
    } else if delta < -5.0 {
        MoveClassification::Inaccuracy
    } else if delta < -2.0 {
        MoveClassification::Good
    } else {
        MoveClassification::Excellent
    }
}

/// Whether `played` is the only good candidate: every other line is more
/// than a pawn away from the top line, and the first line that is not
/// losing for the mover starts with `played`.
pub fn is_move_significant(lines: &[EvaluationLine], played: &str, mover: Color) -> bool {
    let Some(best_cp) = lines.first().and_then(|l| l.score.centipawns()) else {
        return false;
    };
    let sign = match mover {
        Color::White => 1,
        Color::Black => -1,
    };

    let Some(first_non_losing) = lines.iter().find(|l| {
        l.score
            .centipawns()
            .is_some_and(|cp| cp * sign >= -DISADVANTAGE_THRESHOLD)
    }) else {
        return false;
    };

    let significant_gap = lines[1..].iter().all(|l| {
        l.score
            .centipawns()
            .is_some_and(|cp| (best_cp - cp).abs() > DISADVANTAGE_THRESHOLD)
    });

    significant_gap && first_non_losing.first_move() == Some(played)
}

/// A pawn move counts when it creates a passed pawn, lands in the centre,
/// opens lines for rooks and bishops, or takes moves away from the opponent.
fn is_strategic_pawn_move(ctx: &MoveContext<'_>) -> bool {
    let to = ctx.played_move.to();
    let before = ctx.board_before.board();
    let after = ctx.board_after.board();

    if is_passed_pawn(after, to, ctx.mover) || is_central_square(to) {
        return true;
    }
    if line_mobility(after, ctx.mover) > line_mobility(before, ctx.mover) {
        return true;
    }
    match opponent_mobility(&ctx.board_before) {
        Some(before_count) => ctx.board_after.legal_moves().len() < before_count,
        None => false,
    }
}

/// Ordered rule cascade.
pub struct MoveClassifier<'a> {
    book: &'a OpeningBook,
    rules: Vec<Box<dyn ClassificationRule + 'a>>,
}

impl<'a> MoveClassifier<'a> {
    pub fn new(book: &'a OpeningBook) -> Self {
        Self::with_rules(
            book,
            vec![
                Box::new(BookRule { book }),
                Box::new(MissedWinRule),
                Box::new(BrilliantRule),
                Box::new(GreatRule),
                Box::new(BestRule),
            ],
        )
    }

    /// Uses `rules` in the given order; `book` still supplies opening names.
    pub fn with_rules(book: &'a OpeningBook, rules: Vec<Box<dyn ClassificationRule + 'a>>) -> Self {
        Self { book, rules }
    }

    pub fn classify_move(&self, ctx: &MoveContext<'_>) -> MoveClassification {
        let tag = self
            .rules
            .iter()
            .find(|rule| rule.matches(ctx))
            .map(|rule| rule.classification())
            .unwrap_or_else(|| basic_classification(ctx.delta()));
        trace!(ply = ctx.ply, played = ctx.played, %tag, "classified move");
        tag
    }

    /// Tags every position after the first with the quality of the move
    /// that produced it, and labels it with the last opening reached.
    ///
    /// `fens[i]` must be the position of `positions[i]`, and `moves[i]`
    /// must lead from `fens[i]` to `fens[i + 1]`.
    pub fn classify(
        &self,
        positions: &[PositionEvaluation],
        moves: &[String],
        fens: &[String],
    ) -> Result<Vec<PositionEvaluation>, ClassificationError> {
        if positions.len() != fens.len() || moves.len() + 1 != fens.len() {
            return Err(ClassificationError::LengthMismatch {
                positions: positions.len(),
                moves: moves.len(),
                fens: fens.len(),
            });
        }

        let mut classified = Vec::with_capacity(positions.len());
        classified.push(positions[0].clone());
        let mut opening: Option<String> = None;

        for ply in 1..positions.len() {
            let mut ctx = MoveContext::new(
                ply,
                &positions[ply - 1],
                &positions[ply],
                &moves[ply - 1],
                &fens[ply - 1],
                &fens[ply],
            )?;
            if ply > 1 {
                ctx = ctx.with_previous_move(&fens[ply - 2], &moves[ply - 2])?;
            }

            let tag = self.classify_move(&ctx);
            if tag == MoveClassification::Book {
                if let Some(found) = self.book.lookup(&fens[ply]) {
                    opening = Some(found.name.clone());
                }
            }

            let mut evaluation = positions[ply].clone();
            evaluation.classification = Some(tag);
            evaluation.opening = opening.clone();
            classified.push(evaluation);
        }

        Ok(classified)
    }

    /// Last opening reached in `fens[1..=ply]`.
    pub fn opening_at(&self, fens: &[String], ply: usize) -> Option<String> {
        fens.get(1..=ply)?
            .iter()
            .rev()
            .find_map(|fen| self.book.lookup(fen))
            .map(|o| o.name.clone())
    }
}

/// Side to move in the first position, White when it cannot be read.
pub fn first_mover(fens: &[String]) -> Color {
    fens.first()
        .and_then(|fen| board::side_to_move(fen).ok())
        .unwrap_or(Color::White)
}
