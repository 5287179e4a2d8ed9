//! Board queries on top of `shakmaty`.
//!
//! Rules (move legality, check, mate) always come from `shakmaty`; this
//! module only adds the material and mobility measures the classifier
//! needs.

use shakmaty::attacks::{bishop_attacks, rook_attacks};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{Board, CastlingMode, Chess, Color, EnPassantMode, Move, Position, Role, Square};
use thiserror::Error;

use crate::evaluation::{PositionEvaluation, Score};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },
    #[error("illegal move '{uci}' in position '{fen}'")]
    IllegalMove { fen: String, uci: String },
}

pub fn parse_position(fen: &str) -> Result<Chess, BoardError> {
    let invalid = |reason: String| BoardError::InvalidFen {
        fen: fen.to_string(),
        reason,
    };
    let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| invalid(format!("{e}")))
}

/// Resolves a UCI move string against `pos`.
pub fn parse_move(pos: &Chess, uci: &str) -> Result<Move, BoardError> {
    let illegal = || BoardError::IllegalMove {
        fen: to_fen(pos),
        uci: uci.to_string(),
    };
    let parsed: UciMove = uci.parse().map_err(|_| illegal())?;
    parsed.to_move(pos).map_err(|_| illegal())
}

pub fn to_fen(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Side to move in `fen`.
pub fn side_to_move(fen: &str) -> Result<Color, BoardError> {
    Ok(parse_position(fen)?.turn())
}

/// Evaluation for positions the engine is never asked about.
///
/// A mated side scores mate in one against it; stalemate is a flat 0.00.
pub fn terminal_evaluation(fen: &str) -> Result<Option<PositionEvaluation>, BoardError> {
    let pos = parse_position(fen)?;
    if pos.is_checkmate() {
        let score = match pos.turn() {
            Color::White => Score::Mate(-1),
            Color::Black => Score::Mate(1),
        };
        return Ok(Some(PositionEvaluation::terminal(score)));
    }
    if pos.is_stalemate() {
        return Ok(Some(PositionEvaluation::terminal(Score::Centipawns(0))));
    }
    Ok(None)
}

/// FENs of every position reached by playing `moves` from `start`,
/// `start` included.
pub fn fens_from_moves<S: AsRef<str>>(start: &str, moves: &[S]) -> Result<Vec<String>, BoardError> {
    let mut pos = parse_position(start)?;
    let mut fens = Vec::with_capacity(moves.len() + 1);
    fens.push(to_fen(&pos));
    for uci in moves {
        let mv = parse_move(&pos, uci.as_ref())?;
        pos.play_unchecked(mv);
        fens.push(to_fen(&pos));
    }
    Ok(fens)
}

/// Plays a legal move on a copy of `pos`.
pub fn after_move(pos: &Chess, mv: &Move) -> Chess {
    let mut next = pos.clone();
    next.play_unchecked(mv.clone());
    next
}

/// Material value, king counted as 0.
pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 1,
        Role::Knight | Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => 0,
    }
}

/// Material of `color` minus material of the opponent.
pub fn material_balance(board: &Board, color: Color) -> i32 {
    board
        .occupied()
        .into_iter()
        .filter_map(|sq| board.piece_at(sq))
        .map(|piece| {
            let value = piece_value(piece.role);
            if piece.color == color {
                value
            } else {
                -value
            }
        })
        .sum()
}

/// Value of the piece standing on `sq`, 0 if empty.
pub fn value_at(board: &Board, sq: Square) -> i32 {
    board.piece_at(sq).map_or(0, |p| piece_value(p.role))
}

pub fn is_central_square(sq: Square) -> bool {
    matches!(sq, Square::D4 | Square::D5 | Square::E4 | Square::E5)
}

/// Whether the `color` pawn on `sq` has no enemy pawn in front of it on its
/// own or an adjacent file.
pub fn is_passed_pawn(board: &Board, sq: Square, color: Color) -> bool {
    let file = sq.file() as i32;
    let rank = sq.rank() as i32;
    let enemy_pawns = board.pawns() & board.by_color(color.other());

    !enemy_pawns.into_iter().any(|enemy| {
        let ahead = match color {
            Color::White => enemy.rank() as i32 > rank,
            Color::Black => (enemy.rank() as i32) < rank,
        };
        ahead && (enemy.file() as i32 - file).abs() <= 1
    })
}

/// Number of squares the rooks and bishops of `color` attack.
pub fn line_mobility(board: &Board, color: Color) -> usize {
    let occupied = board.occupied();
    let own = board.by_color(color);
    let rooks: usize = (board.rooks() & own)
        .into_iter()
        .map(|sq| rook_attacks(sq, occupied).count())
        .sum();
    let bishops: usize = (board.bishops() & own)
        .into_iter()
        .map(|sq| bishop_attacks(sq, occupied).count())
        .sum();
    rooks + bishops
}

/// Legal moves the opponent of the side to move would have if it were
/// their turn. `None` when passing is not a legal position (mover in check).
pub fn opponent_mobility(pos: &Chess) -> Option<usize> {
    if pos.is_check() {
        return None;
    }
    pos.clone().swap_turn().ok().map(|p| p.legal_moves().len())
}
