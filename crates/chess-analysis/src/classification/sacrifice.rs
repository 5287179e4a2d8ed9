//! Static sacrifice detection.

use shakmaty::{Chess, Color, Move, Position};

use crate::board::{after_move, material_balance, piece_value, value_at};

/// Whether playing `mv` in `before` leaves material en prise for less than
/// it is worth.
///
/// Pawn moves never count. The test looks one capture deep: the cheapest
/// recapture on the destination square and the mover's best reply to it.
pub fn is_piece_sacrifice(before: &Chess, mv: &Move) -> bool {
    if mv.role() == shakmaty::Role::Pawn {
        return false;
    }

    let mover = before.turn();
    let moved_value = piece_value(mv.role());
    let after = after_move(before, mv);
    let gain =
        material_balance(after.board(), mover) - material_balance(before.board(), mover);
    let target = mv.to();

    let replies = after.legal_moves();
    let mut captures_on_target: Vec<&Move> = replies
        .iter()
        .filter(|m| !m.is_castle() && m.to() == target)
        .collect();
    captures_on_target.sort_by_key(|m| piece_value(m.role()));

    let Some(cheapest) = captures_on_target.first().copied() else {
        return false;
    };
    let cheapest_attacker = piece_value(cheapest.role());

    if gain < moved_value && cheapest_attacker < gain + moved_value {
        return true;
    }

    let threatens_more_elsewhere = replies.iter().any(|m| {
        !m.is_castle()
            && m.to() != target
            && after
                .board()
                .piece_at(m.to())
                .is_some_and(|p| p.color == mover && piece_value(p.role) > moved_value + gain)
    });
    if threatens_more_elsewhere {
        return true;
    }

    if can_win_back(&after, cheapest, mover) {
        return false;
    }

    gain < cheapest_attacker && moved_value > gain
}

/// After the opponent plays `recapture`, can `mover` take an opponent piece
/// worth at least what was lost on the recapture square?
fn can_win_back(after: &Chess, recapture: &Move, mover: Color) -> bool {
    let lost = value_at(after.board(), recapture.to());
    let position = after_move(after, recapture);

    position.legal_moves().iter().any(|m| {
        !m.is_castle()
            && position
                .board()
                .piece_at(m.to())
                .is_some_and(|p| p.color == mover.other() && piece_value(p.role) >= lost)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{parse_move, parse_position};

    fn sacrifice(fen: &str, uci: &str) -> bool {
        let pos = parse_position(fen).unwrap();
        let mv = parse_move(&pos, uci).unwrap();
        is_piece_sacrifice(&pos, &mv)
    }

    #[test]
    fn test_knight_into_pawn_attack_is_sacrifice() {
        assert!(sacrifice("4k3/8/4p3/8/8/2N5/8/4K3 w - - 0 1", "c3d5"));
    }

    #[test]
    fn test_safe_square_is_not_sacrifice() {
        assert!(!sacrifice("4k3/8/4p3/8/8/2N5/8/4K3 w - - 0 1", "c3b5"));
    }

    #[test]
    fn test_winning_the_queen_is_not_sacrifice() {
        assert!(!sacrifice("4k3/8/4p3/3q4/8/2N5/8/4K3 w - - 0 1", "c3d5"));
    }

    #[test]
    fn test_pawn_moves_are_never_sacrifices() {
        assert!(!sacrifice("4k3/8/8/3p4/8/4P3/8/4K3 w - - 0 1", "e3e4"));
    }

    #[test]
    fn test_black_knight_into_pawn_attack_is_sacrifice() {
        assert!(sacrifice("4k3/8/2n5/8/8/4P3/8/4K3 b - - 0 1", "c6d4"));
        assert!(!sacrifice("4k3/8/2n5/8/8/4P3/8/4K3 b - - 0 1", "c6b4"));
    }

    #[test]
    fn test_rook_for_defended_knight_is_sacrifice() {
        assert!(sacrifice("4k3/8/2p5/3n4/8/8/8/3RK3 w - - 0 1", "d1d5"));
    }

    #[test]
    fn test_material_won_back_is_not_sacrifice() {
        // The rook takes the knight; the bishop on b3 takes the rook.
        assert!(!sacrifice("3rk3/8/8/8/8/1BN5/8/4K3 w - - 0 1", "c3d5"));
        assert!(sacrifice("3rk3/8/8/8/8/2N5/8/4K3 w - - 0 1", "c3d5"));
    }

    #[test]
    fn test_leaving_rook_hanging_elsewhere_is_sacrifice() {
        // Only the queen can take the bishop, but it can take the rook too.
        assert!(sacrifice("7k/8/8/4p3/8/8/1q2B3/R3K3 w - - 0 1", "e2b5"));
    }
}
