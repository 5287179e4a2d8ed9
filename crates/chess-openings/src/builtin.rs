//! Built-in opening table.
//!
//! Each row is `(eco, name, uci moves, placement)`. Placements were derived by
//! playing the moves from the initial position; `chess-analysis` replays
//! every row against its placement.

use crate::opening::Opening;

const OPENINGS: &[(&str, &str, &str, &str)] = &[
    // Flank openings and Indian systems (A00-A99)
    ("A01", "Larsen's Opening", "b2b3", "rnbqkbnr/pppppppp/8/8/8/1P6/P1PPPPPP/RNBQKBNR"),
    ("A02", "Bird's Opening", "f2f4", "rnbqkbnr/pppppppp/8/8/5P2/8/PPPPP1PP/RNBQKBNR"),
    ("A04", "Reti Opening", "g1f3", "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R"),
    ("A10", "English Opening", "c2c4", "rnbqkbnr/pppppppp/8/8/2P5/8/PP1PPPPP/RNBQKBNR"),
    ("A40", "Queen's Pawn Opening", "d2d4", "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR"),
    ("A06", "Zukertort Opening", "g1f3 d7d5", "rnbqkbnr/ppp1pppp/8/3p4/8/5N2/PPPPPPPP/RNBQKB1R"),
    ("A30", "English Opening: Symmetrical Variation", "c2c4 c7c5", "rnbqkbnr/pp1ppppp/8/2p5/2P5/8/PP1PPPPP/RNBQKBNR"),
    ("A45", "Indian Defense", "d2d4 g8f6", "rnbqkb1r/pppppppp/5n2/8/3P4/8/PPP1PPPP/RNBQKBNR"),
    ("A80", "Dutch Defense", "d2d4 f7f5", "rnbqkbnr/ppppp1pp/8/5p2/3P4/8/PPP1PPPP/RNBQKBNR"),
    ("A07", "Reti Opening: King's Indian Attack", "g1f3 d7d5 g2g3", "rnbqkbnr/ppp1pppp/8/3p4/8/5NP1/PPPPPP1P/RNBQKB1R"),
    ("A45", "Trompowsky Attack", "d2d4 g8f6 c1g5", "rnbqkb1r/pppppppp/5n2/6B1/3P4/8/PPP1PPPP/RN1QKBNR"),
    ("A50", "Indian Defense: Normal Variation", "d2d4 g8f6 c2c4", "rnbqkb1r/pppppppp/5n2/8/2PP4/8/PP2PPPP/RNBQKBNR"),
    ("A51", "Budapest Gambit", "d2d4 g8f6 c2c4 e7e5", "rnbqkb1r/pppp1ppp/5n2/4p3/2PP4/8/PP2PPPP/RNBQKBNR"),
    ("A07", "King's Indian Attack", "g1f3 d7d5 g2g3 g8f6 f1g2", "rnbqkb1r/ppp1pppp/5n2/3p4/8/5NP1/PPPPPPBP/RNBQK2R"),
    ("A46", "Torre Attack", "d2d4 g8f6 g1f3 e7e6 c1g5", "rnbqkb1r/pppp1ppp/4pn2/6B1/3P4/5N2/PPP1PPPP/RN1QKB1R"),
    ("A60", "Benoni Defense", "d2d4 g8f6 c2c4 c7c5 d4d5", "rnbqkb1r/pp1ppppp/5n2/2pP4/2P5/8/PP2PPPP/RNBQKBNR"),
    ("A57", "Benko Gambit", "d2d4 g8f6 c2c4 c7c5 d4d5 b7b5", "rnbqkb1r/p2ppppp/5n2/1ppP4/2P5/8/PP2PPPP/RNBQKBNR"),
    ("A87", "Dutch Defense: Leningrad Variation", "d2d4 f7f5 g2g3 g8f6 f1g2 g7g6", "rnbqkb1r/ppppp2p/5np1/5p2/3P4/6P1/PPP1PPBP/RNBQK1NR"),
    ("A70", "Modern Benoni", "d2d4 g8f6 c2c4 c7c5 d4d5 e7e6 b1c3 e6d5 c4d5 d7d6", "rnbqkb1r/pp3ppp/3p1n2/2pP4/8/2N5/PP2PPPP/R1BQKBNR"),
    // Semi-open games (B00-B99)
    ("B00", "King's Pawn Opening", "e2e4", "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR"),
    ("B01", "Scandinavian Defense", "e2e4 d7d5", "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR"),
    ("B02", "Alekhine Defense", "e2e4 g8f6", "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR"),
    ("B06", "Modern Defense", "e2e4 g7g6", "rnbqkbnr/pppppp1p/6p1/8/4P3/8/PPPP1PPP/RNBQKBNR"),
    ("B10", "Caro-Kann Defense", "e2e4 c7c6", "rnbqkbnr/pp1ppppp/2p5/8/4P3/8/PPPP1PPP/RNBQKBNR"),
    ("B20", "Sicilian Defense", "e2e4 c7c5", "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR"),
    ("B27", "Sicilian Defense: Hyperaccelerated Variation", "e2e4 c7c5 g1f3", "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R"),
    ("B12", "Caro-Kann Defense: Main Line", "e2e4 c7c6 d2d4 d7d5", "rnbqkbnr/pp2pppp/2p5/3p4/3PP3/8/PPP2PPP/RNBQKBNR"),
    ("B30", "Sicilian Defense: Open", "e2e4 c7c5 g1f3 b8c6", "r1bqkbnr/pp1ppppp/2n5/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R"),
    ("B50", "Sicilian Defense: Modern Variations", "e2e4 c7c5 g1f3 d7d6", "rnbqkbnr/pp2pppp/3p4/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R"),
    ("B21", "Sicilian Defense: Smith-Morra Gambit", "e2e4 c7c5 d2d4 c5d4 c2c3", "rnbqkbnr/pp1ppppp/8/8/3pP3/2P5/PP3PPP/RNBQKBNR"),
    ("B07", "Pirc Defense", "e2e4 d7d6 d2d4 g8f6 b1c3 g7g6", "rnbqkb1r/ppp1pp1p/3p1np1/8/3PP3/2N5/PPP2PPP/R1BQKBNR"),
    ("B18", "Caro-Kann Defense: Classical Variation", "e2e4 c7c6 d2d4 d7d5 b1c3 d5e4 c3e4 c8f5", "rn1qkbnr/pp2pppp/2p5/5b2/3PN3/8/PPP2PPP/R1BQKBNR"),
    ("B70", "Sicilian Defense: Dragon Variation", "e2e4 c7c5 g1f3 d7d6 d2d4 c5d4 f3d4 g8f6 b1c3 g7g6", "rnbqkb1r/pp2pp1p/3p1np1/8/3NP3/2N5/PPP2PPP/R1BQKB1R"),
    ("B90", "Sicilian Defense: Najdorf Variation", "e2e4 c7c5 g1f3 d7d6 d2d4 c5d4 f3d4 g8f6 b1c3 a7a6", "rnbqkb1r/1p2pppp/p2p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R"),
    // Open games and the French (C00-C99)
    ("C00", "French Defense", "e2e4 e7e6", "rnbqkbnr/pppp1ppp/4p3/8/4P3/8/PPPP1PPP/RNBQKBNR"),
    ("C20", "King's Pawn Game", "e2e4 e7e5", "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR"),
    ("C23", "Bishop's Opening", "e2e4 e7e5 f1c4", "rnbqkbnr/pppp1ppp/8/4p3/2B1P3/8/PPPP1PPP/RNBQK1NR"),
    ("C25", "Vienna Game", "e2e4 e7e5 b1c3", "rnbqkbnr/pppp1ppp/8/4p3/4P3/2N5/PPPP1PPP/R1BQKBNR"),
    ("C30", "King's Gambit", "e2e4 e7e5 f2f4", "rnbqkbnr/pppp1ppp/8/4p3/4PP2/8/PPPP2PP/RNBQKBNR"),
    ("C40", "King's Knight Opening", "e2e4 e7e5 g1f3", "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R"),
    ("C01", "French Defense: Normal Variation", "e2e4 e7e6 d2d4 d7d5", "rnbqkbnr/ppp2ppp/4p3/3p4/3PP3/8/PPP2PPP/RNBQKBNR"),
    ("C33", "King's Gambit Accepted", "e2e4 e7e5 f2f4 e5f4", "rnbqkbnr/pppp1ppp/8/8/4Pp2/8/PPPP2PP/RNBQKBNR"),
    ("C41", "Philidor Defense", "e2e4 e7e5 g1f3 d7d6", "rnbqkbnr/ppp2ppp/3p4/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R"),
    ("C42", "Petrov Defense", "e2e4 e7e5 g1f3 g8f6", "rnbqkb1r/pppp1ppp/5n2/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R"),
    ("C44", "King's Knight Opening: Normal Variation", "e2e4 e7e5 g1f3 b8c6", "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R"),
    ("C02", "French Defense: Advance Variation", "e2e4 e7e6 d2d4 d7d5 e4e5", "rnbqkbnr/ppp2ppp/4p3/3pP3/3P4/8/PPP2PPP/RNBQKBNR"),
    ("C21", "Danish Gambit", "e2e4 e7e5 d2d4 e5d4 c2c3", "rnbqkbnr/pppp1ppp/8/8/3pP3/2P5/PP3PPP/RNBQKBNR"),
    ("C45", "Scotch Game", "e2e4 e7e5 g1f3 b8c6 d2d4", "r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R"),
    ("C50", "Italian Game", "e2e4 e7e5 g1f3 b8c6 f1c4", "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R"),
    ("C60", "Ruy Lopez", "e2e4 e7e5 g1f3 b8c6 f1b5", "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R"),
    ("C47", "Four Knights Game", "e2e4 e7e5 g1f3 b8c6 b1c3 g8f6", "r1bqkb1r/pppp1ppp/2n2n2/4p3/4P3/2N2N2/PPPP1PPP/R1BQKB1R"),
    ("C53", "Giuoco Piano", "e2e4 e7e5 g1f3 b8c6 f1c4 f8c5", "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R"),
    ("C65", "Ruy Lopez: Morphy Defense", "e2e4 e7e5 g1f3 b8c6 f1b5 a7a6", "r1bqkbnr/1ppp1ppp/p1n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R"),
    ("C51", "Evans Gambit", "e2e4 e7e5 g1f3 b8c6 f1c4 f8c5 b2b4", "r1bqk1nr/pppp1ppp/2n5/2b1p3/1PB1P3/5N2/P1PP1PPP/RNBQK2R"),
    // Closed games and Queen's Gambit (D00-D99)
    ("D00", "Queen's Pawn Game", "d2d4 d7d5", "rnbqkbnr/ppp1pppp/8/3p4/3P4/8/PPP1PPPP/RNBQKBNR"),
    ("D00", "London System", "d2d4 d7d5 c1f4", "rnbqkbnr/ppp1pppp/8/3p4/3P1B2/8/PPP1PPPP/RN1QKBNR"),
    ("D06", "Queen's Gambit", "d2d4 d7d5 c2c4", "rnbqkbnr/ppp1pppp/8/3p4/2PP4/8/PP2PPPP/RNBQKBNR"),
    ("D10", "Slav Defense", "d2d4 d7d5 c2c4 c7c6", "rnbqkbnr/pp2pppp/2p5/3p4/2PP4/8/PP2PPPP/RNBQKBNR"),
    ("D20", "Queen's Gambit Accepted", "d2d4 d7d5 c2c4 d5c4", "rnbqkbnr/ppp1pppp/8/8/2pP4/8/PP2PPPP/RNBQKBNR"),
    ("D30", "Queen's Gambit Declined", "d2d4 d7d5 c2c4 e7e6", "rnbqkbnr/ppp2ppp/4p3/3p4/2PP4/8/PP2PPPP/RNBQKBNR"),
    ("D00", "Blackmar-Diemer Gambit", "d2d4 d7d5 e2e4 d5e4 b1c3", "rnbqkbnr/ppp1pppp/8/8/3Pp3/2N5/PPP2PPP/R1BQKBNR"),
    ("D05", "Colle System", "d2d4 d7d5 g1f3 g8f6 e2e3", "rnbqkb1r/ppp1pppp/5n2/3p4/3P4/4PN2/PPP2PPP/RNBQKB1R"),
    ("D80", "Grunfeld Defense", "d2d4 g8f6 c2c4 g7g6 b1c3 d7d5", "rnbqkb1r/ppp1pp1p/5np1/3p4/2PP4/2N5/PP2PPPP/R1BQKBNR"),
    // Indian defenses (E00-E99)
    ("E60", "King's Indian Defense", "d2d4 g8f6 c2c4 g7g6", "rnbqkb1r/pppppp1p/5np1/8/2PP4/8/PP2PPPP/RNBQKBNR"),
    ("E00", "Catalan Opening", "d2d4 g8f6 c2c4 e7e6 g2g3", "rnbqkb1r/pppp1ppp/4pn2/8/2PP4/6P1/PP2PP1P/RNBQKBNR"),
    ("E61", "King's Indian Defense: Normal Variation", "d2d4 g8f6 c2c4 g7g6 b1c3", "rnbqkb1r/pppppp1p/5np1/8/2PP4/2N5/PP2PPPP/R1BQKBNR"),
    ("E11", "Bogo-Indian Defense", "d2d4 g8f6 c2c4 e7e6 g1f3 f8b4", "rnbqk2r/pppp1ppp/4pn2/8/1bPP4/5N2/PP2PPPP/RNBQKB1R"),
    ("E12", "Queen's Indian Defense", "d2d4 g8f6 c2c4 e7e6 g1f3 b7b6", "rnbqkb1r/p1pp1ppp/1p2pn2/8/2PP4/5N2/PP2PPPP/RNBQKB1R"),
    ("E20", "Nimzo-Indian Defense", "d2d4 g8f6 c2c4 e7e6 b1c3 f8b4", "rnbqk2r/pppp1ppp/4pn2/8/1bPP4/2N5/PP2PPPP/R1BQKBNR"),
    ("E90", "King's Indian Defense: Classical Variation", "d2d4 g8f6 c2c4 g7g6 b1c3 f8g7 e2e4 d7d6 g1f3", "rnbqk2r/ppp1ppbp/3p1np1/8/2PPP3/2N2N2/PP3PPP/R1BQKB1R"),
];

/// Returns the built-in openings in table order.
#[must_use]
pub fn builtin_openings() -> Vec<Opening> {
    OPENINGS
        .iter()
        .map(|(eco, name, moves, placement)| {
            Opening::new(
                *eco,
                *name,
                moves.split_whitespace().map(String::from).collect(),
                placement,
            )
        })
        .collect()
}
