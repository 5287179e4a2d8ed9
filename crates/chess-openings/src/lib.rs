//! Named chess openings keyed by board placement.
//!
//! A game reviewer asks "is this position still theory?" for every ply.
//! Positions are matched on the piece-placement field of their FEN only, so
//! transpositions with different move orders, castling rights or clocks all
//! land on the same opening.

pub mod book;
pub mod builtin;
pub mod opening;

pub use book::{BookError, OpeningBook};
pub use opening::{placement, Opening};
