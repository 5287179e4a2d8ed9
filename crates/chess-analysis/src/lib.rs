//! Chess game review on top of a UCI engine.
//!
//! Every position of a game is searched by an external engine (Stockfish or
//! any UCI-compatible program), each played move is tagged with a quality
//! label, and the win-probability trajectory is folded into one accuracy
//! score per side.
//!
//! # Overview
//!
//! - [`EngineSession`] - One engine process behind an async line channel
//! - [`EvaluationCache`] - Reuses evaluations per (FEN, engine) at sufficient depth
//! - [`GameAnalyzer`] - Sequential full-game evaluation with progress reporting
//! - [`PositionEvaluator`] - Single-position evaluation with retry and streaming
//! - [`MoveClassifier`] - Rule cascade from Book down to Blunder
//! - [`compute_accuracy`] - Per-side accuracy from win percentages
//!
//! # Example
//!
//! ```ignore
//! use chess_analysis::{AnalysisConfig, EngineSession, EvaluationCache, GameAnalyzer};
//! use chess_openings::OpeningBook;
//!
//! let mut session = EngineSession::spawn("stockfish", &[], Default::default())?;
//! session.initialize().await?;
//! let cache = EvaluationCache::new();
//! let book = OpeningBook::builtin();
//! let mut analyzer = GameAnalyzer::new(&mut session, &cache, &book);
//! let review = analyzer
//!     .evaluate_game(&fens, &moves, &AnalysisConfig::default(), |p| println!("{p:.0}%"))
//!     .await?;
//! println!("White accuracy: {:.1}%", review.accuracy.white);
//! ```

pub mod accuracy;
pub mod analyzer;
pub mod board;
pub mod cache;
pub mod classification;
pub mod engine;
pub mod evaluation;
pub mod incremental;
pub mod lines;
pub mod quality;
pub mod win_probability;

#[cfg(test)]
pub(crate) mod fake_engine;

pub use accuracy::{compute_accuracy, compute_accuracy_from};
pub use analyzer::{AnalysisConfig, AnalyzerError, GameAnalyzer};
pub use cache::{CachedEvaluation, EvaluationCache, EvaluationStore, MemoryStore};
pub use classification::{ClassificationError, ClassificationRule, MoveClassifier, MoveContext};
pub use engine::{EngineError, EngineSession, SearchCanceller, SessionOptions, SessionState};
pub use evaluation::{
    Accuracy, EngineSettings, EvaluationError, EvaluationLine, EvaluationOutcome,
    GameEvaluation, PositionEvaluation, Score,
};
pub use incremental::{PlyReview, PositionEvaluator};
pub use quality::{MoveClassification, PlayerSummary};
pub use shakmaty::Color;
