//! Full-game review.
//!
//! Positions are searched strictly in order on a single engine session.
//! Mated and stalemated positions are never sent to the engine, and
//! positions the cache already holds at sufficient depth are reused. Once
//! every position has lines, the moves are classified and each side's
//! accuracy computed.

use chess_openings::OpeningBook;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use crate::accuracy::compute_accuracy_from;
use crate::board::{terminal_evaluation, BoardError};
use crate::cache::EvaluationCache;
use crate::classification::{first_mover, ClassificationError, MoveClassifier};
use crate::engine::{EngineError, EngineSession};
use crate::evaluation::{EngineSettings, EvaluationError, GameEvaluation, PositionEvaluation};

/// Search parameters for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub depth: u32,
    /// Candidate lines per position (2-6).
    pub multi_pv: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            depth: 16,
            multi_pv: 3,
        }
    }
}

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("invalid game: {0}")]
    InvalidGame(String),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("classification failed: {0}")]
    Classification(#[from] ClassificationError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Reviews whole games with one engine session.
pub struct GameAnalyzer<'a> {
    session: &'a mut EngineSession,
    cache: &'a EvaluationCache,
    book: &'a OpeningBook,
}

impl<'a> GameAnalyzer<'a> {
    pub fn new(
        session: &'a mut EngineSession,
        cache: &'a EvaluationCache,
        book: &'a OpeningBook,
    ) -> Self {
        Self {
            session,
            cache,
            book,
        }
    }

    /// Evaluates, classifies and scores a game.
    ///
    /// `fens` lists every position including the start, `moves` the UCI
    /// moves between them. `on_progress` receives a percentage after each
    /// position. Any engine failure aborts the whole review.
    pub async fn evaluate_game<F>(
        &mut self,
        fens: &[String],
        moves: &[String],
        config: &AnalysisConfig,
        mut on_progress: F,
    ) -> Result<GameEvaluation, AnalyzerError>
    where
        F: FnMut(f64),
    {
        if fens.is_empty() {
            return Err(AnalyzerError::InvalidGame("no positions".to_string()));
        }
        if moves.len() + 1 != fens.len() {
            return Err(AnalyzerError::InvalidGame(format!(
                "{} positions need {} moves, got {}",
                fens.len(),
                fens.len() - 1,
                moves.len()
            )));
        }

        self.session.configure_lines(config.multi_pv).await?;
        self.session.new_game().await?;
        let engine = self.session.name().to_string();
        info!(engine = %engine, positions = fens.len(), depth = config.depth, "reviewing game");

        let total = fens.len();
        let mut positions = Vec::with_capacity(total);
        for (i, fen) in fens.iter().enumerate() {
            let evaluation = self.evaluate_position(fen, &engine, config.depth).await?;
            if evaluation.lines.is_empty() {
                return Err(EvaluationError::MissingLines(i).into());
            }
            positions.push(evaluation);
            on_progress(progress(i + 1, total));
        }

        let classified = MoveClassifier::new(self.book).classify(&positions, moves, fens)?;
        let accuracy = compute_accuracy_from(&classified, first_mover(fens))?;
        info!(white = accuracy.white, black = accuracy.black, "review complete");

        Ok(GameEvaluation {
            positions: classified,
            accuracy,
            settings: EngineSettings {
                engine,
                depth: config.depth,
                multi_pv: config.multi_pv,
                timestamp: Utc::now(),
            },
        })
    }

    async fn evaluate_position(
        &mut self,
        fen: &str,
        engine: &str,
        depth: u32,
    ) -> Result<PositionEvaluation, AnalyzerError> {
        if let Some(terminal) = terminal_evaluation(fen)? {
            debug!(fen, "terminal position, skipping search");
            return Ok(terminal);
        }
        if let Some(cached) = self.cache.get(fen, engine, depth) {
            return Ok(cached);
        }

        let evaluation = self.session.evaluate(fen, depth, |_| {}).await?;
        if !evaluation.lines.is_empty() {
            self.cache.put(fen, engine, evaluation.clone());
        }
        Ok(evaluation)
    }
}

/// Progress after `done` of `total` positions: rises steeply at first and
/// approaches, but never reaches, 100.
pub fn progress(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    99.0 - 99.0 * (-4.0 * done as f64 / total as f64).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fens_from_moves;
    use crate::evaluation::Score;
    use crate::fake_engine::FakeEngine;
    use crate::quality::MoveClassification;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn game(moves: &[&str]) -> (Vec<String>, Vec<String>) {
        let moves: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
        let fens = fens_from_moves(START, &moves).unwrap();
        (moves, fens)
    }

    #[test]
    fn test_progress_curve() {
        let values: Vec<f64> = (1..=10).map(|i| progress(i, 10)).collect();
        assert!(values.windows(2).all(|w| w[1] > w[0]));
        assert!(values.iter().all(|&v| v < 100.0));
        assert!(values[0] > 30.0);
        assert!(values[9] > 97.0);
    }

    #[tokio::test]
    async fn test_mated_position_is_not_searched() {
        let (moves, fens) = game(&["f2f3", "e7e5", "g2g4", "d8h4"]);
        let mut engine = FakeEngine::new();
        for fen in &fens[..4] {
            engine = engine.script(fen, &["info depth 8 multipv 1 score cp 20 pv a2a3"], "a2a3");
        }
        let (mut session, log) = engine.start();
        session.initialize().await.unwrap();
        let cache = EvaluationCache::new();
        let book = OpeningBook::new();

        let mut progress_values = Vec::new();
        let review = GameAnalyzer::new(&mut session, &cache, &book)
            .evaluate_game(&fens, &moves, &AnalysisConfig { depth: 8, multi_pv: 2 }, |p| {
                progress_values.push(p)
            })
            .await
            .unwrap();

        assert_eq!(log.searches_of(&fens[4]), 0);
        assert_eq!(log.search_count(), 4);
        let mated = &review.positions[4];
        assert_eq!(mated.lines.len(), 1);
        assert_eq!(mated.lines[0].score, Score::Mate(-1));
        assert_eq!(mated.lines[0].depth, 0);
        assert!(mated.lines[0].pv.is_empty());

        assert_eq!(progress_values.len(), 5);
        assert_eq!(review.positions[0].classification, None);
        assert!(review.positions[1..].iter().all(|p| p.classification.is_some()));
        assert_eq!(review.settings.engine, "FakeFish");
        assert_eq!(review.settings.multi_pv, 2);
        assert!(log.commands().contains(&"setoption name MultiPV value 2".to_string()));
        assert!(log.commands().contains(&"ucinewgame".to_string()));
    }

    #[tokio::test]
    async fn test_cached_positions_are_reused() {
        let (moves, fens) = game(&["e2e4"]);
        let (mut session, log) = FakeEngine::new()
            .script(&fens[1], &["info depth 10 multipv 1 score cp 30 pv e7e5"], "e7e5")
            .start();
        session.initialize().await.unwrap();

        let cache = EvaluationCache::new();
        let mut stored = PositionEvaluation::terminal(Score::Centipawns(25));
        stored.lines[0].depth = 12;
        stored.lines[0].pv = vec!["e2e4".to_string()];
        cache.put(&fens[0], "FakeFish", stored);
        let book = OpeningBook::builtin();

        let review = GameAnalyzer::new(&mut session, &cache, &book)
            .evaluate_game(&fens, &moves, &AnalysisConfig { depth: 10, multi_pv: 3 }, |_| {})
            .await
            .unwrap();

        assert_eq!(log.searches_of(&fens[0]), 0);
        assert_eq!(log.searches_of(&fens[1]), 1);
        assert_eq!(cache.len(), 2);
        assert_eq!(review.positions[1].classification, Some(MoveClassification::Book));
        assert_eq!(review.positions[1].lines[0].score, Score::Centipawns(-30));
    }

    #[tokio::test]
    async fn test_invalid_requests() {
        let (mut session, _log) = FakeEngine::new().start();
        session.initialize().await.unwrap();
        let cache = EvaluationCache::new();
        let book = OpeningBook::new();
        let mut analyzer = GameAnalyzer::new(&mut session, &cache, &book);
        let config = AnalysisConfig::default();

        let err = analyzer.evaluate_game(&[], &[], &config, |_| {}).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidGame(_)));

        let fens = vec![START.to_string()];
        let moves = vec!["e2e4".to_string()];
        let err = analyzer.evaluate_game(&fens, &moves, &config, |_| {}).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidGame(_)));
    }

    #[tokio::test]
    async fn test_uninitialized_session_aborts() {
        let (mut session, _log) = FakeEngine::new().start();
        let cache = EvaluationCache::new();
        let book = OpeningBook::new();
        let (moves, fens) = game(&["e2e4"]);

        let err = GameAnalyzer::new(&mut session, &cache, &book)
            .evaluate_game(&fens, &moves, &AnalysisConfig::default(), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Engine(EngineError::NotReady(_))));
    }
}
