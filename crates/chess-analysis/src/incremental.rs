//! Evaluation of the position currently on screen.
//!
//! Unlike a full review, interactive use needs one position quickly, with
//! intermediate lines as the search deepens. Attempts are retried until a
//! time budget runs out, in which case the outcome is
//! [`EvaluationOutcome::Unresolved`] rather than an error.

use std::time::Duration;

use chess_openings::OpeningBook;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

use crate::analyzer::AnalyzerError;
use crate::board::terminal_evaluation;
use crate::cache::EvaluationCache;
use crate::classification::{MoveClassifier, MoveContext};
use crate::engine::{EngineError, EngineSession};
use crate::evaluation::{EvaluationOutcome, PositionEvaluation};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Evaluations around one ply of a game.
#[derive(Debug, Clone, PartialEq)]
pub struct PlyReview {
    /// The position after the move, classified when both sides resolved.
    pub current: EvaluationOutcome,
    /// The position before the move; `None` at ply 0.
    pub previous: Option<EvaluationOutcome>,
}

pub struct PositionEvaluator<'a> {
    session: &'a mut EngineSession,
    cache: &'a EvaluationCache,
    book: &'a OpeningBook,
    timeout: Duration,
}

impl<'a> PositionEvaluator<'a> {
    pub fn new(
        session: &'a mut EngineSession,
        cache: &'a EvaluationCache,
        book: &'a OpeningBook,
    ) -> Self {
        Self {
            session,
            cache,
            book,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Budget used by [`review_ply`](Self::review_ply) for each position.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Evaluates `fen`, streaming intermediate lines to `on_partial`.
    ///
    /// Cached and terminal positions resolve immediately. Otherwise the
    /// search is retried until it produces at least one line or `budget`
    /// is spent. Engine failures are returned as errors.
    pub async fn evaluate_with_retry<F>(
        &mut self,
        fen: &str,
        depth: u32,
        multi_pv: u32,
        mut on_partial: F,
        budget: Duration,
    ) -> Result<EvaluationOutcome, AnalyzerError>
    where
        F: FnMut(&PositionEvaluation),
    {
        let engine = self.session.name().to_string();
        if let Some(hit) = self.cache.get(fen, &engine, depth) {
            on_partial(&hit);
            return Ok(EvaluationOutcome::Resolved(hit));
        }
        if let Some(terminal) = terminal_evaluation(fen)? {
            on_partial(&terminal);
            return Ok(EvaluationOutcome::Resolved(terminal));
        }

        let started = Instant::now();
        let mut attempts = 0u32;
        while let Some(remaining) = budget.checked_sub(started.elapsed()) {
            if remaining.is_zero() {
                break;
            }
            attempts += 1;

            let attempt = timeout(
                remaining,
                self.attempt(fen, depth, multi_pv, &mut on_partial),
            )
            .await;
            match attempt {
                Err(_) => break,
                Ok(Err(e)) => return Err(e.into()),
                Ok(Ok(evaluation)) if !evaluation.lines.is_empty() => {
                    self.cache.put(fen, &engine, evaluation.clone());
                    return Ok(EvaluationOutcome::Resolved(evaluation));
                }
                Ok(Ok(_)) => {
                    debug!(fen, attempts, "search returned no lines, retrying");
                    sleep(RETRY_DELAY).await;
                }
            }
        }

        warn!(
            fen,
            attempts,
            budget_ms = budget.as_millis() as u64,
            "evaluation unresolved"
        );
        Ok(EvaluationOutcome::Unresolved)
    }

    async fn attempt<F>(
        &mut self,
        fen: &str,
        depth: u32,
        multi_pv: u32,
        on_partial: &mut F,
    ) -> Result<PositionEvaluation, EngineError>
    where
        F: FnMut(&PositionEvaluation),
    {
        self.session.configure_lines(multi_pv).await?;
        self.session.evaluate(fen, depth, on_partial).await
    }

    /// Evaluates the position at `ply` and the one before it, then
    /// classifies the move between them.
    ///
    /// Only the current position streams to `on_partial`.
    pub async fn review_ply<F>(
        &mut self,
        fens: &[String],
        moves: &[String],
        ply: usize,
        depth: u32,
        multi_pv: u32,
        on_partial: F,
    ) -> Result<PlyReview, AnalyzerError>
    where
        F: FnMut(&PositionEvaluation),
    {
        if ply >= fens.len() || moves.len() + 1 != fens.len() {
            return Err(AnalyzerError::InvalidGame(format!(
                "ply {} out of range for {} positions and {} moves",
                ply,
                fens.len(),
                moves.len()
            )));
        }

        let budget = self.timeout;
        let current = self
            .evaluate_with_retry(&fens[ply], depth, multi_pv, on_partial, budget)
            .await?;
        if ply == 0 {
            return Ok(PlyReview {
                current,
                previous: None,
            });
        }

        let previous = self
            .evaluate_with_retry(&fens[ply - 1], depth, multi_pv, |_| {}, budget)
            .await?;

        let classified = match (&current, &previous) {
            (EvaluationOutcome::Resolved(after), EvaluationOutcome::Resolved(before)) => {
                let classifier = MoveClassifier::new(self.book);
                let mut ctx = MoveContext::new(
                    ply,
                    before,
                    after,
                    &moves[ply - 1],
                    &fens[ply - 1],
                    &fens[ply],
                )?;
                if ply > 1 {
                    ctx = ctx.with_previous_move(&fens[ply - 2], &moves[ply - 2])?;
                }
                let mut labelled = after.clone();
                labelled.classification = Some(classifier.classify_move(&ctx));
                labelled.opening = classifier.opening_at(fens, ply);
                Some(labelled)
            }
            _ => None,
        };

        Ok(PlyReview {
            current: classified.map_or(current, EvaluationOutcome::Resolved),
            previous: Some(previous),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fens_from_moves;
    use crate::engine::SessionState;
    use crate::evaluation::{EvaluationLine, Score};
    use crate::fake_engine::FakeEngine;
    use crate::quality::MoveClassification;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn cached(depth: u32, cp: i32) -> PositionEvaluation {
        PositionEvaluation {
            lines: vec![EvaluationLine {
                pv: vec!["e2e4".to_string()],
                depth,
                multi_pv: 1,
                score: Score::Centipawns(cp),
            }],
            best_move: Some("e2e4".to_string()),
            ..PositionEvaluation::default()
        }
    }

    #[tokio::test]
    async fn test_cache_hit_skips_engine() {
        let (mut session, log) = FakeEngine::new().hanging().start();
        session.initialize().await.unwrap();
        let cache = EvaluationCache::new();
        cache.put(START, "FakeFish", cached(18, 25));
        let book = OpeningBook::new();

        let mut partials = 0;
        let outcome = PositionEvaluator::new(&mut session, &cache, &book)
            .evaluate_with_retry(START, 16, 3, |_| partials += 1, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(outcome, EvaluationOutcome::Resolved(cached(18, 25)));
        assert_eq!(partials, 1);
        assert_eq!(log.search_count(), 0);
    }

    #[tokio::test]
    async fn test_fresh_result_is_cached_and_streamed() {
        let (mut session, _log) = FakeEngine::new()
            .script(
                START,
                &[
                    "info depth 1 multipv 1 score cp 15 pv e2e4",
                    "info depth 2 multipv 1 score cp 22 pv e2e4",
                ],
                "e2e4",
            )
            .start();
        session.initialize().await.unwrap();
        let cache = EvaluationCache::new();
        let book = OpeningBook::new();

        let mut depths = Vec::new();
        let outcome = PositionEvaluator::new(&mut session, &cache, &book)
            .evaluate_with_retry(START, 2, 3, |p| depths.push(p.depth()), DEFAULT_TIMEOUT)
            .await
            .unwrap();

        assert!(outcome.is_resolved());
        assert_eq!(depths, vec![1, 2]);
        assert!(cache.get(START, "FakeFish", 2).is_some());
    }

    #[tokio::test]
    async fn test_hung_engine_is_unresolved() {
        let (mut session, _log) = FakeEngine::new().hanging().start();
        session.initialize().await.unwrap();
        let cache = EvaluationCache::new();
        let book = OpeningBook::new();

        let started = std::time::Instant::now();
        let outcome = PositionEvaluator::new(&mut session, &cache, &book)
            .evaluate_with_retry(START, 30, 3, |_| {}, Duration::from_millis(200))
            .await
            .unwrap();

        assert_eq!(outcome, EvaluationOutcome::Unresolved);
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert!(cache.is_empty());

        // The abandoned search is stopped before the next one starts.
        session.new_game().await.unwrap();
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_empty_results_are_retried() {
        let (mut session, log) = FakeEngine::new().script(START, &[], "(none)").start();
        session.initialize().await.unwrap();
        let cache = EvaluationCache::new();
        let book = OpeningBook::new();

        let outcome = PositionEvaluator::new(&mut session, &cache, &book)
            .evaluate_with_retry(START, 10, 3, |_| {}, Duration::from_millis(350))
            .await
            .unwrap();

        assert_eq!(outcome, EvaluationOutcome::Unresolved);
        assert!(log.searches_of(START) >= 2);
    }

    #[tokio::test]
    async fn test_mated_position_resolves_without_search() {
        let fens = fens_from_moves(START, &["f2f3", "e7e5", "g2g4", "d8h4"]).unwrap();
        let (mut session, log) = FakeEngine::new().hanging().start();
        session.initialize().await.unwrap();
        let cache = EvaluationCache::new();
        let book = OpeningBook::new();

        let outcome = PositionEvaluator::new(&mut session, &cache, &book)
            .evaluate_with_retry(&fens[4], 12, 3, |_| {}, DEFAULT_TIMEOUT)
            .await
            .unwrap();

        let evaluation = outcome.into_resolved().unwrap();
        assert_eq!(evaluation.lines[0].score, Score::Mate(-1));
        assert_eq!(log.search_count(), 0);
    }

    #[tokio::test]
    async fn test_uninitialized_session_is_an_error() {
        let (mut session, _log) = FakeEngine::new().start();
        let cache = EvaluationCache::new();
        let book = OpeningBook::new();

        let err = PositionEvaluator::new(&mut session, &cache, &book)
            .evaluate_with_retry(START, 12, 3, |_| {}, DEFAULT_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Engine(EngineError::NotReady(_))));
    }

    #[tokio::test]
    async fn test_review_ply_classifies_move() {
        let moves = vec!["e2e4".to_string()];
        let fens = fens_from_moves(START, &moves).unwrap();
        let (mut session, _log) = FakeEngine::new()
            .script(&fens[0], &["info depth 12 multipv 1 score cp 30 pv e2e4"], "e2e4")
            .script(&fens[1], &["info depth 12 multipv 1 score cp -28 pv e7e5"], "e7e5")
            .start();
        session.initialize().await.unwrap();
        let cache = EvaluationCache::new();
        let book = OpeningBook::builtin();

        let mut evaluator = PositionEvaluator::new(&mut session, &cache, &book);
        let review = evaluator.review_ply(&fens, &moves, 1, 12, 3, |_| {}).await.unwrap();

        let current = review.current.into_resolved().unwrap();
        assert_eq!(current.classification, Some(MoveClassification::Book));
        assert_eq!(current.opening.as_deref(), Some("King's Pawn Opening"));
        assert_eq!(current.lines[0].score, Score::Centipawns(28));
        assert!(review.previous.unwrap().is_resolved());

        let start = evaluator.review_ply(&fens, &moves, 0, 12, 3, |_| {}).await.unwrap();
        assert!(start.previous.is_none());
        assert_eq!(start.current.as_resolved().unwrap().classification, None);

        let err = evaluator.review_ply(&fens, &moves, 2, 12, 3, |_| {}).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidGame(_)));
    }
}
