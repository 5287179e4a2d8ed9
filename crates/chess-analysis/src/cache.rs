//! Evaluation reuse across searches.
//!
//! Entries are keyed by `(FEN, engine name)` and only served when the stored
//! search went at least as deep as the caller asks for. The cache is shared
//! by reference; its lock is held only for map access and never across an
//! `.await`.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::evaluation::PositionEvaluation;

/// A stored evaluation together with the engine that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEvaluation {
    pub engine: String,
    #[serde(flatten)]
    pub evaluation: PositionEvaluation,
}

impl CachedEvaluation {
    /// Usable for a lookup by `engine` that needs at least `min_depth`.
    pub fn is_fresh(&self, engine: &str, min_depth: u32) -> bool {
        self.engine == engine
            && self
                .evaluation
                .top_line()
                .is_some_and(|line| line.depth >= min_depth)
    }
}

/// Persistent backing for an [`EvaluationCache`], keyed by FEN.
pub trait EvaluationStore: Send + Sync {
    fn load(&self, fen: &str) -> Option<CachedEvaluation>;
    fn save(&self, fen: &str, entry: &CachedEvaluation);
}

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CachedEvaluation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EvaluationStore for MemoryStore {
    fn load(&self, fen: &str) -> Option<CachedEvaluation> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(fen)
            .cloned()
    }

    fn save(&self, fen: &str, entry: &CachedEvaluation) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(fen.to_string(), entry.clone());
    }
}

type CacheKey = (String, String);

#[derive(Default)]
struct Entries {
    map: HashMap<CacheKey, PositionEvaluation>,
    /// Insertion order, used for eviction when bounded.
    order: VecDeque<CacheKey>,
}

/// Last-write-wins map from `(FEN, engine)` to an evaluation.
#[derive(Default)]
pub struct EvaluationCache {
    entries: RwLock<Entries>,
    capacity: Option<usize>,
    store: Option<Arc<dyn EvaluationStore>>,
}

impl EvaluationCache {
    /// Unbounded, memory-only cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds at most `capacity` keys, evicting the oldest inserted first.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    /// Reads through to and writes through to `store`.
    pub fn with_store(mut self, store: Arc<dyn EvaluationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Returns the stored evaluation if it was produced by `engine` at
    /// `min_depth` or deeper.
    pub fn get(&self, fen: &str, engine: &str, min_depth: u32) -> Option<PositionEvaluation> {
        let key = (fen.to_string(), engine.to_string());
        let hit = self
            .read()
            .map
            .get(&key)
            .filter(|eval| eval.depth() >= min_depth && !eval.lines.is_empty())
            .cloned();
        if hit.is_some() {
            trace!(fen, "cache hit");
            return hit;
        }

        let stored = self.store.as_ref()?.load(fen)?;
        if !stored.is_fresh(engine, min_depth) {
            return None;
        }
        trace!(fen, "store hit");
        self.insert(key, stored.evaluation.clone());
        Some(stored.evaluation)
    }

    /// Stores `evaluation`, replacing any previous entry for the key.
    pub fn put(&self, fen: &str, engine: &str, evaluation: PositionEvaluation) {
        let key = (fen.to_string(), engine.to_string());
        if let Some(store) = &self.store {
            store.save(
                fen,
                &CachedEvaluation {
                    engine: engine.to_string(),
                    evaluation: evaluation.clone(),
                },
            );
        }
        self.insert(key, evaluation);
    }

    pub fn len(&self) -> usize {
        self.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All in-memory entries as `(fen, entry)` pairs.
    pub fn snapshot(&self) -> Vec<(String, CachedEvaluation)> {
        self.read()
            .map
            .iter()
            .map(|((fen, engine), evaluation)| {
                (
                    fen.clone(),
                    CachedEvaluation {
                        engine: engine.clone(),
                        evaluation: evaluation.clone(),
                    },
                )
            })
            .collect()
    }

    fn insert(&self, key: CacheKey, evaluation: PositionEvaluation) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.map.insert(key.clone(), evaluation).is_none() {
            entries.order.push_back(key);
        }

        if let Some(capacity) = self.capacity {
            while entries.map.len() > capacity {
                match entries.order.pop_front() {
                    Some(oldest) => {
                        entries.map.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}
