//! Evaluation store backed by a single JSON file.
//!
//! The file maps FEN to `{ engine, lines, best_move }`. Entries are kept in
//! memory and written back by [`JsonFileStore::flush`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chess_analysis::{CachedEvaluation, EvaluationStore};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, CachedEvaluation>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries: BTreeMap<String, CachedEvaluation> = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), entries = entries.len(), "opened evaluation store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Writes every entry back to the file.
    pub fn flush(&self) -> Result<(), StoreError> {
        let json = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            serde_json::to_string_pretty(&*entries)?
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "flushed evaluation store");
        Ok(())
    }
}

impl EvaluationStore for JsonFileStore {
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

#[cfg(test)]
mod tests {
    use super::*;
    use chess_analysis::{EvaluationCache, EvaluationLine, PositionEvaluation, Score};
    use std::sync::Arc;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn evaluation(depth: u32) -> PositionEvaluation {
        PositionEvaluation {
            lines: vec![EvaluationLine {
                pv: vec!["e2e4".to_string(), "e7e5".to_string()],
                depth,
                multi_pv: 1,
                score: Score::Centipawns(31),
            }],
            best_move: Some("e2e4".to_string()),
            ..PositionEvaluation::default()
        }
    }

    #[test]
    fn test_entries_survive_flush_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("evaluations.json");

        let store = Arc::new(JsonFileStore::open(&path).unwrap());
        assert_eq!(store.len(), 0);
        let cache = EvaluationCache::new().with_store(store.clone());
        cache.put(START, "Stockfish 17", evaluation(18));
        store.flush().unwrap();

        let reopened = Arc::new(JsonFileStore::open(&path).unwrap());
        assert_eq!(reopened.len(), 1);
        let cache = EvaluationCache::new().with_store(reopened);
        assert_eq!(cache.get(START, "Stockfish 17", 16), Some(evaluation(18)));
        assert_eq!(cache.get(START, "Stockfish 17", 20), None);
        assert_eq!(cache.get(START, "Komodo", 16), None);
    }

    #[test]
    fn test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evaluations.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.save(
            START,
            &CachedEvaluation {
                engine: "Stockfish 17".to_string(),
                evaluation: evaluation(12),
            },
        );
        store.flush().unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let entry = &value[START];
        assert_eq!(entry["engine"], "Stockfish 17");
        assert_eq!(entry["best_move"], "e2e4");
        assert_eq!(entry["lines"][0]["cp"], 31);
        assert_eq!(entry["lines"][0]["depth"], 12);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evaluations.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path).unwrap_err(),
            StoreError::Json(_)
        ));
    }
}
