//! Rating state persistence
//!
//! This module defines the interface for loading and saving the engine's
//! persisted state, with a JSON-file implementation and a mock for tests.
//! The state file is read once at the start of a run and fully rewritten at
//! the end; only one process instance is assumed to run at a time.

use crate::error::{HonorRollError, Result};
use crate::rating::engine::RatingState;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

/// Trait for rating state storage operations
pub trait StateStore: Send + Sync {
    /// Load the persisted state; a missing store yields an empty state
    fn load(&self) -> Result<RatingState>;

    /// Persist the complete state, replacing whatever was stored before
    fn save(&self, state: &RatingState) -> Result<()>;
}

/// JSON-file backed state store (`rating_state.json`)
#[derive(Debug)]
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStateStore {
    fn load(&self) -> Result<RatingState> {
        if !self.path.exists() {
            info!("No state file at {}, starting empty", self.path.display());
            return Ok(RatingState::new());
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            HonorRollError::StateStorageError {
                message: format!("Failed to read {}: {}", self.path.display(), e),
            }
        })?;

        // An undecodable state file is treated as empty rather than fatal,
        // matching the tolerant load-or-reset behavior of the consumer side.
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!(
                    "State file {} is not valid state JSON ({}), starting empty",
                    self.path.display(),
                    e
                );
                Ok(RatingState::new())
            }
        }
    }

    fn save(&self, state: &RatingState) -> Result<()> {
        let rendered = serde_json::to_string_pretty(state).map_err(|e| {
            HonorRollError::StateStorageError {
                message: format!("Failed to serialize state: {}", e),
            }
        })?;

        std::fs::write(&self.path, rendered).map_err(|e| {
            HonorRollError::StateStorageError {
                message: format!("Failed to write {}: {}", self.path.display(), e),
            }
        })?;

        Ok(())
    }
}

/// Mock state store for testing
#[derive(Debug, Default)]
pub struct MockStateStore {
    state: Mutex<RatingState>,
    save_calls: Mutex<Vec<RatingState>>,
}

impl MockStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset the state returned by `load` (for testing)
    pub fn preset_state(&self, state: RatingState) {
        if let Ok(mut stored) = self.state.lock() {
            *stored = state;
        }
    }

    /// Get all states passed to `save` (for testing)
    pub fn get_save_calls(&self) -> Vec<RatingState> {
        self.save_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl StateStore for MockStateStore {
    fn load(&self) -> Result<RatingState> {
        let state = self
            .state
            .lock()
            .map_err(|_| HonorRollError::StateStorageError {
                message: "Failed to acquire state lock".to_string(),
            })?;
        Ok(state.clone())
    }

    fn save(&self, state: &RatingState) -> Result<()> {
        if let Ok(mut calls) = self.save_calls.lock() {
            calls.push(state.clone());
        }

        let mut stored = self
            .state
            .lock()
            .map_err(|_| HonorRollError::StateStorageError {
                message: "Failed to acquire state lock".to_string(),
            })?;
        *stored = state.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("rating_state.json"));

        let state = store.load().unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("rating_state.json"));

        let mut state = RatingState::new();
        state.observe("eu|goldrinn|ashka", "2024-01", 150);
        store.save(&state).unwrap();

        let restored = store.load().unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_undecodable_file_loads_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rating_state.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = JsonFileStateStore::new(path);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("rating_state.json"));

        let mut first = RatingState::new();
        first.observe("a", "2024-01", 1);
        first.observe("b", "2024-01", 2);
        store.save(&first).unwrap();

        let mut second = RatingState::new();
        second.observe("a", "2024-02", 3);
        store.save(&second).unwrap();

        let restored = store.load().unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.get("a").unwrap().month, "2024-02");
    }

    #[test]
    fn test_mock_store_records_saves() {
        let store = MockStateStore::new();
        let mut state = RatingState::new();
        state.observe("k", "2024-01", 10);

        store.save(&state).unwrap();
        assert_eq!(store.get_save_calls().len(), 1);
        assert_eq!(store.load().unwrap(), state);
    }
}
