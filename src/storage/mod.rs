//! Persisted Local Cache
//!
//! Flat key-value snapshot of the client's session: the staged move,
//! the last confirmed move, and the serialized known board. The state
//! machine reads and writes this snapshot through the [`CacheStore`]
//! capability; durability belongs to the storage medium, not to us.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::game::board::KnownBoard;
use crate::game::state::{ConfirmedMove, StagedMove};

/// Storage failure while loading or saving the cache.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error.
    #[error("cache i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// Cache contents did not parse.
    #[error("cache is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Serializable snapshot of session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCache {
    /// Staged move, if a submission was in flight when last saved.
    pub staged: Option<StagedMove>,
    /// Last confirmed move.
    pub confirmed: Option<ConfirmedMove>,
    /// Known-board entries.
    pub board: KnownBoard,
}

/// Read/write capability for the persisted cache.
///
/// Injected into the state machine so it can be tested without a
/// storage backend.
pub trait CacheStore {
    /// Load the last saved snapshot, or `None` if nothing was saved.
    fn load(&self) -> Result<Option<PersistedCache>, StorageError>;

    /// Replace the snapshot.
    fn save(&mut self, cache: &PersistedCache) -> Result<(), StorageError>;

    /// Discard the snapshot. Used when re-initializing a session from
    /// scratch.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Option<PersistedCache>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a snapshot.
    pub fn with_snapshot(cache: PersistedCache) -> Self {
        Self {
            snapshot: Some(cache),
        }
    }
}

impl CacheStore for MemoryStore {
    fn load(&self) -> Result<Option<PersistedCache>, StorageError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, cache: &PersistedCache) -> Result<(), StorageError> {
        self.snapshot = Some(cache.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.snapshot = None;
        Ok(())
    }
}

/// JSON-file-backed store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by the given path. The file is created on first save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStore for JsonFileStore {
    fn load(&self) -> Result<Option<PersistedCache>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&self.path)?;
        let cache = serde_json::from_str(&data)?;
        Ok(Some(cache))
    }

    fn save(&mut self, cache: &PersistedCache) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(cache)?;
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "cache saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Coordinate;
    use crate::proof::params::PublicParams;

    fn sample_cache() -> PersistedCache {
        let params = PublicParams::from_u64(23, 19, 5, 7).unwrap();
        let coordinate = Coordinate::from_u64(4, 2);
        let commitment = coordinate.commitment(&params).unwrap();
        let mut board = KnownBoard::new();
        board.record(coordinate.clone(), commitment.clone());
        PersistedCache {
            staged: None,
            confirmed: Some(ConfirmedMove {
                coordinate,
                commitment,
            }),
            board,
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let cache = sample_cache();
        store.save(&cache).unwrap();
        assert_eq!(store.load().unwrap(), Some(cache));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "gridveil-cache-test-{}.json",
            std::process::id()
        ));
        let mut store = JsonFileStore::new(&path);
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        let cache = sample_cache();
        store.save(&cache).unwrap();
        assert_eq!(store.load().unwrap(), Some(cache));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_cache_reported() {
        let path = std::env::temp_dir().join(format!(
            "gridveil-corrupt-test-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StorageError::Corrupt(_))));
        std::fs::remove_file(&path).unwrap();
    }
}
