//! Game store - one JSON file per game
//!
//! Files live at `<games_dir>/<gameId>.json` and hold a pretty-printed
//! [`GameRecord`]. Callers that load, mutate and save a game hold the
//! per-identifier lock from [`GameStore::lock`] for the whole sequence.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, warn};

use crate::core::GameState;
use crate::protocol::GameRecord;

type LockMap = Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>;

pub struct GameStore {
    dir: PathBuf,
    locks: LockMap,
}

/// Exclusive access to one game id.
///
/// The id's entry leaves the lock map when the last guard or waiter for it
/// is gone, so the map only holds ids that are in use right now.
pub struct GameLock {
    id: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: LockMap,
}

impl Drop for GameLock {
    fn drop(&mut self) {
        // Release first so our own Arc no longer counts.
        drop(self.guard.take());
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if locks
            .get(&self.id)
            .is_some_and(|mutex| Arc::strong_count(mutex) == 1)
        {
            locks.remove(&self.id);
        }
    }
}

impl GameStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Create the games directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create games dir {}", self.dir.display()))
    }

    /// Serialize access to one game.
    pub async fn lock(&self, id: &str) -> GameLock {
        let mutex = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(id.to_string()).or_default().clone()
        };
        GameLock {
            id: id.to_string(),
            guard: Some(mutex.lock_owned().await),
            locks: self.locks.clone(),
        }
    }

    #[cfg(test)]
    fn lock_entries(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub async fn exists(&self, id: &str) -> bool {
        tokio::fs::try_exists(self.path_for(id))
            .await
            .unwrap_or(false)
    }

    /// Load a game. A missing file is `Ok(None)`.
    pub async fn load(&self, id: &str) -> Result<Option<GameState>> {
        let path = self.path_for(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        };

        let record: GameRecord = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let state = GameState::try_from(record)
            .with_context(|| format!("invalid game state in {}", path.display()))?;
        Ok(Some(state))
    }

    /// Write a game, replacing any previous file.
    pub async fn save(&self, id: &str, state: &GameState) -> Result<()> {
        let path = self.path_for(id);
        let json = serde_json::to_vec_pretty(&GameRecord::from(state))?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(game_id = id, "saved game");
        Ok(())
    }

    /// Delete a game. Returns false when there was nothing to delete.
    ///
    /// Callers hold the game's lock.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let path = self.path_for(id);
        let deleted = match tokio::fs::remove_file(&path).await {
            Ok(()) => true,
            Err(err) if err.kind() == ErrorKind::NotFound => false,
            Err(err) => {
                return Err(err).with_context(|| format!("failed to delete {}", path.display()))
            }
        };
        Ok(deleted)
    }

    /// Remove game files whose modification time is older than `max_age`.
    ///
    /// Problems with individual files are logged and skipped. Returns the
    /// number of files removed.
    pub async fn cleanup_older_than(&self, max_age: Duration) -> Result<usize> {
        let cutoff = SystemTime::now()
            .checked_sub(max_age)
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("failed to list {}", self.dir.display()))?;

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            // Hold the game's lock so an in-flight move cannot resurrect the file.
            let _guard = match path.file_stem().and_then(|s| s.to_str()) {
                Some(id) => Some(self.lock(id).await),
                None => None,
            };
            match expire_file(&path, cutoff).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(err) => warn!(path = %path.display(), "error cleaning up game file: {err:#}"),
            }
        }

        Ok(removed)
    }
}

async fn expire_file(path: &Path, cutoff: SystemTime) -> Result<bool> {
    let modified = tokio::fs::metadata(path).await?.modified()?;
    if modified >= cutoff {
        return Ok(false);
    }
    tokio::fs::remove_file(path).await?;
    Ok(true)
}
