//! Player profile store
//!
//! Simple get/set/delete record store for player profiles and their run
//! times, behind a request/response trait. Score submission is best-effort:
//! callers log `StoreError` and keep playing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A stored player record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: String,
    pub name: String,
    /// Reference to an avatar image held by the front-end
    pub avatar_id: Option<String>,
    /// Fastest successful run in seconds (lower is better)
    pub best_time: Option<f32>,
    /// Most recent run in seconds
    pub last_time: Option<f32>,
}

impl PlayerProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_id: None,
            best_time: None,
            last_time: None,
        }
    }
}

/// Partial-field update. `last_time` always overwrites; `best_time` is a
/// candidate, applied only when strictly lower than the stored value or when
/// none is set.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar_id: Option<String>,
    pub last_time: Option<f32>,
    pub best_time: Option<f32>,
}

impl ProfileUpdate {
    /// Update for a finished round: `best_candidate` only on a successful run
    pub fn run_times(last: f32, best_candidate: Option<f32>) -> Self {
        Self {
            last_time: Some(last),
            best_time: best_candidate,
            ..Self::default()
        }
    }
}

/// Profile store failures (transient: log and continue)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile {0} not found")]
    NotFound(String),
    #[error("profile {0} already exists")]
    Duplicate(String),
    #[error("profile store I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile store corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Request/response operations on the profile store
pub trait ProfileStore {
    fn create(&mut self, profile: PlayerProfile) -> Result<(), StoreError>;
    fn get(&self, id: &str) -> Result<Option<PlayerProfile>, StoreError>;
    fn list(&self) -> Result<Vec<PlayerProfile>, StoreError>;
    fn update(&mut self, id: &str, update: ProfileUpdate) -> Result<PlayerProfile, StoreError>;
    fn clear_scores(&mut self, id: &str) -> Result<PlayerProfile, StoreError>;
    fn delete(&mut self, id: &str) -> Result<bool, StoreError>;
}

fn apply_update(profile: &mut PlayerProfile, update: ProfileUpdate) {
    if let Some(name) = update.name {
        profile.name = name;
    }
    if let Some(avatar) = update.avatar_id {
        profile.avatar_id = Some(avatar);
    }
    if let Some(last) = update.last_time {
        profile.last_time = Some(last);
    }
    if let Some(candidate) = update.best_time {
        let improves = profile.best_time.is_none_or(|best| candidate < best);
        if improves {
            profile.best_time = Some(candidate);
        }
    }
}

/// In-memory store for tests and headless demos
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: Vec<PlayerProfile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.profiles.iter().position(|p| p.id == id)
    }
}

impl ProfileStore for MemoryStore {
    fn create(&mut self, profile: PlayerProfile) -> Result<(), StoreError> {
        if self.index_of(&profile.id).is_some() {
            return Err(StoreError::Duplicate(profile.id));
        }
        self.profiles.push(profile);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<PlayerProfile>, StoreError> {
        Ok(self.index_of(id).map(|i| self.profiles[i].clone()))
    }

    fn list(&self) -> Result<Vec<PlayerProfile>, StoreError> {
        Ok(self.profiles.clone())
    }

    fn update(&mut self, id: &str, update: ProfileUpdate) -> Result<PlayerProfile, StoreError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply_update(&mut self.profiles[index], update);
        Ok(self.profiles[index].clone())
    }

    fn clear_scores(&mut self, id: &str) -> Result<PlayerProfile, StoreError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.profiles[index].best_time = None;
        self.profiles[index].last_time = None;
        Ok(self.profiles[index].clone())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        match self.index_of(id) {
            Some(index) => {
                let _ = self.profiles.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// JSON-file-backed store: the whole profile list is rewritten after every
/// mutation
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open a store, loading existing profiles. A missing file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let profiles = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        log::info!("loaded {} profiles from {}", profiles.len(), path.display());
        Ok(Self {
            path,
            inner: MemoryStore { profiles },
        })
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.inner.profiles)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ProfileStore for JsonFileStore {
    fn create(&mut self, profile: PlayerProfile) -> Result<(), StoreError> {
        self.inner.create(profile)?;
        self.flush()
    }

    fn get(&self, id: &str) -> Result<Option<PlayerProfile>, StoreError> {
        self.inner.get(id)
    }

    fn list(&self) -> Result<Vec<PlayerProfile>, StoreError> {
        self.inner.list()
    }

    fn update(&mut self, id: &str, update: ProfileUpdate) -> Result<PlayerProfile, StoreError> {
        let profile = self.inner.update(id, update)?;
        self.flush()?;
        Ok(profile)
    }

    fn clear_scores(&mut self, id: &str) -> Result<PlayerProfile, StoreError> {
        let profile = self.inner.clear_scores(id)?;
        self.flush()?;
        Ok(profile)
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let deleted = self.inner.delete(id)?;
        if deleted {
            self.flush()?;
        }
        Ok(deleted)
    }
}
