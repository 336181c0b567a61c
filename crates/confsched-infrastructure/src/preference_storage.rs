//! PreferenceStorage implementations.

use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use confsched_core::repository::{PreferenceStorage, PreferenceUpdate, Preferences};
use confsched_core::sync::lock;
use confsched_core::{Result, ScheduleError};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Preferences persisted to a TOML file.
///
/// File access runs on the blocking pool; updates are serialized by the
/// file's lock so concurrent writers never lose each other's changes.
pub struct TomlPreferenceStorage {
    file: Arc<AtomicTomlFile<Preferences>>,
}

impl TomlPreferenceStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }
}

#[async_trait]
impl PreferenceStorage for TomlPreferenceStorage {
    async fn load(&self) -> Result<Preferences> {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| ScheduleError::internal(format!("Preference load task failed: {}", e)))?
            .map(Option::unwrap_or_default)
    }

    async fn update(&self, update: PreferenceUpdate) -> Result<Preferences> {
        let file = Arc::clone(&self.file);
        debug!(?update, path = %file.path().display(), "Updating preferences");
        tokio::task::spawn_blocking(move || {
            file.update(Preferences::default(), |prefs| {
                prefs.apply(update);
            })
        })
        .await
        .map_err(|e| ScheduleError::internal(format!("Preference update task failed: {}", e)))?
    }
}

/// Preferences held in memory only.
#[derive(Default)]
pub struct InMemoryPreferenceStorage {
    preferences: Mutex<Preferences>,
}

impl InMemoryPreferenceStorage {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences: Mutex::new(preferences),
        }
    }
}

#[async_trait]
impl PreferenceStorage for InMemoryPreferenceStorage {
    async fn load(&self) -> Result<Preferences> {
        Ok(lock(&self.preferences).clone())
    }

    async fn update(&self, update: PreferenceUpdate) -> Result<Preferences> {
        let mut preferences = lock(&self.preferences);
        preferences.apply(update);
        Ok(preferences.clone())
    }
}
