//! Ignored apps persistence
//!
//! Handles loading and saving the apps the user hid from the update list.
//! The list is a JSON file in the config directory and is rewritten after
//! every change.

use anyhow::{Context, Result};
use appdb_client::{IgnoreEntry, IgnoreStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::paths;

const IGNORED_APPS_VERSION: u32 = 1;

/// On-disk layout of the ignored apps file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IgnoredAppsFile {
    last_modified: DateTime<Utc>,
    version: u32,
    #[serde(default)]
    apps: Vec<IgnoreEntry>,
}

/// File-backed ignore list
#[derive(Debug)]
pub struct IgnoredApps {
    path: PathBuf,
    entries: Mutex<Vec<IgnoreEntry>>,
}

impl IgnoredApps {
    /// Load the ignore list from the default location
    pub fn load() -> Result<Self> {
        Ok(Self::load_from_path(paths::ignored_apps_path()?))
    }

    /// Load the ignore list from a specific path
    ///
    /// Returns an empty list if the file doesn't exist or can't be parsed.
    pub fn load_from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read(&path) {
            Ok(Some(file)) => {
                log::info!("Loaded {} ignored apps from {:?}", file.apps.len(), path);
                file.apps
            }
            Ok(None) => {
                log::debug!("No ignored apps file found, starting fresh");
                Vec::new()
            }
            Err(e) => {
                log::warn!("Failed to load ignored apps file: {:#}", e);
                Vec::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn read(path: &Path) -> Result<Option<IgnoredAppsFile>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read ignored apps file: {:?}", path))?;
        let file = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse ignored apps file: {:?}", path))?;
        Ok(Some(file))
    }

    fn save(&self, entries: &[IgnoreEntry]) -> Result<()> {
        let file = IgnoredAppsFile {
            last_modified: Utc::now(),
            version: IGNORED_APPS_VERSION,
            apps: entries.to_vec(),
        };
        let content =
            serde_json::to_string_pretty(&file).context("Failed to serialize ignored apps")?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write ignored apps file: {:?}", self.path))?;

        log::info!("Saved {} ignored apps to {:?}", entries.len(), self.path);
        Ok(())
    }

    /// Path the list is persisted to
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> MutexGuard<'_, Vec<IgnoreEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl IgnoreStore for IgnoredApps {
    fn contains(&self, track_id: &str) -> bool {
        self.entries().iter().any(|e| e.track_id == track_id)
    }

    fn add(&self, entry: IgnoreEntry) -> Result<()> {
        let mut entries = self.entries();
        if entries.iter().any(|e| e.track_id == entry.track_id) {
            log::debug!("{} is already ignored", entry.track_id);
            return Ok(());
        }
        entries.push(entry);
        if let Err(e) = self.save(&entries) {
            entries.pop();
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, track_id: &str) -> Result<bool> {
        let mut entries = self.entries();
        let Some(index) = entries.iter().position(|e| e.track_id == track_id) else {
            return Ok(false);
        };
        let removed = entries.remove(index);
        if let Err(e) = self.save(&entries) {
            entries.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }

    fn all(&self) -> Vec<IgnoreEntry> {
        self.entries().clone()
    }
}
