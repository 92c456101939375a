// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::models::{AppSettings, DEFAULT_USER_ID};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Ledgerclip", "ledgerclip"));

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const BUDGETS_KEY: &str = "budgets";
pub const RECURRING_KEY: &str = "recurring_transactions";
pub const SETTINGS_KEY: &str = "settings";
pub const LAST_RECURRING_RUN_KEY: &str = "last_recurring_run";

/// JSON snapshot store: one file per collection key in the data directory.
/// Reads degrade to an empty collection on malformed data; writes replace
/// the whole snapshot. A single active process is assumed; concurrent
/// writers race last-write-wins.
pub struct Store {
    dir: PathBuf,
}

pub fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().to_path_buf())
}

impl Store {
    pub fn open_default() -> Result<Self> {
        Self::open(data_dir()?)
    }

    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
        Ok(Store { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.json", key, DEFAULT_USER_ID))
    }

    /// Load a full collection. Missing files yield an empty collection;
    /// malformed contents are logged and also yield an empty collection so
    /// a damaged file never takes the app down.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let path = self.file_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("failed to read {}: {}", path.display(), e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("malformed collection '{}': {}", key, e);
                Vec::new()
            }
        }
    }

    /// Replace the whole collection snapshot.
    pub fn save<T: Serialize>(&self, key: &str, records: &[T]) -> Result<()> {
        let path = self.file_for(key);
        let raw = serde_json::to_string_pretty(records)?;
        fs::write(&path, raw).with_context(|| format!("Write {}", path.display()))
    }

    /// Load a scalar value (settings block, timestamps). Same degrade rules
    /// as collections, with `None` standing in for "empty".
    pub fn load_value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.file_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("failed to read {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("malformed value '{}': {}", key, e);
                None
            }
        }
    }

    pub fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.file_for(key);
        let raw = serde_json::to_string_pretty(value)?;
        fs::write(&path, raw).with_context(|| format!("Write {}", path.display()))
    }

    pub fn settings(&self) -> AppSettings {
        self.load_value(SETTINGS_KEY).unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.save_value(SETTINGS_KEY, settings)
    }
}
