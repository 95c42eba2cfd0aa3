//! Key-value preference file: load/save with atomic writes

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

pub const PREFERENCES_FILENAME: &str = "preferences.json";

/// String-valued preference map backed by a JSON file
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl PreferenceStore {
    /// Open the store in `state_dir`.
    ///
    /// A missing or unreadable file yields an empty store; the next write
    /// replaces whatever was there.
    pub fn open(state_dir: &Path) -> Self {
        let path = state_dir.join(PREFERENCES_FILENAME);
        let values = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring corrupt preferences file");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    /// Store that never touches the file system
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        Self { path: PathBuf::new(), values: BTreeMap::new() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a key and persist the whole map
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.values.insert(key.to_string(), value.into());
        self.save()
    }

    fn save(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create state directory")?;
        }

        let temp = self.path.with_extension("json.tmp");
        let json =
            serde_json::to_string_pretty(&self.values).context("Failed to serialize preferences")?;
        fs::write(&temp, json).context("Failed to write preferences temp file")?;
        fs::rename(&temp, &self.path).context("Failed to rename preferences temp file")?;

        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}
