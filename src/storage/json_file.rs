//! JSON file backed selection store
//!
//! Layout on disk: `{ "<controller>": ["column", ...], ... }`.
//! Every read goes back to the file so several processes can share it.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::{resolve_stored, SelectedColumnStorage};

type Selections = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub struct JsonFileColumnStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileColumnStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store under the platform config directory
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::COLUMNS_FILENAME);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all stored selections; a missing file is an empty store
    pub fn load(&self) -> Result<Selections> {
        if !self.path.exists() {
            return Ok(Selections::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read column selections from {:?}", self.path))?;
        if contents.trim().is_empty() {
            return Ok(Selections::new());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse column selections from {:?}", self.path))
    }

    fn save(&self, selections: &Selections) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create storage directory {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(selections)
            .context("Failed to serialize column selections to JSON")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write column selections to {:?}", self.path))?;
        Ok(())
    }
}

impl SelectedColumnStorage for JsonFileColumnStorage {
    fn selected_columns(&self, controller: &str, default_columns: &[String], available_columns: &[String]) -> Vec<String> {
        let selections = match self.load() {
            Ok(selections) => selections,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable column selection file, using defaults");
                Selections::new()
            }
        };
        let resolved = resolve_stored(selections.get(controller), default_columns, available_columns);
        debug!(controller = %controller, columns = ?resolved, "Recalled stored column selection");
        resolved
    }

    fn store_selected_columns(&self, controller: &str, columns: &[String]) -> Result<()> {
        let _guard = match self.write_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!(path = %self.path.display(), "Column storage lock poisoned, continuing");
                poisoned.into_inner()
            }
        };

        // Keep other controllers' entries; a corrupt file is replaced
        let mut selections = self.load().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Replacing unreadable column selection file");
            Selections::new()
        });
        selections.insert(controller.to_string(), columns.to_vec());
        self.save(&selections)
            .with_context(|| format!("Failed to store column selection for '{}'", controller))?;

        info!(controller = %controller, count = columns.len(), path = %self.path.display(), "Saved column selection");
        Ok(())
    }
}
