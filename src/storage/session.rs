use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, error};

use super::{resolve_stored, SelectedColumnStorage};

/// In-memory selection store, one per user session
#[derive(Debug, Default)]
pub struct SessionColumnStorage {
    selections: RwLock<HashMap<String, Vec<String>>>,
}

impl SessionColumnStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with choices (e.g. restored from a session cookie)
    pub fn with_selections(selections: HashMap<String, Vec<String>>) -> Self {
        Self {
            selections: RwLock::new(selections),
        }
    }

    pub fn clear(&self, controller: &str) {
        match self.selections.write() {
            Ok(mut selections) => {
                selections.remove(controller);
            }
            Err(e) => error!(controller = %controller, error = %e, "Session column storage lock poisoned"),
        }
    }
}

impl SelectedColumnStorage for SessionColumnStorage {
    fn selected_columns(&self, controller: &str, default_columns: &[String], available_columns: &[String]) -> Vec<String> {
        let selections = match self.selections.read() {
            Ok(selections) => selections,
            Err(e) => {
                error!(controller = %controller, error = %e, "Session column storage lock poisoned, using defaults");
                return default_columns.to_vec();
            }
        };
        let resolved = resolve_stored(selections.get(controller), default_columns, available_columns);
        debug!(controller = %controller, columns = ?resolved, "Recalled session column selection");
        resolved
    }

    fn store_selected_columns(&self, controller: &str, columns: &[String]) -> Result<()> {
        let mut selections = self
            .selections
            .write()
            .map_err(|e| anyhow!("Session column storage lock poisoned: {}", e))?;
        selections.insert(controller.to_string(), columns.to_vec());
        debug!(controller = %controller, columns = ?columns, "Stored session column selection");
        Ok(())
    }
}
