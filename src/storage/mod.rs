//! Storage providers for a user's column selection
//!
//! The column chooser only reads through [`SelectedColumnStorage`]; storing a
//! new choice is up to the UI layer (or the CLI `select` command).

use anyhow::Result;

mod json_file;
mod session;

pub use json_file::JsonFileColumnStorage;
pub use session::SessionColumnStorage;

/// Recalls and persists the columns a user picked for a controller
pub trait SelectedColumnStorage: Send + Sync {
    /// Columns previously chosen for `controller`
    ///
    /// `default_columns` and `available_columns` are hints: a provider with no
    /// stored choice returns the defaults, and stored names that are no longer
    /// available are dropped.
    fn selected_columns(&self, controller: &str, default_columns: &[String], available_columns: &[String]) -> Vec<String>;

    /// Persist a new choice for `controller`
    fn store_selected_columns(&self, controller: &str, columns: &[String]) -> Result<()>;
}

/// Shared recall policy: stored choice filtered to what is still available,
/// defaults when nothing was stored
pub(crate) fn resolve_stored(stored: Option<&Vec<String>>, default_columns: &[String], available_columns: &[String]) -> Vec<String> {
    match stored {
        Some(columns) => {
            let mut resolved: Vec<String> = Vec::with_capacity(columns.len());
            for column in columns {
                if available_columns.contains(column) && !resolved.contains(column) {
                    resolved.push(column.clone());
                }
            }
            resolved
        }
        None => default_columns.to_vec(),
    }
}
