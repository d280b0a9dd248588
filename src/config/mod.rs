//! Configuration management for crud-page
//!
//! - **settings**: PageSettings, the JSON page settings file applied to a PageConfig

pub mod settings;

// Re-export commonly used types
pub use settings::{ColumnChooserSettings, PageSettings};
