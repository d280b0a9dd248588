//! Per-request configuration for CRUD admin pages
//!
//! A [`PageConfig`] carries everything rendering code needs to draw one
//! index/detail/edit/new page: titles, help text, formatting, search, sorting,
//! pagination, form themes and permissions. Its column chooser decides which
//! fields a list page shows, recalling the user's choice through a
//! [`SelectedColumnStorage`].

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod field;
pub mod key_value;
pub mod page;
pub mod storage;
pub mod translation;
pub mod types;

pub use config::PageSettings;
pub use field::{FieldCollection, FieldDescriptor};
pub use key_value::KeyValueStore;
pub use page::{ColumnChooser, PageConfig};
pub use storage::{JsonFileColumnStorage, SelectedColumnStorage, SessionColumnStorage};
pub use translation::{t, Text, TranslatableMessage, TranslationParameters};
pub use types::{Entity, EntityPermission, Page, SearchMode, SortDirection};
