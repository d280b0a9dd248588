//! Collaborator configuration carried by a page: paginator, actions, filters, assets

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::paginator;
use crate::types::Page;

/// Paginator settings for list pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatorConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_range_size")]
    pub range_size: u32,
    #[serde(default = "default_range_edge_size")]
    pub range_edge_size: u32,
    #[serde(default = "default_fetch_join_collection")]
    pub fetch_join_collection: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_output_walkers: Option<bool>,
}

fn default_page_size() -> u32 {
    paginator::PAGE_SIZE
}

fn default_range_size() -> u32 {
    paginator::RANGE_SIZE
}

fn default_range_edge_size() -> u32 {
    paginator::RANGE_EDGE_SIZE
}

fn default_fetch_join_collection() -> bool {
    true
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            range_size: default_range_size(),
            range_edge_size: default_range_edge_size(),
            fetch_join_collection: default_fetch_join_collection(),
            use_output_walkers: None,
        }
    }
}

/// Actions available per page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionsConfig {
    /// Action names shown on each page, in display order
    #[serde(default)]
    pub actions: BTreeMap<Page, Vec<String>>,
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Action name -> permission required to run it
    #[serde(default)]
    pub permissions: BTreeMap<String, String>,
}

impl ActionsConfig {
    pub fn actions_for(&self, page: Page) -> impl Iterator<Item = &str> {
        self.actions
            .get(&page)
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(move |name| !self.is_disabled(name))
    }

    pub fn is_disabled(&self, action: &str) -> bool {
        self.disabled.iter().any(|d| d == action)
    }
}

/// Filter configuration for list pages
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FiltersConfig {
    /// Property names with a filter, in display order
    #[serde(default)]
    pub properties: Vec<String>,
}

impl FiltersConfig {
    pub fn add(&mut self, property: impl Into<String>) {
        let property = property.into();
        if !self.properties.contains(&property) {
            self.properties.push(property);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Extra assets required by the fields of a page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldAssets {
    #[serde(default)]
    pub css: Vec<String>,
    #[serde(default)]
    pub js: Vec<String>,
    #[serde(default)]
    pub webpack_encore_entries: Vec<String>,
    #[serde(default)]
    pub head_contents: Vec<String>,
}

impl FieldAssets {
    /// Append another set of assets, skipping entries already present
    pub fn merge(&mut self, other: &FieldAssets) {
        fn extend_unique(target: &mut Vec<String>, source: &[String]) {
            for item in source {
                if !target.contains(item) {
                    target.push(item.clone());
                }
            }
        }

        extend_unique(&mut self.css, &other.css);
        extend_unique(&mut self.js, &other.js);
        extend_unique(&mut self.webpack_encore_entries, &other.webpack_encore_entries);
        extend_unique(&mut self.head_contents, &other.head_contents);
    }
}
