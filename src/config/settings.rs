//! Page settings file
//!
//! JSON document describing the static configuration of one admin page.
//! Missing keys fall back to the same defaults as a fresh `PageConfig`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::constants::{format, paginator, BASE_FORM_THEME};
use crate::key_value::KeyValueStore;
use crate::page::{ActionsConfig, FiltersConfig, PageConfig, PaginatorConfig};
use crate::translation::Text;
use crate::types::{EntityPermission, Page, SearchMode, SortSpec};

/// Static page configuration as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_label_in_singular: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_label_in_plural: Option<Text>,

    /// Custom titles per page
    #[serde(default)]
    pub page_titles: BTreeMap<Page, Text>,
    #[serde(default)]
    pub help_messages: BTreeMap<Page, Text>,

    #[serde(default = "default_pattern")]
    pub date_pattern: Option<String>,
    #[serde(default = "default_pattern")]
    pub time_pattern: Option<String>,
    #[serde(default = "default_date_time_pattern")]
    pub date_time_pattern: (String, String),
    #[serde(default = "default_date_interval_format")]
    pub date_interval_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thousands_separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_separator: Option<String>,

    #[serde(default)]
    pub default_sort: SortSpec,
    /// `null` disables search, `[]` enables it with no fields
    #[serde(default = "default_search_fields")]
    pub search_fields: Option<Vec<String>>,
    #[serde(default)]
    pub search_mode: SearchMode,
    #[serde(default)]
    pub autofocus_search: bool,
    #[serde(default = "default_true")]
    pub show_entity_actions_as_dropdown: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paginator: Option<PaginatorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<ActionsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FiltersConfig>,

    #[serde(default)]
    pub overridden_templates: BTreeMap<String, String>,
    #[serde(default = "default_form_themes")]
    pub form_themes: Vec<String>,
    #[serde(default)]
    pub new_form_options: KeyValueStore,
    #[serde(default)]
    pub edit_form_options: KeyValueStore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_permission: Option<EntityPermission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_width: Option<String>,
    #[serde(default)]
    pub hide_null_values: bool,

    #[serde(default)]
    pub column_chooser: ColumnChooserSettings,
}

/// Column chooser section; storage is attached at runtime
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnChooserSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub default_columns: Vec<String>,
    #[serde(default)]
    pub available_columns: Vec<String>,
    #[serde(default)]
    pub exclude_columns: Vec<String>,
}

fn default_pattern() -> Option<String> {
    Some(format::MEDIUM.to_string())
}

fn default_date_time_pattern() -> (String, String) {
    (format::MEDIUM.to_string(), format::MEDIUM.to_string())
}

fn default_date_interval_format() -> String {
    format::DATE_INTERVAL.to_string()
}

fn default_search_fields() -> Option<Vec<String>> {
    Some(Vec::new())
}

fn default_true() -> bool {
    true
}

fn default_form_themes() -> Vec<String> {
    vec![BASE_FORM_THEME.to_string()]
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            controller: None,
            entity: None,
            entity_label_in_singular: None,
            entity_label_in_plural: None,
            page_titles: BTreeMap::new(),
            help_messages: BTreeMap::new(),
            date_pattern: default_pattern(),
            time_pattern: default_pattern(),
            date_time_pattern: default_date_time_pattern(),
            date_interval_format: default_date_interval_format(),
            timezone: None,
            number_format: None,
            thousands_separator: None,
            decimal_separator: None,
            default_sort: Vec::new(),
            search_fields: default_search_fields(),
            search_mode: SearchMode::default(),
            autofocus_search: false,
            show_entity_actions_as_dropdown: default_true(),
            paginator: None,
            actions: None,
            filters: None,
            overridden_templates: BTreeMap::new(),
            form_themes: default_form_themes(),
            new_form_options: KeyValueStore::new(),
            edit_form_options: KeyValueStore::new(),
            entity_permission: None,
            content_width: None,
            sidebar_width: None,
            hide_null_values: false,
            column_chooser: ColumnChooserSettings::default(),
        }
    }
}

impl PageSettings {
    /// Read, parse and validate a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read page settings from {:?}", path))?;
        let mut settings = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse page settings from {:?}", path))?;
        settings.validate();
        info!(path = %path.display(), controller = ?settings.controller, "Loaded page settings");
        Ok(settings)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Invalid page settings JSON")
    }

    /// Fix values that would misbehave at render time, logging each change
    pub fn validate(&mut self) {
        if let Some(pager) = self.paginator.as_mut()
            && pager.page_size == 0
        {
            warn!(using = paginator::PAGE_SIZE, "paginator page_size is 0, using default");
            pager.page_size = paginator::PAGE_SIZE;
        }

        let chooser = &mut self.column_chooser;
        let before = chooser.default_columns.len();
        let excluded = chooser.exclude_columns.clone();
        chooser.default_columns.retain(|column| {
            let keep = !excluded.contains(column);
            if !keep {
                warn!(column = %column, "default column is also excluded, dropping it from defaults");
            }
            keep
        });
        if chooser.default_columns.len() != before {
            info!(default_columns = ?chooser.default_columns, "Corrected column chooser defaults");
        }

        let mut seen: Vec<String> = Vec::with_capacity(self.form_themes.len());
        self.form_themes.retain(|theme| {
            if seen.contains(theme) {
                warn!(theme = %theme, "duplicate form theme removed");
                false
            } else {
                seen.push(theme.clone());
                true
            }
        });
    }

    /// Copy these settings into a page configuration
    pub fn apply(&self, config: &mut PageConfig) {
        if let Some(controller) = &self.controller {
            config.set_controller_fqcn(controller.clone());
        }
        if let Some(entity) = &self.entity {
            config.set_entity_fqcn(entity.clone());
        }
        if let Some(label) = &self.entity_label_in_singular {
            config.set_entity_label_in_singular(label.clone());
        }
        if let Some(label) = &self.entity_label_in_plural {
            config.set_entity_label_in_plural(label.clone());
        }
        for (page, title) in &self.page_titles {
            config.set_custom_page_title(*page, title.clone());
        }
        for (page, message) in &self.help_messages {
            config.set_help_message(*page, message.clone());
        }

        config.set_date_pattern(self.date_pattern.clone());
        config.set_time_pattern(self.time_pattern.clone());
        config.set_date_time_pattern(self.date_time_pattern.0.clone(), Some(self.date_time_pattern.1.as_str()));
        config.set_date_interval_format(self.date_interval_format.clone());
        if let Some(timezone) = &self.timezone {
            config.set_timezone(timezone.clone());
        }
        if let Some(number_format) = &self.number_format {
            config.set_number_format(number_format.clone());
        }
        if let Some(separator) = &self.thousands_separator {
            config.set_thousands_separator(separator.clone());
        }
        if let Some(separator) = &self.decimal_separator {
            config.set_decimal_separator(separator.clone());
        }

        config.set_default_sort(self.default_sort.clone());
        config.set_search_fields(self.search_fields.clone());
        config.set_search_mode(self.search_mode);
        config.set_autofocus_search(self.autofocus_search);
        config.set_show_entity_actions_as_dropdown(self.show_entity_actions_as_dropdown);
        if let Some(paginator) = &self.paginator {
            config.set_paginator(paginator.clone());
        }
        if let Some(actions) = &self.actions {
            config.set_actions_config(actions.clone());
        }
        if let Some(filters) = &self.filters {
            config.set_filters_config(filters.clone());
        }

        for (name, path) in &self.overridden_templates {
            config.override_template(name.clone(), path.clone());
        }
        config.set_form_themes(self.form_themes.clone());
        config.set_new_form_options(self.new_form_options.clone());
        config.set_edit_form_options(self.edit_form_options.clone());
        if let Some(permission) = &self.entity_permission {
            config.set_entity_permission(permission.clone());
        }
        if let Some(width) = &self.content_width {
            config.set_content_width(width.clone());
        }
        if let Some(width) = &self.sidebar_width {
            config.set_sidebar_width(width.clone());
        }
        config.hide_null_values(self.hide_null_values);

        let chooser = &self.column_chooser;
        config
            .set_column_chooser(chooser.enabled)
            .set_column_chooser_columns(
                chooser.default_columns.clone(),
                chooser.available_columns.clone(),
                chooser.exclude_columns.clone(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SessionColumnStorage;
    use std::sync::Arc;

    #[test]
    fn test_empty_document_matches_page_defaults() {
        let settings = PageSettings::from_json("{}").unwrap();
        assert_eq!(settings, PageSettings::default());

        let mut config = PageConfig::new();
        settings.apply(&mut config);
        let fresh = PageConfig::new();
        assert_eq!(config.date_pattern(), fresh.date_pattern());
        assert_eq!(config.date_time_pattern(), fresh.date_time_pattern());
        assert_eq!(config.form_themes(), fresh.form_themes());
        assert_eq!(config.is_search_enabled(), fresh.is_search_enabled());
        assert_eq!(config.show_entity_actions_as_dropdown(), fresh.show_entity_actions_as_dropdown());
    }

    #[test]
    fn test_null_search_fields_disables_search() {
        let settings = PageSettings::from_json(r#"{"search_fields": null}"#).unwrap();
        let mut config = PageConfig::new();
        settings.apply(&mut config);
        assert!(!config.is_search_enabled());

        let settings = PageSettings::from_json(r#"{"search_fields": []}"#).unwrap();
        settings.apply(&mut config);
        assert!(config.is_search_enabled());
    }

    #[test]
    fn test_apply_full_document() {
        let json = r#"{
            "controller": "App\\Controller\\ProductCrud",
            "entity": "App\\Entity\\Product",
            "entity_label_in_singular": "Product",
            "page_titles": {"index": "All products", "detail": {"message": "product.detail", "domain": "admin"}},
            "help_messages": {"index": "Every product"},
            "timezone": "UTC",
            "default_sort": [["createdAt", "DESC"]],
            "search_fields": ["name", "sku"],
            "search_mode": "ANY_TERM",
            "paginator": {"page_size": 50},
            "form_themes": ["@EasyAdmin/crud/form_theme.html.twig", "admin/theme.html.twig"],
            "new_form_options": {"attr": {"class": "wide"}},
            "entity_permission": {"role": "ROLE_EDITOR"},
            "hide_null_values": true,
            "column_chooser": {"enabled": true, "default_columns": ["name"], "exclude_columns": ["secret"]}
        }"#;
        let settings = PageSettings::from_json(json).unwrap();
        let mut config = PageConfig::new();
        settings.apply(&mut config);

        assert_eq!(config.controller_fqcn(), Some("App\\Controller\\ProductCrud"));
        assert_eq!(config.entity_fqcn(), Some("App\\Entity\\Product"));
        assert_eq!(config.timezone(), Some("UTC"));
        assert_eq!(config.search_mode(), SearchMode::AnyTerm);
        assert_eq!(config.search_fields().map(|f| f.len()), Some(2));
        assert_eq!(config.paginator().map(|p| p.page_size), Some(50));
        assert_eq!(config.form_themes().len(), 2);
        assert!(config.new_form_options().has("attr.class"));
        assert_eq!(config.entity_permission(), Some(&EntityPermission::Role("ROLE_EDITOR".to_string())));
        assert!(config.are_null_values_hidden());
        assert_eq!(config.help_message(Some(Page::Index)).to_string(), "Every product");

        let params = Default::default();
        let index_title = config.custom_page_title(Some(Page::Index), None, &params).unwrap();
        assert_eq!(index_title.message, "All products");
        let detail_title = config.custom_page_title(Some(Page::Detail), None, &params).unwrap();
        assert_eq!(detail_title.domain.as_deref(), Some("admin"));

        // Flag set, but still needs a storage provider
        assert!(!config.is_column_chooser_enabled());
        config.set_column_chooser_storage(Some(Arc::new(SessionColumnStorage::new())));
        assert!(config.is_column_chooser_enabled());
        assert_eq!(config.column_chooser().default_columns(), &["name".to_string()]);
        assert_eq!(config.column_chooser().exclude_columns(), &["secret".to_string()]);
    }

    #[test]
    fn test_validate_fixes_bad_values() {
        let mut settings = PageSettings::from_json(
            r#"{
                "paginator": {"page_size": 0},
                "form_themes": ["a.twig", "b.twig", "a.twig"],
                "column_chooser": {"default_columns": ["id", "secret", "name"], "exclude_columns": ["secret"]}
            }"#,
        )
        .unwrap();
        settings.validate();

        assert_eq!(settings.paginator.as_ref().map(|p| p.page_size), Some(30));
        assert_eq!(settings.form_themes, vec!["a.twig", "b.twig"]);
        assert_eq!(settings.column_chooser.default_columns, vec!["id", "name"]);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PageSettings::load(&dir.path().join("missing.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        fs::write(&path, r#"{"search_mode": "SOMETIMES"}"#).unwrap();
        let err = PageSettings::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse page settings"));
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        fs::write(&path, r#"{"controller": "UserCrud", "paginator": {"page_size": 0}}"#).unwrap();
        let settings = PageSettings::load(&path).unwrap();
        assert_eq!(settings.controller.as_deref(), Some("UserCrud"));
        // validate() ran on load
        assert_eq!(settings.paginator.map(|p| p.page_size), Some(30));
    }
}
