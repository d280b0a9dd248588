//! Per-request page configuration
//!
//! One [`PageConfig`] is built for every admin page request, filled in by
//! setup code, read by rendering code and dropped at the end of the request.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

pub mod column_chooser;
pub mod options;
pub mod text;

pub use column_chooser::ColumnChooser;
pub use options::{ActionsConfig, FieldAssets, FiltersConfig, PaginatorConfig};
pub use text::{LabelSource, TextSource, TitleSource};

use crate::constants::{format, translation, BASE_FORM_THEME};
use crate::field::{self, FieldCollection};
use crate::key_value::KeyValueStore;
use crate::storage::SelectedColumnStorage;
use crate::translation::{t, Text, TranslatableMessage, TranslationParameters};
use crate::types::{Entity, EntityPermission, Page, SearchMode, SortSpec};

/// Maps a breadcrumb item to its parent (`None` ends the trail)
pub type BreadcrumbCallback = Arc<dyn Fn(Option<&str>) -> Option<String> + Send + Sync>;

pub struct PageConfig {
    controller_fqcn: Option<String>,
    page_name: Option<Page>,
    action_name: Option<String>,
    entity_fqcn: Option<String>,
    entity_label_in_singular: Option<LabelSource>,
    entity_label_in_plural: Option<LabelSource>,
    default_page_titles: BTreeMap<Page, Option<String>>,
    custom_page_titles: BTreeMap<Page, TitleSource>,
    help_messages: BTreeMap<Page, Text>,
    breadcrumb_hierarchy_callback: Option<BreadcrumbCallback>,
    field_assets: FieldAssets,
    date_pattern: Option<String>,
    time_pattern: Option<String>,
    date_time_pattern: (String, String),
    date_interval_format: String,
    timezone: Option<String>,
    number_format: Option<String>,
    thousands_separator: Option<String>,
    decimal_separator: Option<String>,
    default_sort: SortSpec,
    search_fields: Option<Vec<String>>,
    search_mode: SearchMode,
    autofocus_search: bool,
    show_entity_actions_as_dropdown: bool,
    paginator: Option<PaginatorConfig>,
    overridden_templates: BTreeMap<String, String>,
    form_themes: Vec<String>,
    new_form_options: KeyValueStore,
    edit_form_options: KeyValueStore,
    entity_permission: Option<EntityPermission>,
    actions_config: Option<ActionsConfig>,
    filters_config: Option<FiltersConfig>,
    content_width: Option<String>,
    sidebar_width: Option<String>,
    hide_null_values: bool,
    column_chooser: ColumnChooser,
}

impl Default for PageConfig {
    fn default() -> Self {
        let default_page_titles = BTreeMap::from([
            (Page::Detail, Some(translation::TITLE_DETAIL.to_string())),
            (Page::Edit, Some(translation::TITLE_EDIT.to_string())),
            (Page::Index, Some(translation::TITLE_INDEX.to_string())),
            (Page::New, Some(translation::TITLE_NEW.to_string())),
        ]);

        Self {
            controller_fqcn: None,
            page_name: None,
            action_name: None,
            entity_fqcn: None,
            entity_label_in_singular: None,
            entity_label_in_plural: None,
            default_page_titles,
            custom_page_titles: BTreeMap::new(),
            help_messages: BTreeMap::new(),
            breadcrumb_hierarchy_callback: None,
            field_assets: FieldAssets::default(),
            date_pattern: Some(format::MEDIUM.to_string()),
            time_pattern: Some(format::MEDIUM.to_string()),
            date_time_pattern: (format::MEDIUM.to_string(), format::MEDIUM.to_string()),
            date_interval_format: format::DATE_INTERVAL.to_string(),
            timezone: None,
            number_format: None,
            thousands_separator: None,
            decimal_separator: None,
            default_sort: Vec::new(),
            search_fields: Some(Vec::new()),
            search_mode: SearchMode::AllTerms,
            autofocus_search: false,
            show_entity_actions_as_dropdown: true,
            paginator: None,
            overridden_templates: BTreeMap::new(),
            form_themes: vec![BASE_FORM_THEME.to_string()],
            new_form_options: KeyValueStore::new(),
            edit_form_options: KeyValueStore::new(),
            entity_permission: None,
            actions_config: None,
            filters_config: None,
            content_width: None,
            sidebar_width: None,
            hide_null_values: false,
            column_chooser: ColumnChooser::new(),
        }
    }
}

impl std::fmt::Debug for PageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageConfig")
            .field("controller_fqcn", &self.controller_fqcn)
            .field("page_name", &self.page_name)
            .field("entity_fqcn", &self.entity_fqcn)
            .field("search_fields", &self.search_fields)
            .field("default_sort", &self.default_sort)
            .field("form_themes", &self.form_themes)
            .field("column_chooser", &self.column_chooser)
            .finish_non_exhaustive()
    }
}

impl PageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // --- identity -----------------------------------------------------------

    pub fn controller_fqcn(&self) -> Option<&str> {
        self.controller_fqcn.as_deref()
    }

    pub fn set_controller_fqcn(&mut self, fqcn: impl Into<String>) {
        self.controller_fqcn = Some(fqcn.into());
    }

    pub fn current_page(&self) -> Option<Page> {
        self.page_name
    }

    pub fn set_page_name(&mut self, page: Option<Page>) {
        self.page_name = page;
    }

    pub fn current_action(&self) -> Option<&str> {
        self.action_name.as_deref()
    }

    pub fn set_current_action(&mut self, action: impl Into<String>) {
        self.action_name = Some(action.into());
    }

    pub fn entity_fqcn(&self) -> Option<&str> {
        self.entity_fqcn.as_deref()
    }

    pub fn set_entity_fqcn(&mut self, fqcn: impl Into<String>) {
        self.entity_fqcn = Some(fqcn.into());
    }

    // --- labels and titles --------------------------------------------------

    pub fn entity_label_in_singular(&self, entity: Option<&dyn Entity>, page: Option<Page>) -> Option<Text> {
        self.entity_label_in_singular.as_ref()?.evaluate(entity, page)
    }

    pub fn set_entity_label_in_singular(&mut self, label: impl Into<LabelSource>) {
        self.entity_label_in_singular = Some(label.into());
    }

    pub fn entity_label_in_plural(&self, entity: Option<&dyn Entity>, page: Option<Page>) -> Option<Text> {
        self.entity_label_in_plural.as_ref()?.evaluate(entity, page)
    }

    pub fn set_entity_label_in_plural(&mut self, label: impl Into<LabelSource>) {
        self.entity_label_in_plural = Some(label.into());
    }

    /// Custom title for `page` (current page when `None`), parameters attached
    pub fn custom_page_title(
        &self,
        page: Option<Page>,
        entity: Option<&dyn Entity>,
        parameters: &TranslationParameters,
    ) -> Option<TranslatableMessage> {
        let page = page.or(self.page_name)?;
        let title = self.custom_page_titles.get(&page)?.evaluate(entity)?;
        match title {
            Text::Translatable(message) => Some(message.with_parameters(parameters)),
            Text::Plain(text) => Some(t(text, parameters, None)),
        }
    }

    pub fn set_custom_page_title(&mut self, page: Page, title: impl Into<TitleSource>) {
        self.custom_page_titles.insert(page, title.into());
    }

    /// The entity's own display string when it has a non-empty one,
    /// otherwise the page's default title template
    pub fn default_page_title(
        &self,
        page: Option<Page>,
        entity: Option<&dyn Entity>,
        parameters: &TranslationParameters,
    ) -> Option<TranslatableMessage> {
        if let Some(entity_as_string) = entity.and_then(|e| e.display_string())
            && !entity_as_string.is_empty()
        {
            return Some(t(entity_as_string, parameters, Some(translation::ADMIN_DOMAIN)));
        }

        let page = page.or(self.page_name)?;
        let template = self.default_page_titles.get(&page)?.as_deref()?;
        if template.is_empty() {
            return None;
        }
        Some(t(template, parameters, Some(translation::ADMIN_DOMAIN)))
    }

    /// Replace (or remove with `None`) the default title template of a page
    pub fn set_default_page_title(&mut self, page: Page, template: Option<String>) {
        self.default_page_titles.insert(page, template);
    }

    /// Help message for `page` (current page when `None`), empty when unset
    pub fn help_message(&self, page: Option<Page>) -> Text {
        page.or(self.page_name)
            .and_then(|p| self.help_messages.get(&p))
            .cloned()
            .unwrap_or_default()
    }

    pub fn help_messages(&self) -> &BTreeMap<Page, Text> {
        &self.help_messages
    }

    pub fn set_help_message(&mut self, page: Page, message: impl Into<Text>) {
        self.help_messages.insert(page, message.into());
    }

    pub fn breadcrumb_hierarchy_callback(&self) -> Option<&BreadcrumbCallback> {
        self.breadcrumb_hierarchy_callback.as_ref()
    }

    pub fn set_breadcrumb_hierarchy_callback(&mut self, callback: Option<BreadcrumbCallback>) {
        self.breadcrumb_hierarchy_callback = callback;
    }

    // --- assets and templates -----------------------------------------------

    /// Assets needed by the fields of the page (shared by all pages today)
    pub fn field_assets(&self, _page: Page) -> &FieldAssets {
        &self.field_assets
    }

    pub fn set_field_assets(&mut self, assets: FieldAssets) {
        self.field_assets = assets;
    }

    pub fn overridden_templates(&self) -> &BTreeMap<String, String> {
        &self.overridden_templates
    }

    pub fn override_template(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.overridden_templates.insert(name.into(), path.into());
    }

    pub fn form_themes(&self) -> &[String] {
        &self.form_themes
    }

    /// Appended themes render with higher priority than earlier ones
    pub fn add_form_theme(&mut self, theme: impl Into<String>) {
        self.form_themes.push(theme.into());
    }

    pub fn set_form_themes(&mut self, themes: Vec<String>) {
        self.form_themes = themes;
    }

    // --- formatting ---------------------------------------------------------

    pub fn date_pattern(&self) -> Option<&str> {
        self.date_pattern.as_deref()
    }

    pub fn set_date_pattern(&mut self, pattern: Option<String>) {
        self.date_pattern = pattern;
    }

    pub fn time_pattern(&self) -> Option<&str> {
        self.time_pattern.as_deref()
    }

    pub fn set_time_pattern(&mut self, pattern: Option<String>) {
        self.time_pattern = pattern;
    }

    pub fn date_time_pattern(&self) -> (&str, &str) {
        (&self.date_time_pattern.0, &self.date_time_pattern.1)
    }

    /// Time format defaults to `none` (date only) when not given
    pub fn set_date_time_pattern(&mut self, date_format_or_pattern: impl Into<String>, time_format: Option<&str>) {
        self.date_time_pattern = (
            date_format_or_pattern.into(),
            time_format.unwrap_or(format::NONE).to_string(),
        );
    }

    pub fn date_interval_format(&self) -> &str {
        &self.date_interval_format
    }

    pub fn set_date_interval_format(&mut self, format: impl Into<String>) {
        self.date_interval_format = format.into();
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn set_timezone(&mut self, timezone: impl Into<String>) {
        self.timezone = Some(timezone.into());
    }

    pub fn number_format(&self) -> Option<&str> {
        self.number_format.as_deref()
    }

    pub fn set_number_format(&mut self, format: impl Into<String>) {
        self.number_format = Some(format.into());
    }

    pub fn thousands_separator(&self) -> Option<&str> {
        self.thousands_separator.as_deref()
    }

    pub fn set_thousands_separator(&mut self, separator: impl Into<String>) {
        self.thousands_separator = Some(separator.into());
    }

    pub fn decimal_separator(&self) -> Option<&str> {
        self.decimal_separator.as_deref()
    }

    pub fn set_decimal_separator(&mut self, separator: impl Into<String>) {
        self.decimal_separator = Some(separator.into());
    }

    // --- sorting, search, pagination ----------------------------------------

    pub fn default_sort(&self) -> &SortSpec {
        &self.default_sort
    }

    pub fn set_default_sort(&mut self, sort: SortSpec) {
        self.default_sort = sort;
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    pub fn set_search_mode(&mut self, mode: SearchMode) {
        self.search_mode = mode;
    }

    pub fn search_fields(&self) -> Option<&[String]> {
        self.search_fields.as_deref()
    }

    /// `None` disables search; `Some(vec![])` keeps it enabled with no fields
    pub fn set_search_fields(&mut self, fields: Option<Vec<String>>) {
        self.search_fields = fields;
    }

    pub fn is_search_enabled(&self) -> bool {
        self.search_fields.is_some()
    }

    pub fn autofocus_search(&self) -> bool {
        self.autofocus_search
    }

    pub fn set_autofocus_search(&mut self, autofocus: bool) {
        self.autofocus_search = autofocus;
    }

    pub fn show_entity_actions_as_dropdown(&self) -> bool {
        self.show_entity_actions_as_dropdown
    }

    pub fn set_show_entity_actions_as_dropdown(&mut self, as_dropdown: bool) {
        self.show_entity_actions_as_dropdown = as_dropdown;
    }

    pub fn paginator(&self) -> Option<&PaginatorConfig> {
        self.paginator.as_ref()
    }

    pub fn set_paginator(&mut self, paginator: PaginatorConfig) {
        self.paginator = Some(paginator);
    }

    // --- forms, permissions, layout -----------------------------------------

    pub fn new_form_options(&self) -> &KeyValueStore {
        &self.new_form_options
    }

    pub fn new_form_options_mut(&mut self) -> &mut KeyValueStore {
        &mut self.new_form_options
    }

    pub fn set_new_form_options(&mut self, options: KeyValueStore) {
        self.new_form_options = options;
    }

    pub fn edit_form_options(&self) -> &KeyValueStore {
        &self.edit_form_options
    }

    pub fn edit_form_options_mut(&mut self) -> &mut KeyValueStore {
        &mut self.edit_form_options
    }

    pub fn set_edit_form_options(&mut self, options: KeyValueStore) {
        self.edit_form_options = options;
    }

    pub fn entity_permission(&self) -> Option<&EntityPermission> {
        self.entity_permission.as_ref()
    }

    pub fn set_entity_permission(&mut self, permission: EntityPermission) {
        self.entity_permission = Some(permission);
    }

    pub fn actions_config(&self) -> Option<&ActionsConfig> {
        self.actions_config.as_ref()
    }

    pub fn set_actions_config(&mut self, config: ActionsConfig) {
        self.actions_config = Some(config);
    }

    pub fn filters_config(&self) -> Option<&FiltersConfig> {
        self.filters_config.as_ref()
    }

    pub fn set_filters_config(&mut self, config: FiltersConfig) {
        self.filters_config = Some(config);
    }

    pub fn content_width(&self) -> Option<&str> {
        self.content_width.as_deref()
    }

    pub fn set_content_width(&mut self, width: impl Into<String>) {
        self.content_width = Some(width.into());
    }

    pub fn sidebar_width(&self) -> Option<&str> {
        self.sidebar_width.as_deref()
    }

    pub fn set_sidebar_width(&mut self, width: impl Into<String>) {
        self.sidebar_width = Some(width.into());
    }

    pub fn are_null_values_hidden(&self) -> bool {
        self.hide_null_values
    }

    pub fn hide_null_values(&mut self, hide: bool) {
        self.hide_null_values = hide;
    }

    // --- column chooser -----------------------------------------------------

    pub fn column_chooser(&self) -> &ColumnChooser {
        &self.column_chooser
    }

    /// Attach storage, toggle the chooser and set its column lists in one go
    pub fn setup_column_chooser(
        &mut self,
        storage: Arc<dyn SelectedColumnStorage>,
        enabled: bool,
        default_columns: Vec<String>,
        available_columns: Vec<String>,
        exclude_columns: Vec<String>,
    ) -> &mut Self {
        self.set_column_chooser_storage(Some(storage));
        self.set_column_chooser(enabled);
        self.set_column_chooser_columns(default_columns, available_columns, exclude_columns)
    }

    pub fn set_column_chooser_columns(
        &mut self,
        default_columns: Vec<String>,
        available_columns: Vec<String>,
        exclude_columns: Vec<String>,
    ) -> &mut Self {
        self.column_chooser.set_columns(default_columns, available_columns, exclude_columns);
        self
    }

    pub fn set_column_chooser_storage(&mut self, storage: Option<Arc<dyn SelectedColumnStorage>>) -> &mut Self {
        self.column_chooser.set_storage(storage);
        self
    }

    pub fn column_chooser_storage(&self) -> Option<&Arc<dyn SelectedColumnStorage>> {
        self.column_chooser.storage()
    }

    pub fn set_column_chooser(&mut self, enabled: bool) -> &mut Self {
        self.column_chooser.set_enabled(enabled);
        self
    }

    pub fn enable_column_chooser(&mut self) -> &mut Self {
        self.set_column_chooser(true)
    }

    pub fn disable_column_chooser(&mut self) -> &mut Self {
        self.set_column_chooser(false)
    }

    pub fn is_column_chooser_enabled(&self) -> bool {
        self.column_chooser.is_enabled()
    }

    pub fn is_special_form_type(&self, form_type: Option<&str>) -> bool {
        field::is_special_form_type(form_type)
    }

    pub fn current_columns(&self) -> Vec<(String, String)> {
        self.column_chooser.current_columns()
    }

    pub fn selected_columns(&self) -> &[String] {
        self.column_chooser.selected_columns()
    }

    pub fn available_columns(&self) -> &[String] {
        self.column_chooser.available_columns()
    }

    pub fn all_columns_labels(&self) -> &[(String, String)] {
        self.column_chooser.all_columns_labels()
    }

    /// Fields to render on the list page, keyed by this page's controller
    pub fn column_chooser_process_fields<'a>(&mut self, fields: &'a FieldCollection) -> Cow<'a, FieldCollection> {
        let controller = match self.controller_fqcn.as_deref() {
            Some(controller) => controller,
            None => {
                debug!("No controller set, column selection stored under an empty key");
                ""
            }
        };
        self.column_chooser.process(controller, fields)
    }
}
