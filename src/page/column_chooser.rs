//! Column chooser: picks which fields a list page renders
//!
//! Every request the field catalog is reconciled against the user's stored
//! choice (via a [`SelectedColumnStorage`]). Whenever the chooser has nothing
//! usable to offer, the original catalog is rendered untouched.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::constants::columns::DEFAULT_COLUMN_COUNT;
use crate::field::{FieldCollection, FieldDescriptor};
use crate::storage::SelectedColumnStorage;
use crate::types::Page;

/// Ordered name -> label pairs; inserting an existing name updates it in place
pub type ColumnLabels = Vec<(String, String)>;

#[derive(Clone, Default)]
pub struct ColumnChooser {
    enabled: bool,
    storage: Option<Arc<dyn SelectedColumnStorage>>,
    default_columns: Vec<String>,
    available_columns: Vec<String>,
    available_columns_with_labels: ColumnLabels,
    exclude_columns: Vec<String>,
    all_columns_labels: ColumnLabels,
    selected_columns: Vec<String>,
}

impl fmt::Debug for ColumnChooser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnChooser")
            .field("enabled", &self.enabled)
            .field("has_storage", &self.storage.is_some())
            .field("default_columns", &self.default_columns)
            .field("available_columns", &self.available_columns)
            .field("exclude_columns", &self.exclude_columns)
            .field("selected_columns", &self.selected_columns)
            .finish_non_exhaustive()
    }
}

impl ColumnChooser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults and excludes are kept as given; available becomes defaults
    /// followed by the extra availables, without duplicates
    pub fn set_columns(&mut self, default_columns: Vec<String>, available_columns: Vec<String>, exclude_columns: Vec<String>) {
        self.available_columns = unique(default_columns.iter().chain(available_columns.iter()));
        self.default_columns = default_columns;
        self.exclude_columns = exclude_columns;
    }

    pub fn set_storage(&mut self, storage: Option<Arc<dyn SelectedColumnStorage>>) {
        self.storage = storage;
    }

    pub fn storage(&self) -> Option<&Arc<dyn SelectedColumnStorage>> {
        self.storage.as_ref()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Both the flag and a storage provider are required
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.storage.is_some()
    }

    pub fn default_columns(&self) -> &[String] {
        &self.default_columns
    }

    pub fn available_columns(&self) -> &[String] {
        &self.available_columns
    }

    pub fn exclude_columns(&self) -> &[String] {
        &self.exclude_columns
    }

    pub fn selected_columns(&self) -> &[String] {
        &self.selected_columns
    }

    /// Label of every field seen by the last `process`, eligible or not
    pub fn all_columns_labels(&self) -> &[(String, String)] {
        &self.all_columns_labels
    }

    pub fn column_label(&self, column: &str) -> Option<&str> {
        self.all_columns_labels
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, label)| label.as_str())
    }

    /// (label, column) pairs for the chooser control: the current selection
    /// first, then every other available column
    pub fn current_columns(&self) -> Vec<(String, String)> {
        let mut by_column: ColumnLabels = Vec::new();
        for column in &self.selected_columns {
            upsert(&mut by_column, column, column);
        }
        for (column, label) in &self.available_columns_with_labels {
            upsert(&mut by_column, column, label);
        }

        // Keyed by label: a repeated label keeps its slot and takes the later column
        let mut by_label: ColumnLabels = Vec::with_capacity(by_column.len());
        for (column, label) in &by_column {
            upsert(&mut by_label, label, column);
        }
        by_label
    }

    /// Reconcile `fields` with the stored selection for `controller`
    ///
    /// Returns the input catalog (borrowed) when the chooser is disabled or
    /// has nothing to offer, otherwise a new catalog holding only the
    /// selected fields, each marked as shown on the index page only.
    pub fn process<'a>(&mut self, controller: &str, fields: &'a FieldCollection) -> Cow<'a, FieldCollection> {
        let storage = match &self.storage {
            Some(storage) if self.enabled => Arc::clone(storage),
            _ => return Cow::Borrowed(fields),
        };

        self.all_columns_labels.clear();
        self.available_columns.clear();
        self.available_columns_with_labels.clear();

        for field in fields {
            let label = field.label_or_humanized();
            upsert(&mut self.all_columns_labels, &field.property, &label);
            if is_eligible(field, &self.exclude_columns) {
                if !self.available_columns.contains(&field.property) {
                    self.available_columns.push(field.property.clone());
                }
                upsert(&mut self.available_columns_with_labels, &field.property, &label);
            }
        }

        if self.available_columns.is_empty() {
            debug!(controller = %controller, fields = fields.len(), "No chooser-eligible fields, rendering all fields");
            return Cow::Borrowed(fields);
        }

        if self.default_columns.is_empty() {
            self.default_columns = self
                .available_columns
                .iter()
                .take(DEFAULT_COLUMN_COUNT)
                .cloned()
                .collect();
        }
        if self.default_columns.is_empty() {
            return Cow::Borrowed(fields);
        }

        let selected = storage.selected_columns(controller, &self.default_columns, &self.available_columns);
        self.selected_columns = if selected.is_empty() {
            debug!(controller = %controller, "Storage returned no columns, using defaults");
            self.default_columns.clone()
        } else {
            selected
        };

        match select_fields(fields, &self.available_columns, &self.selected_columns) {
            Some(selected_fields) => {
                debug!(
                    controller = %controller,
                    available = self.available_columns.len(),
                    rendered = selected_fields.len(),
                    "Applied column selection"
                );
                Cow::Owned(selected_fields)
            }
            None => {
                debug!(controller = %controller, selected = ?self.selected_columns, "Selection matched no field, rendering all fields");
                Cow::Borrowed(fields)
            }
        }
    }
}

/// Not a layout field, not excluded, and visible on detail or index
pub fn is_eligible(field: &FieldDescriptor, exclude_columns: &[String]) -> bool {
    !field.is_special()
        && !exclude_columns.contains(&field.property)
        && (field.is_displayed_on(Page::Detail) || field.is_displayed_on(Page::Index))
}

/// Fields named in `selected` (in that order) that are also available
///
/// Matching descriptors are cloned and restricted to the index page; the
/// input catalog is never modified. `None` when nothing matched.
pub fn select_fields(fields: &FieldCollection, available: &[String], selected: &[String]) -> Option<FieldCollection> {
    let mut result = Vec::with_capacity(selected.len());
    for column in selected {
        if !available.contains(column) {
            continue;
        }
        if let Some(field) = fields.get_by_property(column)
            && !field.is_special()
        {
            let mut field = field.clone();
            field.set_displayed_on(BTreeSet::from([Page::Index]));
            result.push(field);
        }
    }

    if result.is_empty() {
        None
    } else {
        Some(FieldCollection::new(result))
    }
}

fn unique<'a>(names: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

fn upsert(list: &mut ColumnLabels, key: &str, value: &str) {
    match list.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value.to_string(),
        None => list.push((key.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::form_type;
    use crate::storage::SessionColumnStorage;
    use anyhow::Result;
    use std::sync::Mutex;

    /// Storage returning a fixed answer and recording what it was asked
    #[derive(Default)]
    struct FixedStorage {
        answer: Vec<String>,
        calls: Mutex<Vec<(String, Vec<String>, Vec<String>)>>,
    }

    impl FixedStorage {
        fn answering(answer: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                answer: names(answer),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    impl SelectedColumnStorage for FixedStorage {
        fn selected_columns(&self, controller: &str, default_columns: &[String], available_columns: &[String]) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .push((controller.to_string(), default_columns.to_vec(), available_columns.to_vec()));
            self.answer.clone()
        }

        fn store_selected_columns(&self, _controller: &str, _columns: &[String]) -> Result<()> {
            Ok(())
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn catalog(properties: &[&str]) -> FieldCollection {
        FieldCollection::new(properties.iter().map(|p| FieldDescriptor::new(*p)).collect())
    }

    fn chooser_with(storage: Arc<dyn SelectedColumnStorage>) -> ColumnChooser {
        let mut chooser = ColumnChooser::new();
        chooser.set_storage(Some(storage));
        chooser.set_enabled(true);
        chooser
    }

    fn rendered(fields: &FieldCollection) -> Vec<&str> {
        fields.properties()
    }

    #[test]
    fn test_set_columns_dedups_available_in_first_seen_order() {
        let mut chooser = ColumnChooser::new();
        chooser.set_columns(names(&["id", "name"]), names(&["email", "name", "id", "bio"]), names(&["password"]));

        assert_eq!(chooser.default_columns(), names(&["id", "name"]).as_slice());
        assert_eq!(chooser.available_columns(), names(&["id", "name", "email", "bio"]).as_slice());
        assert_eq!(chooser.exclude_columns(), names(&["password"]).as_slice());
    }

    #[test]
    fn test_enabled_requires_flag_and_storage() {
        let mut chooser = ColumnChooser::new();
        assert!(!chooser.is_enabled());

        chooser.set_enabled(true);
        assert!(!chooser.is_enabled(), "flag alone is not enough");

        chooser.set_storage(Some(Arc::new(SessionColumnStorage::new())));
        assert!(chooser.is_enabled());

        chooser.set_enabled(false);
        assert!(!chooser.is_enabled(), "storage alone is not enough");
    }

    #[test]
    fn test_disabled_returns_input_unchanged() {
        let fields = catalog(&["id", "name"]);

        // Flag off, storage attached
        let mut chooser = chooser_with(FixedStorage::answering(&["name"]));
        chooser.set_enabled(false);
        let out = chooser.process("C", &fields);
        assert!(matches!(out, Cow::Borrowed(b) if std::ptr::eq(b, &fields)));
        assert!(chooser.all_columns_labels().is_empty());

        // Flag on, no storage
        let mut chooser = ColumnChooser::new();
        chooser.set_enabled(true);
        let out = chooser.process("C", &fields);
        assert!(matches!(out, Cow::Borrowed(b) if std::ptr::eq(b, &fields)));
    }

    #[test]
    fn test_excluded_columns_never_available() {
        let fields = catalog(&["id", "password", "name", "salt"]);
        let mut chooser = chooser_with(FixedStorage::answering(&[]));
        chooser.set_columns(vec![], vec![], names(&["password", "salt"]));

        chooser.process("C", &fields);
        assert_eq!(chooser.available_columns(), names(&["id", "name"]).as_slice());
        assert!(!chooser.available_columns().contains(&"password".to_string()));
    }

    #[test]
    fn test_all_labels_include_ineligible_fields() {
        let fields = FieldCollection::new(vec![
            FieldDescriptor::new("details").with_form_type(form_type::PANEL),
            FieldDescriptor::new("firstName"),
            FieldDescriptor::new("internalNote").only_on(&[Page::Edit]),
            FieldDescriptor::new("email").with_label("E-mail"),
        ]);
        let mut chooser = chooser_with(FixedStorage::answering(&[]));
        chooser.process("C", &fields);

        assert_eq!(
            chooser.all_columns_labels(),
            &[
                ("details".to_string(), "Details".to_string()),
                ("firstName".to_string(), "First name".to_string()),
                ("internalNote".to_string(), "Internal note".to_string()),
                ("email".to_string(), "E-mail".to_string()),
            ]
        );
        assert_eq!(chooser.available_columns(), names(&["firstName", "email"]).as_slice());
        assert_eq!(chooser.column_label("internalNote"), Some("Internal note"));
    }

    #[test]
    fn test_detail_only_field_is_eligible() {
        let fields = FieldCollection::new(vec![
            FieldDescriptor::new("id"),
            FieldDescriptor::new("bio").only_on(&[Page::Detail]),
        ]);
        let mut chooser = chooser_with(FixedStorage::answering(&["bio"]));
        let out = chooser.process("C", &fields);

        assert_eq!(rendered(&out), vec!["bio"]);
        // Rendered copy is index-only, the catalog keeps its own visibility
        assert!(out.get_by_property("bio").unwrap().is_displayed_on(Page::Index));
        assert!(!out.get_by_property("bio").unwrap().is_displayed_on(Page::Detail));
        assert!(!fields.get_by_property("bio").unwrap().is_displayed_on(Page::Index));
    }

    #[test]
    fn test_no_eligible_fields_returns_input() {
        let fields = FieldCollection::new(vec![
            FieldDescriptor::new("tab").with_form_type(form_type::TAB),
            FieldDescriptor::new("row").with_form_type(form_type::ROW),
            FieldDescriptor::new("plainPassword").only_on(&[Page::New, Page::Edit]),
        ]);
        let storage = FixedStorage::answering(&["tab"]);
        let mut chooser = chooser_with(storage.clone());
        let out = chooser.process("C", &fields);

        assert!(matches!(out, Cow::Borrowed(b) if std::ptr::eq(b, &fields)));
        assert!(storage.calls.lock().unwrap().is_empty(), "storage must not be consulted");
        assert_eq!(chooser.all_columns_labels().len(), 3);
    }

    #[test]
    fn test_default_columns_are_first_seven_eligible() {
        let props = ["f0", "f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9"];
        let fields = catalog(&props);
        let storage = FixedStorage::answering(&[]);
        let mut chooser = chooser_with(storage.clone());
        let out = chooser.process("C", &fields);

        let expected = names(&props[..7]);
        assert_eq!(chooser.default_columns(), expected.as_slice());
        assert_eq!(rendered(&out), props[..7].to_vec());

        // Storage got the defaults and every available column as hints
        let calls = storage.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "C");
        assert_eq!(calls[0].1, expected);
        assert_eq!(calls[0].2, names(&props));
    }

    #[test]
    fn test_explicit_defaults_are_kept() {
        let fields = catalog(&["id", "name", "email"]);
        let mut chooser = chooser_with(FixedStorage::answering(&[]));
        chooser.set_columns(names(&["email", "id"]), vec![], vec![]);
        let out = chooser.process("C", &fields);

        assert_eq!(chooser.default_columns(), names(&["email", "id"]).as_slice());
        assert_eq!(rendered(&out), vec!["email", "id"]);
    }

    #[test]
    fn test_empty_storage_answer_falls_back_to_defaults() {
        let fields = catalog(&["id", "name", "email"]);
        let mut chooser = chooser_with(FixedStorage::answering(&[]));
        chooser.set_columns(names(&["name"]), vec![], vec![]);
        chooser.process("C", &fields);

        assert_eq!(chooser.selected_columns(), chooser.default_columns());
        assert_eq!(chooser.selected_columns(), names(&["name"]).as_slice());
    }

    #[test]
    fn test_unavailable_selection_is_dropped() {
        let fields = catalog(&["a", "b"]);
        let mut chooser = chooser_with(FixedStorage::answering(&["a", "ghost", "b"]));
        let out = chooser.process("C", &fields);

        assert_eq!(chooser.selected_columns(), names(&["a", "ghost", "b"]).as_slice());
        assert_eq!(chooser.available_columns(), names(&["a", "b"]).as_slice());
        assert_eq!(rendered(&out), vec!["a", "b"]);
    }

    #[test]
    fn test_selection_order_drives_output_order() {
        let fields = catalog(&["id", "name", "email"]);
        let mut chooser = chooser_with(FixedStorage::answering(&["email", "id"]));
        let out = chooser.process("C", &fields);
        assert_eq!(rendered(&out), vec!["email", "id"]);
    }

    #[test]
    fn test_excluded_selection_is_not_rendered() {
        let fields = catalog(&["id", "name", "password"]);
        let mut chooser = chooser_with(FixedStorage::answering(&["password", "name"]));
        chooser.set_columns(vec![], vec![], names(&["password"]));
        let out = chooser.process("C", &fields);
        assert_eq!(rendered(&out), vec!["name"]);
    }

    #[test]
    fn test_selection_resolving_to_nothing_returns_input() {
        let fields = catalog(&["id", "name"]);
        let mut chooser = chooser_with(FixedStorage::answering(&["ghost"]));
        let out = chooser.process("C", &fields);

        assert!(matches!(out, Cow::Borrowed(b) if std::ptr::eq(b, &fields)));
        assert_eq!(chooser.selected_columns(), names(&["ghost"]).as_slice());
    }

    #[test]
    fn test_process_is_idempotent() {
        let fields = catalog(&["id", "name", "email", "bio"]);
        let mut chooser = chooser_with(FixedStorage::answering(&["bio", "id"]));

        let first = chooser.process("C", &fields).into_owned();
        let second = chooser.process("C", &fields).into_owned();
        assert_eq!(first, second);
        assert_eq!(chooser.available_columns(), names(&["id", "name", "email", "bio"]).as_slice());
    }

    #[test]
    fn test_process_recomputes_available_from_catalog() {
        let mut chooser = chooser_with(FixedStorage::answering(&[]));
        chooser.set_columns(names(&["id"]), names(&["notInCatalog"]), vec![]);
        chooser.process("C", &catalog(&["id", "name"]));
        assert_eq!(chooser.available_columns(), names(&["id", "name"]).as_slice());
    }

    #[test]
    fn test_current_columns_lists_selection_then_available() {
        let fields = FieldCollection::new(vec![
            FieldDescriptor::new("id").with_label("ID"),
            FieldDescriptor::new("name"),
            FieldDescriptor::new("email").with_label("E-mail"),
        ]);
        let mut chooser = chooser_with(FixedStorage::answering(&["email", "ghost"]));
        chooser.process("C", &fields);

        assert_eq!(
            chooser.current_columns(),
            vec![
                ("E-mail".to_string(), "email".to_string()),
                ("ghost".to_string(), "ghost".to_string()),
                ("ID".to_string(), "id".to_string()),
                ("Name".to_string(), "name".to_string()),
            ]
        );
    }

    #[test]
    fn test_current_columns_repeated_label_takes_later_column() {
        let fields = FieldCollection::new(vec![
            FieldDescriptor::new("createdAt").with_label("Date"),
            FieldDescriptor::new("updatedAt").with_label("Date"),
        ]);
        let mut chooser = chooser_with(FixedStorage::answering(&[]));
        chooser.process("C", &fields);

        assert_eq!(chooser.current_columns(), vec![("Date".to_string(), "updatedAt".to_string())]);
    }

    #[test]
    fn test_select_fields_skips_special_types() {
        let fields = FieldCollection::new(vec![
            FieldDescriptor::new("panel").with_form_type(form_type::PANEL),
            FieldDescriptor::new("id"),
        ]);
        let out = select_fields(&fields, &names(&["panel", "id"]), &names(&["panel", "id"])).unwrap();
        assert_eq!(out.properties(), vec!["id"]);
        assert!(select_fields(&fields, &names(&["id"]), &names(&["panel"])).is_none());
    }

    #[test]
    fn test_session_storage_round_trip_through_chooser() {
        let storage = Arc::new(SessionColumnStorage::new());
        let fields = catalog(&["id", "name", "email"]);
        let mut chooser = chooser_with(storage.clone());

        assert_eq!(rendered(&chooser.process("App\\UserCrud", &fields)), vec!["id", "name", "email"]);

        storage.store_selected_columns("App\\UserCrud", &names(&["name"])).unwrap();
        assert_eq!(rendered(&chooser.process("App\\UserCrud", &fields)), vec!["name"]);
    }
}
