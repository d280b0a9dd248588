//! Field descriptors and the ordered field catalog of a page

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::form_type;
use crate::types::Page;

/// One configured field of an entity page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    /// Pages this field is rendered on (all pages when omitted)
    #[serde(default = "all_pages")]
    pub displayed_on: BTreeSet<Page>,
}

fn all_pages() -> BTreeSet<Page> {
    Page::ALL.into_iter().collect()
}

impl FieldDescriptor {
    /// Field shown on every page, no label, plain form type
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            label: None,
            form_type: None,
            displayed_on: all_pages(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_form_type(mut self, form_type: impl Into<String>) -> Self {
        self.form_type = Some(form_type.into());
        self
    }

    pub fn only_on(mut self, pages: &[Page]) -> Self {
        self.displayed_on = pages.iter().copied().collect();
        self
    }

    pub fn is_displayed_on(&self, page: Page) -> bool {
        self.displayed_on.contains(&page)
    }

    pub fn set_displayed_on(&mut self, pages: BTreeSet<Page>) {
        self.displayed_on = pages;
    }

    /// Explicit label, or the property name humanized
    pub fn label_or_humanized(&self) -> String {
        self.label.clone().unwrap_or_else(|| humanize(&self.property))
    }

    /// Layout-only field (panel, row, tab)
    pub fn is_special(&self) -> bool {
        is_special_form_type(self.form_type.as_deref())
    }
}

/// True for the layout grouping form types
pub fn is_special_form_type(kind: Option<&str>) -> bool {
    kind.is_some_and(|kind| form_type::SPECIAL.contains(&kind))
}

/// Turn a property name into a label: `firstName` and `first_name` both become `First name`
pub fn humanize(property: &str) -> String {
    let mut spaced = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_uppercase() {
            spaced.push('_');
        }
        spaced.push(c);
    }

    // Collapse runs of '_' and whitespace into a single space
    let mut collapsed = String::with_capacity(spaced.len());
    let mut in_gap = false;
    for c in spaced.chars() {
        if c == '_' || c.is_whitespace() {
            if !in_gap {
                collapsed.push(' ');
                in_gap = true;
            }
        } else {
            collapsed.push(c);
            in_gap = false;
        }
    }

    let lower = collapsed.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ordered field catalog for one page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCollection {
    fields: Vec<FieldDescriptor>,
}

impl FieldCollection {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First field with the given property name
    pub fn get_by_property(&self, property: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.property == property)
    }

    pub fn properties(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.property.as_str()).collect()
    }
}

impl From<Vec<FieldDescriptor>> for FieldCollection {
    fn from(fields: Vec<FieldDescriptor>) -> Self {
        Self::new(fields)
    }
}

impl<'a> IntoIterator for &'a FieldCollection {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
