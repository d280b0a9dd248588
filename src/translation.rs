//! Translatable message handles
//!
//! The translation engine itself lives outside this crate; page configuration
//! only builds handles (message key + parameters + optional domain) for it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Parameters substituted into a message by the translator
pub type TranslationParameters = BTreeMap<String, String>;

/// Message key plus parameters, resolved later by the translator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranslatableMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: TranslationParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl TranslatableMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Copy of this handle with extra parameters merged in (new values win)
    pub fn with_parameters(&self, parameters: &TranslationParameters) -> Self {
        let mut merged = self.parameters.clone();
        merged.extend(parameters.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            message: self.message.clone(),
            parameters: merged,
            domain: self.domain.clone(),
        }
    }
}

impl fmt::Display for TranslatableMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Build a translatable handle
pub fn t(message: impl Into<String>, parameters: &TranslationParameters, domain: Option<&str>) -> TranslatableMessage {
    TranslatableMessage {
        message: message.into(),
        parameters: parameters.clone(),
        domain: domain.map(str::to_string),
    }
}

/// Plain text or a translatable handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Plain(String),
    Translatable(TranslatableMessage),
}

impl Text {
    pub fn is_empty(&self) -> bool {
        match self {
            Text::Plain(s) => s.is_empty(),
            Text::Translatable(m) => m.message.is_empty(),
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Text::Plain(String::new())
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text::Plain(value.to_string())
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text::Plain(value)
    }
}

impl From<TranslatableMessage> for Text {
    fn from(value: TranslatableMessage) -> Self {
        Text::Translatable(value)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Text::Plain(s) => f.write_str(s),
            Text::Translatable(m) => m.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> TranslationParameters {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_t_builds_handle() {
        let msg = t("page_title.index", &params(&[("%entity_label_plural%", "Users")]), Some("EasyAdminBundle"));
        assert_eq!(msg.message, "page_title.index");
        assert_eq!(msg.domain.as_deref(), Some("EasyAdminBundle"));
        assert_eq!(msg.parameters.get("%entity_label_plural%").map(String::as_str), Some("Users"));
    }

    #[test]
    fn test_with_parameters_overrides_existing_values() {
        let original = t("title", &params(&[("a", "own")]), None);
        let merged = original.with_parameters(&params(&[("a", "new"), ("b", "added")]));
        assert_eq!(merged.parameters.get("a").map(String::as_str), Some("new"));
        assert_eq!(merged.parameters.get("b").map(String::as_str), Some("added"));
        // Original untouched
        assert_eq!(original.parameters.len(), 1);
    }

    #[test]
    fn test_text_untagged_serde() {
        let plain: Text = serde_json::from_str("\"Hello\"").unwrap();
        assert_eq!(plain, Text::Plain("Hello".to_string()));
        let handle: Text = serde_json::from_str(r#"{"message":"help.users","domain":"admin"}"#).unwrap();
        assert!(matches!(handle, Text::Translatable(ref m) if m.message == "help.users"));
    }
}
