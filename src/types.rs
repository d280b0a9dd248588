//! Small value types shared across page configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::page;

/// CRUD page an admin request renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Index,
    Detail,
    Edit,
    New,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Detail, Page::Edit, Page::Index, Page::New];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Index => page::INDEX,
            Page::Detail => page::DETAIL,
            Page::Edit => page::EDIT,
            Page::New => page::NEW,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            page::INDEX => Ok(Page::Index),
            page::DETAIL => Ok(Page::Detail),
            page::EDIT => Ok(Page::Edit),
            page::NEW => Ok(Page::New),
            other => anyhow::bail!("Unknown page '{}' (expected index, detail, edit or new)", other),
        }
    }
}

/// Sort direction for one entry of the default sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// How a multi-word search query is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchMode {
    /// Every term must match (AND)
    #[default]
    AllTerms,
    /// Any single term may match (OR)
    AnyTerm,
}

/// Ordered (field, direction) pairs; first entry sorts first
pub type SortSpec = Vec<(String, SortDirection)>;

/// Permission required to see an entity: a role name or an expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityPermission {
    Role(String),
    Expression(String),
}

/// Trait implemented by entity instances passed to title and label resolution
pub trait Entity {
    /// Human-readable representation, if the entity has one
    fn display_string(&self) -> Option<String> {
        None
    }
}

impl Entity for String {
    fn display_string(&self) -> Option<String> {
        Some(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_parse_case_insensitive() {
        assert_eq!("Index".parse::<Page>().unwrap(), Page::Index);
        assert_eq!(" detail ".parse::<Page>().unwrap(), Page::Detail);
        assert!("dashboard".parse::<Page>().is_err());
    }

    #[test]
    fn test_search_mode_serde_names() {
        let json = serde_json::to_string(&SearchMode::AnyTerm).unwrap();
        assert_eq!(json, "\"ANY_TERM\"");
        let mode: SearchMode = serde_json::from_str("\"ALL_TERMS\"").unwrap();
        assert_eq!(mode, SearchMode::AllTerms);
    }

    #[test]
    fn test_sort_direction_serde_names() {
        let spec: SortSpec = serde_json::from_str(r#"[["name","ASC"],["id","DESC"]]"#).unwrap();
        assert_eq!(spec[0], ("name".to_string(), SortDirection::Asc));
        assert_eq!(spec[1], ("id".to_string(), SortDirection::Desc));
    }
}
