//! Application-wide constants
//!
//! Page names, translation domains, form types and the default values
//! used by page configuration.

/// Page identifiers as they appear in settings files and templates
pub mod page {
    pub const INDEX: &str = "index";
    pub const DETAIL: &str = "detail";
    pub const EDIT: &str = "edit";
    pub const NEW: &str = "new";
}

/// Translation domain and message keys
pub mod translation {
    /// Domain used for built-in admin messages (default titles, entity names)
    pub const ADMIN_DOMAIN: &str = "EasyAdminBundle";

    pub const TITLE_DETAIL: &str = "page_title.detail";
    pub const TITLE_EDIT: &str = "page_title.edit";
    pub const TITLE_INDEX: &str = "page_title.index";
    pub const TITLE_NEW: &str = "page_title.new";
}

/// Form type identifiers
pub mod form_type {
    /// Panel grouping (fieldset)
    pub const PANEL: &str = "EasyCorp\\Bundle\\EasyAdminBundle\\Form\\Type\\EaFormPanelType";

    /// Row break inside a form
    pub const ROW: &str = "EasyCorp\\Bundle\\EasyAdminBundle\\Form\\Type\\EaFormRowType";

    /// Tab grouping
    pub const TAB: &str = "EasyCorp\\Bundle\\EasyAdminBundle\\Form\\Type\\EasyAdminTabType";

    /// Layout-only types that never render as a data column
    pub const SPECIAL: [&str; 3] = [PANEL, ROW, TAB];
}

/// Formatting defaults
pub mod format {
    /// ICU date/time style used when nothing else is configured
    pub const MEDIUM: &str = "medium";

    /// Time format meaning "date only"
    pub const NONE: &str = "none";

    pub const DATE_INTERVAL: &str = "%%y Year(s) %%m Month(s) %%d Day(s)";
}

/// Base form theme always rendered first
pub const BASE_FORM_THEME: &str = "@EasyAdmin/crud/form_theme.html.twig";

/// Column chooser constants
pub mod columns {
    /// Number of eligible fields taken as defaults when none are configured
    pub const DEFAULT_COLUMN_COUNT: usize = 7;
}

/// Paginator defaults
pub mod paginator {
    pub const PAGE_SIZE: u32 = 30;
    pub const RANGE_SIZE: u32 = 3;
    pub const RANGE_EDGE_SIZE: u32 = 1;
}

/// Storage locations
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "crud-page";

    /// File holding persisted column selections
    pub const COLUMNS_FILENAME: &str = "selected_columns.json";
}
