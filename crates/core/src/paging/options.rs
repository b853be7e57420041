//! Paginator options

use crate::config::PanelConfig;

/// Default rows per page
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Default number of page links shown at once
pub const DEFAULT_PAGES_TO_SHOW: u32 = 10;

/// Default query parameter holding the page number
pub const DEFAULT_PAGE_VARIABLE: &str = "p";

/// Default separator between page links
pub const DEFAULT_PAGE_SEPARATOR: &str = "|";

/// Settings for one [`Paginator`](super::Paginator)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerOptions {
    /// Rows per page, at least 1
    pub per_page: u32,
    /// Page links shown at once, at least 1
    pub pages_to_show: u32,
    /// Render the page list even when there is only one page
    pub show_single_page: bool,
    /// Query parameter holding the current page
    pub page_variable: String,
    /// Separator placed between page links
    pub page_separator: String,
    /// Render the page-jump input
    pub show_page_jump: bool,
    /// Page jump only shows above this many pages
    pub page_jump_min_pages: u64,
    /// Header suffix for columns sorted ascending
    pub sort_ascending_suffix: String,
    /// Header suffix for columns sorted descending
    pub sort_descending_suffix: String,
    /// Result summary template
    pub results_message: String,
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self::from_panel(&PanelConfig::default())
    }
}

impl PagerOptions {
    /// Options derived from the panel settings
    pub fn from_panel(panel: &PanelConfig) -> Self {
        Self {
            per_page: panel.results_per_page,
            pages_to_show: panel.pages_to_show,
            show_single_page: panel.show_single_page,
            page_variable: DEFAULT_PAGE_VARIABLE.to_string(),
            page_separator: DEFAULT_PAGE_SEPARATOR.to_string(),
            show_page_jump: panel.show_page_jump,
            page_jump_min_pages: panel.page_jump_min_pages.into(),
            sort_ascending_suffix: panel.column_sort_ascending.clone(),
            sort_descending_suffix: panel.column_sort_descending.clone(),
            results_message: panel.found_search_results.clone(),
        }
        .normalized()
    }

    /// Replace zero counts with the defaults
    pub fn normalized(mut self) -> Self {
        if self.per_page == 0 {
            tracing::warn!("per_page of 0 replaced with {}", DEFAULT_PER_PAGE);
            self.per_page = DEFAULT_PER_PAGE;
        }
        if self.pages_to_show == 0 {
            tracing::warn!("pages_to_show of 0 replaced with {}", DEFAULT_PAGES_TO_SHOW);
            self.pages_to_show = DEFAULT_PAGES_TO_SHOW;
        }
        if self.page_variable.is_empty() {
            self.page_variable = DEFAULT_PAGE_VARIABLE.to_string();
        }
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self.normalized()
    }

    pub fn with_pages_to_show(mut self, pages_to_show: u32) -> Self {
        self.pages_to_show = pages_to_show;
        self.normalized()
    }

    pub fn with_show_single_page(mut self, show: bool) -> Self {
        self.show_single_page = show;
        self
    }

    pub fn with_page_variable(mut self, name: impl Into<String>) -> Self {
        self.page_variable = name.into();
        self.normalized()
    }

    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }

    pub fn with_page_jump(mut self, show: bool) -> Self {
        self.show_page_jump = show;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PagerOptions::default();
        assert_eq!(options.per_page, 20);
        assert_eq!(options.pages_to_show, 10);
        assert!(!options.show_single_page);
        assert_eq!(options.page_variable, "p");
        assert_eq!(options.page_separator, "|");
    }

    #[test]
    fn test_from_panel() {
        let panel = PanelConfig {
            results_per_page: 50,
            pages_to_show: 5,
            show_single_page: true,
            ..PanelConfig::default()
        };
        let options = PagerOptions::from_panel(&panel);
        assert_eq!(options.per_page, 50);
        assert_eq!(options.pages_to_show, 5);
        assert!(options.show_single_page);
    }

    #[test]
    fn test_zero_counts_normalized() {
        let options = PagerOptions::default()
            .with_per_page(0)
            .with_pages_to_show(0)
            .with_page_variable("");
        assert_eq!(options.per_page, DEFAULT_PER_PAGE);
        assert_eq!(options.pages_to_show, DEFAULT_PAGES_TO_SHOW);
        assert_eq!(options.page_variable, "p");
    }
}
