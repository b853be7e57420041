//! Request-scoped paginator
//!
//! Built once per request from the row count and the request URI. Sort
//! state is read from `<column>_order` parameters while the SQL is built and
//! then drives the header links.

use std::collections::HashMap;

use super::options::PagerOptions;
use super::query::{split_uri, QueryParams};
use super::render::{escape_html, PageItem, PageList, SortLink};
use super::sort::{SortDirection, SortableColumn};

/// Placeholder substituted by the page-jump script
const JUMP_MARKER: &str = "__FLUXPANEL_PAGE__";

/// Escape text for a single-quoted JavaScript string literal
fn escape_js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

/// Paging and sorting state for one admin listing request
#[derive(Debug, Clone)]
pub struct Paginator {
    total: u64,
    current_page: u64,
    number_of_pages: u64,
    options: PagerOptions,

    /// Request path without the query string
    path: String,
    /// Parsed query string of the request
    query: QueryParams,

    /// Sortable columns in declaration order
    sortable: Vec<SortableColumn>,
    /// Directions applied by the last [`Paginator::sql`] call, keyed by
    /// declared column name
    current_sort: HashMap<String, SortDirection>,
}

impl Paginator {
    /// Create a paginator for `total` rows and the raw request URI.
    ///
    /// The current page comes from the page parameter; missing, non-numeric
    /// and non-positive values mean page 1.
    pub fn new(total: u64, request_uri: &str, options: PagerOptions) -> Self {
        let options = options.normalized();
        let (path, _) = split_uri(request_uri);
        let query = QueryParams::from_uri(request_uri);

        let current_page = query
            .get(&options.page_variable)
            .and_then(|p| p.trim().parse::<u64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);

        let per_page = u64::from(options.per_page);
        let number_of_pages = total.div_ceil(per_page).max(1);

        tracing::debug!(
            "Paginator: {} rows, page {}/{}, {} per page",
            total,
            current_page,
            number_of_pages,
            per_page
        );

        Self {
            total,
            current_page,
            number_of_pages,
            options,
            path: path.to_string(),
            query,
            sortable: Vec::new(),
            current_sort: HashMap::new(),
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn number_of_pages(&self) -> u64 {
        self.number_of_pages
    }

    pub fn per_page(&self) -> u64 {
        u64::from(self.options.per_page)
    }

    pub fn options(&self) -> &PagerOptions {
        &self.options
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Row offset of the current page
    pub fn offset(&self) -> u64 {
        self.per_page().saturating_mul(self.current_page - 1)
    }

    /// `LIMIT offset,count` for the current page
    pub fn limit_clause(&self) -> String {
        format!("LIMIT {},{}", self.offset(), self.per_page())
    }

    /// Declare sortable columns.
    ///
    /// Columns keep declaration order; declaring a column again replaces its
    /// default direction without moving it.
    pub fn set_sortable_columns<I, C>(&mut self, columns: I) -> &[SortableColumn]
    where
        I: IntoIterator<Item = C>,
        C: Into<SortableColumn>,
    {
        for column in columns {
            let column = column.into();
            match self.sortable.iter_mut().find(|c| c.name() == column.name()) {
                Some(existing) => *existing = column,
                None => self.sortable.push(column),
            }
        }
        &self.sortable
    }

    pub fn sortable_columns(&self) -> &[SortableColumn] {
        &self.sortable
    }

    /// Direction a column was sorted in by the last [`Paginator::sql`] call.
    ///
    /// Accepts the declared name, or the bare column name when no column is
    /// declared under exactly that name.
    pub fn current_sort(&self, column: &str) -> Option<SortDirection> {
        if self.sortable.iter().any(|c| c.name() == column) {
            return self.current_sort.get(column).copied();
        }
        self.sortable
            .iter()
            .find(|c| c.parts().1 == column)
            .and_then(|c| self.current_sort.get(c.name()).copied())
    }

    /// Direction requested for a column: the query parameter when valid,
    /// otherwise the declared default
    fn effective_direction(&self, column: &SortableColumn) -> Option<SortDirection> {
        let param = column.param();
        let requested = self.query.get(&param).and_then(|value| match value.parse() {
            Ok(direction) => Some(direction),
            Err(_) => {
                tracing::debug!("Ignoring sort value {:?} for {}", value, param);
                None
            }
        });
        requested.or(column.default_direction())
    }

    /// Append `ORDER BY` for the sorted columns and `LIMIT` for the current
    /// page to `base`.
    pub fn sql(&mut self, base: &str) -> String {
        self.current_sort.clear();

        let mut terms = Vec::new();
        for column in &self.sortable {
            let Some(direction) = self.effective_direction(column) else {
                continue;
            };
            if let Some(term) = column.order_term(direction) {
                self.current_sort.insert(column.name().to_string(), direction);
                terms.push(term);
            }
        }

        let mut sql = base.to_string();
        if !terms.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }
        sql.push(' ');
        sql.push_str(&self.limit_clause());
        sql
    }

    /// Declare sortable columns and build the paged query in one step
    pub fn sorted_paged_query<I, C>(&mut self, base: &str, columns: I) -> String
    where
        I: IntoIterator<Item = C>,
        C: Into<SortableColumn>,
    {
        self.set_sortable_columns(columns);
        self.sql(base)
    }

    /// Header link cycling a column through unsorted, ascending and
    /// descending.
    ///
    /// After descending, columns with a declared default go to an explicit
    /// `none`; columns without one drop the parameter entirely.
    pub fn sortable_column(&self, column: &str, name: Option<&str>) -> SortLink {
        let label = name.unwrap_or(column);

        let Some(declared) = self.sortable.iter().find(|c| c.name() == column) else {
            return SortLink {
                label: label.to_string(),
                href: None,
                current: None,
                next: None,
            };
        };

        let current = self.current_sort.get(declared.name()).copied();
        let (next, suffix) = match current {
            None | Some(SortDirection::Off) => (Some(SortDirection::Asc), ""),
            Some(SortDirection::Asc) => (
                Some(SortDirection::Desc),
                self.options.sort_ascending_suffix.as_str(),
            ),
            Some(SortDirection::Desc) => (
                declared.default_direction().map(|_| SortDirection::Off),
                self.options.sort_descending_suffix.as_str(),
            ),
        };

        let param = declared.param();
        let mut query = self.query.clone();
        match next {
            Some(direction) => query.set(&param, direction.as_param()),
            None => {
                query.remove(&param);
            }
        }

        SortLink {
            label: format!("{}{}", label, suffix),
            href: Some(query.to_uri(&self.path)),
            current,
            next,
        }
    }

    fn link_with_page_value(&self, value: &str) -> String {
        let mut query = self.query.clone();
        query.set(&self.options.page_variable, value);
        format!("{}?{}", self.path, query)
    }

    /// URI of the current request pointing at another page.
    ///
    /// Every other parameter is kept in place; the page parameter is
    /// overwritten where it was or appended.
    pub fn page_link(&self, page: u64) -> String {
        self.link_with_page_value(&page.to_string())
    }

    /// Page links for the window containing the current page.
    ///
    /// Returns `None` when there is a single page and single pages are not
    /// shown.
    pub fn page_list(&self) -> Option<PageList> {
        if !self.options.show_single_page && self.number_of_pages == 1 {
            return None;
        }

        let pages_to_show = u64::from(self.options.pages_to_show);
        let start = (self.current_page - 1) / pages_to_show * pages_to_show + 1;
        let last = start
            .saturating_add(pages_to_show - 1)
            .min(self.number_of_pages);

        let mut items = Vec::new();
        if start > 1 {
            items.push(PageItem::Previous {
                page: start - 1,
                href: self.page_link(start - 1),
            });
        }

        for page in start..=last {
            if page == self.current_page {
                items.push(PageItem::Current { page });
            } else {
                items.push(PageItem::Page {
                    page,
                    href: self.page_link(page),
                });
            }
        }

        if last < self.number_of_pages {
            items.push(PageItem::Next {
                page: last + 1,
                href: self.page_link(last + 1),
            });
        }

        Some(PageList { items })
    }

    /// Page-jump input whose Enter handler loads the typed page
    fn page_jump_html(&self) -> String {
        let target = escape_html(&escape_js_string(&self.link_with_page_value(JUMP_MARKER)))
            .replace(JUMP_MARKER, "'+this.value+'");
        format!(
            "<div class=\"jump-to-page\"><label>Page Jump: <input type=\"text\" name=\"jump_to_page\" \
             id=\"jump_to_page\" size=\"4\" onkeypress=\"if (event.keyCode == 13) {{ location.href='{}' }}\" \
             /></label></div>",
            target
        )
    }

    /// Page list HTML, with the page jump when enabled; empty when there is
    /// nothing to show
    pub fn render_html(&self) -> String {
        let Some(list) = self.page_list() else {
            return String::new();
        };

        let mut html = list.to_html(&self.options.page_separator);
        if self.options.show_page_jump && self.number_of_pages > self.options.page_jump_min_pages
        {
            html.push_str(&self.page_jump_html());
        }
        html
    }

    /// Result summary for the current page
    pub fn info_text(&self) -> String {
        let per_page = self.per_page();
        let last_on_page = self.current_page.saturating_mul(per_page);
        let first = last_on_page - (per_page - 1);
        let last = last_on_page.min(self.total);

        self.options
            .results_message
            .replace("{total}", &self.total.to_string())
            .replace("{pages}", &self.number_of_pages.to_string())
            .replace("{first}", &first.to_string())
            .replace("{last}", &last.to_string())
    }
}
