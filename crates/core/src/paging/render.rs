//! Link descriptors and their HTML rendering

use std::fmt::Write;

use serde::Serialize;

use super::sort::SortDirection;

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// One entry of a page list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageItem {
    /// Link to the last page of the previous window
    Previous { page: u64, href: String },
    /// Link to a page in the current window
    Page { page: u64, href: String },
    /// The page being displayed, not linked
    Current { page: u64 },
    /// Link to the first page of the next window
    Next { page: u64, href: String },
}

impl PageItem {
    pub fn page(&self) -> u64 {
        match self {
            Self::Previous { page, .. }
            | Self::Page { page, .. }
            | Self::Current { page }
            | Self::Next { page, .. } => *page,
        }
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Previous { href, .. } | Self::Page { href, .. } | Self::Next { href, .. } => {
                Some(href)
            }
            Self::Current { .. } => None,
        }
    }

    fn to_html(&self) -> String {
        match self {
            Self::Previous { page, href } => format!(
                "<a href=\"{}\" title=\"Previous Pane (p#{})\" class=\"page-prev\">Prev.</a>",
                escape_html(href),
                page
            ),
            Self::Page { page, href } => format!(
                "<a href=\"{}\" title=\"Page #{}\" class=\"page-num\">{}</a>",
                escape_html(href),
                page,
                page
            ),
            Self::Current { page } => format!(
                "<a title=\"Page #{}\" class=\"page-num current-page\">{}</a>",
                page, page
            ),
            Self::Next { page, href } => format!(
                "<a href=\"{}\" title=\"Next Pane (p#{})\" class=\"page-next\">Next</a>",
                escape_html(href),
                page
            ),
        }
    }
}

/// Window of page links around the current page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageList {
    pub items: Vec<PageItem>,
}

impl PageList {
    /// Render as `<div class="pages">` with `separator` between links
    pub fn to_html(&self, separator: &str) -> String {
        let joiner = format!(" {} ", escape_html(separator));
        let mut body = String::new();

        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                body.push_str(&joiner);
            }
            // Prev/next sit one space further from their neighbours
            match item {
                PageItem::Previous { .. } => {
                    let _ = write!(body, "{} ", item.to_html());
                }
                PageItem::Next { .. } => {
                    let _ = write!(body, " {}", item.to_html());
                }
                _ => body.push_str(&item.to_html()),
            }
        }

        format!("<div class=\"pages\">{}</div>\n", body)
    }

    /// Pages linked or shown in the window, excluding prev/next
    pub fn window(&self) -> impl Iterator<Item = u64> + '_ {
        self.items.iter().filter_map(|item| match item {
            PageItem::Page { page, .. } | PageItem::Current { page } => Some(*page),
            _ => None,
        })
    }
}

/// Header link that cycles a column's sort state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortLink {
    /// Header text, with a direction suffix when sorted
    pub label: String,
    /// Target URI, `None` when the column is not sortable
    pub href: Option<String>,
    /// Direction the column is currently sorted in
    pub current: Option<SortDirection>,
    /// Direction the link switches to, `None` when it clears the sort
    pub next: Option<SortDirection>,
}

impl SortLink {
    pub fn is_sortable(&self) -> bool {
        self.href.is_some()
    }

    /// Render as an anchor, or plain escaped text for unsortable columns
    pub fn to_html(&self) -> String {
        match &self.href {
            Some(href) => format!(
                "<a href=\"{}\" class=\"sortable\">{}</a>",
                escape_html(href),
                escape_html(&self.label)
            ),
            None => escape_html(&self.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom & Jerry's\"</b>"),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#039;s&quot;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_page_list_html() {
        let list = PageList {
            items: vec![
                PageItem::Previous {
                    page: 10,
                    href: "/a?p=10".to_string(),
                },
                PageItem::Current { page: 11 },
                PageItem::Page {
                    page: 12,
                    href: "/a?x=1&p=12".to_string(),
                },
                PageItem::Next {
                    page: 13,
                    href: "/a?p=13".to_string(),
                },
            ],
        };

        let html = list.to_html("|");
        assert!(html.starts_with("<div class=\"pages\"><a href=\"/a?p=10\""));
        assert!(html.contains("Prev.</a>  | <a title=\"Page #11\" class=\"page-num current-page\">11</a>"));
        assert!(html.contains("href=\"/a?x=1&amp;p=12\""));
        assert!(html.contains(" |  <a href=\"/a?p=13\" title=\"Next Pane (p#13)\""));
        assert!(html.ends_with("</div>\n"));
        assert_eq!(list.window().collect::<Vec<_>>(), vec![11, 12]);
    }

    #[test]
    fn test_page_item_accessors() {
        let item = PageItem::Page {
            page: 3,
            href: "/x?p=3".to_string(),
        };
        assert_eq!(item.page(), 3);
        assert_eq!(item.href(), Some("/x?p=3"));
        assert_eq!(PageItem::Current { page: 2 }.href(), None);
    }

    #[test]
    fn test_sort_link_html() {
        let link = SortLink {
            label: "Name <ASC>".to_string(),
            href: Some("/list?a=1&name_order=desc".to_string()),
            current: Some(SortDirection::Asc),
            next: Some(SortDirection::Desc),
        };
        assert_eq!(
            link.to_html(),
            "<a href=\"/list?a=1&amp;name_order=desc\" class=\"sortable\">Name &lt;ASC&gt;</a>"
        );

        let plain = SortLink {
            label: "Zeny".to_string(),
            href: None,
            current: None,
            next: None,
        };
        assert!(!plain.is_sortable());
        assert_eq!(plain.to_html(), "Zeny");
    }

    #[test]
    fn test_page_item_serializes_tagged() {
        let json = serde_json::to_value(PageItem::Current { page: 4 }).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "current", "page": 4}));
    }
}
