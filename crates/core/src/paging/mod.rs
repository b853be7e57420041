//! Pagination and column sorting for admin listings
//!
//! A [`Paginator`] is built per request from the total row count and the
//! request URI. It appends `ORDER BY` and `LIMIT` to the listing query and
//! produces the page links and sortable column headers for the response.
//!
//! Sort state travels in the query string as `<table>_<column>_order` (or
//! `<column>_order`) with the values `asc`, `desc` and `none`. Every link the
//! paginator builds keeps the other parameters of the request untouched.
//!
//! # Example
//!
//! ```ignore
//! use fluxpanel_core::paging::{PagerOptions, Paginator, SortDirection};
//!
//! let mut pager = Paginator::new(total, request_uri, PagerOptions::default());
//! let sql = pager.sorted_paged_query(
//!     "SELECT * FROM login",
//!     [("login.userid", None), ("login.lastlogin", Some(SortDirection::Desc))],
//! );
//! let header = pager.sortable_column("login.userid", Some("User ID")).to_html();
//! let pages = pager.render_html();
//! ```

mod options;
mod paginator;
mod query;
mod render;
mod sort;

pub use options::{
    PagerOptions, DEFAULT_PAGES_TO_SHOW, DEFAULT_PAGE_SEPARATOR, DEFAULT_PAGE_VARIABLE,
    DEFAULT_PER_PAGE,
};
pub use paginator::Paginator;
pub use query::{split_uri, QueryParams};
pub use render::{escape_html, PageItem, PageList, SortLink};
pub use sort::{SortDirection, SortableColumn};
