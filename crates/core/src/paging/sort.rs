//! Sortable columns and sort directions

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Sort direction of a column, as carried in `<column>_order` parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending, NULLs first
    Asc,
    /// Descending
    Desc,
    /// Explicitly unsorted, overrides a declared default
    #[serde(rename = "none")]
    Off,
}

impl SortDirection {
    /// Value written into query strings
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::Off => "none",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else if s.eq_ignore_ascii_case("none") {
            Ok(Self::Off)
        } else {
            Err(format!("Unknown sort direction: {}", s))
        }
    }
}

/// A column an admin listing lets users sort on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortableColumn {
    /// Name as declared, e.g. `login.userid` or `userid`
    name: String,
    /// Direction applied when the request says nothing
    default: Option<SortDirection>,
}

impl SortableColumn {
    pub fn new(name: impl Into<String>, default: Option<SortDirection>) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }

    /// Declared name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_direction(&self) -> Option<SortDirection> {
        self.default
    }

    /// Table qualifier and bare column name
    pub fn parts(&self) -> (Option<&str>, &str) {
        match self.name.split_once('.') {
            Some((table, column)) => (Some(table), column),
            None => (None, self.name.as_str()),
        }
    }

    /// Query parameter carrying this column's direction
    ///
    /// `login.userid` → `login_userid_order`, `userid` → `userid_order`
    pub fn param(&self) -> String {
        match self.parts() {
            (Some(table), column) => format!("{}_{}_order", table, column),
            (None, column) => format!("{}_order", column),
        }
    }

    /// Backtick-quoted SQL identifier
    pub fn sql_identifier(&self) -> String {
        match self.parts() {
            (Some(table), column) => format!("`{}`.`{}`", table, column),
            (None, column) => format!("`{}`", column),
        }
    }

    /// ORDER BY term for a direction, `None` for [`SortDirection::Off`]
    ///
    /// Ascending puts NULLs first regardless of the database's default.
    pub fn order_term(&self, direction: SortDirection) -> Option<String> {
        let ident = self.sql_identifier();
        match direction {
            SortDirection::Asc => Some(format!(
                "(CASE WHEN {ident} IS NULL THEN 1 ELSE 0 END) ASC, {ident} ASC"
            )),
            SortDirection::Desc => Some(format!("{ident} DESC")),
            SortDirection::Off => None,
        }
    }
}

impl From<&str> for SortableColumn {
    fn from(name: &str) -> Self {
        Self::new(name, None)
    }
}

impl From<(&str, SortDirection)> for SortableColumn {
    fn from((name, default): (&str, SortDirection)) -> Self {
        Self::new(name, Some(default))
    }
}

impl From<(&str, Option<SortDirection>)> for SortableColumn {
    fn from((name, default): (&str, Option<SortDirection>)) -> Self {
        Self::new(name, default)
    }
}
