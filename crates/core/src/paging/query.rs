//! Ordered query-string map
//!
//! Keeps parameters in order of first appearance. Repeated keys collapse
//! into one entry holding the last value. Values are kept exactly as they
//! appear in the URI; nothing is percent-decoded or re-encoded.

use std::fmt;

/// Split a request URI into its path and optional query string
pub fn split_uri(uri: &str) -> (&str, Option<&str>) {
    match uri.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (uri, None),
    }
}

/// Query parameters of a request, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// `None` values are bare keys without `=`
    pairs: Vec<(String, Option<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (without the leading `?`)
    pub fn parse(query: &str) -> Self {
        let mut params = Self::new();
        for part in query.split('&').filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some((key, value)) => params.set(key, value),
                None => params.set_bare(part),
            }
        }
        params
    }

    /// Parse the query part of a request URI
    pub fn from_uri(uri: &str) -> Self {
        split_uri(uri).1.map(Self::parse).unwrap_or_default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.pairs.iter().position(|(k, _)| k == key)
    }

    /// Value of a parameter; bare keys read as an empty string
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key)
            .map(|i| self.pairs[i].1.as_deref().unwrap_or(""))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Set a parameter, overwriting in place or appending
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.put(key, Some(value.into()));
    }

    fn set_bare(&mut self, key: &str) {
        self.put(key, None);
    }

    fn put(&mut self, key: &str, value: Option<String>) {
        match self.position(key) {
            Some(i) => self.pairs[i].1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    /// Remove a parameter, returning whether it was present
    pub fn remove(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(i) => {
                self.pairs.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate `(key, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Rebuild a URI from a path and these parameters.
    ///
    /// No `?` is emitted when there are no parameters.
    pub fn to_uri(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self)
        }
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            match value {
                Some(value) => write!(f, "{}={}", key, value)?,
                None => f.write_str(key)?,
            }
        }
        Ok(())
    }
}
