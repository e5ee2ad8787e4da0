//! Hash fragment and query string parsing
//!
//! All addressable state lives in the URL fragment, read as
//! `#<pathname>?<query>`. Splitting works on string slices; only the final
//! [`HashLocation`] and parameter maps own their data.

use std::fmt;

use crate::types::{Params, QueryParams};

// =============================================================================
// Fragment Splitting
// =============================================================================

/// Strip a single leading `#`.
#[inline]
pub fn strip_hash_prefix(fragment: &str) -> &str {
    fragment.strip_prefix('#').unwrap_or(fragment)
}

/// Split a fragment into pathname and query.
///
/// A second `#` ends the addressable part. The query is `None` when there is
/// no `?`, and `Some("")` for a bare trailing `?`.
#[inline]
pub fn split_fragment(fragment: &str) -> (&str, Option<&str>) {
    let fragment = strip_hash_prefix(fragment);
    let end = fragment.find('#').unwrap_or(fragment.len());
    let fragment = &fragment[..end];

    match fragment.find('?') {
        Some(q_pos) => (&fragment[..q_pos], Some(&fragment[q_pos + 1..])),
        None => (fragment, None),
    }
}

/// Build the fragment for a path, e.g. `/library` → `#/library`.
#[inline]
pub fn to_fragment(path: &str) -> String {
    format!("#{}", strip_hash_prefix(path))
}

// =============================================================================
// Hash Location
// =============================================================================

/// A decoded hash fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HashLocation {
    /// Everything before `?`
    pub pathname: String,
    /// Everything after `?`, if present
    pub query: Option<String>,
}

impl HashLocation {
    pub fn new(pathname: impl Into<String>, query: Option<String>) -> Self {
        Self {
            pathname: pathname.into(),
            query,
        }
    }

    /// Parse a fragment, with or without its leading `#`.
    pub fn parse(fragment: &str) -> Self {
        let (pathname, query) = split_fragment(fragment);
        Self::new(pathname, query.map(str::to_string))
    }

    /// Pathname plus `?query` when a query is present.
    pub fn path(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.pathname, query),
            None => self.pathname.clone(),
        }
    }

    /// Query string, empty when absent.
    pub fn query_str(&self) -> &str {
        self.query.as_deref().unwrap_or("")
    }
}

impl fmt::Display for HashLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pathname)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Query Parameter Handling
// =============================================================================

/// Parse a query string into a flat map.
///
/// Pairs are separated by `&`, key and value by the first `=`. A key without
/// `=` maps to `""` and the last duplicate wins. Empty segments and empty keys
/// are skipped. Values are kept verbatim.
pub fn parse_query(query: &str) -> QueryParams {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params = Params::new();

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (key, value) = match pair.find('=') {
            Some(eq_pos) => (&pair[..eq_pos], &pair[eq_pos + 1..]),
            None => (pair, ""),
        };

        if key.is_empty() {
            log::trace!("skipping query pair without a key: {pair:?}");
            continue;
        }

        params.insert(key, value);
    }

    params
}

// =============================================================================
// Percent Decoding
// =============================================================================

/// Percent-decode a captured path segment.
///
/// Sequences that do not decode to UTF-8 leave the raw text untouched.
pub fn decode_component(raw: &str) -> String {
    if !raw.contains('%') {
        return raw.to_string();
    }
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}
