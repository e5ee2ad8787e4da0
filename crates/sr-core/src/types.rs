//! Core type definitions for SlotRouter
//!
//! Identifiers and parameter maps shared by the matcher, the slot projector
//! and the router.

use std::fmt;

// =============================================================================
// Route Identity
// =============================================================================

/// Index of a route definition in the flattened route list.
///
/// Assigned once when a [`ViewsConfig`](crate::route::ViewsConfig) is built.
/// Flattened order is slot order, then authoring order within the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub u32);

impl RouteId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a route lives in the slot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SlotPosition {
    /// Slot index
    pub slot: usize,
    /// Route index within the slot
    pub index: usize,
}

impl SlotPosition {
    pub const fn new(slot: usize, index: usize) -> Self {
        Self { slot, index }
    }
}

// =============================================================================
// View Keys
// =============================================================================

/// Stable identity of an active view.
///
/// Derived only from the route's slot position, so a view keeps its key while
/// other slots change and a renderer does not tear it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKey {
    /// View produced by a matched route
    Route(SlotPosition),
    /// View produced by the not-found handler
    NotFound,
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route(pos) => write!(f, "{}.{}", pos.slot, pos.index),
            Self::NotFound => f.write_str("-1"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ViewKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// Flat string map that remembers insertion order.
///
/// Inserting an existing key overwrites the value but keeps the key's
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

/// Named captures extracted from the pathname.
pub type UrlParams = Params;

/// Pairs parsed from the query string.
pub type QueryParams = Params;

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Params {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_overwrite_keeps_position() {
        let mut params = Params::new();
        params.insert("a", "1");
        params.insert("b", "2");
        assert_eq!(params.insert("a", "3"), Some("1".to_string()));

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_params_from_array() {
        let params = Params::from([("type", "movie"), ("id", "tt1")]);
        assert_eq!(params.get("type"), Some("movie"));
        assert_eq!(params.get("id"), Some("tt1"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_params_display() {
        let params = Params::from([("a", "1"), ("b", "")]);
        assert_eq!(params.to_string(), "{a: 1, b: }");
        assert_eq!(Params::new().to_string(), "{}");
    }

    #[test]
    fn test_view_key_display() {
        assert_eq!(ViewKey::Route(SlotPosition::new(1, 0)).to_string(), "1.0");
        assert_eq!(ViewKey::Route(SlotPosition::new(11, 2)).to_string(), "11.2");
        assert_eq!(ViewKey::NotFound.to_string(), "-1");
    }
}
