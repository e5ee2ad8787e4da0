//! Route definitions and the slot table
//!
//! Both are authored once at startup and never change afterwards. Every
//! structural check happens here, so a malformed table fails at construction
//! instead of during navigation.

use regex::Regex;

use crate::types::{RouteId, SlotPosition};

/// Error type for route table construction.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Route pattern '{pattern}' has {captures} capture groups but {names} parameter names")]
    ParamCountMismatch {
        pattern: String,
        captures: usize,
        names: usize,
    },
    #[error("Views config has no slots")]
    NoSlots,
    #[error("Route {0} is not present in any slot")]
    UnknownRoute(RouteId),
}

// =============================================================================
// Route Definition
// =============================================================================

/// A pattern, its parameter names and the view it selects.
#[derive(Debug, Clone)]
pub struct RouteDefinition<V> {
    source: String,
    regex: Regex,
    param_names: Vec<String>,
    view: V,
}

impl<V> RouteDefinition<V> {
    /// Compile a route definition.
    ///
    /// The pattern must match the whole pathname: it is wrapped as
    /// `^(?:pattern)$`, which leaves the capture groups untouched.
    pub fn new<I, S>(pattern: &str, param_names: I, view: V) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        let param_names: Vec<String> = param_names.into_iter().map(Into::into).collect();
        // captures_len counts the implicit whole-match group
        let captures = regex.captures_len() - 1;
        if captures != param_names.len() {
            return Err(ConfigError::ParamCountMismatch {
                pattern: pattern.to_string(),
                captures,
                names: param_names.len(),
            });
        }

        Ok(Self {
            source: pattern.to_string(),
            regex,
            param_names,
            view,
        })
    }

    /// Pattern as authored.
    pub fn pattern(&self) -> &str {
        &self.source
    }

    /// Compiled, anchored pattern.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}

// =============================================================================
// Views Config
// =============================================================================

/// Ordered slots, each an ordered list of route definitions.
///
/// Definitions are moved in, so one definition can never sit in two slots.
/// Each one gets a [`RouteId`] equal to its index in the flattened list.
#[derive(Debug, Clone)]
pub struct ViewsConfig<V> {
    routes: Vec<RouteDefinition<V>>,
    slots: Vec<Vec<RouteId>>,
}

impl<V> ViewsConfig<V> {
    pub fn new(slots: Vec<Vec<RouteDefinition<V>>>) -> Result<Self, ConfigError> {
        if slots.is_empty() {
            return Err(ConfigError::NoSlots);
        }

        let mut routes = Vec::with_capacity(slots.iter().map(Vec::len).sum());
        let mut slot_ids = Vec::with_capacity(slots.len());

        for slot in slots {
            let mut ids = Vec::with_capacity(slot.len());
            for definition in slot {
                ids.push(RouteId(routes.len() as u32));
                routes.push(definition);
            }
            slot_ids.push(ids);
        }

        Ok(Self {
            routes,
            slots: slot_ids,
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// All definitions in flattened order.
    pub fn routes(&self) -> &[RouteDefinition<V>] {
        &self.routes
    }

    pub fn route(&self, id: RouteId) -> Option<&RouteDefinition<V>> {
        self.routes.get(id.index())
    }

    /// Route ids per slot, in authoring order.
    pub fn slots(&self) -> &[Vec<RouteId>] {
        &self.slots
    }

    pub fn slot(&self, slot: usize) -> Option<&[RouteId]> {
        self.slots.get(slot).map(Vec::as_slice)
    }

    /// Definition at a slot position.
    pub fn route_at(&self, position: SlotPosition) -> Option<&RouteDefinition<V>> {
        let id = *self.slots.get(position.slot)?.get(position.index)?;
        self.route(id)
    }

    /// Iterate `(id, definition)` in flattened order.
    pub fn iter(&self) -> impl Iterator<Item = (RouteId, &RouteDefinition<V>)> {
        self.routes
            .iter()
            .enumerate()
            .map(|(i, def)| (RouteId(i as u32), def))
    }
}
