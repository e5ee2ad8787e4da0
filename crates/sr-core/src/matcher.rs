//! Path Matching Engine
//!
//! Linear scan over the flattened route list. Authoring order is the
//! priority: the first full match wins, so specific patterns must be listed
//! before general ones. The pathname is matched as-is, with no case folding
//! and no trailing-slash cleanup.

use crate::route::{RouteDefinition, ViewsConfig};
use crate::types::{RouteId, UrlParams};
use crate::url::decode_component;

/// A route that matched a pathname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Matched route
    pub route: RouteId,
    /// Named captures, percent-decoded
    pub url_params: UrlParams,
}

/// Match a path against an ordered list of route definitions.
///
/// Returns the index of the first matching definition, the definition and its
/// URL params.
pub fn match_routes<'r, V>(
    routes: &'r [RouteDefinition<V>],
    path: &str,
) -> Option<(usize, &'r RouteDefinition<V>, UrlParams)> {
    routes.iter().enumerate().find_map(|(index, route)| {
        let captures = route.regex().captures(path)?;
        Some((index, route, extract_params(route, &captures)))
    })
}

/// Pair captures with parameter names.
///
/// Optional groups that took no part in the match leave their name unset.
fn extract_params<V>(route: &RouteDefinition<V>, captures: &regex::Captures<'_>) -> UrlParams {
    let mut params = UrlParams::new();
    for (i, name) in route.param_names().iter().enumerate() {
        if let Some(capture) = captures.get(i + 1) {
            params.insert(name.as_str(), decode_component(capture.as_str()));
        }
    }
    params
}

// =============================================================================
// Path Matcher
// =============================================================================

/// Path matcher over a slot table.
pub struct PathMatcher<'a, V> {
    config: &'a ViewsConfig<V>,
}

impl<'a, V> PathMatcher<'a, V> {
    pub fn new(config: &'a ViewsConfig<V>) -> Self {
        Self { config }
    }

    /// Match a pathname and extract its URL params.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let (index, _, url_params) = match_routes(self.config.routes(), path)?;
        Some(RouteMatch {
            route: RouteId(index as u32),
            url_params,
        })
    }

    /// Find the matching route without extracting params.
    pub fn find_route(&self, path: &str) -> Option<RouteId> {
        self.config
            .iter()
            .find(|(_, route)| route.regex().is_match(path))
            .map(|(id, _)| id)
    }

    /// Whether any route matches the pathname.
    pub fn is_routable(&self, path: &str) -> bool {
        self.find_route(path).is_some()
    }
}
