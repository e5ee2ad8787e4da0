use std::path::Path;

use serde::{Deserialize, Serialize};

use sr_core::DeepLinkRestore;

/// Error type for route table parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid TOML route table: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid JSON route table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown route table format for '{0}' (expected .toml or .json)")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Toml,
    Json,
}

impl TableFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(ParseError::UnknownFormat(path.display().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestorePolicy {
    #[default]
    Assign,
    Replace,
}

impl From<RestorePolicy> for DeepLinkRestore {
    fn from(policy: RestorePolicy) -> Self {
        match policy {
            RestorePolicy::Assign => DeepLinkRestore::Assign,
            RestorePolicy::Replace => DeepLinkRestore::Replace,
        }
    }
}

/// Declarative route table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RouteTable {
    #[serde(default)]
    pub home_path: Option<String>,
    /// View shown when nothing matches
    #[serde(default)]
    pub not_found: Option<String>,
    #[serde(default)]
    pub deep_link_restore: RestorePolicy,
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SlotSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    pub view: String,
    pub pattern: String,
    #[serde(default)]
    pub params: Vec<String>,
}

impl RouteTable {
    pub fn route_count(&self) -> usize {
        self.slots.iter().map(|slot| slot.routes.len()).sum()
    }

    /// Display label for a slot: its name, or its index.
    pub fn slot_label(&self, slot: usize) -> String {
        match self.slots.get(slot).and_then(|s| s.name.as_deref()) {
            Some(name) => name.to_string(),
            None => slot.to_string(),
        }
    }
}

pub fn parse_route_table(text: &str, format: TableFormat) -> Result<RouteTable, ParseError> {
    let table = match format {
        TableFormat::Toml => toml::from_str(text)?,
        TableFormat::Json => serde_json::from_str(text)?,
    };
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEDIA_ROUTES: &str = include_str!("../../../demos/media-routes.toml");

    #[test]
    fn test_parse_demo_table() {
        let table = parse_route_table(MEDIA_ROUTES, TableFormat::Toml).unwrap();
        assert_eq!(table.home_path.as_deref(), Some("/"));
        assert_eq!(table.not_found.as_deref(), Some("not-found"));
        assert_eq!(table.deep_link_restore, RestorePolicy::Assign);
        assert_eq!(table.slots.len(), 4);
        assert_eq!(table.route_count(), 10);
        assert_eq!(table.slot_label(1), "details");
        assert_eq!(table.slots[0].routes[3].params, vec!["type".to_string()]);
        assert!(table.slots[0].routes[0].params.is_empty());
    }

    #[test]
    fn test_parse_json_table() {
        let json = r#"{
            "home-path": "/home",
            "deep-link-restore": "replace",
            "slots": [
                { "routes": [ { "view": "home", "pattern": "/home" } ] },
                { "routes": [ { "view": "item", "pattern": "/item/([^/]+)", "params": ["id"] } ] }
            ]
        }"#;
        let table = parse_route_table(json, TableFormat::Json).unwrap();
        assert_eq!(table.deep_link_restore, RestorePolicy::Replace);
        assert_eq!(table.not_found, None);
        assert_eq!(table.slot_label(0), "0");
        assert_eq!(table.slots[1].routes[0].params, vec!["id".to_string()]);
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        let err = parse_route_table(
            r#"{ "slots": [ { "routes": [ { "view": "a", "pattern": "/a", "component": "A" } ] } ] }"#,
            TableFormat::Json,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));

        let err = parse_route_table("homepath = \"/\"", TableFormat::Toml).unwrap_err();
        assert!(matches!(err, ParseError::Toml(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(TableFormat::from_path(Path::new("routes.toml")).unwrap(), TableFormat::Toml);
        assert_eq!(TableFormat::from_path(Path::new("a/b/routes.JSON")).unwrap(), TableFormat::Json);
        assert!(matches!(
            TableFormat::from_path(Path::new("routes.yaml")),
            Err(ParseError::UnknownFormat(_))
        ));
    }
}
