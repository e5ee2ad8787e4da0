use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;

use sr_compiler::{build_views_config, parse_route_table, CompiledRoutes, RouteTable, TableFormat};
use sr_core::{QueryParams, UrlParams, View};

/// A view identified by its name in the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedView(pub String);

/// What a [`NamedView`] renders to: its name and the params it was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRender {
    pub view: String,
    pub url_params: UrlParams,
    pub query_params: QueryParams,
}

impl View for NamedView {
    type Output = ViewRender;

    fn render(&self, url_params: &UrlParams, query_params: &QueryParams) -> ViewRender {
        ViewRender {
            view: self.0.clone(),
            url_params: url_params.clone(),
            query_params: query_params.clone(),
        }
    }
}

impl fmt::Display for ViewRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.view, self.url_params, self.query_params)
    }
}

pub fn load_table(path: &Path) -> Result<RouteTable, String> {
    let format = TableFormat::from_path(path).map_err(|e| e.to_string())?;
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    parse_route_table(&text, format).map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))
}

/// Compile a table. Every view name resolves to itself.
pub fn compile_table(table: &RouteTable) -> Result<CompiledRoutes<NamedView>, String> {
    build_views_config(table, |name| Some(NamedView(name.to_string())))
        .map_err(|e| format!("Invalid route table: {}", e))
}
