use sr_core::{ConfigError, DeepLinkRestore, RouteDefinition, Router, ViewsConfig};

use crate::parser::RouteTable;

/// Error type for building a views config from a route table.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Route {index} ('{view}') in slot '{slot}': {source}")]
    Route {
        slot: String,
        index: usize,
        view: String,
        #[source]
        source: ConfigError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unknown view '{0}'")]
    UnknownView(String),
}

/// A compiled route table, ready to drive a [`Router`].
pub struct CompiledRoutes<V> {
    pub views: ViewsConfig<V>,
    pub home_path: Option<String>,
    pub not_found: Option<V>,
    pub deep_link_restore: DeepLinkRestore,
}

impl<V: Clone + 'static> CompiledRoutes<V> {
    pub fn into_router(self) -> Router<V> {
        let mut builder = Router::builder(self.views).deep_link_restore(self.deep_link_restore);
        if let Some(home_path) = self.home_path {
            builder = builder.home_path(home_path);
        }
        if let Some(view) = self.not_found {
            builder = builder.on_path_not_match(move || Some(view.clone()));
        }
        builder.build()
    }
}

/// Compile a route table, resolving each view name with `resolve`.
pub fn build_views_config<V, F>(table: &RouteTable, mut resolve: F) -> Result<CompiledRoutes<V>, BuildError>
where
    F: FnMut(&str) -> Option<V>,
{
    let mut slots = Vec::with_capacity(table.slots.len());

    for (slot_index, slot) in table.slots.iter().enumerate() {
        let mut routes = Vec::with_capacity(slot.routes.len());
        for (index, spec) in slot.routes.iter().enumerate() {
            let view = resolve(&spec.view).ok_or_else(|| BuildError::UnknownView(spec.view.clone()))?;
            let route = RouteDefinition::new(&spec.pattern, spec.params.iter().cloned(), view).map_err(
                |source| BuildError::Route {
                    slot: table.slot_label(slot_index),
                    index,
                    view: spec.view.clone(),
                    source,
                },
            )?;
            routes.push(route);
        }
        slots.push(routes);
    }

    let views = ViewsConfig::new(slots)?;

    let not_found = match &table.not_found {
        Some(name) => Some(resolve(name).ok_or_else(|| BuildError::UnknownView(name.clone()))?),
        None => None,
    };

    log::debug!(
        "compiled {} routes across {} slots",
        views.route_count(),
        views.slot_count()
    );

    Ok(CompiledRoutes {
        views,
        home_path: table.home_path.clone(),
        not_found,
        deep_link_restore: table.deep_link_restore.into(),
    })
}
