//! WebAssembly bindings for SlotRouter

mod location;
mod logger;
mod view;

use log::LevelFilter;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use sr_core::{render_views, DeepLinkRestore, MountedRouter, RouteDefinition, Router, ViewsConfig};

pub use location::BrowserLocation;
pub use view::{params_to_object, JsView};

use view::rendered_to_array;

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logger::init(LevelFilter::Warn);
}

/// Set the console log level: "off", "error", "warn", "info", "debug" or "trace".
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level: LevelFilter = level
        .parse()
        .map_err(|_| JsValue::from_str(&format!("Unknown log level '{}'", level)))?;
    logger::init(level);
    Ok(())
}

/// Hash router over a slot table of JS components.
///
/// ```js
/// const router = new SlotRouter({
///     homePath: "/",
///     viewsConfig: [[{ regexp: /^\/library(?:\/([^/]*))?$/, urlParamsNames: ["type"], component: Library }]],
///     onPathNotMatch: () => NotFound,
/// }, (views) => render(views));
/// router.mount();
/// ```
#[wasm_bindgen]
pub struct SlotRouter {
    views: ViewsConfig<JsView>,
    home_path: Option<String>,
    deep_link_restore: DeepLinkRestore,
    on_path_not_match: Option<js_sys::Function>,
    on_render: js_sys::Function,
    mounted: Option<MountedRouter<JsView, BrowserLocation>>,
}

#[wasm_bindgen]
impl SlotRouter {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, on_render: js_sys::Function) -> Result<SlotRouter, JsValue> {
        let home_path = get(&config, "homePath")?.as_string();
        let deep_link_restore = match get(&config, "deepLinkRestore")?.as_string().as_deref() {
            None | Some("assign") => DeepLinkRestore::Assign,
            Some("replace") => DeepLinkRestore::Replace,
            Some(other) => {
                return Err(JsValue::from_str(&format!(
                    "deepLinkRestore must be 'assign' or 'replace', got '{}'",
                    other
                )))
            }
        };
        let views = parse_views_config(&get(&config, "viewsConfig")?)?;
        let on_path_not_match = get(&config, "onPathNotMatch")?.dyn_into::<js_sys::Function>().ok();

        Ok(SlotRouter {
            views,
            home_path,
            deep_link_restore,
            on_path_not_match,
            on_render,
            mounted: None,
        })
    }

    /// Normalize the location, start listening and render the current path.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.mounted.is_some() {
            return Err(JsValue::from_str("Router is already mounted"));
        }

        let location = BrowserLocation::new()?;
        let on_render = self.on_render.clone();
        let mounted = self
            .build_router()
            .mount(location, move |state| {
                let views = rendered_to_array(render_views(state));
                if let Err(err) = on_render.call1(&JsValue::NULL, &views) {
                    log::error!("onRender threw: {err:?}");
                }
            })
            .map_err(|e| JsValue::from_str(&format!("Failed to mount router: {}", e)))?;

        self.mounted = Some(mounted);
        Ok(())
    }

    /// Stop listening. Mounting again starts from the current location.
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.unmount();
        }
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Push `path` onto the history; the view update follows its hashchange.
    pub fn navigate(&self, path: &str) -> Result<(), JsValue> {
        let mounted = self
            .mounted
            .as_ref()
            .ok_or_else(|| JsValue::from_str("Router is not mounted"))?;
        mounted.navigate(path);
        Ok(())
    }

    /// `[{ key, focused, element }]` for the current state.
    #[wasm_bindgen(js_name = activeViews)]
    pub fn active_views(&self) -> js_sys::Array {
        match &self.mounted {
            Some(mounted) => rendered_to_array(mounted.render()),
            None => js_sys::Array::new(),
        }
    }

    #[wasm_bindgen(getter, js_name = slotCount)]
    pub fn slot_count(&self) -> usize {
        self.views.slot_count()
    }
}

impl SlotRouter {
    fn build_router(&self) -> Router<JsView> {
        let mut builder = Router::builder(self.views.clone()).deep_link_restore(self.deep_link_restore);
        if let Some(home_path) = &self.home_path {
            builder = builder.home_path(home_path.clone());
        }
        if let Some(handler) = &self.on_path_not_match {
            let handler = handler.clone();
            // Anything other than a function means "no view"
            builder = builder.on_path_not_match(move || match handler.call0(&JsValue::NULL) {
                Ok(value) => JsView::from_value(value),
                Err(err) => {
                    log::error!("onPathNotMatch threw: {err:?}");
                    None
                }
            });
        }
        builder.build()
    }
}

fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
}

/// `[[{ regexp, urlParamsNames, component }]]`
fn parse_views_config(value: &JsValue) -> Result<ViewsConfig<JsView>, JsValue> {
    if !js_sys::Array::is_array(value) {
        return Err(JsValue::from_str("viewsConfig must be an array of slots"));
    }

    let mut slots = Vec::new();
    for (slot, routes_value) in js_sys::Array::from(value).iter().enumerate() {
        if !js_sys::Array::is_array(&routes_value) {
            return Err(JsValue::from_str(&format!("viewsConfig[{}] must be an array", slot)));
        }

        let mut routes = Vec::new();
        for (index, route) in js_sys::Array::from(&routes_value).iter().enumerate() {
            let at = format!("viewsConfig[{}][{}]", slot, index);
            let pattern = pattern_source(&get(&route, "regexp")?)
                .map_err(|e| JsValue::from_str(&format!("{at}.regexp {e}")))?;
            let names = param_names(&get(&route, "urlParamsNames")?)
                .ok_or_else(|| JsValue::from_str(&format!("{at}.urlParamsNames must be an array of strings")))?;
            let component = JsView::from_value(get(&route, "component")?)
                .ok_or_else(|| JsValue::from_str(&format!("{at}.component must be a function")))?;

            let definition = RouteDefinition::new(&pattern, names, component)
                .map_err(|e| JsValue::from_str(&format!("{at}: {}", e)))?;
            routes.push(definition);
        }
        slots.push(routes);
    }

    ViewsConfig::new(slots).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// A RegExp keeps its `i`, `m` and `s` flags as an inline group.
fn pattern_source(value: &JsValue) -> Result<String, String> {
    match value.dyn_ref::<js_sys::RegExp>() {
        Some(regexp) => {
            let flags = inline_flags(&String::from(regexp.flags()))?;
            Ok(format!("{}{}", flags, String::from(regexp.source())))
        }
        None => value.as_string().ok_or_else(|| "must be a RegExp or string".to_string()),
    }
}

fn inline_flags(flags: &str) -> Result<String, String> {
    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' => inline.push(flag),
            // Unicode mode and match indices change nothing for a full match
            'u' | 'v' | 'd' => {}
            'g' | 'y' => return Err(format!("flag '{flag}' is not supported for route patterns")),
            other => return Err(format!("has unknown flag '{other}'")),
        }
    }
    if inline.is_empty() {
        Ok(inline)
    } else {
        Ok(format!("(?{inline})"))
    }
}

/// Missing names mean a pattern without captures.
fn param_names(value: &JsValue) -> Option<Vec<String>> {
    if value.is_undefined() || value.is_null() {
        return Some(Vec::new());
    }
    if !js_sys::Array::is_array(value) {
        return None;
    }
    js_sys::Array::from(value).iter().map(|name| name.as_string()).collect()
}
