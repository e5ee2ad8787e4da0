use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use sr_core::{Params, QueryParams, RenderedView, UrlParams, View};

/// A JS component: `component({ urlParams, queryParams })`.
#[derive(Clone)]
pub struct JsView(pub js_sys::Function);

impl JsView {
    /// `None` when `value` is not callable.
    pub fn from_value(value: JsValue) -> Option<Self> {
        value.dyn_into::<js_sys::Function>().ok().map(Self)
    }
}

impl View for JsView {
    type Output = JsValue;

    fn render(&self, url_params: &UrlParams, query_params: &QueryParams) -> JsValue {
        let props = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&props, &"urlParams".into(), &params_to_object(url_params));
        let _ = js_sys::Reflect::set(&props, &"queryParams".into(), &params_to_object(query_params));

        match self.0.call1(&JsValue::NULL, &props) {
            Ok(element) => element,
            Err(err) => {
                log::error!("view component threw: {err:?}");
                JsValue::UNDEFINED
            }
        }
    }
}

pub fn params_to_object(params: &Params) -> JsValue {
    let object = js_sys::Object::new();
    for (key, value) in params.iter() {
        let _ = js_sys::Reflect::set(&object, &JsValue::from_str(key), &JsValue::from_str(value));
    }
    object.into()
}

/// `[{ key, focused, element }]`
pub fn rendered_to_array(views: Vec<RenderedView<JsValue>>) -> js_sys::Array {
    let array = js_sys::Array::new();
    for view in views {
        let entry = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&entry, &"key".into(), &JsValue::from_str(&view.key.to_string()));
        let _ = js_sys::Reflect::set(&entry, &"focused".into(), &JsValue::from_bool(view.focused));
        let _ = js_sys::Reflect::set(&entry, &"element".into(), &view.output);
        array.push(&entry);
    }
    array
}
