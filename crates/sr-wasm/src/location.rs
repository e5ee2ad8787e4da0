use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use sr_core::{HashLocation, LocationSource, Subscription};

const HASH_CHANGE: &str = "hashchange";

/// `window.location` and its `hashchange` event.
#[derive(Clone)]
pub struct BrowserLocation {
    window: web_sys::Window,
}

impl BrowserLocation {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No global window"))?;
        Ok(Self { window })
    }
}

impl LocationSource for BrowserLocation {
    fn read(&self) -> HashLocation {
        let hash = self.window.location().hash().unwrap_or_default();
        HashLocation::parse(&hash)
    }

    fn replace(&self, path: &str) {
        if let Err(err) = self.window.location().replace(&format!("#{path}")) {
            log::error!("location.replace('#{path}') failed: {err:?}");
        }
    }

    fn assign(&self, path: &str) {
        if let Err(err) = self.window.location().assign(&format!("#{path}")) {
            log::error!("location.assign('#{path}') failed: {err:?}");
        }
    }

    fn subscribe(&self, mut listener: Box<dyn FnMut()>) -> Subscription {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| listener()));

        if let Err(err) = self
            .window
            .add_event_listener_with_callback(HASH_CHANGE, callback.as_ref().unchecked_ref())
        {
            log::error!("failed to attach {HASH_CHANGE} listener: {err:?}");
            return Subscription::detached();
        }

        let window = self.window.clone();
        Subscription::new(move || {
            if let Err(err) =
                window.remove_event_listener_with_callback(HASH_CHANGE, callback.as_ref().unchecked_ref())
            {
                log::error!("failed to detach {HASH_CHANGE} listener: {err:?}");
            }
            drop(callback);
        })
    }
}
