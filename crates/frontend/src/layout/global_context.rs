use crate::layout::pages::Page;
use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

/// Application-wide navigation state
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub active: RwSignal<Page>,
    pub left_open: RwSignal<bool>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            active: RwSignal::new(Page::default()),
            left_open: RwSignal::new(true),
        }
    }

    /// Read `?page=` once, then keep the query string in step with the active page
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let params: HashMap<String, String> =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        if let Some(page) = params.get("page").and_then(|k| Page::from_key(k)) {
            self.active.set(page);
        }

        let this = *self;
        Effect::new(move |_| {
            let page = this.active.get();
            let query = serde_qs::to_string(&HashMap::from([("page", page.key())])).unwrap_or_default();
            let new_url = format!("?{}", query);
            let current = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            if current != new_url {
                if let Some(history) = window().and_then(|w| w.history().ok()) {
                    let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&new_url));
                }
            }
        });
    }

    pub fn navigate(&self, page: Page) {
        log::debug!("navigate: {}", page.key());
        self.active.set(page);
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|open| *open = !*open);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_app_context() -> AppGlobalContext {
    use_context::<AppGlobalContext>().expect("AppGlobalContext not found")
}
