//! Stack of open modals rendered by a single `ModalHost` at the app root.
//!
//! Pages push a builder; the builder receives a `ModalHandle` to close
//! itself. Escape closes the topmost modal only.

use crate::shared::modal_frame::ModalFrame;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use std::sync::Arc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;

type Builder = Arc<dyn Fn(ModalHandle) -> AnyView + Send + Sync>;

#[derive(Clone)]
struct ModalEntry {
    id: u64,
    builder: Builder,
    modal_style: Option<String>,
}

#[derive(Clone, Copy)]
pub struct ModalHandle {
    id: u64,
    svc: ModalStackService,
}

impl ModalHandle {
    pub fn close(&self) {
        self.svc.close_deferred(self.id);
    }
}

#[derive(Clone, Copy)]
pub struct ModalStackService {
    stack: RwSignal<Vec<ModalEntry>>,
    next_id: StoredValue<u64>,
}

impl ModalStackService {
    pub fn new() -> Self {
        Self {
            stack: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(1),
        }
    }

    pub fn is_open(&self) -> bool {
        !self.stack.with(|s| s.is_empty())
    }

    /// Open a modal; `modal_style` sizes the surface
    pub fn push<F>(&self, modal_style: Option<String>, builder: F) -> ModalHandle
    where
        F: Fn(ModalHandle) -> AnyView + Send + Sync + 'static,
    {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.stack.update(|s| {
            s.push(ModalEntry {
                id,
                builder: Arc::new(builder),
                modal_style,
            })
        });
        ModalHandle { id, svc: *self }
    }

    pub fn close(&self, id: u64) {
        self.stack.update(|s| s.retain(|e| e.id != id));
    }

    /// Close on the next tick, safe to call from the modal's own event handlers
    pub fn close_deferred(&self, id: u64) {
        let svc = *self;
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            svc.close(id);
        });
    }

    fn pop_deferred(&self) {
        let svc = *self;
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            svc.stack.update(|s| {
                s.pop();
            });
        });
    }

    pub fn clear(&self) {
        self.stack.set(Vec::new());
    }
}

/// Stack entries paired with their position; the position drives the z-index
fn indexed<T>(stack: Vec<T>) -> Vec<(usize, T)> {
    stack.into_iter().enumerate().collect()
}

fn z_index(position: usize) -> i32 {
    1000 + position as i32
}

#[component]
pub fn ModalHost() -> impl IntoView {
    let svc = use_context::<ModalStackService>().expect("ModalStackService not provided in context");

    // Mounted once for the app lifetime, so the listener is leaked on purpose.
    Effect::new(move |_| {
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if let Some(key_event) = event.dyn_ref::<KeyboardEvent>() {
                if key_event.key() == "Escape" && svc.stack.with_untracked(|s| !s.is_empty()) {
                    svc.pop_deferred();
                }
            }
        }) as Box<dyn FnMut(_)>);
        if let Some(window) = web_sys::window() {
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    });

    view! {
        <For
            each=move || indexed(svc.stack.get())
            key=|pair| pair.1.id
            children=move |pair: (usize, ModalEntry)| {
                let (idx, entry) = pair;
                let id = entry.id;
                let on_close = Callback::new(move |_| svc.close_deferred(id));
                let content = (entry.builder)(ModalHandle { id, svc });
                view! {
                    <ModalFrame
                        z_index=z_index(idx)
                        on_close=on_close
                        modal_style=entry.modal_style.clone().unwrap_or_default()
                    >
                        {content}
                    </ModalFrame>
                }
            }
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topmost_modal_gets_highest_z_index() {
        let pairs = indexed(vec![7_u64, 9, 12]);
        assert_eq!(pairs, vec![(0, 7), (1, 9), (2, 12)]);
        let top = pairs.last().map(|pair| z_index(pair.0));
        assert_eq!(top, Some(1002));
        assert!(indexed(Vec::<u64>::new()).is_empty());
    }
}
