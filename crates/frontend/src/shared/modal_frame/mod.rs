use gloo_timers::future::TimeoutFuture;
use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Centred modal surface over a dimmed overlay.
///
/// Clicking the overlay closes the modal, but only when the press started on
/// the overlay too, so selecting text inside the modal and releasing outside
/// keeps it open. The frame renders no header; content brings its own.
#[component]
pub fn ModalFrame(
    on_close: Callback<()>,
    #[prop(optional)] z_index: Option<i32>,
    /// Extra style of the surface, typically a width
    #[prop(optional, into)]
    modal_style: Option<String>,
    children: Children,
) -> impl IntoView {
    let z_index = z_index.unwrap_or(1000);
    let pressed_on_overlay = RwSignal::new(false);

    let on_overlay = |ev: &ev::MouseEvent| match (ev.target(), ev.current_target()) {
        (Some(t), Some(ct)) => t == ct,
        _ => false,
    };

    let handle_mouse_down = move |ev: ev::MouseEvent| pressed_on_overlay.set(on_overlay(&ev));

    let handle_click = move |ev: ev::MouseEvent| {
        let close = pressed_on_overlay.get_untracked() && on_overlay(&ev);
        pressed_on_overlay.set(false);
        if close {
            // next tick: the overlay must not be removed while its own click is dispatched
            spawn_local(async move {
                TimeoutFuture::new(0).await;
                on_close.run(());
            });
        }
    };

    let surface_style = format!("position: relative; {}", modal_style.unwrap_or_default());

    view! {
        <div
            class="modal-overlay"
            style=format!("z-index: {z_index};")
            on:mousedown=handle_mouse_down
            on:click=handle_click
        >
            <div class="modal" style=surface_style on:click=|ev: ev::MouseEvent| ev.stop_propagation()>
                {children()}
            </div>
        </div>
    }
}
