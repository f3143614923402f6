//! Top bar: sidebar toggle, brand and the title of the open screen.

use crate::layout::global_context::use_app_context;
use crate::shared::icons::icon;
use leptos::prelude::*;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_app_context();
    let sidebar_visible = move || ctx.left_open.get();

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if sidebar_visible() { "Ocultar menú" } else { "Mostrar menú" }
                >
                    {icon("menu")}
                </button>
                <span class="top-header__title">"Muebles · Gestión"</span>
            </div>
            <div class="top-header__page">{move || ctx.active.get().label()}</div>
        </div>
    }
}
