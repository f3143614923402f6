use crate::layout::global_context::use_app_context;
use leptos::prelude::*;

/// Collapsible left zone
#[component]
pub fn Left(children: Children) -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <div data-zone="left" class="left" class:hidden=move || !ctx.left_open.get()>
            {children()}
        </div>
    }
}
