//! Navigation menu grouped in collapsible sections

use crate::layout::global_context::use_app_context;
use crate::layout::pages::MENU;
use crate::shared::icons::icon;
use leptos::prelude::*;

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_app_context();
    let collapsed = RwSignal::new(Vec::<&'static str>::new());

    view! {
        <nav class="app-sidebar__content">
            {MENU
                .into_iter()
                .map(|(title, pages)| {
                    let toggle = move |_| {
                        collapsed.update(|c| {
                            if let Some(pos) = c.iter().position(|t| *t == title) {
                                c.remove(pos);
                            } else {
                                c.push(title);
                            }
                        })
                    };
                    view! {
                        <div class="app-sidebar__group">
                            <div class="app-sidebar__group-title" on:click=toggle>
                                <span>{title}</span>
                                <span
                                    class="app-sidebar__chevron"
                                    class:app-sidebar__chevron--expanded=move || !collapsed.get().contains(&title)
                                >
                                    {icon("chevron-right")}
                                </span>
                            </div>
                            <Show when=move || !collapsed.get().contains(&title)>
                                <div class="app-sidebar__children">
                                    {pages
                                        .iter()
                                        .copied()
                                        .map(|page| {
                                            view! {
                                                <div
                                                    class="app-sidebar__item"
                                                    class:app-sidebar__item--active=move || ctx.active.get() == page
                                                    on:click=move |_| ctx.navigate(page)
                                                >
                                                    <div class="app-sidebar__item-content">
                                                        {icon(page.icon())}
                                                        <span>{page.label()}</span>
                                                    </div>
                                                </div>
                                            }
                                        })
                                        .collect_view()}
                                </div>
                            </Show>
                        </div>
                    }
                })
                .collect_view()}
        </nav>
    }
}
