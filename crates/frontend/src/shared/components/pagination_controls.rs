use crate::shared::icons::icon;
use leptos::prelude::*;

/// Pager for client-side lists; pages are 1-based
#[component]
pub fn PaginationControls(
    #[prop(into)] current_page: Signal<usize>,
    #[prop(into)] total_pages: Signal<usize>,
    #[prop(into)] total_count: Signal<usize>,
    #[prop(into)] page_size: Signal<usize>,
    on_page_change: Callback<usize>,
    on_page_size_change: Callback<usize>,
    /// Defaults to 6, 12, 24, 48
    #[prop(optional)]
    page_size_options: Option<Vec<usize>>,
) -> impl IntoView {
    let options = page_size_options.unwrap_or_else(|| vec![6, 12, 24, 48]);
    let at_first = move || current_page.get() <= 1;
    let at_last = move || current_page.get() >= total_pages.get().max(1);

    view! {
        <div class="pagination-controls">
            <button class="pagination-btn" on:click=move |_| on_page_change.run(1) disabled=at_first title="Primera página">
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(current_page.get().saturating_sub(1).max(1))
                disabled=at_first
                title="Página anterior"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || format!("{} / {} ({})", current_page.get(), total_pages.get().max(1), total_count.get())}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run((current_page.get() + 1).min(total_pages.get().max(1)))
                disabled=at_last
                title="Página siguiente"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(total_pages.get().max(1))
                disabled=at_last
                title="Última página"
            >
                {icon("chevrons-right")}
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    if let Ok(size) = event_target_value(&ev).parse::<usize>() {
                        on_page_size_change.run(size);
                    }
                }
                prop:value=move || page_size.get().to_string()
            >
                {options
                    .into_iter()
                    .map(|size| {
                        view! {
                            <option value=size.to_string() selected=move || page_size.get() == size>
                                {format!("{size} / pág.")}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}
