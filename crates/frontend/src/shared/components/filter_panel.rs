use crate::shared::icons::icon;
use leptos::prelude::*;

/// Collapsible filter block shown above every list.
///
/// The header always shows the number of active filters and an optional
/// trailing slot (pagination or counters); chips render below the form.
#[component]
pub fn FilterPanel(
    #[prop(into)] is_expanded: RwSignal<bool>,
    #[prop(into)] active_filters_count: Signal<usize>,
    /// Right side of the header, usually pagination or a counter
    #[prop(optional, into)]
    header_extra: Option<ViewFn>,
    #[prop(optional, into)] filter_tags: Option<ViewFn>,
    /// Form fields
    children: ChildrenFn,
) -> impl IntoView {
    let toggle_expanded = move |_| is_expanded.update(|e| *e = !*e);

    view! {
        <div class="filter-panel">
            <div class="filter-panel-header">
                <div class="filter-panel-header__left" on:click=toggle_expanded>
                    <span class=move || {
                        if is_expanded.get() {
                            "filter-panel__chevron filter-panel__chevron--expanded"
                        } else {
                            "filter-panel__chevron"
                        }
                    }>{icon("chevron-down")}</span>
                    {icon("filter")}
                    <span class="filter-panel__title">"Filtros"</span>
                    {move || {
                        let count = active_filters_count.get();
                        (count > 0).then(|| view! { <span class="badge badge--primary">{count}</span> })
                    }}
                </div>
                <div class="filter-panel-header__center">
                    {header_extra.map(|extra| extra.run())}
                </div>
            </div>

            <div class=move || {
                if is_expanded.get() {
                    "filter-panel__collapsible filter-panel__collapsible--expanded"
                } else {
                    "filter-panel__collapsible filter-panel__collapsible--collapsed"
                }
            }>
                <div class="filter-panel-content">{children()}</div>
            </div>
            {filter_tags.map(|tags| view! { <div class="filter-panel__tags">{tags.run()}</div> })}
        </div>
    }
}

/// One removable chip
#[component]
pub fn FilterTag(#[prop(into)] label: String, on_remove: Callback<()>) -> impl IntoView {
    view! {
        <div class="filter-tag">
            <span>{label}</span>
            <span
                class="filter-tag__remove"
                title="Quitar filtro"
                on:click=move |e| {
                    e.stop_propagation();
                    on_remove.run(());
                }
            >
                {icon("x")}
            </span>
        </div>
    }
}

/// Row of chips followed by a "Limpiar todo" button, hidden when empty.
///
/// `chips` are `(index, label)` pairs; `on_remove` receives the index.
#[component]
pub fn FilterChips(
    #[prop(into)] chips: Signal<Vec<(usize, String)>>,
    on_remove: Callback<usize>,
    on_clear: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || !chips.with(|c| c.is_empty())>
            <div class="filter-chips">
                <For
                    each=move || chips.get()
                    key=|(idx, label)| format!("{idx}:{label}")
                    children=move |(idx, label)| {
                        view! { <FilterTag label=label on_remove=Callback::new(move |_| on_remove.run(idx)) /> }
                    }
                />
                <button class="button button--ghost button--small" on:click=move |_| on_clear.run(())>
                    "Limpiar todo"
                </button>
            </div>
        </Show>
    }
}
