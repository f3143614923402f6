//! PageFrame: root wrapper of every page shown in the content area.
//!
//! Sets `id="{module}--{category}"` and `data-page-category` on the root
//! element so a page can be located from the DOM inspector.

use leptos::prelude::*;

/// Table of records with filters
pub const PAGE_CAT_LIST: &str = "list";
/// Figures and charts
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";
/// Multi-step action page (new sale, transport board)
pub const PAGE_CAT_USECASE: &str = "usecase";

#[component]
pub fn PageFrame(
    /// `{module}--{category}`, e.g. `"a001_cliente--list"`
    page_id: &'static str,
    category: &'static str,
    #[prop(optional)]
    class: &'static str,
    children: Children,
) -> impl IntoView {
    let base_class = match category {
        PAGE_CAT_DASHBOARD => "page page--dashboard",
        PAGE_CAT_USECASE => "page page--usecase",
        _ => "page",
    };
    let full_class = if class.is_empty() {
        base_class.to_string()
    } else {
        format!("{base_class} {class}")
    };

    view! {
        <div id=page_id class=full_class data-page-category=category>
            {children()}
        </div>
    }
}

/// Standard page header: title, optional subtitle and action buttons
#[component]
pub fn PageHeader(
    #[prop(into)] title: String,
    #[prop(optional, into)] subtitle: Option<Signal<String>>,
    #[prop(optional, into)] actions: Option<ViewFn>,
) -> impl IntoView {
    view! {
        <div class="page__header">
            <div class="page__header-text">
                <h1 class="page__title">{title}</h1>
                {subtitle.map(|s| view! { <p class="page__subtitle">{move || s.get()}</p> })}
            </div>
            <div class="page__actions">{actions.map(|a| a.run())}</div>
        </div>
    }
}

/// Inline error box
#[component]
pub fn ErrorBox(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="warning-box warning-box--error">
            <span class="warning-box__icon">"⚠"</span>
            <span class="warning-box__text">{message}</span>
        </div>
    }
}

/// Inline success box
#[component]
pub fn SuccessBox(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="warning-box warning-box--success">
            <span class="warning-box__icon">"✓"</span>
            <span class="warning-box__text">{message}</span>
        </div>
    }
}
