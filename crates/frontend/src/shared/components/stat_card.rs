use crate::shared::icons::icon;
use leptos::prelude::*;

/// KPI tile of the dashboard and the analytics page.
///
/// `variant` is one of "success", "error", "warning"; anything else is neutral.
#[component]
pub fn StatCard(
    #[prop(into)] label: String,
    #[prop(into)] icon_name: String,
    /// Already formatted value, `None` while loading
    #[prop(into)]
    value: Signal<Option<String>>,
    #[prop(optional, into)] variant: MaybeProp<String>,
    #[prop(optional, into)] subtitle: MaybeProp<String>,
) -> impl IntoView {
    let card_class = move || match variant.get().as_deref() {
        Some("success") => "stat-card stat-card--success",
        Some("error") => "stat-card stat-card--error",
        Some("warning") => "stat-card stat-card--warning",
        _ => "stat-card",
    };

    view! {
        <div class=card_class>
            <div class="stat-card__icon">{icon(&icon_name)}</div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">{move || value.get().unwrap_or_else(|| "—".to_string())}</div>
                {move || subtitle.get().map(|s| view! { <div class="stat-card__subtitle">{s}</div> })}
            </div>
        </div>
    }
}
