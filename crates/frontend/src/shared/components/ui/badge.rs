use leptos::prelude::*;

/// Coloured pill; variants: primary, success, warning, error, info, neutral (default)
#[component]
pub fn Badge(
    #[prop(optional, into)] variant: MaybeProp<String>,
    children: Children,
    #[prop(optional, into)] class: MaybeProp<String>,
) -> impl IntoView {
    let variant_class = move || match variant.get().as_deref().unwrap_or("neutral") {
        "primary" => "badge--primary",
        "success" => "badge--success",
        "warning" => "badge--warning",
        "error" => "badge--error",
        "info" => "badge--info",
        _ => "badge--neutral",
    };

    view! {
        <span class=move || format!("badge {} {}", variant_class(), class.get().unwrap_or_default())>
            {children()}
        </span>
    }
}

/// Badge of an albarán estado
#[component]
pub fn EstadoBadge(estado: contracts::domain::a004_albaran::estado::EstadoAlbaran) -> impl IntoView {
    let variant = estado.badge_variant().to_string();
    let label = estado.label().to_string();
    view! { <Badge variant=variant>{label}</Badge> }
}
