use leptos::prelude::*;

/// Pair of native date pickers bound to ISO `YYYY-MM-DD` strings
#[component]
pub fn DateRangeInputs(
    from: RwSignal<String>,
    to: RwSignal<String>,
    #[prop(optional, into)] from_label: Option<String>,
    #[prop(optional, into)] to_label: Option<String>,
) -> impl IntoView {
    view! {
        <div class="date-range">
            <label class="form__label">
                {from_label.unwrap_or_else(|| "Desde".to_string())}
                <input
                    type="date"
                    class="form__input"
                    prop:value=move || from.get()
                    on:input=move |ev| from.set(event_target_value(&ev))
                />
            </label>
            <label class="form__label">
                {to_label.unwrap_or_else(|| "Hasta".to_string())}
                <input
                    type="date"
                    class="form__input"
                    prop:value=move || to.get()
                    on:input=move |ev| to.set(event_target_value(&ev))
                />
            </label>
        </div>
    }
}
