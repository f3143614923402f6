use leptos::prelude::*;

/// `<td>` holding a row selection checkbox.
///
/// Clicks do not bubble to the row, so selecting never opens the detail.
#[component]
pub fn TableCheckbox(
    checked: Signal<bool>,
    on_change: Callback<bool>,
    #[prop(optional)] disabled: bool,
) -> impl IntoView {
    view! {
        <td class="table__cell table__cell--checkbox" on:click=|e| e.stop_propagation()>
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=checked
                prop:disabled=disabled
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </td>
    }
}
