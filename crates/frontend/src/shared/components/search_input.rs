use crate::shared::date_utils::now_ms;
use crate::shared::icons::icon;
use contracts::shared::debounce::Debouncer;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Text box whose value reaches `value` only after `delay_ms` without typing.
///
/// Writes to `value` from outside (chips, "Limpiar todo") are mirrored back
/// into the box immediately.
#[component]
pub fn SearchInput(
    /// Settled query
    value: RwSignal<String>,
    delay_ms: u32,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    let text = RwSignal::new(value.get_untracked());
    let debouncer = StoredValue::new(Debouncer::<String>::new(delay_ms as u64));

    Effect::new(move |_| {
        let external = value.get();
        if text.get_untracked() != external {
            debouncer.update_value(|d| {
                d.flush(external.clone());
            });
            text.set(external);
        }
    });

    let on_input = move |ev| {
        let raw = event_target_value(&ev);
        text.set(raw.clone());
        debouncer.update_value(|d| d.push(raw, now_ms()));
        spawn_local(async move {
            TimeoutFuture::new(delay_ms).await;
            let settled = debouncer.try_update_value(|d| d.poll(now_ms())).flatten();
            if let Some(q) = settled {
                value.set(q);
            }
        });
    };

    let clear = move |_| {
        text.set(String::new());
        debouncer.update_value(|d| {
            d.flush(String::new());
        });
        value.set(String::new());
    };

    view! {
        <div class="search-input">
            <span class="search-input__icon">{icon("search")}</span>
            <input
                type="search"
                class="search-input__field"
                placeholder=placeholder
                prop:value=move || text.get()
                on:input=on_input
            />
            <Show when=move || !text.with(|t| t.is_empty())>
                <button class="search-input__clear" title="Borrar" on:click=clear>
                    {icon("x")}
                </button>
            </Show>
        </div>
    }
}
