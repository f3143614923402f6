use crate::domain::a001_cliente::api::fetch_clientes;
use crate::domain::a001_cliente::ui::details::open_cliente_details;
use crate::shared::app_config::config;
use crate::shared::components::filter_panel::{FilterChips, FilterPanel};
use crate::shared::components::search_input::SearchInput;
use crate::shared::icons::icon;
use crate::shared::modal_stack::ModalStackService;
use crate::shared::page_frame::{ErrorBox, PageFrame, PageHeader, PAGE_CAT_LIST};
use crate::shared::storage::{self, CLIENTE_OPEN_ID};
use contracts::domain::a001_cliente::aggregate::Cliente;
use contracts::domain::a001_cliente::filter::{available_domains, default_id_range, ClienteFilter, ClienteSort};
use contracts::domain::ids::ClienteId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

fn parse_bound(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

#[component]
#[allow(non_snake_case)]
pub fn ClienteList() -> impl IntoView {
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let items = RwSignal::new(Vec::<Cliente>::new());
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);
    let filter = RwSignal::new(ClienteFilter::default());
    let query = RwSignal::new(String::new());
    let filters_open = RwSignal::new(true);

    let default_ids = Memo::new(move |_| items.with(|list| default_id_range(list)));
    let domains = Memo::new(move |_| items.with(|list| available_domains(list)));
    let visible = Memo::new(move |_| {
        let f = filter.get();
        items.with(|list| f.apply(list))
    });

    Effect::new(move |_| {
        let q = query.get();
        if filter.with_untracked(|f| f.query != q) {
            filter.update(|f| f.query = q);
        }
    });

    let open_details = move |cliente: Cliente| open_cliente_details(modal_stack, cliente);

    let load = move || {
        loading.set(true);
        spawn_local(async move {
            match fetch_clientes().await {
                Ok(list) => {
                    let q = query.get_untracked();
                    let mut f = ClienteFilter::for_items(&list);
                    f.query = q;
                    filter.set(f);
                    items.set(list);
                    error.set(None);

                    if let Some(id) = storage::peek_handoff(CLIENTE_OPEN_ID) {
                        let found = items.with_untracked(|l| l.iter().find(|c| c.id == ClienteId(id)).cloned());
                        storage::remove(CLIENTE_OPEN_ID);
                        match found {
                            Some(c) => open_details(c),
                            None => log::warn!("cliente {} from hand-off not in list", id),
                        }
                    }
                }
                Err(e) => {
                    log::error!("clientes: {}", e);
                    error.set(Some(e.with_context("No se pudieron cargar los clientes")));
                }
            }
            loading.set(false);
        });
    };
    load();

    let chips = Signal::derive(move || {
        filter
            .get()
            .chips(default_ids.get())
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i, c.label))
            .collect::<Vec<_>>()
    });
    let remove_chip = Callback::new(move |idx: usize| {
        let defaults = default_ids.get_untracked();
        filter.update(|f| {
            if let Some(chip) = f.chips(defaults).get(idx).map(|c| c.key.clone()) {
                f.remove_chip(&chip, defaults);
            }
        });
        query.set(filter.with_untracked(|f| f.query.clone()));
    });
    let clear_all = Callback::new(move |_| {
        filter.update(|f| f.clear(default_ids.get_untracked()));
        query.set(String::new());
    });
    let active_count = Signal::derive(move || chips.with(|c| c.len()));

    view! {
        <PageFrame page_id="a001_cliente--list" category=PAGE_CAT_LIST>
            <PageHeader
                title="Clientes"
                subtitle=Signal::derive(move || format!("Clientes registrados: {}", items.with(|l| l.len())))
                actions=move || {
                    view! {
                        <Button appearance=ButtonAppearance::Secondary on_click=move |_| load() disabled=loading>
                            {icon("refresh")}
                            " Actualizar"
                        </Button>
                    }
                }
            />

            {move || error.get().map(|e| view! { <ErrorBox message=e /> })}

            <FilterPanel
                is_expanded=filters_open
                active_filters_count=active_count
                header_extra=move || view! { <span class="filter-panel__count">{move || format!("{} resultados", visible.with(|v| v.len()))}</span> }
                filter_tags=move || view! { <FilterChips chips=chips on_remove=remove_chip on_clear=clear_all /> }
            >
                <Flex gap=FlexGap::Large align=FlexAlign::End>
                    <SearchInput
                        value=query
                        delay_ms=config().ui.search_debounce_ms
                        placeholder="Nombre, email o DNI"
                    />
                    <label class="form__label">
                        "ID desde"
                        <input
                            type="number"
                            min="0"
                            class="form__input form__input--short"
                            prop:value=move || filter.with(|f| f.ids.min.map(|v| v.to_string()).unwrap_or_default())
                            on:change=move |ev| {
                                let min = parse_bound(&event_target_value(&ev));
                                filter.update(|f| {
                                    let max = f.ids.max;
                                    f.set_ids(min, max);
                                });
                            }
                        />
                    </label>
                    <label class="form__label">
                        "ID hasta"
                        <input
                            type="number"
                            min="0"
                            class="form__input form__input--short"
                            prop:value=move || filter.with(|f| f.ids.max.map(|v| v.to_string()).unwrap_or_default())
                            on:change=move |ev| {
                                let max = parse_bound(&event_target_value(&ev));
                                filter.update(|f| {
                                    let min = f.ids.min;
                                    f.set_ids(min, max);
                                });
                            }
                        />
                    </label>
                    <label class="form__label">
                        "Orden"
                        <select
                            class="form__select"
                            prop:value=move || filter.with(|f| f.sort.code())
                            on:change=move |ev| {
                                let sort = ClienteSort::from_code(&event_target_value(&ev));
                                filter.update(|f| f.sort = sort);
                            }
                        >
                            {ClienteSort::ALL
                                .into_iter()
                                .map(|s| view! { <option value=s.code()>{s.label()}</option> })
                                .collect_view()}
                        </select>
                    </label>
                </Flex>
                <div class="filter-panel__group">
                    <span class="form__label">"Dominios de email"</span>
                    <div class="checkbox-list">
                        <For
                            each=move || domains.get()
                            key=|d| d.clone()
                            children=move |dom: String| {
                                let dom_check = dom.clone();
                                let dom_toggle = dom.clone();
                                view! {
                                    <label class="checkbox-list__item">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || filter.with(|f| f.domains.contains(&dom_check))
                                            on:change=move |ev| {
                                                let on = event_target_checked(&ev);
                                                let d = dom_toggle.clone();
                                                filter.update(|f| {
                                                    if on {
                                                        f.domains.insert(d);
                                                    } else {
                                                        f.domains.remove(&d);
                                                    }
                                                });
                                            }
                                        />
                                        {dom}
                                    </label>
                                }
                            }
                        />
                    </div>
                </div>
            </FilterPanel>

            <Show when=move || loading.get()>
                <Flex justify=FlexJustify::Center><Spinner /></Flex>
            </Show>

            <div class="table-wrapper">
                <table class="table__data">
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Nombre"</th>
                            <th>"Email"</th>
                            <th>"DNI"</th>
                            <th>"Teléfono"</th>
                            <th>"Ciudad"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || visible.get()
                            key=|c| c.id
                            children=move |c: Cliente| {
                                let row = c.clone();
                                view! {
                                    <tr class="table__row table__row--clickable" on:click=move |_| open_details(row.clone())>
                                        <td>{c.id.value()}</td>
                                        <td>{c.nombre_completo()}</td>
                                        <td>{c.email.clone()}</td>
                                        <td>{c.dni.clone()}</td>
                                        <td>{c.telefonos()}</td>
                                        <td>{c.ciudad.clone()}</td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || !loading.get() && visible.with(|v| v.is_empty())>
                    <p class="table__empty">"No hay clientes que coincidan con los filtros."</p>
                </Show>
            </div>
        </PageFrame>
    }
}
