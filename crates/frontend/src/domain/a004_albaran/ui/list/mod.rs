use crate::domain::a001_cliente::api::fetch_clientes;
use crate::domain::a004_albaran::api::{fetch_albaranes, patch_estado};
use crate::domain::a004_albaran::ui::details::open_albaran_details;
use crate::shared::app_config::config;
use crate::shared::components::date_range_inputs::DateRangeInputs;
use crate::shared::components::filter_panel::{FilterChips, FilterPanel};
use crate::shared::components::search_input::SearchInput;
use crate::shared::components::table_checkbox::TableCheckbox;
use crate::shared::components::ui::EstadoBadge;
use crate::shared::export::{export_csv, CsvExportable};
use crate::shared::icons::icon;
use crate::shared::modal_stack::ModalStackService;
use crate::shared::number_format::format_money;
use crate::shared::page_frame::{ErrorBox, PageFrame, PageHeader, SuccessBox, PAGE_CAT_LIST};
use crate::shared::storage::{self, ALBARAN_OPEN_ID};
use contracts::domain::a001_cliente::aggregate::{Cliente, ClienteIndex};
use contracts::domain::a001_cliente::filter::available_domains;
use contracts::domain::a004_albaran::aggregate::{splice, Albaran};
use contracts::domain::a004_albaran::estado::EstadoAlbaran;
use contracts::domain::a004_albaran::filter::{default_total_range, AlbaranFilter, AlbaranSort};
use contracts::domain::ids::AlbaranId;
use contracts::shared::dates::parse_date;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashSet;
use thaw::*;

/// Row of the CSV export: the albarán plus its resolved client name
struct AlbaranCsvRow {
    albaran: Albaran,
    cliente: String,
}

impl CsvExportable for AlbaranCsvRow {
    fn headers() -> Vec<&'static str> {
        vec!["Nº", "Fecha", "Cliente", "Estado", "Total", "Descripción"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        let a = &self.albaran;
        vec![
            a.id.to_string(),
            a.fecha_iso(),
            self.cliente.clone(),
            a.estado.label().to_string(),
            format!("{:.2}", a.total).replace('.', ","),
            a.descripcion.clone(),
        ]
    }
}

fn parse_total(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

fn bound_text(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

#[component]
#[allow(non_snake_case)]
pub fn AlbaranList() -> impl IntoView {
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let items = RwSignal::new(Vec::<Albaran>::new());
    let clientes = RwSignal::new(Vec::<Cliente>::new());
    let error = RwSignal::new(None::<String>);
    let notice = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);
    let filter = RwSignal::new(AlbaranFilter::default());
    let filters_open = RwSignal::new(true);
    let selected = RwSignal::new(HashSet::<AlbaranId>::new());
    let bulk_running = RwSignal::new(false);

    // raw input text, mirrored into the filter
    let query = RwSignal::new(String::new());
    let total_min = RwSignal::new(String::new());
    let total_max = RwSignal::new(String::new());
    let desde = RwSignal::new(String::new());
    let hasta = RwSignal::new(String::new());

    let default_total = Memo::new(move |_| items.with(|list| default_total_range(list)));
    let index = Memo::new(move |_| clientes.with(|c| ClienteIndex::new(c)));
    let domains = Memo::new(move |_| clientes.with(|c| available_domains(c)));
    let visible = Memo::new(move |_| {
        let f = filter.get();
        let idx = index.get();
        items.with(|list| f.apply(list, &idx))
    });

    Effect::new(move |_| {
        let q = query.get();
        if filter.with_untracked(|f| f.query != q) {
            filter.update(|f| f.query = q);
        }
    });
    Effect::new(move |_| {
        let min = parse_total(&total_min.get());
        let max = parse_total(&total_max.get());
        if filter.with_untracked(|f| f.total.min != min || f.total.max != max) {
            filter.update(|f| {
                f.total.min = min;
                f.total.max = max;
            });
        }
    });
    Effect::new(move |_| {
        let from = parse_date(&desde.get());
        let to = parse_date(&hasta.get());
        if filter.with_untracked(|f| f.fechas.min != from || f.fechas.max != to) {
            filter.update(|f| {
                f.fechas.min = from;
                f.fechas.max = to;
            });
        }
    });

    let sync_inputs = move || {
        filter.with_untracked(|f| {
            query.set(f.query.clone());
            total_min.set(bound_text(f.total.min));
            total_max.set(bound_text(f.total.max));
            desde.set(f.fechas.min.map(|d| d.to_string()).unwrap_or_default());
            hasta.set(f.fechas.max.map(|d| d.to_string()).unwrap_or_default());
        });
    };

    let on_updated = Callback::new(move |updated: Albaran| {
        items.update(|list| {
            splice(list, updated);
        });
    });
    let open_details = move |a: Albaran| open_albaran_details(modal_stack, a, on_updated);

    let load = move || {
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match fetch_clientes().await {
                Ok(list) => clientes.set(list),
                Err(e) => {
                    log::error!("clientes: {}", e);
                    error.set(Some(e.with_context("No se pudieron cargar los clientes")));
                }
            }
        });
        spawn_local(async move {
            match fetch_albaranes().await {
                Ok(list) => {
                    let previous = default_total.get_untracked();
                    let next = default_total_range(&list);
                    filter.update(|f| f.rebase_total(previous, next));
                    items.set(list);
                    selected.update(|s| s.clear());
                    sync_inputs();

                    if let Some(id) = storage::peek_handoff(ALBARAN_OPEN_ID) {
                        let found = items.with_untracked(|l| l.iter().find(|a| a.id == AlbaranId(id)).cloned());
                        storage::remove(ALBARAN_OPEN_ID);
                        match found {
                            Some(a) => open_details(a),
                            None => log::warn!("albaran {} from hand-off not in list", id),
                        }
                    }
                }
                Err(e) => {
                    log::error!("albaranes: {}", e);
                    error.set(Some(e.with_context("No se pudieron cargar los albaranes")));
                }
            }
            loading.set(false);
        });
    };
    load();

    let advance = move |a: Albaran| {
        let Some(next) = a.estado.next() else {
            return;
        };
        let id = a.id;
        spawn_local(async move {
            match patch_estado(id, next).await {
                Ok(updated) => items.update(|list| {
                    splice(list, updated);
                }),
                Err(e) => {
                    log::error!("estado albaran {}: {}", id, e);
                    error.set(Some(e.with_context(&format!("No se pudo actualizar el albarán #{}", id))));
                }
            }
        });
    };

    // sequential, stops at the first failure; earlier changes stay applied
    let marcar_entregados = move |_| {
        let ids: Vec<AlbaranId> = visible.with_untracked(|v| {
            selected.with_untracked(|s| {
                v.iter()
                    .filter(|a| s.contains(&a.id) && !a.estado.is_final())
                    .map(|a| a.id)
                    .collect()
            })
        });
        if ids.is_empty() {
            notice.set(Some("No hay albaranes pendientes de entrega en la selección.".to_string()));
            return;
        }
        bulk_running.set(true);
        error.set(None);
        notice.set(None);
        spawn_local(async move {
            let total = ids.len();
            let mut done = 0usize;
            for id in ids {
                match patch_estado(id, EstadoAlbaran::Entregado).await {
                    Ok(updated) => {
                        items.update(|list| {
                            splice(list, updated);
                        });
                        selected.update(|s| {
                            s.remove(&id);
                        });
                        done += 1;
                    }
                    Err(e) => {
                        log::error!("marcar entregado {}: {}", id, e);
                        error.set(Some(format!(
                            "Se marcaron {} de {} albaranes. Falló el #{}: {}",
                            done, total, id, e
                        )));
                        break;
                    }
                }
            }
            if done == total {
                notice.set(Some(format!("{} albaranes marcados como entregados.", done)));
            }
            bulk_running.set(false);
        });
    };

    let exportar = move |_| {
        let idx = index.get_untracked();
        let rows: Vec<AlbaranCsvRow> = visible.with_untracked(|v| {
            v.iter()
                .map(|a| AlbaranCsvRow {
                    albaran: a.clone(),
                    cliente: idx.display_name(a.cliente_id),
                })
                .collect()
        });
        if let Err(e) = export_csv(&rows, "albaranes.csv") {
            log::warn!("export albaranes: {}", e);
            error.set(Some(e));
        }
    };

    let chips = Signal::derive(move || {
        filter
            .get()
            .chips(default_total.get())
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i, c.label))
            .collect::<Vec<_>>()
    });
    let remove_chip = Callback::new(move |idx: usize| {
        let defaults = default_total.get_untracked();
        filter.update(|f| {
            if let Some(key) = f.chips(defaults).get(idx).map(|c| c.key.clone()) {
                f.remove_chip(&key, defaults);
            }
        });
        sync_inputs();
    });
    let clear_all = Callback::new(move |_| {
        filter.update(|f| f.clear(default_total.get_untracked()));
        sync_inputs();
    });
    let active_count = Signal::derive(move || chips.with(|c| c.len()));

    let all_selected = Signal::derive(move || {
        visible.with(|v| !v.is_empty() && selected.with(|s| v.iter().all(|a| s.contains(&a.id))))
    });
    let toggle_all = Callback::new(move |on: bool| {
        let ids: Vec<AlbaranId> = visible.with_untracked(|v| v.iter().map(|a| a.id).collect());
        selected.update(|s| {
            if on {
                s.extend(ids);
            } else {
                s.clear();
            }
        });
    });
    let selected_count = Signal::derive(move || selected.with(|s| s.len()));

    view! {
        <PageFrame page_id="a004_albaran--list" category=PAGE_CAT_LIST>
            <PageHeader
                title="Albaranes"
                subtitle=Signal::derive(move || format!("{} de {} albaranes", visible.with(|v| v.len()), items.with(|l| l.len())))
                actions=move || view! {
                    <Flex gap=FlexGap::Small>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=marcar_entregados
                            disabled=Signal::derive(move || bulk_running.get() || selected_count.get() == 0)
                        >
                            {icon("check")}
                            {move || format!(" Marcar entregados ({})", selected_count.get())}
                        </Button>
                        <Button appearance=ButtonAppearance::Secondary on_click=exportar>
                            {icon("download")}
                            " CSV"
                        </Button>
                        <Button appearance=ButtonAppearance::Secondary on_click=move |_| load() disabled=loading>
                            {icon("refresh")}
                            " Actualizar"
                        </Button>
                    </Flex>
                }
            />

            {move || error.get().map(|e| view! { <ErrorBox message=e /> })}
            {move || notice.get().map(|m| view! { <SuccessBox message=m /> })}

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
                        placeholder="Nº, descripción o cliente"
                    />
                    <label class="form__label">
                        "Total desde (€)"
                        <input
                            type="number"
                            min="0"
                            class="form__input form__input--short"
                            prop:value=move || total_min.get()
                            on:change=move |ev| total_min.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="form__label">
                        "Total hasta (€)"
                        <input
                            type="number"
                            min="0"
                            class="form__input form__input--short"
                            prop:value=move || total_max.get()
                            on:change=move |ev| total_max.set(event_target_value(&ev))
                        />
                    </label>
                    <DateRangeInputs from=desde to=hasta />
                    <label class="form__label">
                        "Orden"
                        <select
                            class="form__select"
                            prop:value=move || filter.with(|f| f.sort.code())
                            on:change=move |ev| {
                                let sort = AlbaranSort::from_code(&event_target_value(&ev));
                                filter.update(|f| f.sort = sort);
                            }
                        >
                            {AlbaranSort::ALL
                                .into_iter()
                                .map(|s| view! { <option value=s.code()>{s.label()}</option> })
                                .collect_view()}
                        </select>
                    </label>
                </Flex>
                <div class="filter-panel__group">
                    <span class="form__label">"Estado"</span>
                    <div class="checkbox-list">
                        {EstadoAlbaran::CHAIN
                            .into_iter()
                            .map(|estado| {
                                let check = estado.clone();
                                let label = estado.label().to_string();
                                view! {
                                    <label class="checkbox-list__item">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || filter.with(|f| f.estados.contains(&check))
                                            on:change=move |_| filter.update(|f| f.toggle_estado(&estado))
                                        />
                                        {label}
                                    </label>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
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
                            <TableCheckbox checked=all_selected on_change=toggle_all />
                            <th>"Nº"</th>
                            <th>"Fecha"</th>
                            <th>"Cliente"</th>
                            <th>"Estado"</th>
                            <th class="table__cell--right">"Total"</th>
                            <th>"Descripción"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || visible.get()
                            key=|a| (a.id, a.estado.clone(), a.total.to_bits())
                            children=move |a: Albaran| {
                                let id = a.id;
                                let row = a.clone();
                                let for_action = a.clone();
                                let cliente_id = a.cliente_id;
                                let cliente = move || index.with(|idx| idx.display_name(cliente_id));
                                let checked = Signal::derive(move || selected.with(|s| s.contains(&id)));
                                let on_check = Callback::new(move |on: bool| {
                                    selected.update(|s| {
                                        if on {
                                            s.insert(id);
                                        } else {
                                            s.remove(&id);
                                        }
                                    });
                                });
                                view! {
                                    <tr class="table__row table__row--clickable" on:click=move |_| open_details(row.clone())>
                                        <TableCheckbox checked=checked on_change=on_check />
                                        <td>{format!("#{}", id)}</td>
                                        <td>{a.fecha_display()}</td>
                                        <td>{cliente}</td>
                                        <td><EstadoBadge estado=a.estado.clone() /></td>
                                        <td class="table__cell--right">{format_money(a.total)}</td>
                                        <td class="table__cell--truncate">{a.descripcion.clone()}</td>
                                        <td on:click=|e| e.stop_propagation()>
                                            {a.estado.next().map(|next| {
                                                let target = for_action.clone();
                                                view! {
                                                    <Button
                                                        size=ButtonSize::Small
                                                        appearance=ButtonAppearance::Secondary
                                                        on_click=move |_| advance(target.clone())
                                                    >
                                                        {next.action_label()}
                                                    </Button>
                                                }
                                            })}
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || !loading.get() && visible.with(|v| v.is_empty())>
                    <p class="table__empty">"No hay albaranes que coincidan con los filtros."</p>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::ids::ClienteId;

    #[test]
    fn test_csv_row_uses_comma_decimals() {
        let row = AlbaranCsvRow {
            albaran: Albaran {
                id: AlbaranId(7),
                fecha: "2024-05-02T09:00:00".into(),
                cliente_id: ClienteId(1),
                total: 1250.5,
                estado: EstadoAlbaran::Almacen,
                descripcion: "Sofá".into(),
                ..Default::default()
            },
            cliente: "Ana López".into(),
        };
        assert_eq!(
            row.to_csv_row(),
            vec!["7", "2024-05-02", "Ana López", "Almacén", "1250,50", "Sofá"]
        );
        assert_eq!(AlbaranCsvRow::headers().len(), row.to_csv_row().len());
    }

    #[test]
    fn test_parse_total() {
        assert_eq!(parse_total("100,5"), Some(100.5));
        assert_eq!(parse_total(""), None);
        assert_eq!(bound_text(Some(300.0)), "300");
        assert_eq!(bound_text(None), "");
    }
}
