use crate::domain::a005_movimiento::api::{create_movimiento, fetch_movimientos};
use crate::shared::app_config::config;
use crate::shared::components::date_range_inputs::DateRangeInputs;
use crate::shared::components::search_input::SearchInput;
use crate::shared::components::stat_card::StatCard;
use crate::shared::components::ui::Badge as TipoBadge;
use crate::shared::date_utils::today;
use crate::shared::icons::icon;
use crate::shared::number_format::format_money;
use crate::shared::page_frame::{ErrorBox, PageFrame, PageHeader, PAGE_CAT_LIST};
use contracts::domain::a005_movimiento::aggregate::{Movimiento, MovimientoForm, TipoMovimiento};
use contracts::domain::a005_movimiento::filter::MovimientoFilter;
use contracts::domain::a005_movimiento::ledger::month_summary;
use contracts::shared::dates::parse_date;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const TIPO_TODOS: &str = "TODOS";

#[component]
#[allow(non_snake_case)]
pub fn MovimientoList() -> impl IntoView {
    let items = RwSignal::new(Vec::<Movimiento>::new());
    let error = RwSignal::new(None::<String>);
    let form_error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);
    let saving = RwSignal::new(false);

    let query = RwSignal::new(String::new());
    let tipo = RwSignal::new(TIPO_TODOS.to_string());
    let desde = RwSignal::new(String::new());
    let hasta = RwSignal::new(String::new());

    let form = RwSignal::new(MovimientoForm::new(today()));

    let filter = Memo::new(move |_| {
        let mut f = MovimientoFilter {
            query: query.get(),
            tipo: TipoMovimiento::from_code(&tipo.get()),
            ..Default::default()
        };
        f.fechas.min = parse_date(&desde.get());
        f.fechas.max = parse_date(&hasta.get());
        f
    });
    let visible = Memo::new(move |_| {
        let f = filter.get();
        items.with(|list| f.apply(list))
    });
    let summary = Memo::new(move |_| items.with(|list| month_summary(list, today())));
    let loaded = move || !loading.get() || items.with(|l| !l.is_empty());

    let load = move || {
        loading.set(true);
        spawn_local(async move {
            match fetch_movimientos().await {
                Ok(list) => {
                    items.set(list);
                    error.set(None);
                }
                Err(e) => {
                    log::error!("movimientos: {}", e);
                    error.set(Some(e.with_context("No se pudieron cargar los movimientos")));
                }
            }
            loading.set(false);
        });
    };
    load();

    let submit = move || {
        if saving.get_untracked() {
            return;
        }
        let Some(body) = form.with_untracked(|f| f.to_request()) else {
            form_error.set(Some("Fecha, concepto y cantidad son obligatorios.".to_string()));
            return;
        };
        form_error.set(None);
        saving.set(true);
        spawn_local(async move {
            match create_movimiento(&body).await {
                Ok(created) => {
                    items.update(|list| list.insert(0, created));
                    form.update(|f| f.reset_after_post());
                }
                Err(e) => {
                    log::error!("crear movimiento: {}", e);
                    form_error.set(Some(e.with_context("No se pudo guardar el movimiento")));
                }
            }
            saving.set(false);
        });
    };

    view! {
        <PageFrame page_id="a005_movimiento--list" category=PAGE_CAT_LIST>
            <PageHeader
                title="Movimientos"
                subtitle=Signal::derive(move || format!("Resumen de {}", summary.with(|s| s.period_label())))
                actions=move || view! {
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load() disabled=loading>
                        {icon("refresh")}
                        " Actualizar"
                    </Button>
                }
            />

            {move || error.get().map(|e| view! { <ErrorBox message=e /> })}

            <div class="stat-grid">
                <StatCard
                    label="Ingresos del mes"
                    icon_name="movimientos"
                    variant="success"
                    value=Signal::derive(move || loaded().then(|| format_money(summary.with(|s| s.ingresos))))
                />
                <StatCard
                    label="Egresos del mes"
                    icon_name="movimientos"
                    variant="error"
                    value=Signal::derive(move || loaded().then(|| format_money(summary.with(|s| s.egresos))))
                />
                <StatCard
                    label="Balance"
                    icon_name="dashboard"
                    value=Signal::derive(move || loaded().then(|| format_money(summary.with(|s| s.balance()))))
                />
            </div>

            <Card class="movimiento-form">
                <h3>"Nuevo movimiento"</h3>
                {move || form_error.get().map(|e| view! { <ErrorBox message=e /> })}
                <Flex gap=FlexGap::Large align=FlexAlign::End>
                    <label class="form__label">
                        "Fecha"
                        <input
                            type="date"
                            class="form__input"
                            prop:value=move || form.with(|f| f.fecha.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                form.update(|f| f.fecha = v);
                            }
                        />
                    </label>
                    <label class="form__label form__label--grow">
                        "Concepto"
                        <input
                            type="text"
                            class="form__input"
                            placeholder="Concepto"
                            prop:value=move || form.with(|f| f.concepto.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                form.update(|f| f.concepto = v);
                            }
                        />
                    </label>
                    <label class="form__label">
                        "Cantidad (€)"
                        <input
                            type="number"
                            step="0.01"
                            min="0"
                            class="form__input form__input--short"
                            prop:value=move || form.with(|f| f.cantidad.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                form.update(|f| f.cantidad = v);
                            }
                        />
                    </label>
                    <label class="form__label">
                        "Tipo"
                        <select
                            class="form__select"
                            prop:value=move || form.with(|f| f.tipo.code())
                            on:change=move |ev| {
                                if let Some(t) = TipoMovimiento::from_code(&event_target_value(&ev)) {
                                    form.update(|f| f.tipo = t);
                                }
                            }
                        >
                            {TipoMovimiento::ALL
                                .into_iter()
                                .map(|t| view! { <option value=t.code()>{t.label()}</option> })
                                .collect_view()}
                        </select>
                    </label>
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| submit() disabled=saving>
                        {icon("plus")}
                        " Añadir"
                    </Button>
                </Flex>
            </Card>

            <div class="filter-bar">
                <Flex gap=FlexGap::Large align=FlexAlign::End>
                    <SearchInput
                        value=query
                        delay_ms=config().ui.search_debounce_ms
                        placeholder="Concepto, tipo o cantidad"
                    />
                    <label class="form__label">
                        "Tipo"
                        <select
                            class="form__select"
                            prop:value=move || tipo.get()
                            on:change=move |ev| tipo.set(event_target_value(&ev))
                        >
                            <option value=TIPO_TODOS>"Todos"</option>
                            {TipoMovimiento::ALL
                                .into_iter()
                                .map(|t| view! { <option value=t.code()>{t.label()}</option> })
                                .collect_view()}
                        </select>
                    </label>
                    <DateRangeInputs from=desde to=hasta />
                </Flex>
                <span class="list-summary">{move || format!("Mostrando {} movimientos", visible.with(|v| v.len()))}</span>
            </div>

            <Show when=move || loading.get()>
                <Flex justify=FlexJustify::Center><Spinner /></Flex>
            </Show>

            <div class="table-wrapper">
                <table class="table__data">
                    <thead>
                        <tr>
                            <th>"Fecha"</th>
                            <th>"Concepto"</th>
                            <th>"Tipo"</th>
                            <th class="table__cell--right">"Cantidad"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || visible.get()
                            key=|m| m.id
                            children=move |m: Movimiento| {
                                let amount_class = match m.tipo {
                                    TipoMovimiento::Ingreso => "table__cell--right text-success",
                                    TipoMovimiento::Egreso => "table__cell--right text-error",
                                };
                                view! {
                                    <tr class="table__row">
                                        <td>{m.fecha_date().map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_else(|| m.fecha.clone())}</td>
                                        <td>{m.concepto.clone()}</td>
                                        <td><TipoBadge variant=m.tipo.badge_variant()>{m.tipo.label()}</TipoBadge></td>
                                        <td class=amount_class>{format_money(m.signed())}</td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || !loading.get() && visible.with(|v| v.is_empty())>
                    <p class="table__empty">"No hay movimientos que coincidan con los filtros."</p>
                </Show>
            </div>
        </PageFrame>
    }
}
