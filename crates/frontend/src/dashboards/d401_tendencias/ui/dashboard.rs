use super::chat::TendenciasChat;
use crate::dashboards::d401_tendencias::api;
use crate::shared::components::date_range_inputs::DateRangeInputs;
use crate::shared::components::stat_card::StatCard;
use crate::shared::components::svg_chart::BarChart;
use crate::shared::date_utils::today;
use crate::shared::icons::icon;
use crate::shared::number_format::{format_int, format_money};
use crate::shared::page_frame::{ErrorBox, PageFrame, PageHeader, PAGE_CAT_DASHBOARD};
use contracts::dashboards::d401_tendencias::dto::{
    AnalyticsQuery, Averages, CompareResponse, DaySales, SummaryResponse, RANGE_PRESETS, SALES_DAYS_LIMIT,
};
use contracts::shared::dates::{last_days, to_iso};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const KPI_ICONS: [&str; 4] = ["tendencias", "albaranes", "nueva-venta", "clientes"];

/// Labels and the revenue series of the "Ventas por día" chart
fn day_series(days: &[DaySales]) -> (Vec<String>, Vec<f64>) {
    days.iter()
        .map(|d| (d.date.get(5..).unwrap_or(&d.date).to_string(), d.revenue))
        .unzip()
}

#[component]
#[allow(non_snake_case)]
pub fn TendenciasDashboard() -> impl IntoView {
    let from = RwSignal::new(String::new());
    let to = RwSignal::new(String::new());
    let compare_enabled = RwSignal::new(false);

    let summary = RwSignal::new(None::<SummaryResponse>);
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);

    let compare = RwSignal::new(None::<CompareResponse>);
    let compare_error = RwSignal::new(None::<String>);
    let compare_loading = RwSignal::new(false);

    let export_error = RwSignal::new(None::<String>);
    let exporting = RwSignal::new(false);

    let query = Memo::new(move |_| AnalyticsQuery::range(&from.get(), &to.get()));

    Effect::new(move |_| {
        let q = query.get();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::fetch_summary(&q).await {
                Ok(s) => summary.set(Some(s)),
                Err(e) => {
                    log::error!("analytics summary: {}", e);
                    summary.set(None);
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    });

    Effect::new(move |_| {
        let q = query.get();
        if !compare_enabled.get() {
            compare.set(None);
            compare_error.set(None);
            return;
        }
        compare_loading.set(true);
        compare_error.set(None);
        spawn_local(async move {
            match api::fetch_compare(&q).await {
                Ok(c) => compare.set(Some(c)),
                Err(e) => {
                    log::error!("analytics compare: {}", e);
                    compare.set(None);
                    compare_error.set(Some(e.to_string()));
                }
            }
            compare_loading.set(false);
        });
    });

    let apply_preset = move |days: u32| {
        let (start, end) = last_days(days, today());
        from.set(to_iso(start));
        to.set(to_iso(end));
    };

    let export = move |include_compare: bool| {
        exporting.set(true);
        export_error.set(None);
        let q = query.get_untracked();
        spawn_local(async move {
            if let Err(e) = api::export_pdf(&q, include_compare).await {
                log::error!("analytics pdf: {}", e);
                export_error.set(Some(e.with_context("No se pudo exportar el PDF")));
            }
            exporting.set(false);
        });
    };

    let kpi = move |idx: usize| {
        Signal::derive(move || summary.with(|s| s.as_ref().map(|s| s.metrics.averages.kpis()[idx].1.clone())))
    };

    view! {
        <PageFrame page_id="d401_tendencias--dashboard" category=PAGE_CAT_DASHBOARD>
            <PageHeader
                title="Tendencias"
                subtitle=Signal::derive(move || {
                    summary.with(|s| {
                        s.as_ref()
                            .map(|s| format!("Rango: {} → {}", s.metrics.range.from, s.metrics.range.to))
                            .unwrap_or_else(|| "Rango, comparativa, exportación PDF y asistente IA.".to_string())
                    })
                })
                actions=move || view! {
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| export(false) disabled=exporting>
                        {icon("download")}
                        " Exportar PDF"
                    </Button>
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| export(true) disabled=exporting>
                        {icon("download")}
                        " PDF + Comparativa"
                    </Button>
                }
            />

            {move || export_error.get().map(|e| view! { <ErrorBox message=e /> })}

            <Flex gap=FlexGap::Large align=FlexAlign::End>
                <DateRangeInputs from=from to=to />
                <Flex gap=FlexGap::Small>
                    {RANGE_PRESETS
                        .into_iter()
                        .map(|days| view! {
                            <Button size=ButtonSize::Small appearance=ButtonAppearance::Secondary on_click=move |_| apply_preset(days)>
                                {format!("Últimos {}", days)}
                            </Button>
                        })
                        .collect_view()}
                </Flex>
                <label class="checkbox-list__item">
                    <input
                        type="checkbox"
                        prop:checked=move || compare_enabled.get()
                        on:change=move |ev| compare_enabled.set(event_target_checked(&ev))
                    />
                    "Comparar periodo anterior"
                </label>
            </Flex>

            <div class="analytics-layout">
                <div class="analytics-layout__main">
                    <Show when=move || loading.get()>
                        <Flex justify=FlexJustify::Center><Spinner /></Flex>
                    </Show>
                    {move || error.get().map(|e| view! { <ErrorBox message=e /> })}

                    <div class="stat-grid">
                        {(0..4)
                            .map(|i| {
                                let label = Averages::default().kpis()[i].0;
                                view! { <StatCard label=label icon_name=KPI_ICONS[i] value=kpi(i) /> }
                            })
                            .collect_view()}
                    </div>

                    <Show when=move || compare_enabled.get()>
                        <Card class="dashboard-card">
                            <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                                <h3 class="dashboard-card__title">"Comparativa"</h3>
                                <Show when=move || compare_loading.get()>
                                    <span class="filter-panel__count">"Cargando comparativa…"</span>
                                </Show>
                            </Flex>
                            {move || {
                                if let Some(e) = compare_error.get() {
                                    return view! { <ErrorBox message=e /> }.into_any();
                                }
                                match compare.get().and_then(|c| c.delta.map(|d| (d, c.ai_compare_report))) {
                                    None => view! { <p class="table__empty">"No hay datos de comparativa."</p> }.into_any(),
                                    Some((delta, reading)) => view! {
                                        <table class="table__data table__data--compact">
                                            <thead>
                                                <tr>
                                                    <th>"Métrica"</th>
                                                    <th class="table__cell--right">"Actual"</th>
                                                    <th class="table__cell--right">"Anterior"</th>
                                                    <th class="table__cell--right">"Δ"</th>
                                                    <th class="table__cell--right">"%"</th>
                                                </tr>
                                            </thead>
                                            <tbody>
                                                {delta
                                                    .rows()
                                                    .into_iter()
                                                    .map(|(label, entry, money)| view! {
                                                        <tr>
                                                            <td>{label}</td>
                                                            {entry
                                                                .cells(money)
                                                                .into_iter()
                                                                .map(|c| view! { <td class="table__cell--right">{c}</td> })
                                                                .collect_view()}
                                                        </tr>
                                                    })
                                                    .collect_view()}
                                            </tbody>
                                        </table>
                                        {reading.filter(|r| !r.trim().is_empty()).map(|r| view! {
                                            <h4 class="dashboard-card__subtitle">"Lectura IA"</h4>
                                            <p class="report-text">{r}</p>
                                        })}
                                    }
                                    .into_any(),
                                }
                            }}
                        </Card>
                    </Show>

                    <div class="dashboard-grid">
                        <Card class="dashboard-card">
                            <h3 class="dashboard-card__title">"Top productos"</h3>
                            <table class="table__data table__data--compact">
                                <thead>
                                    <tr>
                                        <th>"Producto"</th>
                                        <th class="table__cell--right">"Unidades"</th>
                                        <th class="table__cell--right">"Facturación"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {move || summary.with(|s| {
                                        s.as_ref()
                                            .map(|s| s.metrics.top().to_vec())
                                            .unwrap_or_default()
                                            .into_iter()
                                            .map(|t| view! {
                                                <tr>
                                                    <td>{t.name}</td>
                                                    <td class="table__cell--right">{format_int(t.qty)}</td>
                                                    <td class="table__cell--right">{format_money(t.revenue)}</td>
                                                </tr>
                                            })
                                            .collect_view()
                                    })}
                                </tbody>
                            </table>
                            <Show when=move || summary.with(|s| s.as_ref().map_or(true, |s| s.metrics.top_products.is_empty()))>
                                <p class="table__empty">"Sin datos."</p>
                            </Show>
                        </Card>

                        <Card class="dashboard-card">
                            <h3 class="dashboard-card__title">{format!("Ventas por día (últimos {})", SALES_DAYS_LIMIT)}</h3>
                            {move || summary.with(|s| match s {
                                Some(s) if !s.metrics.sales_by_day.is_empty() => {
                                    let days = s.metrics.recent_days();
                                    let (labels, revenue) = day_series(days);
                                    let rows = days
                                        .iter()
                                        .map(|d| view! {
                                            <tr>
                                                <td>{d.date.clone()}</td>
                                                <td class="table__cell--right">{format!("{} pedidos", d.orders)}</td>
                                                <td class="table__cell--right">{format_money(d.revenue)}</td>
                                            </tr>
                                        })
                                        .collect_view();
                                    view! {
                                        <BarChart labels=labels series=vec![("Facturación".to_string(), revenue)] />
                                        <table class="table__data table__data--compact"><tbody>{rows}</tbody></table>
                                    }
                                    .into_any()
                                }
                                _ => view! { <p class="table__empty">"Sin datos."</p> }.into_any(),
                            })}
                        </Card>
                    </div>

                    <Card class="dashboard-card">
                        <h3 class="dashboard-card__title">"Informe IA (resumen en pantalla)"</h3>
                        <p class="report-text">
                            {move || summary.with(|s| s.as_ref().map(|s| s.report_text().to_string()).unwrap_or_default())}
                        </p>
                        <p class="chat__hint">"El PDF exportado incluye el informe completo generado por la IA."</p>
                    </Card>
                </div>

                <div class="analytics-layout__side">
                    <TendenciasChat from=from to=to />
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_series_short_labels() {
        let days = vec![
            DaySales { date: "2024-05-01".into(), orders: 2.0, revenue: 120.0 },
            DaySales { date: "x".into(), orders: 0.0, revenue: 0.0 },
        ];
        let (labels, revenue) = day_series(&days);
        assert_eq!(labels, vec!["05-01", "x"]);
        assert_eq!(revenue, vec![120.0, 0.0]);
    }
}
