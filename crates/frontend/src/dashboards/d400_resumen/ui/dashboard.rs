use crate::dashboards::d400_resumen::api::fetch_resumen;
use crate::layout::global_context::use_app_context;
use crate::layout::pages::Page;
use crate::shared::components::stat_card::StatCard;
use crate::shared::components::svg_chart::LineChart;
use crate::shared::components::ui::{Badge, EstadoBadge};
use crate::shared::date_utils::today;
use crate::shared::icons::icon;
use crate::shared::number_format::format_money;
use crate::shared::page_frame::{ErrorBox, PageFrame, PageHeader, PAGE_CAT_DASHBOARD};
use contracts::dashboards::d400_resumen::{ResumenDashboard, SERIES_MONTHS};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
#[allow(non_snake_case)]
pub fn ResumenDashboardView() -> impl IntoView {
    let ctx = use_app_context();
    let data = RwSignal::new(None::<ResumenDashboard>);
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);

    let load = move || {
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match fetch_resumen(today()).await {
                Ok(d) => data.set(Some(d)),
                Err(e) => {
                    log::error!("resumen: {}", e);
                    error.set(Some(e.with_context("No se pudo cargar el resumen")));
                }
            }
            loading.set(false);
        });
    };
    load();

    let money = move |f: fn(&ResumenDashboard) -> f64| {
        Signal::derive(move || data.with(|d| d.as_ref().map(|d| format_money(f(d)))))
    };

    view! {
        <PageFrame page_id="d400_resumen--dashboard" category=PAGE_CAT_DASHBOARD>
            <PageHeader
                title="Panel"
                subtitle=Signal::derive(move || {
                    data.with(|d| d.as_ref().map(|d| format!("Mes en curso: {}", d.mes.period_label())).unwrap_or_default())
                })
                actions=move || view! {
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load() disabled=loading>
                        {icon("refresh")}
                        " Actualizar"
                    </Button>
                }
            />

            {move || error.get().map(|e| view! { <ErrorBox message=e /> })}

            <div class="stat-grid">
                <StatCard label="Ingresos del mes" icon_name="movimientos" variant="success" value=money(|d| d.mes.ingresos) />
                <StatCard label="Egresos del mes" icon_name="movimientos" variant="error" value=money(|d| d.mes.egresos) />
                <StatCard label="Balance" icon_name="dashboard" value=money(|d| d.mes.balance()) />
                <StatCard
                    label="Albaranes abiertos"
                    icon_name="albaranes"
                    variant="warning"
                    value=Signal::derive(move || data.with(|d| d.as_ref().map(|d| d.abiertos().to_string())))
                    subtitle="Pendientes de entrega"
                />
            </div>

            <div class="dashboard-grid">
                <Card class="dashboard-card">
                    <h3 class="dashboard-card__title">{format!("Ingresos y egresos (últimos {} meses)", SERIES_MONTHS)}</h3>
                    {move || data.get().map(|d| {
                        let (labels, ingresos, egresos) = d.chart_series();
                        view! {
                            <LineChart
                                labels=labels
                                series=vec![("Ingresos".to_string(), ingresos), ("Egresos".to_string(), egresos)]
                            />
                        }
                    })}
                </Card>

                <Card class="dashboard-card">
                    <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                        <h3 class="dashboard-card__title">"Albaranes por estado"</h3>
                        <Button size=ButtonSize::Small appearance=ButtonAppearance::Subtle on_click=move |_| ctx.navigate(Page::Albaranes)>
                            {icon("chevron-right")}
                        </Button>
                    </Flex>
                    <table class="table__data table__data--compact">
                        <tbody>
                            {move || data.get().map(|d| {
                                d.estados
                                    .into_iter()
                                    .map(|e| view! {
                                        <tr>
                                            <td><EstadoBadge estado=e.estado.clone() /></td>
                                            <td class="table__cell--right">{e.count}</td>
                                            <td class="table__cell--right">{format_money(e.total)}</td>
                                        </tr>
                                    })
                                    .collect_view()
                            })}
                        </tbody>
                    </table>
                </Card>

                <Card class="dashboard-card">
                    <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                        <h3 class="dashboard-card__title">"Últimos movimientos"</h3>
                        <Button size=ButtonSize::Small appearance=ButtonAppearance::Subtle on_click=move |_| ctx.navigate(Page::Movimientos)>
                            {icon("chevron-right")}
                        </Button>
                    </Flex>
                    {move || match data.get() {
                        None => view! { <Flex justify=FlexJustify::Center><Spinner /></Flex> }.into_any(),
                        Some(d) if d.recientes.is_empty() => view! { <p class="table__empty">"Sin movimientos."</p> }.into_any(),
                        Some(d) => view! {
                            <table class="table__data table__data--compact">
                                <tbody>
                                    {d.recientes
                                        .into_iter()
                                        .map(|m| view! {
                                            <tr>
                                                <td>{m.fecha_date().map(|f| f.format("%d/%m/%Y").to_string()).unwrap_or_default()}</td>
                                                <td>{m.concepto.clone()}</td>
                                                <td><Badge variant=m.tipo.badge_variant()>{m.tipo.label()}</Badge></td>
                                                <td class="table__cell--right">{format_money(m.signed())}</td>
                                            </tr>
                                        })
                                        .collect_view()}
                                </tbody>
                            </table>
                        }
                        .into_any(),
                    }}
                </Card>
            </div>
        </PageFrame>
    }
}
