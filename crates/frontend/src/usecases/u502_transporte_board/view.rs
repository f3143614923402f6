use crate::domain::a001_cliente::api::fetch_clientes;
use crate::domain::a006_transporte::api::{
    download_factura_ruta, facturar_almacen, fetch_almacen, fetch_rutas, liquidar_ruta, run_board_action,
};
use crate::shared::app_config::config;
use crate::shared::icons::icon;
use crate::shared::number_format::format_money;
use crate::shared::page_frame::{ErrorBox, PageFrame, PageHeader, SuccessBox, PAGE_CAT_USECASE};
use crate::shared::storage::{self, TRANSPORTE_CAMIONES, TRANSPORTE_OCULTOS};
use contracts::domain::a001_cliente::aggregate::{Cliente, ClienteIndex};
use contracts::domain::a004_albaran::aggregate::Albaran;
use contracts::domain::a006_transporte::aggregate::RutasResponse;
use contracts::domain::ids::{AlbaranId, CamionId};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u502_transporte_board::{
    build_lanes, can_remove_truck, resolve_drop, settlement_preview, BoardLane, DragPayload, Lane,
    TransporteBoard, TruckPrefs,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::{BTreeSet, HashSet};
use thaw::*;
use web_sys::DragEvent;

const DRAG_MIME: &str = "application/json";

fn load_prefs() -> TruckPrefs {
    let ids = |key: &str| -> BTreeSet<CamionId> {
        storage::load_json::<Vec<CamionId>>(key)
            .unwrap_or_default()
            .into_iter()
            .collect()
    };
    TruckPrefs {
        extra: ids(TRANSPORTE_CAMIONES),
        hidden: ids(TRANSPORTE_OCULTOS),
    }
}

fn save_prefs(prefs: &TruckPrefs) {
    let extra: Vec<CamionId> = prefs.extra.iter().copied().collect();
    let hidden: Vec<CamionId> = prefs.hidden.iter().copied().collect();
    storage::save_pref(TRANSPORTE_CAMIONES, &extra);
    storage::save_pref(TRANSPORTE_OCULTOS, &hidden);
}

fn lane_class(lane: Lane, hovered: bool) -> String {
    let kind = match lane {
        Lane::Almacen => "board-lane--almacen",
        Lane::Pendiente => "board-lane--pendiente",
        Lane::Camion(_) => "board-lane--camion",
    };
    if hovered {
        format!("board-lane {} board-lane--over", kind)
    } else {
        format!("board-lane {}", kind)
    }
}

/// Drag-and-drop board of warehouse orders, pending orders and trucks
#[component]
#[allow(non_snake_case)]
pub fn TransporteBoardView() -> impl IntoView {
    let almacen = RwSignal::new(Vec::<Albaran>::new());
    let rutas = RwSignal::new(RutasResponse::default());
    let clientes = RwSignal::new(Vec::<Cliente>::new());
    let prefs = RwSignal::new(load_prefs());
    let pending = RwSignal::new(0u8);
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let notice = RwSignal::new(None::<String>);
    let drag_over = RwSignal::new(None::<Lane>);
    let selected = RwSignal::new(HashSet::<AlbaranId>::new());

    Effect::new(move |_| prefs.with(save_prefs));

    let index = Memo::new(move |_| clientes.with(|c| ClienteIndex::new(c)));
    let lanes = Memo::new(move |_| {
        let p = prefs.get();
        almacen.with(|a| rutas.with(|r| build_lanes(a, r, &p)))
    });
    let fee_percent = config().transport.fee_percent;

    // no incremental patching: every action reloads all three lists
    let reload = move || {
        pending.set(3);
        spawn_local(async move {
            match fetch_almacen().await {
                Ok(list) => {
                    let ids: HashSet<AlbaranId> = list.iter().map(|a| a.id).collect();
                    selected.update(|s| s.retain(|id| ids.contains(id)));
                    almacen.set(list);
                }
                Err(e) => {
                    log::error!("transporte/almacen: {}", e);
                    error.set(Some(e.with_context("No se pudo cargar el almacén")));
                }
            }
            pending.update(|p| *p = p.saturating_sub(1));
        });
        spawn_local(async move {
            match fetch_rutas().await {
                Ok(r) => rutas.set(r),
                Err(e) => {
                    log::error!("transporte/rutas: {}", e);
                    error.set(Some(e.with_context("No se pudieron cargar las rutas")));
                }
            }
            pending.update(|p| *p = p.saturating_sub(1));
        });
        spawn_local(async move {
            match fetch_clientes().await {
                Ok(list) => clientes.set(list),
                Err(e) => log::warn!("clientes for board: {}", e),
            }
            pending.update(|p| *p = p.saturating_sub(1));
        });
    };
    reload();

    let loading = Signal::derive(move || pending.get() > 0);

    let handle_drop = move |dest: Lane, ev: DragEvent| {
        ev.prevent_default();
        drag_over.set(None);
        let raw = ev
            .data_transfer()
            .and_then(|dt| dt.get_data(DRAG_MIME).ok())
            .unwrap_or_default();
        let Some(payload) = DragPayload::from_json(&raw) else {
            log::warn!("drop without a readable payload: {:?}", raw);
            return;
        };
        let Some(action) = resolve_drop(&payload, dest) else {
            return;
        };
        log::debug!("board action: {}", action.describe());
        busy.set(true);
        error.set(None);
        notice.set(None);
        spawn_local(async move {
            match run_board_action(&action).await {
                Ok(()) => reload(),
                Err(e) => {
                    log::error!("{}: {}", action.describe(), e);
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    let aceptar_ruta = move |camion_id: CamionId| {
        busy.set(true);
        error.set(None);
        notice.set(None);
        spawn_local(async move {
            match liquidar_ruta(camion_id).await {
                Ok(liq) => {
                    notice.set(Some(format!(
                        "Ruta del camión {} liquidada: {} albaranes, base {}, transporte {} ({}%).",
                        liq.camion_id,
                        liq.n_albaranes,
                        format_money(liq.base_total),
                        format_money(liq.importe),
                        liq.porcentaje
                    )));
                    if let Err(e) = download_factura_ruta(camion_id).await {
                        log::error!("factura camion {}: {}", camion_id, e);
                        error.set(Some(e.with_context("La ruta se liquidó pero no se pudo descargar la factura")));
                    }
                    reload();
                }
                Err(e) => {
                    log::error!("liquidar camion {}: {}", camion_id, e);
                    error.set(Some(e.with_context(&format!("No se pudo liquidar el camión {}", camion_id))));
                }
            }
            busy.set(false);
        });
    };

    let add_truck = move |_| {
        let server: Vec<CamionId> = rutas.with_untracked(|r| r.camiones.iter().map(|c| c.camion_id).collect());
        prefs.update(|p| {
            let id = p.add_truck(&server);
            log::info!("camión {} añadido", id);
        });
    };
    let hide_truck = move |id: CamionId| prefs.update(|p| p.hide(id));

    let facturar = move |_| {
        let ids: Vec<AlbaranId> = selected.with_untracked(|s| {
            let mut v: Vec<AlbaranId> = s.iter().copied().collect();
            v.sort();
            v
        });
        if ids.is_empty() {
            return;
        }
        busy.set(true);
        error.set(None);
        notice.set(None);
        spawn_local(async move {
            match facturar_almacen(ids).await {
                Ok(f) => {
                    notice.set(Some(format!(
                        "Factura de transporte generada: {} pedidos, {}. Archivo: {}",
                        f.n_pedidos,
                        format_money(f.importe),
                        f.path
                    )));
                    selected.update(|s| s.clear());
                }
                Err(e) => {
                    log::error!("transporte/factura: {}", e);
                    error.set(Some(e.with_context("No se pudo generar la factura de transporte")));
                }
            }
            busy.set(false);
        });
    };

    let albaran_card = move |a: Albaran, origin: Lane| {
        let id = a.id;
        let cliente_id = a.cliente_id;
        let selectable = origin == Lane::Almacen;
        let on_dragstart = move |ev: DragEvent| {
            let payload = DragPayload { albaran_id: id, origin };
            match (payload.to_json(), ev.data_transfer()) {
                (Ok(json), Some(dt)) => {
                    if dt.set_data(DRAG_MIME, &json).is_err() {
                        log::warn!("could not set drag data for albaran {}", id);
                    }
                    dt.set_effect_allowed("move");
                }
                (Err(e), _) => log::error!("drag payload: {}", e),
                (_, None) => log::warn!("dragstart without dataTransfer"),
            }
        };
        view! {
            <div class="board-card" draggable="true" on:dragstart=on_dragstart>
                <div class="board-card__header">
                    {selectable.then(|| view! {
                        <input
                            type="checkbox"
                            class="board-card__check"
                            prop:checked=move || selected.with(|s| s.contains(&id))
                            on:change=move |ev| {
                                let on = event_target_checked(&ev);
                                selected.update(|s| {
                                    if on {
                                        s.insert(id);
                                    } else {
                                        s.remove(&id);
                                    }
                                });
                            }
                        />
                    })}
                    <span class="board-card__id">{format!("#{}", id)}</span>
                    <span class="board-card__total">{format_money(a.total)}</span>
                </div>
                <div class="board-card__client">{move || index.with(|idx| idx.display_name(cliente_id))}</div>
                <div class="board-card__date">{a.fecha_display()}</div>
            </div>
        }
    };

    let lane_view = move |bl: BoardLane| {
        let lane = bl.lane;
        let total = bl.total();
        let count = bl.albaranes.len();
        let removable = can_remove_truck(&bl);
        let header_actions = match lane {
            Lane::Camion(camion_id) => Some(view! {
                <div class="board-lane__actions">
                    <span class="board-lane__fee">
                        {format!("Transporte {}%: {}", fee_percent, format_money(settlement_preview(total, fee_percent)))}
                    </span>
                    <Flex gap=FlexGap::Small>
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Primary
                            disabled=Signal::derive(move || busy.get() || count == 0)
                            on_click=move |_| aceptar_ruta(camion_id)
                        >
                            {icon("check")}
                            " Aceptar ruta"
                        </Button>
                        {removable.then(|| view! {
                            <Button
                                size=ButtonSize::Small
                                appearance=ButtonAppearance::Subtle
                                on_click=move |_| hide_truck(camion_id)
                            >
                                {icon("trash")}
                                " Quitar"
                            </Button>
                        })}
                    </Flex>
                </div>
            }),
            _ => None,
        };
        view! {
            <section
                class=move || lane_class(lane, drag_over.get() == Some(lane))
                on:dragover=move |ev: DragEvent| {
                    ev.prevent_default();
                    if drag_over.get_untracked() != Some(lane) {
                        drag_over.set(Some(lane));
                    }
                }
                on:dragleave=move |_| {
                    if drag_over.get_untracked() == Some(lane) {
                        drag_over.set(None);
                    }
                }
                on:drop=move |ev: DragEvent| handle_drop(lane, ev)
            >
                <header class="board-lane__header">
                    <h3 class="board-lane__title">{lane.title()}</h3>
                    <span class="board-lane__summary">{format!("{} albaranes · {}", count, format_money(total))}</span>
                    {header_actions}
                </header>
                <div class="board-lane__body">
                    {if bl.albaranes.is_empty() {
                        view! { <p class="board-lane__empty">"Arrastra albaranes aquí"</p> }.into_any()
                    } else {
                        bl.albaranes
                            .into_iter()
                            .map(|a| albaran_card(a, lane))
                            .collect_view()
                            .into_any()
                    }}
                </div>
            </section>
        }
    };

    let selected_count = Signal::derive(move || selected.with(|s| s.len()));

    view! {
        <PageFrame page_id="u502_transporte_board--board" category=PAGE_CAT_USECASE>
            <PageHeader
                title=TransporteBoard::display_name()
                subtitle=Signal::derive(|| TransporteBoard::description().to_string())
                actions=move || view! {
                    <Flex gap=FlexGap::Small>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=facturar
                            disabled=Signal::derive(move || busy.get() || selected_count.get() == 0)
                        >
                            {icon("download")}
                            {move || format!(" Facturar selección ({})", selected_count.get())}
                        </Button>
                        <Button appearance=ButtonAppearance::Secondary on_click=add_truck>
                            {icon("plus")}
                            " Añadir camión"
                        </Button>
                        <Button appearance=ButtonAppearance::Secondary on_click=move |_| reload() disabled=loading>
                            {icon("refresh")}
                            " Actualizar"
                        </Button>
                    </Flex>
                }
            />

            {move || error.get().map(|e| view! { <ErrorBox message=e /> })}
            {move || notice.get().map(|m| view! { <SuccessBox message=m /> })}

            <Show when=move || loading.get() || busy.get()>
                <Flex justify=FlexJustify::Center><Spinner /></Flex>
            </Show>

            <div class="board">
                {move || lanes.get().into_iter().map(lane_view).collect_view()}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_class() {
        assert_eq!(lane_class(Lane::Almacen, false), "board-lane board-lane--almacen");
        assert_eq!(
            lane_class(Lane::Camion(CamionId(2)), true),
            "board-lane board-lane--camion board-lane--over"
        );
    }
}
