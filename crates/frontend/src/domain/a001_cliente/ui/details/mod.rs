//! Client detail modal: contact data and the client's albaranes with
//! lazily loaded lines.

use crate::domain::a001_cliente::api::fetch_cliente;
use crate::domain::a004_albaran::api::{fetch_albaran, fetch_by_cliente};
use crate::layout::global_context::use_app_context;
use crate::layout::pages::Page;
use crate::shared::components::ui::EstadoBadge;
use crate::shared::icons::icon;
use crate::shared::modal_stack::{ModalHandle, ModalStackService};
use crate::shared::number_format::format_money;
use crate::shared::page_frame::ErrorBox;
use crate::shared::storage::{self, ALBARAN_OPEN_ID};
use contracts::domain::a001_cliente::aggregate::Cliente;
use contracts::domain::a004_albaran::aggregate::{Albaran, LineaAlbaran};
use contracts::domain::ids::AlbaranId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashMap;
use thaw::*;

/// Lines of one expanded albarán
#[derive(Clone, Debug, PartialEq)]
enum LineasState {
    Loading,
    Loaded(Vec<LineaAlbaran>),
    Failed(String),
}

pub fn open_cliente_details(modal_stack: ModalStackService, cliente: Cliente) {
    modal_stack.push(Some("width: min(960px, 95vw);".to_string()), move |handle| {
        view! { <ClienteDetails cliente=cliente.clone() handle=handle /> }.into_any()
    });
}

#[component]
fn ClienteDetails(cliente: Cliente, handle: ModalHandle) -> impl IntoView {
    let ctx = use_app_context();
    let id = cliente.id;
    let current = RwSignal::new(cliente);
    let tab = RwSignal::new("info".to_string());

    let albaranes = RwSignal::new(None::<Vec<Albaran>>);
    let albaranes_error = RwSignal::new(None::<String>);
    let expanded = RwSignal::new(HashMap::<AlbaranId, LineasState>::new());

    // the row is already shown; the fresh copy replaces it when it arrives
    spawn_local(async move {
        match fetch_cliente(id).await {
            Ok(c) => current.set(c),
            Err(e) => log::warn!("cliente {} detail: {}, keeping list row", id, e),
        }
    });

    Effect::new(move |_| {
        if tab.get() == "albaranes" && albaranes.get_untracked().is_none() {
            spawn_local(async move {
                match fetch_by_cliente(id).await {
                    Ok(list) => albaranes.set(Some(list)),
                    Err(e) => {
                        albaranes_error.set(Some(e.with_context("No se pudieron cargar los albaranes")));
                        albaranes.set(Some(Vec::new()));
                    }
                }
            });
        }
    });

    let toggle_lineas = move |albaran_id: AlbaranId| {
        if expanded.with_untracked(|m| m.contains_key(&albaran_id)) {
            expanded.update(|m| {
                m.remove(&albaran_id);
            });
            return;
        }
        expanded.update(|m| {
            m.insert(albaran_id, LineasState::Loading);
        });
        spawn_local(async move {
            let state = match fetch_albaran(albaran_id).await {
                Ok(a) => LineasState::Loaded(a.lineas),
                Err(e) => LineasState::Failed(e.to_string()),
            };
            expanded.update(|m| {
                // collapsed while loading: keep it collapsed
                if let Some(slot) = m.get_mut(&albaran_id) {
                    *slot = state;
                }
            });
        });
    };

    let open_albaran = move |albaran_id: AlbaranId| {
        storage::put_handoff(ALBARAN_OPEN_ID, albaran_id.value());
        handle.close();
        ctx.navigate(Page::Albaranes);
    };

    view! {
        <div class="details-container">
            <div class="modal-header">
                <h2 class="modal-title">{move || current.with(|c| c.display_name())}</h2>
                <Button appearance=ButtonAppearance::Subtle on_click=move |_| handle.close()>
                    {icon("x")}
                </Button>
            </div>

            <TabList selected_value=tab>
                <Tab value="info">"Info"</Tab>
                <Tab value="albaranes">"Albaranes"</Tab>
            </TabList>

            <div class="tab-content">
                {move || {
                    if tab.get() == "info" {
                        let c = current.get();
                        view! {
                            <dl class="details-grid">
                                <dt>"ID"</dt><dd>{c.id.value()}</dd>
                                <dt>"Nombre"</dt><dd>{c.nombre_completo()}</dd>
                                <dt>"DNI"</dt><dd>{c.dni.clone()}</dd>
                                <dt>"Email"</dt><dd>{c.email.clone()}</dd>
                                <dt>"Teléfonos"</dt><dd>{c.telefonos()}</dd>
                                <dt>"Dirección"</dt><dd>{c.direccion()}</dd>
                            </dl>
                        }
                        .into_any()
                    } else {
                        view! {
                            {move || albaranes_error.get().map(|e| view! { <ErrorBox message=e /> })}
                            {move || match albaranes.get() {
                                None => view! { <Flex justify=FlexJustify::Center><Spinner /></Flex> }.into_any(),
                                Some(list) if list.is_empty() => {
                                    view! { <p class="table__empty">"Este cliente no tiene albaranes."</p> }.into_any()
                                }
                                Some(list) => view! {
                                    <table class="table__data">
                                        <thead>
                                            <tr>
                                                <th></th>
                                                <th>"Nº"</th>
                                                <th>"Fecha"</th>
                                                <th>"Estado"</th>
                                                <th class="table__cell--right">"Total"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {list
                                                .into_iter()
                                                .map(|a| {
                                                    let aid = a.id;
                                                    view! {
                                                        <tr>
                                                            <td>
                                                                <button class="button button--icon" on:click=move |_| toggle_lineas(aid)>
                                                                    {move || if expanded.with(|m| m.contains_key(&aid)) { icon("chevron-down") } else { icon("chevron-right") }}
                                                                </button>
                                                            </td>
                                                            <td>{format!("#{}", aid)}</td>
                                                            <td>{a.fecha_display()}</td>
                                                            <td><EstadoBadge estado=a.estado.clone() /></td>
                                                            <td class="table__cell--right">{format_money(a.total)}</td>
                                                            <td>
                                                                <Button size=ButtonSize::Small appearance=ButtonAppearance::Secondary on_click=move |_| open_albaran(aid)>
                                                                    "Abrir"
                                                                </Button>
                                                            </td>
                                                        </tr>
                                                        {move || expanded.with(|m| m.get(&aid).cloned()).map(|state| {
                                                            view! {
                                                                <tr class="table__row--nested">
                                                                    <td colspan="6">{lineas_view(state)}</td>
                                                                </tr>
                                                            }
                                                        })}
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                }
                                .into_any(),
                            }}
                        }
                        .into_any()
                    }
                }}
            </div>
        </div>
    }
}

fn lineas_view(state: LineasState) -> AnyView {
    match state {
        LineasState::Loading => view! { <Spinner /> }.into_any(),
        LineasState::Failed(msg) => view! { <span class="text-error">{format!("Error al cargar líneas: {}", msg)}</span> }.into_any(),
        LineasState::Loaded(lineas) if lineas.is_empty() => view! { <span class="text-muted">"Sin líneas."</span> }.into_any(),
        LineasState::Loaded(lineas) => view! {
            <table class="table__data table__data--compact">
                <thead>
                    <tr>
                        <th>"Producto"</th>
                        <th class="table__cell--right">"Cantidad"</th>
                        <th class="table__cell--right">"Precio"</th>
                        <th class="table__cell--right">"Subtotal"</th>
                    </tr>
                </thead>
                <tbody>
                    {lineas
                        .into_iter()
                        .map(|l| view! {
                            <tr>
                                <td>{format!("Producto #{}", l.producto_id)}</td>
                                <td class="table__cell--right">{l.cantidad}</td>
                                <td class="table__cell--right">{format_money(l.precio_unitario)}</td>
                                <td class="table__cell--right">{format_money(l.subtotal())}</td>
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any(),
    }
}
