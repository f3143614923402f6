//! Albarán detail modal: header, client card, lines and the next-estado action.

use crate::domain::a001_cliente::api::fetch_cliente;
use crate::domain::a004_albaran::api::{fetch_albaran, patch_estado};
use crate::layout::global_context::use_app_context;
use crate::layout::pages::Page;
use crate::shared::components::ui::EstadoBadge;
use crate::shared::icons::icon;
use crate::shared::modal_stack::{ModalHandle, ModalStackService};
use crate::shared::number_format::format_money;
use crate::shared::page_frame::ErrorBox;
use crate::shared::storage::{self, CLIENTE_OPEN_ID};
use contracts::domain::a001_cliente::aggregate::Cliente;
use contracts::domain::a004_albaran::aggregate::Albaran;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// `on_updated` receives the albarán returned by an estado change
pub fn open_albaran_details(modal_stack: ModalStackService, albaran: Albaran, on_updated: Callback<Albaran>) {
    modal_stack.push(Some("width: min(860px, 95vw);".to_string()), move |handle| {
        view! { <AlbaranDetails albaran=albaran.clone() handle=handle on_updated=on_updated /> }.into_any()
    });
}

#[component]
fn AlbaranDetails(albaran: Albaran, handle: ModalHandle, on_updated: Callback<Albaran>) -> impl IntoView {
    let ctx = use_app_context();
    let id = albaran.id;
    let cliente_id = albaran.cliente_id;

    let detail = RwSignal::new(None::<Albaran>);
    let cliente = RwSignal::new(None::<Cliente>);
    let albaran_failed = RwSignal::new(None::<String>);
    let cliente_failed = RwSignal::new(None::<String>);
    let action_error = RwSignal::new(None::<String>);
    let updating = RwSignal::new(false);
    let fallback = StoredValue::new(albaran);

    spawn_local(async move {
        match fetch_albaran(id).await {
            Ok(a) => detail.set(Some(a)),
            Err(e) => {
                log::warn!("albaran {} detail: {}", id, e);
                albaran_failed.set(Some(e.to_string()));
            }
        }
    });
    spawn_local(async move {
        match fetch_cliente(cliente_id).await {
            Ok(c) => cliente.set(Some(c)),
            Err(e) => {
                log::warn!("cliente {} for albaran {}: {}", cliente_id, id, e);
                cliente_failed.set(Some(e.to_string()));
            }
        }
    });

    // one failed request still leaves something to show
    let both_failed = move || albaran_failed.with(|a| a.is_some()) && cliente_failed.with(|c| c.is_some());
    let shown = move || detail.get().unwrap_or_else(|| fallback.get_value());

    let advance = move |_| {
        let Some(next) = shown().estado.next() else {
            return;
        };
        updating.set(true);
        action_error.set(None);
        spawn_local(async move {
            match patch_estado(id, next).await {
                Ok(updated) => {
                    let mut merged = updated.clone();
                    // the PATCH response carries no lines
                    if merged.lineas.is_empty() {
                        if let Some(d) = detail.get_untracked() {
                            merged.lineas = d.lineas;
                        }
                    }
                    detail.set(Some(merged));
                    on_updated.run(updated);
                }
                Err(e) => {
                    log::error!("estado albaran {}: {}", id, e);
                    action_error.set(Some(e.with_context("No se pudo cambiar el estado")));
                }
            }
            updating.set(false);
        });
    };

    let ver_cliente = move |_| {
        storage::put_handoff(CLIENTE_OPEN_ID, cliente_id.value());
        handle.close();
        ctx.navigate(Page::Clientes);
    };

    view! {
        <div class="details-container">
            <div class="modal-header">
                <h2 class="modal-title">{format!("Albarán #{}", id)}</h2>
                <Button appearance=ButtonAppearance::Subtle on_click=move |_| handle.close()>
                    {icon("x")}
                </Button>
            </div>

            <Show
                when=move || !both_failed()
                fallback=move || view! { <ErrorBox message="No se pudo cargar el albarán ni el cliente.".to_string() /> }
            >
                {move || action_error.get().map(|e| view! { <ErrorBox message=e /> })}
                {move || {
                    let a = shown();
                    let next = a.estado.next();
                    view! {
                        <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                            <dl class="details-grid">
                                <dt>"Fecha"</dt><dd>{a.fecha_display()}</dd>
                                <dt>"Estado"</dt><dd><EstadoBadge estado=a.estado.clone() /></dd>
                                <dt>"Total"</dt><dd>{format_money(a.total)}</dd>
                                <dt>"Descripción"</dt><dd>{if a.descripcion.is_empty() { "—".to_string() } else { a.descripcion.clone() }}</dd>
                            </dl>
                            {next.map(|n| view! {
                                <Button appearance=ButtonAppearance::Primary on_click=advance disabled=updating>
                                    {n.action_label()}
                                </Button>
                            })}
                        </Flex>
                    }
                }}

                <section class="details-section">
                    <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                        <h3>"Cliente"</h3>
                        <Button size=ButtonSize::Small appearance=ButtonAppearance::Secondary on_click=ver_cliente>
                            {icon("eye")}
                            " Ver cliente"
                        </Button>
                    </Flex>
                    {move || match (cliente.get(), cliente_failed.get()) {
                        (Some(c), _) => view! {
                            <dl class="details-grid">
                                <dt>"Nombre"</dt><dd>{c.nombre_completo()}</dd>
                                <dt>"Email"</dt><dd>{c.email.clone()}</dd>
                                <dt>"Teléfonos"</dt><dd>{c.telefonos()}</dd>
                                <dt>"Dirección"</dt><dd>{c.direccion()}</dd>
                            </dl>
                        }
                        .into_any(),
                        (None, Some(_)) => view! { <p class="text-muted">{format!("Cliente #{} no disponible.", cliente_id)}</p> }.into_any(),
                        (None, None) => view! { <Spinner /> }.into_any(),
                    }}
                </section>

                <section class="details-section">
                    <h3>"Líneas"</h3>
                    {move || match (detail.get(), albaran_failed.get()) {
                        (Some(a), _) if a.lineas.is_empty() => view! { <p class="text-muted">"Sin líneas."</p> }.into_any(),
                        (Some(a), _) => {
                            let suma = a.lineas_total();
                            view! {
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
                                        {a.lineas
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
                                    <tfoot>
                                        <tr>
                                            <td colspan="3">"Suma de líneas"</td>
                                            <td class="table__cell--right">{format_money(suma)}</td>
                                        </tr>
                                    </tfoot>
                                </table>
                            }
                            .into_any()
                        }
                        (None, Some(msg)) => view! { <p class="text-error">{format!("Líneas no disponibles: {}", msg)}</p> }.into_any(),
                        (None, None) => view! { <Spinner /> }.into_any(),
                    }}
                </section>
            </Show>
        </div>
    }
}
