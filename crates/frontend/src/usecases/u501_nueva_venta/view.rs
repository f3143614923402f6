use super::api::create_albaran;
use crate::domain::a001_cliente::api::search_clientes;
use crate::domain::a003_producto::api::search_productos;
use crate::shared::app_config::config;
use crate::shared::date_utils::{now_ms, today};
use crate::shared::icons::icon;
use crate::shared::number_format::format_money;
use crate::shared::page_frame::{ErrorBox, PageFrame, PageHeader, SuccessBox, PAGE_CAT_USECASE};
use contracts::domain::a001_cliente::aggregate::Cliente;
use contracts::domain::a003_producto::aggregate::Producto;
use contracts::shared::debounce::Debouncer;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_nueva_venta::suggestions::MAX_SUGGESTIONS;
use contracts::usecases::u501_nueva_venta::{
    cliente_caption, rank_product_suggestions, NuevaVenta, NuevaVentaForm, NuevoCliente, SuggestionList,
};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use web_sys::KeyboardEvent;

const TOAST_MS: u32 = 4000;

type Getter = fn(&NuevoCliente) -> String;
type Setter = fn(&mut NuevoCliente, String);

/// Fields of the new-client block: label, required, getter, setter
const CLIENTE_FIELDS: [(&str, bool, Getter, Setter); 11] = [
    ("Nombre", true, |c| c.nombre.clone(), |c, v| c.nombre = v),
    ("Apellidos", true, |c| c.apellidos.clone(), |c, v| c.apellidos = v),
    ("DNI", true, |c| c.dni.clone(), |c, v| c.dni = v),
    ("Email", true, |c| c.email.clone(), |c, v| c.email = v),
    ("Teléfono 1", true, |c| c.telefono1.clone(), |c, v| c.telefono1 = v),
    ("Teléfono 2", false, |c| c.telefono2.clone().unwrap_or_default(), |c, v| c.telefono2 = Some(v)),
    ("Calle", true, |c| c.calle.clone(), |c, v| c.calle = v),
    ("Número", true, |c| c.numero_vivienda.clone(), |c, v| c.numero_vivienda = v),
    ("Piso / portal", false, |c| c.piso_portal.clone().unwrap_or_default(), |c, v| c.piso_portal = Some(v)),
    ("Ciudad", true, |c| c.ciudad.clone(), |c, v| c.ciudad = v),
    ("Código postal", true, |c| c.codigo_postal.clone(), |c, v| c.codigo_postal = v),
];

fn new_form() -> NuevaVentaForm {
    NuevaVentaForm::new(today().format("%Y-%m-%d").to_string(), config().sales.deposit_percent)
}

/// Feed `raw` to the debouncer and run `on_settle` once typing pauses
fn schedule(debouncer: StoredValue<Debouncer<String>>, raw: String, delay_ms: u32, on_settle: Callback<String>) {
    debouncer.update_value(|d| d.push(raw, now_ms()));
    spawn_local(async move {
        TimeoutFuture::new(delay_ms).await;
        if let Some(q) = debouncer.try_update_value(|d| d.poll(now_ms())).flatten() {
            on_settle.run(q);
        }
    });
}

/// Arrow keys move the cursor, Enter picks, Escape closes
fn handle_keys<T: Clone + Send + Sync + 'static>(
    ev: &KeyboardEvent,
    list: RwSignal<SuggestionList<T>>,
    pick: impl Fn(T),
) {
    match ev.key().as_str() {
        "ArrowDown" => {
            ev.prevent_default();
            list.update(|l| l.move_down());
        }
        "ArrowUp" => {
            ev.prevent_default();
            list.update(|l| l.move_up());
        }
        "Enter" => {
            if let Some(item) = list.with_untracked(|l| l.current()) {
                ev.prevent_default();
                pick(item);
            }
        }
        "Escape" => list.update(|l| l.close()),
        _ => {}
    }
}

fn item_class(active: bool) -> &'static str {
    if active {
        "suggestions__item suggestions__item--active"
    } else {
        "suggestions__item"
    }
}

#[component]
#[allow(non_snake_case)]
pub fn NuevaVentaView() -> impl IntoView {
    let delay = config().ui.suggest_debounce_ms;
    let form = RwSignal::new(new_form());
    let error = RwSignal::new(None::<String>);
    let toast = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let cliente_text = RwSignal::new(String::new());
    let cliente_list = RwSignal::new(SuggestionList::<Cliente>::default());
    let cliente_debounce = StoredValue::new(Debouncer::<String>::new(delay as u64));

    let producto_text = RwSignal::new(String::new());
    let producto_list = RwSignal::new(SuggestionList::<Producto>::default());
    let producto_debounce = StoredValue::new(Debouncer::<String>::new(delay as u64));

    // responses are applied in arrival order
    let search_cliente = Callback::new(move |q: String| {
        if q.trim().is_empty() {
            cliente_list.update(|l| l.close());
            return;
        }
        spawn_local(async move {
            match search_clientes(&q).await {
                Ok(found) => cliente_list.set(SuggestionList::with_items(
                    found.into_iter().take(MAX_SUGGESTIONS).collect(),
                )),
                Err(e) => log::warn!("buscar clientes '{}': {}", q, e),
            }
        });
    });
    let search_producto = Callback::new(move |q: String| {
        if q.trim().is_empty() {
            producto_list.update(|l| l.close());
            return;
        }
        spawn_local(async move {
            match search_productos(&q).await {
                Ok(found) => producto_list.set(SuggestionList::with_items(rank_product_suggestions(&found, &q))),
                Err(e) => log::warn!("buscar productos '{}': {}", q, e),
            }
        });
    });

    let pick_cliente = move |c: Cliente| {
        cliente_text.set(cliente_caption(&c));
        form.update(|f| f.cliente_existente = Some(c));
        cliente_list.update(|l| l.close());
    };
    let pick_producto = move |p: Producto| {
        form.update(|f| f.add_item(&p));
        producto_text.set(String::new());
        producto_list.update(|l| l.close());
    };

    let show_toast = move |msg: String| {
        toast.set(Some(msg));
        spawn_local(async move {
            TimeoutFuture::new(TOAST_MS).await;
            toast.set(None);
        });
    };

    let submit = move |_| {
        if saving.get_untracked() {
            return;
        }
        let request = match form.with_untracked(|f| f.to_request()) {
            Ok(r) => r,
            Err(e) => {
                error.set(Some(e.to_string()));
                return;
            }
        };
        error.set(None);
        saving.set(true);
        spawn_local(async move {
            match create_albaran(&request).await {
                Ok(id) => {
                    log::info!("{}: albarán creado {:?}", NuevaVenta::full_name(), id);
                    form.update(|f| f.reset(today().format("%Y-%m-%d").to_string()));
                    cliente_text.set(String::new());
                    producto_text.set(String::new());
                    show_toast(match id {
                        Some(id) => format!("Venta registrada: albarán #{}", id),
                        None => "Venta registrada".to_string(),
                    });
                }
                Err(e) => {
                    log::error!("{}: {}", NuevaVenta::full_name(), e);
                    error.set(Some(e.with_context("No se pudo registrar la venta")));
                }
            }
            saving.set(false);
        });
    };

    let total = Signal::derive(move || form.with(|f| f.total()));
    let fianza_defecto = Signal::derive(move || form.with(|f| f.fianza_por_defecto()));

    view! {
        <PageFrame page_id="u501_nueva_venta--form" category=PAGE_CAT_USECASE>
            <PageHeader
                title=NuevaVenta::display_name()
                subtitle=Signal::derive(|| NuevaVenta::description().to_string())
            />

            {move || error.get().map(|e| view! { <ErrorBox message=e /> })}
            {move || toast.get().map(|m| view! { <div class="toast"><SuccessBox message=m /></div> })}

            <Card class="venta-section">
                <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                    <h3>"Cliente"</h3>
                    <Flex gap=FlexGap::Small>
                        <label class="radio-inline">
                            <input
                                type="radio"
                                name="cliente-modo"
                                prop:checked=move || form.with(|f| f.usar_existente)
                                on:change=move |_| form.update(|f| f.usar_existente = true)
                            />
                            "Existente"
                        </label>
                        <label class="radio-inline">
                            <input
                                type="radio"
                                name="cliente-modo"
                                prop:checked=move || form.with(|f| !f.usar_existente)
                                on:change=move |_| form.update(|f| f.usar_existente = false)
                            />
                            "Nuevo"
                        </label>
                    </Flex>
                </Flex>

                <Show
                    when=move || form.with(|f| f.usar_existente)
                    fallback=move || view! {
                        <div class="form-grid">
                            {CLIENTE_FIELDS
                                .into_iter()
                                .map(|(label, required, get, set)| view! {
                                    <label class="form__label">
                                        {if required { format!("{} *", label) } else { label.to_string() }}
                                        <input
                                            type="text"
                                            class="form__input"
                                            prop:value=move || form.with(|f| get(&f.cliente_nuevo))
                                            on:input=move |ev| {
                                                let v = event_target_value(&ev);
                                                form.update(|f| set(&mut f.cliente_nuevo, v));
                                            }
                                        />
                                    </label>
                                })
                                .collect_view()}
                        </div>
                    }
                >
                    <div class="suggest">
                        <input
                            type="text"
                            class="form__input"
                            placeholder="Busca por nombre, DNI o email"
                            prop:value=move || cliente_text.get()
                            on:input=move |ev| {
                                let raw = event_target_value(&ev);
                                cliente_text.set(raw.clone());
                                form.update(|f| f.cliente_existente = None);
                                schedule(cliente_debounce, raw, delay, search_cliente);
                            }
                            on:keydown=move |ev: KeyboardEvent| handle_keys(&ev, cliente_list, pick_cliente)
                        />
                        <Show when=move || cliente_list.with(|l| l.is_open())>
                            <ul class="suggestions">
                                {move || {
                                    let list = cliente_list.get();
                                    list.items
                                        .into_iter()
                                        .enumerate()
                                        .map(|(i, c)| {
                                            let caption = cliente_caption(&c);
                                            let active = list.active == Some(i);
                                            view! {
                                                <li class=item_class(active) on:mousedown=move |_| pick_cliente(c.clone())>
                                                    {caption}
                                                </li>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </ul>
                        </Show>
                        {move || form.with(|f| f.cliente_existente.as_ref().map(|c| c.id)).map(|id| view! {
                            <span class="suggest__selected">{icon("check")}{format!(" Cliente #{}", id)}</span>
                        })}
                    </div>
                </Show>
            </Card>

            <Card class="venta-section">
                <h3>"Productos"</h3>
                <div class="suggest">
                    <input
                        type="text"
                        class="form__input"
                        placeholder="Añadir producto por nombre"
                        prop:value=move || producto_text.get()
                        on:input=move |ev| {
                            let raw = event_target_value(&ev);
                            producto_text.set(raw.clone());
                            schedule(producto_debounce, raw, delay, search_producto);
                        }
                        on:keydown=move |ev: KeyboardEvent| handle_keys(&ev, producto_list, pick_producto)
                    />
                    <Show when=move || producto_list.with(|l| l.is_open())>
                        <ul class="suggestions">
                            {move || {
                                let list = producto_list.get();
                                list.items
                                    .into_iter()
                                    .enumerate()
                                    .map(|(i, p)| {
                                        let active = list.active == Some(i);
                                        let caption = format!("{} · {}", p.nombre, format_money(p.precio));
                                        view! {
                                            <li class=item_class(active) on:mousedown=move |_| pick_producto(p.clone())>
                                                {caption}
                                            </li>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </ul>
                    </Show>
                </div>

                <table class="table__data">
                    <thead>
                        <tr>
                            <th>"Producto"</th>
                            <th class="table__cell--right">"Precio"</th>
                            <th class="table__cell--right">"Cantidad"</th>
                            <th class="table__cell--right">"Subtotal"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || form.with(|f| f.items.clone())
                            key=|l| (l.producto.id, l.cantidad)
                            children=move |line| {
                                let pid = line.producto.id;
                                view! {
                                    <tr>
                                        <td>{line.producto.nombre.clone()}</td>
                                        <td class="table__cell--right">{format_money(line.precio_unitario)}</td>
                                        <td class="table__cell--right">
                                            <input
                                                type="number"
                                                min="1"
                                                class="form__input form__input--tiny"
                                                prop:value=line.cantidad.to_string()
                                                on:change=move |ev| {
                                                    let raw = event_target_value(&ev);
                                                    form.update(|f| f.set_cantidad(pid, &raw));
                                                }
                                            />
                                        </td>
                                        <td class="table__cell--right">{format_money(line.subtotal())}</td>
                                        <td>
                                            <Button
                                                size=ButtonSize::Small
                                                appearance=ButtonAppearance::Subtle
                                                on_click=move |_| form.update(|f| f.remove_item(pid))
                                            >
                                                {icon("trash")}
                                            </Button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                    <tfoot>
                        <tr>
                            <td colspan="2">{move || format!("{} unidades", form.with(|f| f.unidades()))}</td>
                            <td class="table__cell--right">"Total"</td>
                            <td class="table__cell--right"><strong>{move || format_money(total.get())}</strong></td>
                            <td></td>
                        </tr>
                    </tfoot>
                </table>
                <Show when=move || form.with(|f| f.items.is_empty())>
                    <p class="table__empty">"Todavía no hay productos en la venta."</p>
                </Show>
            </Card>

            <Card class="venta-section">
                <h3>"Datos de la venta"</h3>
                <div class="form-grid">
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
                    <label class="form__label form__label--wide">
                        "Descripción"
                        <textarea
                            class="form__input"
                            rows="2"
                            prop:value=move || form.with(|f| f.descripcion.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                form.update(|f| f.descripcion = v);
                            }
                        ></textarea>
                    </label>
                </div>
                <label class="checkbox-list__item">
                    <input
                        type="checkbox"
                        prop:checked=move || form.with(|f| f.registrar_fianza)
                        on:change=move |ev| {
                            let on = event_target_checked(&ev);
                            form.update(|f| f.registrar_fianza = on);
                        }
                    />
                    {move || format!("Registrar fianza ({}% por defecto)", form.with(|f| f.deposit_percent))}
                </label>
                <Show when=move || form.with(|f| f.registrar_fianza)>
                    <Flex gap=FlexGap::Large align=FlexAlign::End>
                        <label class="form__label">
                            "Importe de la fianza (€)"
                            <input
                                type="number"
                                min="0"
                                step="0.01"
                                class="form__input form__input--short"
                                placeholder=move || format!("{:.2}", fianza_defecto.get())
                                prop:value=move || form.with(|f| f.fianza_cantidad.clone())
                                on:input=move |ev| {
                                    let v = event_target_value(&ev);
                                    form.update(|f| f.fianza_cantidad = v);
                                }
                            />
                        </label>
                        <span class="venta-fianza">
                            {move || format!("Se registrará: {}", format_money(form.with(|f| f.fianza_final())))}
                        </span>
                    </Flex>
                </Show>
            </Card>

            <Flex justify=FlexJustify::End gap=FlexGap::Small>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| {
                        form.set(new_form());
                        cliente_text.set(String::new());
                        producto_text.set(String::new());
                        error.set(None);
                    }
                >
                    "Limpiar"
                </Button>
                <Button appearance=ButtonAppearance::Primary on_click=submit disabled=saving>
                    {icon("check")}
                    {move || format!(" Registrar venta ({})", format_money(total.get()))}
                </Button>
            </Flex>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cliente_fields_cover_required_labels() {
        let required: Vec<&str> = CLIENTE_FIELDS
            .iter()
            .filter(|(_, req, _, _)| *req)
            .map(|(label, _, _, _)| *label)
            .collect();
        assert_eq!(required, NuevoCliente::default().missing_fields());
    }

    #[test]
    fn test_cliente_field_setters() {
        let mut c = NuevoCliente::default();
        for (label, _, _, set) in CLIENTE_FIELDS {
            set(&mut c, label.to_string());
        }
        assert_eq!(c.nombre, "Nombre");
        assert_eq!(c.telefono2.as_deref(), Some("Teléfono 2"));
        assert_eq!(CLIENTE_FIELDS[9].2(&c), "Ciudad");
    }

    #[test]
    fn test_item_class() {
        assert_eq!(item_class(true), "suggestions__item suggestions__item--active");
        assert_eq!(item_class(false), "suggestions__item");
    }
}
