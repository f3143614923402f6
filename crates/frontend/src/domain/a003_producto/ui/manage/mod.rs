use super::ProductosState;
use crate::domain::a003_producto::api::{create_producto, delete_producto, update_producto};
use crate::shared::icons::icon;
use crate::shared::modal_stack::{ModalHandle, ModalStackService};
use crate::shared::number_format::format_money;
use crate::shared::page_frame::{ErrorBox, SuccessBox};
use contracts::domain::a002_proveedor::aggregate::ProveedorIndex;
use contracts::domain::a003_producto::aggregate::{Producto, ProductoForm, ProductoFormErrors};
use contracts::domain::a003_producto::filter::{gestion_list, ProductoRow};
use contracts::domain::ids::ProductoId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

fn select_class(invalid: bool) -> &'static str {
    if invalid {
        "form__select form__select--invalid"
    } else {
        "form__select"
    }
}

/// Management tab: create, edit and delete products
#[component]
#[allow(non_snake_case)]
pub fn ProductoGestion(state: ProductosState) -> impl IntoView {
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let search = RwSignal::new(String::new());
    let editing = RwSignal::new(None::<ProductoId>);
    let form = RwSignal::new(ProductoForm::default());
    let errors = RwSignal::new(ProductoFormErrors::default());
    let banner_error = RwSignal::new(None::<String>);
    let banner_ok = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let index = Memo::new(move |_| state.proveedores.with(|p| ProveedorIndex::new(p)));
    let list = Memo::new(move |_| {
        let idx = index.get();
        let q = search.get();
        state.productos.with(|p| gestion_list(&ProductoRow::join(p, &idx), &q))
    });

    let reset_form = move || {
        editing.set(None);
        form.set(ProductoForm::default());
        errors.set(ProductoFormErrors::default());
    };

    let select = move |p: &Producto| {
        editing.set(Some(p.id));
        form.set(ProductoForm::from_producto(p));
        errors.set(ProductoFormErrors::default());
        banner_error.set(None);
        banner_ok.set(None);
    };

    let save = move || {
        if saving.get_untracked() {
            return;
        }
        banner_error.set(None);
        banner_ok.set(None);
        let dto = match form.with_untracked(|f| f.validate()) {
            Ok(dto) => {
                errors.set(ProductoFormErrors::default());
                dto
            }
            Err(e) => {
                banner_error.set(Some(e.summary()));
                errors.set(e);
                return;
            }
        };
        let target = editing.get_untracked();
        saving.set(true);
        spawn_local(async move {
            let result = match target {
                Some(id) => update_producto(id, &dto).await,
                None => create_producto(&dto).await,
            };
            match result {
                Ok(saved) => {
                    let nombre = saved.nombre.clone();
                    if target.is_some() {
                        state.productos.update(|list| {
                            if let Some(slot) = list.iter_mut().find(|p| p.id == saved.id) {
                                *slot = saved;
                            }
                        });
                        banner_ok.set(Some(format!("Producto \"{}\" actualizado.", nombre)));
                    } else {
                        state.productos.update(|list| list.insert(0, saved));
                        banner_ok.set(Some(format!("Producto \"{}\" creado.", nombre)));
                    }
                    reset_form();
                }
                Err(e) => {
                    log::error!("guardar producto: {}", e);
                    banner_error.set(Some(e.with_context("No se pudo guardar el producto")));
                }
            }
            saving.set(false);
        });
    };

    let confirm_delete = move |p: Producto| {
        let id = p.id;
        let nombre = p.nombre.clone();
        modal_stack.push(Some("max-width: 420px;".to_string()), move |handle: ModalHandle| {
            let nombre = nombre.clone();
            let on_confirm = move |_| {
                handle.close();
                spawn_local(async move {
                    match delete_producto(id).await {
                        Ok(()) => {
                            state.productos.update(|list| list.retain(|p| p.id != id));
                            if editing.get_untracked() == Some(id) {
                                reset_form();
                            }
                            banner_ok.set(Some("Producto eliminado.".to_string()));
                        }
                        Err(e) => {
                            log::error!("eliminar producto {}: {}", id, e);
                            banner_error.set(Some(e.with_context("No se pudo eliminar el producto")));
                        }
                    }
                });
            };
            view! {
                <div class="confirm-dialog">
                    <h3 class="confirm-dialog__title">"Eliminar producto"</h3>
                    <p>{format!("¿Eliminar \"{}\"? Esta acción no se puede deshacer.", nombre)}</p>
                    <Flex justify=FlexJustify::End gap=FlexGap::Small>
                        <Button appearance=ButtonAppearance::Secondary on_click=move |_| handle.close()>
                            "Cancelar"
                        </Button>
                        <Button appearance=ButtonAppearance::Primary on_click=on_confirm>
                            {icon("trash")}
                            " Eliminar"
                        </Button>
                    </Flex>
                </div>
            }
            .into_any()
        });
    };

    let nombre = RwSignal::new(String::new());
    let precio = RwSignal::new(String::new());
    let descripcion = RwSignal::new(String::new());
    // the thaw inputs write into these; the form struct follows them
    Effect::new(move |_| {
        form.with(|f| {
            if nombre.get_untracked() != f.nombre {
                nombre.set(f.nombre.clone());
            }
            if precio.get_untracked() != f.precio {
                precio.set(f.precio.clone());
            }
            if descripcion.get_untracked() != f.descripcion {
                descripcion.set(f.descripcion.clone());
            }
        });
    });
    Effect::new(move |_| {
        let (n, p, d) = (nombre.get(), precio.get(), descripcion.get());
        if form.with_untracked(|f| f.nombre != n || f.precio != p || f.descripcion != d) {
            form.update(|f| {
                f.nombre = n;
                f.precio = p;
                f.descripcion = d;
            });
        }
    });

    view! {
        <div class="gestion-layout">
            <Card class="gestion-form">
                <h3 class="gestion-form__title">
                    {move || if editing.get().is_some() { "Editar producto" } else { "Nuevo producto" }}
                </h3>
                {move || banner_error.get().map(|e| view! { <ErrorBox message=e /> })}
                {move || banner_ok.get().map(|m| view! { <SuccessBox message=m /> })}

                <label class="form__label">
                    "Nombre *"
                    <div class=move || if errors.with(|e| e.nombre) { "form__field form__field--invalid" } else { "form__field" }>
                        <Input value=nombre placeholder="Nombre del producto" />
                    </div>
                </label>
                <label class="form__label">
                    "Precio (€) *"
                    <div class=move || if errors.with(|e| e.precio) { "form__field form__field--invalid" } else { "form__field" }>
                        <Input value=precio input_type=InputType::Number placeholder="0.00" />
                    </div>
                </label>
                <label class="form__label">
                    "Proveedor *"
                    <select
                        class=move || select_class(errors.with(|e| e.proveedor))
                        prop:value=move || form.with(|f| f.proveedor.clone())
                        on:change=move |ev| {
                            let v = event_target_value(&ev);
                            form.update(|f| f.proveedor = v);
                        }
                    >
                        <option value="">"Selecciona un proveedor"</option>
                        {move || {
                            state
                                .proveedores
                                .get()
                                .into_iter()
                                .map(|p| view! { <option value=p.id.to_string()>{p.nombre}</option> })
                                .collect_view()
                        }}
                    </select>
                </label>
                <label class="form__label">
                    "Descripción"
                    <textarea
                        class="form__input"
                        rows="3"
                        prop:value=move || descripcion.get()
                        on:input=move |ev| descripcion.set(event_target_value(&ev))
                    ></textarea>
                </label>

                <Flex gap=FlexGap::Small>
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| save() disabled=saving>
                        {icon("check")}
                        {move || if editing.get().is_some() { " Guardar cambios" } else { " Crear producto" }}
                    </Button>
                    <Show when=move || editing.get().is_some()>
                        <Button appearance=ButtonAppearance::Secondary on_click=move |_| reset_form()>
                            "Cancelar edición"
                        </Button>
                    </Show>
                </Flex>
            </Card>

            <div class="gestion-list">
                <Input value=search placeholder="Buscar producto" />
                <table class="table__data">
                    <thead>
                        <tr>
                            <th>"Nombre"</th>
                            <th>"Proveedor"</th>
                            <th class="table__cell--right">"Precio"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || list.get()
                            key=|r| (r.producto.id, r.producto.nombre.clone(), r.producto.precio.to_bits(), r.proveedor.clone())
                            children=move |r: ProductoRow| {
                                let p = r.producto.clone();
                                let for_edit = p.clone();
                                let for_delete = p.clone();
                                let id = p.id;
                                view! {
                                    <tr class=move || {
                                        if editing.get() == Some(id) { "table__row table__row--selected" } else { "table__row" }
                                    }>
                                        <td>{p.nombre.clone()}</td>
                                        <td>{r.proveedor.clone()}</td>
                                        <td class="table__cell--right">{format_money(p.precio)}</td>
                                        <td class="table__cell--actions">
                                            <Button
                                                appearance=ButtonAppearance::Subtle
                                                size=ButtonSize::Small
                                                on_click=move |_| select(&for_edit)
                                            >
                                                {icon("edit")}
                                            </Button>
                                            <Button
                                                appearance=ButtonAppearance::Subtle
                                                size=ButtonSize::Small
                                                on_click=move |_| confirm_delete(for_delete.clone())
                                            >
                                                {icon("trash")}
                                            </Button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || list.with(|l| l.is_empty())>
                    <p class="table__empty">"Sin productos."</p>
                </Show>
            </div>
        </div>
    }
}
