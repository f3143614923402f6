use super::ProductosState;
use crate::shared::app_config::config;
use crate::shared::components::filter_panel::{FilterChips, FilterPanel};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::search_input::SearchInput;
use crate::shared::number_format::format_money;
use crate::shared::storage::{self, PRODUCTOS_GROUP_MODE, PRODUCTOS_PAGE_SIZE};
use contracts::domain::a002_proveedor::aggregate::ProveedorIndex;
use contracts::domain::a003_producto::filter::{group_by_proveedor, ProductoFilter, ProductoRow, ProductoSort};
use contracts::domain::ids::ProveedorId;
use contracts::shared::list_query::Pagination;
use leptos::prelude::*;
use std::collections::HashSet;
use thaw::*;

const GROUP_ALL: &str = "all";
const GROUP_PROVEEDOR: &str = "proveedor";

fn parse_price(raw: &str) -> Option<f64> {
    let raw = raw.trim().replace(',', ".");
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn producto_card(row: ProductoRow) -> impl IntoView {
    let p = row.producto;
    let descripcion = if p.descripcion.trim().is_empty() {
        "Sin descripción".to_string()
    } else {
        p.descripcion.clone()
    };
    view! {
        <div class="product-card">
            <div class="product-card__header">
                <span class="product-card__name">{p.nombre.clone()}</span>
                <span class="product-card__price">{format_money(p.precio)}</span>
            </div>
            <p class="product-card__desc">{descripcion}</p>
            <span class="product-card__supplier">{row.proveedor}</span>
        </div>
    }
}

/// Catalogue tab: filters, chips and either a paged grid or supplier groups
#[component]
#[allow(non_snake_case)]
pub fn ProductoListado(state: ProductosState) -> impl IntoView {
    let filter = RwSignal::new(ProductoFilter::default());
    let query = RwSignal::new(String::new());
    let filters_open = RwSignal::new(true);
    let precio_min = RwSignal::new(String::new());
    let precio_max = RwSignal::new(String::new());

    let group_mode = RwSignal::new(
        storage::load_json::<String>(PRODUCTOS_GROUP_MODE)
            .filter(|m| m == GROUP_ALL || m == GROUP_PROVEEDOR)
            .unwrap_or_else(|| GROUP_ALL.to_string()),
    );
    Effect::new(move |_| storage::save_pref(PRODUCTOS_GROUP_MODE, &group_mode.get()));

    let stored_size = storage::load_json::<usize>(PRODUCTOS_PAGE_SIZE)
        .filter(|s| *s > 0)
        .unwrap_or(config().ui.products_page_size);
    let pagination = RwSignal::new(Pagination::new(stored_size));
    let collapsed = RwSignal::new(HashSet::<ProveedorId>::new());

    let index = Memo::new(move |_| state.proveedores.with(|p| ProveedorIndex::new(p)));
    let rows = Memo::new(move |_| {
        let idx = index.get();
        state.productos.with(|p| ProductoRow::join(p, &idx))
    });
    let visible = Memo::new(move |_| {
        let f = filter.get();
        rows.with(|r| f.apply(r))
    });

    Effect::new(move |_| {
        let q = query.get();
        if filter.with_untracked(|f| f.query != q) {
            filter.update(|f| f.query = q);
        }
    });

    // any filter change goes back to page 1
    Effect::new(move |_| {
        filter.track();
        pagination.update(|p| p.reset());
    });

    Effect::new(move |_| {
        let min = parse_price(&precio_min.get());
        let max = parse_price(&precio_max.get());
        if filter.with_untracked(|f| f.precio.min != min || f.precio.max != max) {
            filter.update(|f| {
                f.precio.min = min;
                f.precio.max = max;
            });
        }
    });

    let chips = Signal::derive(move || {
        let idx = index.get();
        filter
            .get()
            .chips(&idx)
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i, c.label))
            .collect::<Vec<_>>()
    });
    let sync_inputs = move || {
        filter.with_untracked(|f| {
            query.set(f.query.clone());
            precio_min.set(f.precio.min.map(|v| v.to_string()).unwrap_or_default());
            precio_max.set(f.precio.max.map(|v| v.to_string()).unwrap_or_default());
        });
    };
    let remove_chip = Callback::new(move |idx: usize| {
        let proveedores = index.get_untracked();
        filter.update(|f| {
            if let Some(key) = f.chips(&proveedores).get(idx).map(|c| c.key.clone()) {
                f.remove_chip(&key);
            }
        });
        sync_inputs();
    });
    let clear_all = Callback::new(move |_| {
        filter.set(ProductoFilter::default());
        sync_inputs();
    });
    let active_count = Signal::derive(move || chips.with(|c| c.len()));

    let total = Signal::derive(move || visible.with(|v| v.len()));
    let current_page = Signal::derive(move || pagination.get().current_page(total.get()));
    let total_pages = Signal::derive(move || pagination.get().total_pages(total.get()));
    let page_size = Signal::derive(move || pagination.get().page_size);
    let on_page_change = Callback::new(move |page: usize| pagination.update(|p| p.page = page));
    let on_page_size_change = Callback::new(move |size: usize| {
        pagination.set(Pagination::new(size));
        storage::save_pref(PRODUCTOS_PAGE_SIZE, &size);
    });

    let page_items = move || {
        let p = pagination.get();
        visible.with(|v| p.slice(v).to_vec())
    };
    let groups = move || {
        let idx = index.get();
        visible.with(|v| group_by_proveedor(v, &idx))
    };

    view! {
        <FilterPanel
            is_expanded=filters_open
            active_filters_count=active_count
            header_extra=move || view! { <span class="filter-panel__count">{move || format!("{} productos", total.get())}</span> }
            filter_tags=move || view! { <FilterChips chips=chips on_remove=remove_chip on_clear=clear_all /> }
        >
            <Flex gap=FlexGap::Large align=FlexAlign::End>
                <SearchInput
                    value=query
                    delay_ms=config().ui.search_debounce_ms
                    placeholder="Nombre, descripción o proveedor"
                />
                <label class="form__label">
                    "Proveedor"
                    <select
                        class="form__select"
                        prop:value=move || filter.with(|f| f.proveedor.map(|p| p.to_string()).unwrap_or_default())
                        on:change=move |ev| {
                            let prov = ProveedorId::parse(&event_target_value(&ev));
                            filter.update(|f| f.proveedor = prov);
                        }
                    >
                        <option value="">"Todos"</option>
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
                    "Precio mín."
                    <input
                        type="number"
                        min="0"
                        step="0.01"
                        class="form__input form__input--short"
                        prop:value=move || precio_min.get()
                        on:change=move |ev| precio_min.set(event_target_value(&ev))
                    />
                </label>
                <label class="form__label">
                    "Precio máx."
                    <input
                        type="number"
                        min="0"
                        step="0.01"
                        class="form__input form__input--short"
                        prop:value=move || precio_max.get()
                        on:change=move |ev| precio_max.set(event_target_value(&ev))
                    />
                </label>
                <label class="form__label">
                    "Orden"
                    <select
                        class="form__select"
                        prop:value=move || filter.with(|f| f.sort.code())
                        on:change=move |ev| {
                            let sort = ProductoSort::from_code(&event_target_value(&ev));
                            filter.update(|f| f.sort = sort);
                        }
                    >
                        {ProductoSort::ALL
                            .into_iter()
                            .map(|s| view! { <option value=s.code()>{s.label()}</option> })
                            .collect_view()}
                    </select>
                </label>
            </Flex>
            <Show when=move || filter.with(|f| f.precio_range_invalid())>
                <p class="form__warning">"El precio mínimo es mayor que el máximo; el rango de precio no se aplica."</p>
            </Show>
            <Flex gap=FlexGap::Large>
                <label class="checkbox-list__item">
                    <input
                        type="checkbox"
                        prop:checked=move || filter.with(|f| f.solo_con_descripcion)
                        on:change=move |ev| {
                            let on = event_target_checked(&ev);
                            filter.update(|f| f.solo_con_descripcion = on);
                        }
                    />
                    "Solo con descripción"
                </label>
                <label class="checkbox-list__item">
                    <input
                        type="checkbox"
                        prop:checked=move || filter.with(|f| f.solo_precio_positivo)
                        on:change=move |ev| {
                            let on = event_target_checked(&ev);
                            filter.update(|f| f.solo_precio_positivo = on);
                        }
                    />
                    "Precio mayor que 0"
                </label>
            </Flex>
        </FilterPanel>

        <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
            <span class="list-summary">{move || format!("Mostrando {} productos", total.get())}</span>
            <label class="form__label form__label--inline">
                "Agrupar"
                <select
                    class="form__select"
                    prop:value=move || group_mode.get()
                    on:change=move |ev| group_mode.set(event_target_value(&ev))
                >
                    <option value=GROUP_ALL>"Todos"</option>
                    <option value=GROUP_PROVEEDOR>"Por proveedor"</option>
                </select>
            </label>
        </Flex>

        <Show when=move || total.get() == 0>
            <p class="table__empty">"No hay productos que coincidan con los filtros."</p>
        </Show>

        {move || {
            if group_mode.get() == GROUP_PROVEEDOR {
                view! {
                    <div class="product-groups">
                        <For
                            each=groups
                            key=|g| (g.proveedor_id, g.items.len(), g.items.first().map(|r| r.producto.id))
                            children=move |g| {
                                let pid = g.proveedor_id;
                                let count = g.items.len();
                                let items = g.items.clone();
                                view! {
                                    <section class="product-group">
                                        <button
                                            class="product-group__header"
                                            on:click=move |_| collapsed.update(|set| {
                                                if !set.remove(&pid) {
                                                    set.insert(pid);
                                                }
                                            })
                                        >
                                            <span>{g.titulo.clone()}</span>
                                            <span class="product-group__count">{format!("({})", count)}</span>
                                        </button>
                                        <Show when=move || !collapsed.with(|set| set.contains(&pid))>
                                            <div class="product-grid">
                                                {items.clone().into_iter().map(producto_card).collect_view()}
                                            </div>
                                        </Show>
                                    </section>
                                }
                            }
                        />
                    </div>
                }
                .into_any()
            } else {
                view! {
                    <div class="product-grid">
                        <For
                            each=page_items
                            key=|r| r.producto.id
                            children=producto_card
                        />
                    </div>
                    <PaginationControls
                        current_page=current_page
                        total_pages=total_pages
                        total_count=total
                        page_size=page_size
                        on_page_change=on_page_change
                        on_page_size_change=on_page_size_change
                    />
                }
                .into_any()
            }
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price(" 12,5 "), Some(12.5));
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price("0"), Some(0.0));
    }
}
