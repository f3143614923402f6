use super::list::ProductoListado;
use super::manage::ProductoGestion;
use super::ProductosState;
use crate::domain::a002_proveedor::api::fetch_proveedores;
use crate::domain::a003_producto::api::fetch_productos;
use crate::shared::icons::icon;
use crate::shared::page_frame::{ErrorBox, PageFrame, PageHeader, PAGE_CAT_LIST};
use crate::shared::storage::{self, PRODUCTOS_TAB};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const TAB_LISTADO: &str = "listado";
const TAB_GESTION: &str = "gestion";

#[component]
#[allow(non_snake_case)]
pub fn ProductosPage() -> impl IntoView {
    let state = ProductosState::new();
    let error = RwSignal::new(None::<String>);
    let pending = RwSignal::new(0u8);

    let initial_tab = storage::load_json::<String>(PRODUCTOS_TAB)
        .filter(|t| t == TAB_LISTADO || t == TAB_GESTION)
        .unwrap_or_else(|| TAB_LISTADO.to_string());
    let tab = RwSignal::new(initial_tab);
    Effect::new(move |_| storage::save_pref(PRODUCTOS_TAB, &tab.get()));

    // both requests run side by side; each reports its own failure
    let load = move || {
        pending.set(2);
        error.set(None);
        spawn_local(async move {
            match fetch_productos().await {
                Ok(list) => state.productos.set(list),
                Err(e) => {
                    log::error!("productos: {}", e);
                    error.set(Some(e.with_context("No se pudieron cargar los productos")));
                }
            }
            pending.update(|p| *p = p.saturating_sub(1));
        });
        spawn_local(async move {
            match fetch_proveedores().await {
                Ok(list) => state.proveedores.set(list),
                Err(e) => {
                    log::error!("proveedores: {}", e);
                    error.set(Some(e.with_context("No se pudieron cargar los proveedores")));
                }
            }
            pending.update(|p| *p = p.saturating_sub(1));
        });
    };
    load();

    let loading = Signal::derive(move || pending.get() > 0);

    view! {
        <PageFrame page_id="a003_producto--list" category=PAGE_CAT_LIST>
            <PageHeader
                title="Productos"
                subtitle=Signal::derive(move || format!("{} productos en catálogo", state.productos.with(|p| p.len())))
                actions=move || view! {
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load() disabled=loading>
                        {icon("refresh")}
                        " Actualizar"
                    </Button>
                }
            />

            {move || error.get().map(|e| view! { <ErrorBox message=e /> })}

            <TabList selected_value=tab>
                <Tab value=TAB_LISTADO>"Listado"</Tab>
                <Tab value=TAB_GESTION>"Gestión"</Tab>
            </TabList>

            <Show when=move || loading.get()>
                <Flex justify=FlexJustify::Center><Spinner /></Flex>
            </Show>

            {move || {
                if tab.get() == TAB_GESTION {
                    view! { <ProductoGestion state=state /> }.into_any()
                } else {
                    view! { <ProductoListado state=state /> }.into_any()
                }
            }}
        </PageFrame>
    }
}
