//! Content zone: renders the active page

use crate::dashboards::d400_resumen::ui::ResumenDashboardView;
use crate::dashboards::d401_tendencias::ui::TendenciasDashboard;
use crate::domain::a001_cliente::ui::ClienteList;
use crate::domain::a003_producto::ui::ProductosPage;
use crate::domain::a004_albaran::ui::AlbaranList;
use crate::domain::a005_movimiento::ui::MovimientoList;
use crate::domain::a007_banco::ui::BancoView;
use crate::layout::global_context::use_app_context;
use crate::layout::pages::Page;
use crate::usecases::u501_nueva_venta::NuevaVentaView;
use crate::usecases::u502_transporte_board::TransporteBoardView;
use leptos::prelude::*;

#[component]
pub fn Center() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <div data-zone="center" class="app-content">
            {move || match ctx.active.get() {
                Page::Dashboard => view! { <ResumenDashboardView /> }.into_any(),
                Page::Clientes => view! { <ClienteList /> }.into_any(),
                Page::Productos => view! { <ProductosPage /> }.into_any(),
                Page::Albaranes => view! { <AlbaranList /> }.into_any(),
                Page::Movimientos => view! { <MovimientoList /> }.into_any(),
                Page::Transporte => view! { <TransporteBoardView /> }.into_any(),
                Page::NuevaVenta => view! { <NuevaVentaView /> }.into_any(),
                Page::Tendencias => view! { <TendenciasDashboard /> }.into_any(),
                Page::Banco => view! { <BancoView /> }.into_any(),
            }}
        </div>
    }
}
