pub mod list;
pub mod manage;
pub mod page;

pub use page::ProductosPage;

use contracts::domain::a002_proveedor::aggregate::Proveedor;
use contracts::domain::a003_producto::aggregate::Producto;
use leptos::prelude::*;

/// Data shared by both tabs of the products page
#[derive(Clone, Copy)]
pub struct ProductosState {
    pub productos: RwSignal<Vec<Producto>>,
    pub proveedores: RwSignal<Vec<Proveedor>>,
}

impl ProductosState {
    pub fn new() -> Self {
        Self {
            productos: RwSignal::new(Vec::new()),
            proveedores: RwSignal::new(Vec::new()),
        }
    }
}
