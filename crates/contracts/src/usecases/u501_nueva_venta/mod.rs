pub mod request;
pub mod suggestions;

pub use request::{CartLine, NuevaVentaForm, NuevaVentaRequest, NuevoCliente, VentaItem};
pub use suggestions::{cliente_caption, filter_clientes, rank_product_suggestions, SuggestionList};

use crate::usecases::common::UseCaseMetadata;

pub struct NuevaVenta;

impl UseCaseMetadata for NuevaVenta {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "nueva_venta"
    }

    fn display_name() -> &'static str {
        "Nueva venta"
    }

    fn description() -> &'static str {
        "Crea un albarán seleccionando cliente y productos. Opcionalmente puedes registrar una fianza."
    }
}
