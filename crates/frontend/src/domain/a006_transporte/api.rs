use crate::shared::api_utils::{download_pdf, get_json, post_empty, post_json};
use contracts::domain::a004_albaran::aggregate::Albaran;
use contracts::domain::a006_transporte::aggregate::{
    factura_filename, AlbaranIdsRequest, FacturaTransporteResponse, LiquidarResponse, RutasResponse,
};
use contracts::domain::ids::{AlbaranId, CamionId};
use contracts::shared::error::ApiError;
use contracts::usecases::u502_transporte_board::{group_flat_routes, BoardAction};

/// Orders waiting in the warehouse
pub async fn fetch_almacen() -> Result<Vec<Albaran>, ApiError> {
    get_json("transporte/almacen").await
}

/// Routes grouped by truck. Older backends only expose the flat
/// `transporte/ruta` listing, which is grouped here.
pub async fn fetch_rutas() -> Result<RutasResponse, ApiError> {
    match get_json::<RutasResponse>("transporte/rutas").await {
        Ok(rutas) => Ok(rutas),
        Err(e) if e.is_not_found() => {
            log::debug!("transporte/rutas unavailable ({}), using flat listing", e);
            let flat: Vec<Albaran> = get_json("transporte/ruta").await?;
            Ok(group_flat_routes(&flat))
        }
        Err(e) => Err(e),
    }
}

/// Execute a drop on the board; the response body is not used
pub async fn run_board_action(action: &BoardAction) -> Result<(), ApiError> {
    post_json::<_, serde_json::Value>(action.endpoint(), &action.request())
        .await
        .map(|_| ())
}

pub async fn liquidar_ruta(camion_id: CamionId) -> Result<LiquidarResponse, ApiError> {
    post_empty(&format!("transporte/ruta/{}/liquidar", camion_id)).await
}

pub async fn download_factura_ruta(camion_id: CamionId) -> Result<(), ApiError> {
    download_pdf(
        &format!("transporte/ruta/{}/factura", camion_id),
        &factura_filename(camion_id),
    )
    .await
}

/// Transport invoice over selected warehouse orders
pub async fn facturar_almacen(albaran_ids: Vec<AlbaranId>) -> Result<FacturaTransporteResponse, ApiError> {
    post_json("transporte/factura", &AlbaranIdsRequest { albaran_ids }).await
}
