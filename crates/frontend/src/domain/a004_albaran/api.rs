use crate::shared::api_utils::{get_json, patch_json};
use contracts::domain::a004_albaran::aggregate::{for_cliente, Albaran};
use contracts::domain::a004_albaran::estado::{EstadoAlbaran, EstadoPatch};
use contracts::domain::ids::{AlbaranId, ClienteId};
use contracts::shared::error::ApiError;

pub async fn fetch_albaranes() -> Result<Vec<Albaran>, ApiError> {
    get_json("albaranes/get").await
}

/// Detail including `lineas`
pub async fn fetch_albaran(id: AlbaranId) -> Result<Albaran, ApiError> {
    get_json(&format!("albaranes/get/{}", id)).await
}

/// Orders of one client, newest first. Without that route the full list is filtered here.
pub async fn fetch_by_cliente(cliente_id: ClienteId) -> Result<Vec<Albaran>, ApiError> {
    match get_json::<Vec<Albaran>>(&format!("albaranes/by-cliente/{}", cliente_id)).await {
        Ok(list) => Ok(for_cliente(&list, cliente_id)),
        Err(e) if e.is_not_found() => {
            log::debug!("albaranes/by-cliente unavailable ({}), filtering locally", e);
            let all = fetch_albaranes().await?;
            Ok(for_cliente(&all, cliente_id))
        }
        Err(e) => Err(e),
    }
}

pub async fn patch_estado(id: AlbaranId, estado: EstadoAlbaran) -> Result<Albaran, ApiError> {
    patch_json(&format!("albaranes/{}/estado", id), &EstadoPatch { estado }).await
}
