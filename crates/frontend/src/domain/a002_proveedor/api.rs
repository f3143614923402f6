use crate::shared::api_utils::get_json;
use contracts::domain::a002_proveedor::aggregate::Proveedor;
use contracts::shared::error::ApiError;

pub async fn fetch_proveedores() -> Result<Vec<Proveedor>, ApiError> {
    get_json("proveedores/get").await
}
