use crate::shared::api_utils::{get_json, post_json};
use contracts::domain::a005_movimiento::aggregate::{Movimiento, MovimientoCreate};
use contracts::shared::error::ApiError;

pub async fn fetch_movimientos() -> Result<Vec<Movimiento>, ApiError> {
    get_json("movimientos/get").await
}

pub async fn create_movimiento(body: &MovimientoCreate) -> Result<Movimiento, ApiError> {
    post_json("movimientos/post", body).await
}
