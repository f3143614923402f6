use crate::shared::api_utils::{delete, get_json, get_json_query, post_json, put_json, SearchQuery};
use contracts::domain::a003_producto::aggregate::{Producto, ProductoDto};
use contracts::domain::ids::ProductoId;
use contracts::shared::error::ApiError;

pub async fn fetch_productos() -> Result<Vec<Producto>, ApiError> {
    get_json("productos/get").await
}

pub async fn search_productos(query: &str) -> Result<Vec<Producto>, ApiError> {
    get_json_query("productos/search", &SearchQuery { q: query }).await
}

pub async fn create_producto(dto: &ProductoDto) -> Result<Producto, ApiError> {
    post_json("productos/post", dto).await
}

pub async fn update_producto(id: ProductoId, dto: &ProductoDto) -> Result<Producto, ApiError> {
    put_json(&format!("productos/put/{}", id), dto).await
}

pub async fn delete_producto(id: ProductoId) -> Result<(), ApiError> {
    delete(&format!("productos/delete/{}", id)).await
}
