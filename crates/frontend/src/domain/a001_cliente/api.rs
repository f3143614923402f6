use crate::shared::api_utils::{get_json, get_json_query, SearchQuery};
use contracts::domain::a001_cliente::aggregate::Cliente;
use contracts::domain::ids::ClienteId;
use contracts::shared::error::ApiError;
use contracts::usecases::u501_nueva_venta::filter_clientes;

pub async fn fetch_clientes() -> Result<Vec<Cliente>, ApiError> {
    get_json("clientes/get").await
}

pub async fn fetch_cliente(id: ClienteId) -> Result<Cliente, ApiError> {
    get_json(&format!("clientes/get/{}", id)).await
}

/// `GET /clientes/search?q=`; when the backend lacks that route the full
/// list is filtered here instead
pub async fn search_clientes(query: &str) -> Result<Vec<Cliente>, ApiError> {
    match get_json_query::<_, Vec<Cliente>>("clientes/search", &SearchQuery { q: query }).await {
        Ok(found) => Ok(found),
        Err(e) => {
            log::debug!("clientes/search unavailable ({}), filtering locally", e);
            let all = fetch_clientes().await?;
            Ok(filter_clientes(&all, query))
        }
    }
}
