use crate::shared::api_utils::post_json;
use contracts::domain::ids::AlbaranId;
use contracts::shared::error::ApiError;
use contracts::usecases::u501_nueva_venta::NuevaVentaRequest;
use serde_json::Value;

/// `POST /albaranes/post`. Returns the new albarán id when the backend reports it.
pub async fn create_albaran(request: &NuevaVentaRequest) -> Result<Option<AlbaranId>, ApiError> {
    let body: Value = post_json("albaranes/post", request).await?;
    Ok(created_id(&body))
}

fn created_id(body: &Value) -> Option<AlbaranId> {
    ["albaran_id", "id"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_i64))
        .map(AlbaranId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_created_id() {
        assert_eq!(created_id(&json!({"ok": true, "albaran_id": 41})), Some(AlbaranId(41)));
        assert_eq!(created_id(&json!({"id": 7, "total": 10})), Some(AlbaranId(7)));
        assert_eq!(created_id(&json!({"ok": true})), None);
    }
}
