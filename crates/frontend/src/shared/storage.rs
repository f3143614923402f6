//! `localStorage` access: UI preferences and cross-page hand-offs.
//!
//! A hand-off is an id written by one page right before navigating to
//! another; the target page reads it once its data is loaded and removes it.

use contracts::shared::error::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Albarán to open when the Albaranes page mounts
pub const ALBARAN_OPEN_ID: &str = "albaran_open_id";
/// Cliente to open when the Clientes page mounts
pub const CLIENTE_OPEN_ID: &str = "cliente_open_id";

pub const PRODUCTOS_TAB: &str = "productos.tab";
pub const PRODUCTOS_GROUP_MODE: &str = "productos.groupMode";
pub const PRODUCTOS_PAGE_SIZE: &str = "productos.pageSize";

pub const TRANSPORTE_CAMIONES: &str = "transporte.camiones";
pub const TRANSPORTE_OCULTOS: &str = "transporte.camiones_ocultos";

fn local_storage() -> Result<web_sys::Storage, ApiError> {
    web_sys::window()
        .ok_or_else(|| ApiError::Storage("no window".to_string()))?
        .local_storage()
        .map_err(|e| ApiError::Storage(format!("{:?}", e)))?
        .ok_or_else(|| ApiError::Storage("localStorage unavailable".to_string()))
}

pub fn get_raw(key: &str) -> Option<String> {
    local_storage().ok()?.get_item(key).ok().flatten()
}

pub fn set_raw(key: &str, value: &str) -> Result<(), ApiError> {
    local_storage()?
        .set_item(key, value)
        .map_err(|e| ApiError::Storage(format!("{:?}", e)))
}

pub fn remove(key: &str) {
    if let Ok(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

/// Value stored as JSON; unreadable entries count as missing
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    decode_json(get_raw(key)?.as_str())
}

pub fn save_json<T: Serialize>(key: &str, value: &T) -> Result<(), ApiError> {
    let raw = serde_json::to_string(value).map_err(|e| ApiError::Storage(e.to_string()))?;
    set_raw(key, &raw)
}

/// Save and log instead of failing; preferences are best effort
pub fn save_pref<T: Serialize>(key: &str, value: &T) {
    if let Err(e) = save_json(key, value) {
        log::warn!("cannot persist {}: {}", key, e);
    }
}

pub fn put_handoff(key: &str, id: i64) {
    if let Err(e) = set_raw(key, &id.to_string()) {
        log::warn!("cannot write hand-off {}: {}", key, e);
    }
}

/// Pending hand-off id, left in place until `remove` is called
pub fn peek_handoff(key: &str) -> Option<i64> {
    parse_handoff(get_raw(key)?.as_str())
}

pub fn decode_json<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_str(raw).ok()
}

/// Hand-off ids may have been written as plain numbers or JSON strings
pub fn parse_handoff(raw: &str) -> Option<i64> {
    let trimmed = raw.trim().trim_matches('"');
    trimmed.parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_parse_handoff() {
        assert_eq!(parse_handoff("42"), Some(42));
        assert_eq!(parse_handoff("\"7\""), Some(7));
        assert_eq!(parse_handoff("abc"), None);
        assert_eq!(parse_handoff("0"), None);
    }

    #[test]
    fn test_decode_json() {
        let set: Option<BTreeSet<i64>> = decode_json("[3,1,2]");
        assert_eq!(set.map(|s| s.into_iter().collect::<Vec<_>>()), Some(vec![1, 2, 3]));
        assert_eq!(decode_json::<String>("\"proveedor\""), Some("proveedor".to_string()));
        assert_eq!(decode_json::<usize>("not json"), None);
    }
}
