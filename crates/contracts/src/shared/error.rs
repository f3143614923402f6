use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by backend calls and client-side validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Error de red: {0}")]
    Network(String),

    #[error("{detail}")]
    Http { status: u16, detail: String },

    #[error("Respuesta no válida: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("Almacenamiento local: {0}")]
    Storage(String),
}

impl ApiError {
    /// Build an error from a non-2xx response.
    ///
    /// Prefers the `detail` (or `message`) field of a JSON body, then the raw
    /// body text, then the status line.
    pub fn from_response_body(status: u16, status_text: &str, body: &str) -> Self {
        let detail = extract_detail(body)
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && !trimmed.starts_with('{') && !trimmed.starts_with('<'))
                    .then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                if status_text.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    format!("HTTP {} {}", status, status_text.trim())
                }
            });
        ApiError::Http { status, detail }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message prefixed with a context label, as shown in banners.
    pub fn with_context(&self, context: &str) -> String {
        format!("{}: {}", context, self)
    }
}

/// Extract a human readable message from a JSON error body.
///
/// Understands `{"detail": "..."}`, validation lists `{"detail": [{"msg": ...}]}`
/// and `{"message": "..."}`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;

    if let Some(detail) = obj.get("detail") {
        match detail {
            Value::String(s) if !s.trim().is_empty() => return Some(s.clone()),
            Value::Array(items) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Object(o) => o.get("msg").and_then(|m| m.as_str()).map(str::to_string),
                        _ => None,
                    })
                    .collect();
                if !msgs.is_empty() {
                    return Some(msgs.join("; "));
                }
            }
            Value::Object(_) => return Some(detail.to_string()),
            _ => {}
        }
    }

    obj.get("message")
        .and_then(|m| m.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        let err = ApiError::from_response_body(409, "Conflict", r#"{"detail":"Producto en uso"}"#);
        assert_eq!(err.to_string(), "Producto en uso");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_detail_validation_list() {
        let body = r#"{"detail":[{"loc":["body","precio"],"msg":"field required"},{"msg":"bad id"}]}"#;
        assert_eq!(extract_detail(body).as_deref(), Some("field required; bad id"));
    }

    #[test]
    fn test_message_field() {
        assert_eq!(
            extract_detail(r#"{"message":"No encontrado"}"#).as_deref(),
            Some("No encontrado")
        );
    }

    #[test]
    fn test_fallbacks() {
        let plain = ApiError::from_response_body(500, "Internal Server Error", "boom");
        assert_eq!(plain.to_string(), "boom");

        let html = ApiError::from_response_body(502, "Bad Gateway", "<html></html>");
        assert_eq!(html.to_string(), "HTTP 502 Bad Gateway");

        let empty = ApiError::from_response_body(404, "", "");
        assert_eq!(empty.to_string(), "HTTP 404");
        assert!(empty.is_not_found());
    }

    #[test]
    fn test_with_context() {
        let err = ApiError::Network("timeout".into());
        assert_eq!(err.with_context("Error al cargar"), "Error al cargar: Error de red: timeout");
    }
}
