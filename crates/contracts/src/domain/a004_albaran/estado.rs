//! Lifecycle of an albarán: FIANZA → ALMACEN → TRANSPORTE → ENTREGADO.
//!
//! Transitions are executed by the backend. The client only decides which
//! button to offer next to each row.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EstadoAlbaran {
    #[default]
    Fianza,
    Almacen,
    Transporte,
    Entregado,
    /// Value unknown to this client, kept verbatim
    Otro(String),
}

impl EstadoAlbaran {
    /// The four known states in lifecycle order
    pub const CHAIN: [EstadoAlbaran; 4] = [
        EstadoAlbaran::Fianza,
        EstadoAlbaran::Almacen,
        EstadoAlbaran::Transporte,
        EstadoAlbaran::Entregado,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "FIANZA" => EstadoAlbaran::Fianza,
            "ALMACEN" | "ALMACÉN" => EstadoAlbaran::Almacen,
            "TRANSPORTE" | "RUTA" => EstadoAlbaran::Transporte,
            "ENTREGADO" => EstadoAlbaran::Entregado,
            _ => EstadoAlbaran::Otro(raw.to_string()),
        }
    }

    /// Wire value sent in `PATCH /albaranes/{id}/estado`
    pub fn code(&self) -> &str {
        match self {
            EstadoAlbaran::Fianza => "FIANZA",
            EstadoAlbaran::Almacen => "ALMACEN",
            EstadoAlbaran::Transporte => "TRANSPORTE",
            EstadoAlbaran::Entregado => "ENTREGADO",
            EstadoAlbaran::Otro(raw) => raw.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EstadoAlbaran::Fianza => "Fianza",
            EstadoAlbaran::Almacen => "Almacén",
            EstadoAlbaran::Transporte => "Ruta",
            EstadoAlbaran::Entregado => "Entregado",
            EstadoAlbaran::Otro(raw) => raw.as_str(),
        }
    }

    /// Badge variant name understood by the UI badge component
    pub fn badge_variant(&self) -> &'static str {
        match self {
            EstadoAlbaran::Fianza => "warning",
            EstadoAlbaran::Almacen => "primary",
            EstadoAlbaran::Transporte => "info",
            EstadoAlbaran::Entregado => "success",
            EstadoAlbaran::Otro(_) => "neutral",
        }
    }

    /// State offered by the contextual action button, if any
    pub fn next(&self) -> Option<EstadoAlbaran> {
        match self {
            EstadoAlbaran::Fianza => Some(EstadoAlbaran::Almacen),
            EstadoAlbaran::Almacen => Some(EstadoAlbaran::Transporte),
            EstadoAlbaran::Transporte => Some(EstadoAlbaran::Entregado),
            EstadoAlbaran::Entregado | EstadoAlbaran::Otro(_) => None,
        }
    }

    /// Caption of the button that moves an albarán into this state
    pub fn action_label(&self) -> String {
        match self {
            EstadoAlbaran::Almacen => "Pasar a almacén".to_string(),
            EstadoAlbaran::Transporte => "Enviar a ruta".to_string(),
            EstadoAlbaran::Entregado => "Marcar entregado".to_string(),
            other => format!("Pasar a {}", other.label()),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, EstadoAlbaran::Entregado)
    }
}

impl From<String> for EstadoAlbaran {
    fn from(raw: String) -> Self {
        EstadoAlbaran::parse(&raw)
    }
}

impl From<EstadoAlbaran> for String {
    fn from(estado: EstadoAlbaran) -> Self {
        estado.code().to_string()
    }
}

impl fmt::Display for EstadoAlbaran {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Body of `PATCH /albaranes/{id}/estado`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstadoPatch {
    pub estado: EstadoAlbaran,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_transitions() {
        let mut estado = EstadoAlbaran::Fianza;
        let mut visited = vec![estado.clone()];
        while let Some(next) = estado.next() {
            visited.push(next.clone());
            estado = next;
        }
        assert_eq!(visited, EstadoAlbaran::CHAIN.to_vec());
        assert!(estado.is_final());
        assert_eq!(EstadoAlbaran::Otro("ANULADO".into()).next(), None);
    }

    #[test]
    fn test_wire_aliases() {
        let e: EstadoAlbaran = serde_json::from_str("\"RUTA\"").unwrap();
        assert_eq!(e, EstadoAlbaran::Transporte);
        assert_eq!(serde_json::to_string(&e).unwrap(), "\"TRANSPORTE\"");

        let unknown: EstadoAlbaran = serde_json::from_str("\"ANULADO\"").unwrap();
        assert_eq!(unknown, EstadoAlbaran::Otro("ANULADO".into()));
        assert_eq!(unknown.label(), "ANULADO");
        assert_eq!(unknown.badge_variant(), "neutral");
    }

    #[test]
    fn test_patch_body() {
        let body = EstadoPatch {
            estado: EstadoAlbaran::Almacen,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"estado": "ALMACEN"})
        );
    }
}
