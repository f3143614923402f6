use crate::domain::ids::ClienteId;
use crate::shared::format::deserialize_text;
use crate::shared::list_query::{email_domain, Searchable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cliente as returned by `GET /clientes/get`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cliente {
    pub id: ClienteId,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub nombre: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub apellidos: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub dni: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub telefono1: String,
    #[serde(default)]
    pub telefono2: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub calle: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub numero_vivienda: String,
    #[serde(default)]
    pub piso_portal: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub ciudad: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub codigo_postal: String,
}

impl Cliente {
    /// "nombre apellidos", trimmed
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellidos).trim().to_string()
    }

    /// Name shown in lists; falls back to `Cliente #id`
    pub fn display_name(&self) -> String {
        let full = self.nombre_completo();
        if full.is_empty() {
            format!("Cliente #{}", self.id)
        } else {
            full
        }
    }

    pub fn email_domain(&self) -> Option<String> {
        email_domain(&self.email)
    }

    /// One-line postal address
    pub fn direccion(&self) -> String {
        let mut parts = vec![format!("{} {}", self.calle, self.numero_vivienda).trim().to_string()];
        if let Some(piso) = self.piso_portal.as_deref().filter(|p| !p.trim().is_empty()) {
            parts.push(piso.trim().to_string());
        }
        let city = format!("{} {}", self.codigo_postal, self.ciudad).trim().to_string();
        parts.push(city);
        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn telefonos(&self) -> String {
        match self.telefono2.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(t2) => format!("{} / {}", self.telefono1, t2),
            None => self.telefono1.clone(),
        }
    }
}

impl Searchable for Cliente {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.nombre_completo(), self.email, self.dni)
    }
}

/// Clients by id, for screens that join rows against their client
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClienteIndex {
    by_id: HashMap<ClienteId, Cliente>,
}

impl ClienteIndex {
    pub fn new(clientes: &[Cliente]) -> Self {
        Self {
            by_id: clientes.iter().map(|c| (c.id, c.clone())).collect(),
        }
    }

    pub fn get(&self, id: ClienteId) -> Option<&Cliente> {
        self.by_id.get(&id)
    }

    /// Client name or `Cliente #id` when not loaded
    pub fn display_name(&self, id: ClienteId) -> String {
        self.get(id)
            .map(Cliente::display_name)
            .unwrap_or_else(|| format!("Cliente #{}", id))
    }

    pub fn email_domain(&self, id: ClienteId) -> Option<String> {
        self.get(id).and_then(Cliente::email_domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_partial_row() {
        let c: Cliente = serde_json::from_value(json!({
            "id": 3,
            "nombre": "Lucía",
            "apellidos": "Pérez",
            "email": "lucia@Correo.es",
            "numero_vivienda": 14,
            "codigo_postal": "41001",
            "ciudad": "Sevilla",
            "calle": "Calle Feria"
        }))
        .unwrap();
        assert_eq!(c.id, ClienteId(3));
        assert_eq!(c.nombre_completo(), "Lucía Pérez");
        assert_eq!(c.email_domain().as_deref(), Some("correo.es"));
        assert_eq!(c.direccion(), "Calle Feria 14, 41001 Sevilla");
        assert_eq!(c.telefonos(), "");
    }

    #[test]
    fn test_display_name_fallback() {
        let c = Cliente {
            id: ClienteId(9),
            ..Default::default()
        };
        assert_eq!(c.display_name(), "Cliente #9");

        let index = ClienteIndex::new(&[Cliente {
            id: ClienteId(1),
            nombre: "Ana".into(),
            email: "ana@x.es".into(),
            ..Default::default()
        }]);
        assert_eq!(index.display_name(ClienteId(1)), "Ana");
        assert_eq!(index.display_name(ClienteId(2)), "Cliente #2");
        assert_eq!(index.email_domain(ClienteId(1)).as_deref(), Some("x.es"));
    }

    #[test]
    fn test_index_equality_follows_contents() {
        let rows = vec![Cliente {
            id: ClienteId(4),
            nombre: "Marta".into(),
            ..Default::default()
        }];
        let index = ClienteIndex::new(&rows);
        assert_eq!(index, ClienteIndex::new(&rows));
        assert_ne!(index, ClienteIndex::default());
        assert_eq!(index.get(ClienteId(4)).map(|c| c.nombre.as_str()), Some("Marta"));
    }

    #[test]
    fn test_search_text_covers_dni() {
        let c = Cliente {
            id: ClienteId(1),
            nombre: "Ana".into(),
            dni: "12345678Z".into(),
            ..Default::default()
        };
        assert!(c.matches_query("678z"));
        assert!(c.matches_query(""));
        assert!(!c.matches_query("pedro"));
    }
}
