use crate::domain::ids::ProveedorId;
use crate::shared::format::deserialize_text;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supplier, read-only lookup for products
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Proveedor {
    pub id: ProveedorId,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub nombre: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub contacto: String,
}

/// Name lookup by id
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProveedorIndex {
    names: HashMap<ProveedorId, String>,
}

impl ProveedorIndex {
    pub fn new(proveedores: &[Proveedor]) -> Self {
        Self {
            names: proveedores
                .iter()
                .map(|p| (p.id, p.nombre.clone()))
                .collect(),
        }
    }

    pub fn get(&self, id: ProveedorId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Supplier name or `#id` when unknown
    pub fn name(&self, id: ProveedorId) -> String {
        self.get(id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", id))
    }

    /// Heading used when grouping products by supplier
    pub fn group_title(&self, id: ProveedorId) -> String {
        self.get(id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Proveedor #{}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_fallbacks() {
        let index = ProveedorIndex::new(&[Proveedor {
            id: ProveedorId(1),
            nombre: "Maderas Sur".into(),
            contacto: "ventas@maderas.es".into(),
        }]);
        assert_eq!(index.name(ProveedorId(1)), "Maderas Sur");
        assert_eq!(index.name(ProveedorId(8)), "#8");
        assert_eq!(index.group_title(ProveedorId(8)), "Proveedor #8");
    }

    #[test]
    fn test_index_equality_follows_contents() {
        let rows = vec![Proveedor {
            id: ProveedorId(2),
            nombre: "Tapicerías Norte".into(),
            ..Default::default()
        }];
        assert_eq!(ProveedorIndex::new(&rows), ProveedorIndex::new(&rows));
        assert_ne!(ProveedorIndex::new(&rows), ProveedorIndex::default());
    }
}
