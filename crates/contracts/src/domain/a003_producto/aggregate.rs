use crate::domain::ids::{ProductoId, ProveedorId};
use crate::shared::format::{deserialize_f64, deserialize_text, parse_amount};
use serde::{Deserialize, Serialize};

/// Producto as returned by `GET /productos/get`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Producto {
    pub id: ProductoId,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub nombre: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub descripcion: String,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub precio: f64,
    pub proveedor_id: ProveedorId,
}

/// Body of `POST /productos/post` and `PUT /productos/put/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductoDto {
    pub nombre: String,
    pub descripcion: String,
    pub precio: f64,
    pub proveedor_id: ProveedorId,
}

/// Raw text of the create/edit form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductoForm {
    pub nombre: String,
    pub descripcion: String,
    pub precio: String,
    /// Selected supplier id as text, empty when none
    pub proveedor: String,
}

/// Per-field error flags plus the ordered list of labels to complete
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductoFormErrors {
    pub nombre: bool,
    pub precio: bool,
    pub proveedor: bool,
    pub missing: Vec<&'static str>,
}

impl ProductoFormErrors {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    /// "Completa: Nombre, Precio."
    pub fn summary(&self) -> String {
        format!("Completa: {}.", self.missing.join(", "))
    }
}

impl ProductoForm {
    pub fn from_producto(p: &Producto) -> Self {
        Self {
            nombre: p.nombre.clone(),
            descripcion: p.descripcion.clone(),
            precio: p.precio.to_string(),
            proveedor: p.proveedor_id.to_string(),
        }
    }

    /// Validate and build the request body
    pub fn validate(&self) -> Result<ProductoDto, ProductoFormErrors> {
        let mut errors = ProductoFormErrors::default();

        if self.nombre.trim().is_empty() {
            errors.nombre = true;
            errors.missing.push("Nombre");
        }

        let precio = parse_amount(&self.precio);
        if precio.is_none() {
            errors.precio = true;
            errors.missing.push("Precio");
        }

        let proveedor = ProveedorId::parse(&self.proveedor);
        if proveedor.is_none() {
            errors.proveedor = true;
            errors.missing.push("Proveedor");
        }

        if precio.map_or(false, |p| p < 0.0) {
            errors.precio = true;
            errors.missing.push("Precio (no puede ser negativo)");
        }

        match (precio, proveedor) {
            (Some(precio), Some(proveedor_id)) if errors.is_empty() => Ok(ProductoDto {
                nombre: self.nombre.trim().to_string(),
                descripcion: self.descripcion.trim().to_string(),
                precio,
                proveedor_id,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_form() {
        let form = ProductoForm {
            nombre: "  Mesa roble ".into(),
            descripcion: "".into(),
            precio: "249,90".into(),
            proveedor: "3".into(),
        };
        let dto = form.validate().unwrap();
        assert_eq!(dto.nombre, "Mesa roble");
        assert_eq!(dto.precio, 249.9);
        assert_eq!(dto.proveedor_id, ProveedorId(3));
    }

    #[test]
    fn test_missing_fields_in_order() {
        let errors = ProductoForm::default().validate().unwrap_err();
        assert_eq!(errors.missing, vec!["Nombre", "Precio", "Proveedor"]);
        assert_eq!(errors.summary(), "Completa: Nombre, Precio, Proveedor.");
        assert!(errors.nombre && errors.precio && errors.proveedor);
    }

    #[test]
    fn test_negative_price() {
        let form = ProductoForm {
            nombre: "Silla".into(),
            precio: "-5".into(),
            proveedor: "1".into(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.missing, vec!["Precio (no puede ser negativo)"]);
    }

    #[test]
    fn test_lenient_price_from_backend() {
        let p: Producto =
            serde_json::from_str(r#"{"id":1,"nombre":"Sofá","precio":"899.00","proveedor_id":2}"#)
                .unwrap();
        assert_eq!(p.precio, 899.0);
        assert_eq!(ProductoForm::from_producto(&p).precio, "899");
    }
}
