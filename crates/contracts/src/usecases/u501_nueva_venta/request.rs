use crate::domain::a001_cliente::aggregate::Cliente;
use crate::domain::a003_producto::aggregate::Producto;
use crate::domain::ids::{ClienteId, ProductoId};
use crate::shared::format::{parse_amount, round2};
use crate::usecases::common::{UseCaseError, UseCaseResult};
use serde::{Deserialize, Serialize};

/// Client created together with the sale
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NuevoCliente {
    pub nombre: String,
    pub apellidos: String,
    pub dni: String,
    pub email: String,
    pub telefono1: String,
    pub telefono2: Option<String>,
    pub calle: String,
    pub numero_vivienda: String,
    pub piso_portal: Option<String>,
    pub ciudad: String,
    pub codigo_postal: String,
}

impl NuevoCliente {
    /// Required fields with their labels, in form order
    fn required(&self) -> [(&'static str, &str); 9] {
        [
            ("Nombre", self.nombre.as_str()),
            ("Apellidos", self.apellidos.as_str()),
            ("DNI", self.dni.as_str()),
            ("Email", self.email.as_str()),
            ("Teléfono 1", self.telefono1.as_str()),
            ("Calle", self.calle.as_str()),
            ("Número", self.numero_vivienda.as_str()),
            ("Ciudad", self.ciudad.as_str()),
            ("Código postal", self.codigo_postal.as_str()),
        ]
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.required()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(label, _)| label)
            .collect()
    }

    /// Trimmed copy; blank optional fields become None
    pub fn normalized(&self) -> NuevoCliente {
        let opt = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        NuevoCliente {
            nombre: self.nombre.trim().to_string(),
            apellidos: self.apellidos.trim().to_string(),
            dni: self.dni.trim().to_string(),
            email: self.email.trim().to_string(),
            telefono1: self.telefono1.trim().to_string(),
            telefono2: opt(&self.telefono2),
            calle: self.calle.trim().to_string(),
            numero_vivienda: self.numero_vivienda.trim().to_string(),
            piso_portal: opt(&self.piso_portal),
            ciudad: self.ciudad.trim().to_string(),
            codigo_postal: self.codigo_postal.trim().to_string(),
        }
    }
}

/// Line of the sale as sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentaItem {
    pub producto_id: ProductoId,
    pub cantidad: u32,
    pub precio_unitario: f64,
}

/// Body of `POST /albaranes/post`. Exactly one of `cliente_id` and
/// `cliente` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevaVentaRequest {
    pub fecha: String,
    pub descripcion: String,
    pub items: Vec<VentaItem>,
    pub registrar_fianza: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fianza_cantidad: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<ClienteId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente: Option<NuevoCliente>,
}

/// Product row in the cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub producto: Producto,
    pub cantidad: u32,
    pub precio_unitario: f64,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        round2(self.cantidad as f64 * self.precio_unitario)
    }
}

/// Whole state of the new sale form
#[derive(Debug, Clone, PartialEq)]
pub struct NuevaVentaForm {
    pub usar_existente: bool,
    pub cliente_existente: Option<Cliente>,
    pub cliente_nuevo: NuevoCliente,
    pub fecha: String,
    pub descripcion: String,
    pub items: Vec<CartLine>,
    pub registrar_fianza: bool,
    /// Typed deposit; empty means the default percentage
    pub fianza_cantidad: String,
    pub deposit_percent: f64,
}

impl NuevaVentaForm {
    pub fn new(fecha: String, deposit_percent: f64) -> Self {
        Self {
            usar_existente: true,
            cliente_existente: None,
            cliente_nuevo: NuevoCliente::default(),
            fecha,
            descripcion: String::new(),
            items: Vec::new(),
            registrar_fianza: false,
            fianza_cantidad: String::new(),
            deposit_percent,
        }
    }

    /// Add one unit, or a new line at the catalogue price
    pub fn add_item(&mut self, producto: &Producto) {
        match self.items.iter_mut().find(|l| l.producto.id == producto.id) {
            Some(line) => line.cantidad += 1,
            None => self.items.push(CartLine {
                producto: producto.clone(),
                cantidad: 1,
                precio_unitario: producto.precio,
            }),
        }
    }

    /// Quantity from user input, never below 1
    pub fn set_cantidad(&mut self, producto_id: ProductoId, raw: &str) {
        let cantidad = raw.trim().parse::<u32>().unwrap_or(1).max(1);
        if let Some(line) = self.items.iter_mut().find(|l| l.producto.id == producto_id) {
            line.cantidad = cantidad;
        }
    }

    pub fn remove_item(&mut self, producto_id: ProductoId) {
        self.items.retain(|l| l.producto.id != producto_id);
    }

    pub fn total(&self) -> f64 {
        round2(self.items.iter().map(CartLine::subtotal).sum())
    }

    pub fn unidades(&self) -> u32 {
        self.items.iter().map(|l| l.cantidad).sum()
    }

    pub fn fianza_por_defecto(&self) -> f64 {
        round2(self.total() * self.deposit_percent / 100.0)
    }

    /// Deposit that will be registered, 0 when disabled
    pub fn fianza_final(&self) -> f64 {
        if !self.registrar_fianza {
            return 0.0;
        }
        if self.fianza_cantidad.trim().is_empty() {
            self.fianza_por_defecto()
        } else {
            parse_amount(&self.fianza_cantidad).unwrap_or(0.0)
        }
    }

    /// Labels of every missing field, in the order they are checked
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.items.is_empty() {
            missing.push("Productos");
        }
        if self.usar_existente {
            if self.cliente_existente.is_none() {
                missing.push("Cliente");
            }
        } else {
            missing.extend(self.cliente_nuevo.missing_fields());
        }
        missing
    }

    /// Validate and build the request. The error names the first missing field.
    pub fn to_request(&self) -> UseCaseResult<NuevaVentaRequest> {
        if let Some(first) = self.missing_fields().first() {
            return Err(UseCaseError::required(first));
        }

        let fianza_cantidad = if self.registrar_fianza && !self.fianza_cantidad.trim().is_empty() {
            Some(
                parse_amount(&self.fianza_cantidad)
                    .ok_or_else(|| UseCaseError::validation("La fianza no es un importe válido"))?,
            )
        } else {
            None
        };

        let (cliente_id, cliente) = if self.usar_existente {
            (self.cliente_existente.as_ref().map(|c| c.id), None)
        } else {
            (None, Some(self.cliente_nuevo.normalized()))
        };

        Ok(NuevaVentaRequest {
            fecha: self.fecha.clone(),
            descripcion: self.descripcion.clone(),
            items: self
                .items
                .iter()
                .map(|l| VentaItem {
                    producto_id: l.producto.id,
                    cantidad: l.cantidad,
                    precio_unitario: l.precio_unitario,
                })
                .collect(),
            registrar_fianza: self.registrar_fianza,
            fianza_cantidad,
            cliente_id,
            cliente,
        })
    }

    /// Clear everything after a successful submit, keeping the mode
    pub fn reset(&mut self, fecha: String) {
        *self = Self {
            usar_existente: self.usar_existente,
            ..Self::new(fecha, self.deposit_percent)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn producto(id: i64, precio: f64) -> Producto {
        Producto {
            id: ProductoId(id),
            nombre: format!("Producto {}", id),
            precio,
            ..Default::default()
        }
    }

    fn form() -> NuevaVentaForm {
        NuevaVentaForm::new("2024-05-02".into(), 30.0)
    }

    #[test]
    fn test_add_item_increments_quantity() {
        let mut f = form();
        f.add_item(&producto(1, 100.0));
        f.add_item(&producto(2, 49.5));
        f.add_item(&producto(1, 100.0));
        assert_eq!(f.items.len(), 2);
        assert_eq!(f.items[0].cantidad, 2);
        assert_eq!(f.total(), 249.5);
        assert_eq!(f.unidades(), 3);

        f.set_cantidad(ProductoId(2), "0");
        assert_eq!(f.items[1].cantidad, 1);
        f.remove_item(ProductoId(1));
        assert_eq!(f.total(), 49.5);
    }

    #[test]
    fn test_fianza_default_and_override() {
        let mut f = form();
        f.add_item(&producto(1, 1500.0));
        assert_eq!(f.fianza_final(), 0.0);
        f.registrar_fianza = true;
        assert_eq!(f.fianza_final(), 450.0);
        f.fianza_cantidad = "200".into();
        assert_eq!(f.fianza_final(), 200.0);

        f.usar_existente = true;
        f.cliente_existente = Some(Cliente {
            id: ClienteId(9),
            ..Default::default()
        });
        assert_eq!(f.to_request().unwrap().fianza_cantidad, Some(200.0));
    }

    #[test]
    fn test_first_missing_field() {
        let f = form();
        assert_eq!(f.to_request().unwrap_err().message, "Productos es obligatorio");

        let mut f = form();
        f.add_item(&producto(1, 10.0));
        assert_eq!(f.to_request().unwrap_err().message, "Cliente es obligatorio");

        f.usar_existente = false;
        f.cliente_nuevo.nombre = "Ana".into();
        assert_eq!(f.to_request().unwrap_err().message, "Apellidos es obligatorio");
        assert_eq!(f.missing_fields().len(), 8);
    }

    #[test]
    fn test_request_with_existing_client() {
        let mut f = form();
        f.add_item(&producto(3, 80.0));
        f.cliente_existente = Some(Cliente {
            id: ClienteId(5),
            ..Default::default()
        });
        let body = serde_json::to_value(f.to_request().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "fecha": "2024-05-02",
                "descripcion": "",
                "items": [{"producto_id": 3, "cantidad": 1, "precio_unitario": 80.0}],
                "registrar_fianza": false,
                "cliente_id": 5
            })
        );
    }

    #[test]
    fn test_request_with_new_client() {
        let mut f = form();
        f.usar_existente = false;
        f.add_item(&producto(3, 80.0));
        f.cliente_nuevo = NuevoCliente {
            nombre: " Ana ".into(),
            apellidos: "Ruiz".into(),
            dni: "1X".into(),
            email: "ana@x.es".into(),
            telefono1: "600".into(),
            telefono2: Some("  ".into()),
            calle: "Mayor".into(),
            numero_vivienda: "3".into(),
            piso_portal: None,
            ciudad: "Soria".into(),
            codigo_postal: "42001".into(),
        };
        let req = f.to_request().unwrap();
        assert_eq!(req.cliente_id, None);
        let cliente = req.cliente.unwrap();
        assert_eq!(cliente.nombre, "Ana");
        assert_eq!(cliente.telefono2, None);

        f.reset("2024-05-03".into());
        assert!(!f.usar_existente);
        assert!(f.items.is_empty());
        assert_eq!(f.cliente_nuevo, NuevoCliente::default());
    }
}
