use super::estado::EstadoAlbaran;
use crate::domain::ids::{AlbaranId, CamionId, ClienteId, ProductoId};
use crate::shared::dates::{parse_date, to_iso};
use crate::shared::format::{deserialize_f64, deserialize_text, round2};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Line of an albarán, only present on `GET /albaranes/get/{id}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineaAlbaran {
    #[serde(default)]
    pub id: i64,
    pub producto_id: ProductoId,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub cantidad: f64,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub precio_unitario: f64,
}

impl LineaAlbaran {
    pub fn subtotal(&self) -> f64 {
        round2(self.cantidad * self.precio_unitario)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Albaran {
    pub id: AlbaranId,
    /// ISO date or datetime as sent by the backend
    #[serde(default, deserialize_with = "deserialize_text")]
    pub fecha: String,
    pub cliente_id: ClienteId,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub total: f64,
    #[serde(default)]
    pub estado: EstadoAlbaran,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub descripcion: String,
    #[serde(default)]
    pub lineas: Vec<LineaAlbaran>,
    /// Only filled by the flat `GET /transporte/ruta` listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camion_id: Option<CamionId>,
}

impl Albaran {
    pub fn fecha_date(&self) -> Option<NaiveDate> {
        parse_date(&self.fecha)
    }

    /// `YYYY-MM-DD`, empty when the date cannot be read
    pub fn fecha_iso(&self) -> String {
        self.fecha_date().map(to_iso).unwrap_or_default()
    }

    /// `dd/mm/yyyy` for tables, "—" when missing
    pub fn fecha_display(&self) -> String {
        self.fecha_date()
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "—".to_string())
    }

    pub fn lineas_total(&self) -> f64 {
        round2(self.lineas.iter().map(LineaAlbaran::subtotal).sum())
    }
}

/// Replace the entry with the same id, keeping list order
pub fn splice(list: &mut [Albaran], updated: Albaran) -> bool {
    match list.iter_mut().find(|a| a.id == updated.id) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

/// Orders of one client, newest first
pub fn for_cliente(list: &[Albaran], cliente_id: ClienteId) -> Vec<Albaran> {
    let mut out: Vec<Albaran> = list
        .iter()
        .filter(|a| a.cliente_id == cliente_id)
        .cloned()
        .collect();
    out.sort_by(|a, b| b.fecha_date().cmp(&a.fecha_date()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_detail() {
        let a: Albaran = serde_json::from_value(json!({
            "id": 12,
            "fecha": "2024-03-05T10:00:00",
            "cliente_id": 3,
            "total": "410.5",
            "estado": "RUTA",
            "descripcion": null,
            "lineas": [
                {"id": 1, "producto_id": 7, "cantidad": 2, "precio_unitario": 150.25},
                {"id": 2, "producto_id": 9, "cantidad": 1, "precio_unitario": 110}
            ]
        }))
        .unwrap();
        assert_eq!(a.estado, EstadoAlbaran::Transporte);
        assert_eq!(a.total, 410.5);
        assert_eq!(a.descripcion, "");
        assert_eq!(a.fecha_iso(), "2024-03-05");
        assert_eq!(a.fecha_display(), "05/03/2024");
        assert_eq!(a.lineas[0].subtotal(), 300.5);
        assert_eq!(a.lineas_total(), 410.5);
    }

    #[test]
    fn test_splice_and_for_cliente() {
        let mk = |id: i64, cli: i64, fecha: &str| Albaran {
            id: AlbaranId(id),
            cliente_id: ClienteId(cli),
            fecha: fecha.into(),
            ..Default::default()
        };
        let mut list = vec![mk(1, 1, "2024-01-10"), mk(2, 2, "2024-02-01"), mk(3, 1, "2024-03-01")];

        let mut changed = list[1].clone();
        changed.estado = EstadoAlbaran::Entregado;
        assert!(splice(&mut list, changed));
        assert_eq!(list[1].estado, EstadoAlbaran::Entregado);
        assert!(!splice(&mut list, mk(99, 1, "")));

        let ids: Vec<i64> = for_cliente(&list, ClienteId(1)).iter().map(|a| a.id.value()).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
