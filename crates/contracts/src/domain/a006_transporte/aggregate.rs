//! Wire types of the `/transporte` endpoints.

use crate::domain::a004_albaran::aggregate::Albaran;
use crate::domain::ids::{AlbaranId, CamionId, MovimientoId};
use crate::shared::format::{deserialize_f64, deserialize_text};
use serde::{Deserialize, Serialize};

/// Orders loaded on one truck
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CamionRuta {
    pub camion_id: CamionId,
    #[serde(default)]
    pub albaranes: Vec<Albaran>,
}

impl CamionRuta {
    pub fn total(&self) -> f64 {
        self.albaranes.iter().map(|a| a.total).sum()
    }
}

/// `GET /transporte/rutas`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RutasResponse {
    #[serde(default)]
    pub camiones: Vec<CamionRuta>,
    /// Orders in route state without a truck
    #[serde(default)]
    pub sin_camion: Vec<Albaran>,
}

/// `POST /transporte/ruta/asignar`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsignarRequest {
    pub camion_id: CamionId,
    pub albaran_ids: Vec<AlbaranId>,
}

/// Body of `quitar`, `pendiente` and `factura`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbaranIdsRequest {
    pub albaran_ids: Vec<AlbaranId>,
}

/// `POST /transporte/ruta/{id}/liquidar`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LiquidarResponse {
    #[serde(default)]
    pub ok: bool,
    pub camion_id: CamionId,
    #[serde(default)]
    pub n_albaranes: u32,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub base_total: f64,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub porcentaje: f64,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub importe: f64,
    #[serde(default)]
    pub movimiento_id: Option<MovimientoId>,
}

/// `POST /transporte/factura`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FacturaTransporteResponse {
    #[serde(default)]
    pub n_pedidos: u32,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub importe: f64,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub path: String,
}

/// File name of the route invoice download
pub fn factura_filename(camion_id: CamionId) -> String {
    format!("factura_ruta_camion_{}.pdf", camion_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rutas_response() {
        let r: RutasResponse = serde_json::from_value(json!({
            "camiones": [
                {"camion_id": 2, "albaranes": [
                    {"id": 5, "fecha": "2024-05-01", "cliente_id": 1, "total": 300.0, "estado": "RUTA"},
                    {"id": 6, "fecha": "2024-05-02", "cliente_id": 2, "total": 200.5, "estado": "RUTA"}
                ]}
            ],
            "sin_camion": []
        }))
        .unwrap();
        assert_eq!(r.camiones[0].camion_id, CamionId(2));
        assert_eq!(r.camiones[0].total(), 500.5);
        assert!(r.sin_camion.is_empty());
    }

    #[test]
    fn test_request_bodies() {
        let body = AsignarRequest {
            camion_id: CamionId(3),
            albaran_ids: vec![AlbaranId(10), AlbaranId(11)],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"camion_id": 3, "albaran_ids": [10, 11]})
        );
        assert_eq!(factura_filename(CamionId(3)), "factura_ruta_camion_3.pdf");
    }

    #[test]
    fn test_liquidar_response() {
        let r: LiquidarResponse = serde_json::from_value(json!({
            "ok": true, "camion_id": 1, "n_albaranes": 2, "base_total": 1000.0,
            "porcentaje": 7.0, "importe": 70.0, "movimiento_id": 44
        }))
        .unwrap();
        assert_eq!(r.importe, 70.0);
        assert_eq!(r.movimiento_id, Some(MovimientoId(44)));
    }
}
