use crate::domain::ids::MovimientoId;
use crate::shared::dates::parse_date;
use crate::shared::format::{deserialize_f64, deserialize_text, parse_amount};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TipoMovimiento {
    #[default]
    Ingreso,
    Egreso,
}

impl TipoMovimiento {
    pub const ALL: [TipoMovimiento; 2] = [TipoMovimiento::Ingreso, TipoMovimiento::Egreso];

    pub fn code(self) -> &'static str {
        match self {
            TipoMovimiento::Ingreso => "INGRESO",
            TipoMovimiento::Egreso => "EGRESO",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            TipoMovimiento::Ingreso => "Ingreso",
            TipoMovimiento::Egreso => "Egreso",
        }
    }

    pub fn badge_variant(self) -> &'static str {
        match self {
            TipoMovimiento::Ingreso => "success",
            TipoMovimiento::Egreso => "error",
        }
    }
}

/// Income or expense entry of `GET /movimientos/get`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Movimiento {
    pub id: MovimientoId,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub fecha: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub concepto: String,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub cantidad: f64,
    #[serde(default)]
    pub tipo: TipoMovimiento,
}

impl Movimiento {
    pub fn fecha_date(&self) -> Option<NaiveDate> {
        parse_date(&self.fecha)
    }

    /// Signed amount: expenses count negative
    pub fn signed(&self) -> f64 {
        match self.tipo {
            TipoMovimiento::Ingreso => self.cantidad,
            TipoMovimiento::Egreso => -self.cantidad,
        }
    }
}

/// Body of `POST /movimientos/post`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovimientoCreate {
    pub fecha: String,
    pub concepto: String,
    pub cantidad: f64,
    pub tipo: TipoMovimiento,
}

/// Add-form input as typed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovimientoForm {
    pub fecha: String,
    pub concepto: String,
    pub cantidad: String,
    pub tipo: TipoMovimiento,
}

impl MovimientoForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            fecha: today.format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    /// None while fecha, concepto or cantidad is missing
    pub fn to_request(&self) -> Option<MovimientoCreate> {
        let fecha = self.fecha.trim();
        let concepto = self.concepto.trim();
        if fecha.is_empty() || concepto.is_empty() {
            return None;
        }
        let cantidad = parse_amount(&self.cantidad)?;
        Some(MovimientoCreate {
            fecha: fecha.to_string(),
            concepto: concepto.to_string(),
            cantidad,
            tipo: self.tipo,
        })
    }

    /// Clear the fields after a successful post, keeping the date
    pub fn reset_after_post(&mut self) {
        self.concepto.clear();
        self.cantidad.clear();
        self.tipo = TipoMovimiento::Ingreso;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let m: Movimiento = serde_json::from_str(
            r#"{"id":4,"fecha":"2024-05-02","concepto":"Liquidación ruta","cantidad":"84.7","tipo":"EGRESO"}"#,
        )
        .unwrap();
        assert_eq!(m.tipo, TipoMovimiento::Egreso);
        assert_eq!(m.signed(), -84.7);
        assert_eq!(TipoMovimiento::from_code("INGRESO"), Some(TipoMovimiento::Ingreso));
        assert_eq!(TipoMovimiento::from_code("TODOS"), None);
    }

    #[test]
    fn test_form_requires_all_fields() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let mut form = MovimientoForm::new(today);
        assert_eq!(form.fecha, "2024-05-02");
        assert!(form.to_request().is_none());

        form.concepto = "Venta mesa".into();
        assert!(form.to_request().is_none());

        form.cantidad = "120,5".into();
        let req = form.to_request().unwrap();
        assert_eq!(req.cantidad, 120.5);
        assert_eq!(
            serde_json::to_value(&req).unwrap()["tipo"],
            serde_json::json!("INGRESO")
        );

        form.tipo = TipoMovimiento::Egreso;
        form.reset_after_post();
        assert_eq!(form, MovimientoForm::new(today));
    }
}
