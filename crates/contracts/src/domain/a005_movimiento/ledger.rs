//! Monthly income/expense totals for the Movimientos header and the dashboard.

use super::aggregate::{Movimiento, TipoMovimiento};
use crate::shared::dates::{month_key, month_start_back, same_month};
use crate::shared::format::round2;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub ingresos: f64,
    pub egresos: f64,
}

impl MonthSummary {
    pub fn balance(&self) -> f64 {
        round2(self.ingresos - self.egresos)
    }

    /// "5/2024"
    pub fn period_label(&self) -> String {
        format!("{}/{}", self.month, self.year)
    }

    fn add(&mut self, m: &Movimiento) {
        match m.tipo {
            TipoMovimiento::Ingreso => self.ingresos = round2(self.ingresos + m.cantidad),
            TipoMovimiento::Egreso => self.egresos = round2(self.egresos + m.cantidad),
        }
    }
}

/// Totals of the month containing `today`. Rows without a readable date are skipped.
pub fn month_summary(items: &[Movimiento], today: NaiveDate) -> MonthSummary {
    let mut summary = MonthSummary {
        year: today.year(),
        month: today.month(),
        ..Default::default()
    };
    for m in items {
        if m.fecha_date().map_or(false, |d| same_month(d, today)) {
            summary.add(m);
        }
    }
    summary
}

/// One point of the monthly series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthPoint {
    /// "YYYY-MM"
    pub key: String,
    pub summary: MonthSummary,
}

/// The last `months` months up to and including the month of `today`,
/// oldest first. Months without movements are present with zeros.
pub fn monthly_series(items: &[Movimiento], today: NaiveDate, months: u32) -> Vec<MonthPoint> {
    (0..months.max(1))
        .rev()
        .map(|back| {
            let start = month_start_back(today, back);
            MonthPoint {
                key: month_key(start),
                summary: month_summary(items, start),
            }
        })
        .collect()
}

/// Most recent movements first, at most `limit`
pub fn latest(items: &[Movimiento], limit: usize) -> Vec<Movimiento> {
    let mut list = items.to_vec();
    list.sort_by(|a, b| b.fecha_date().cmp(&a.fecha_date()));
    list.truncate(limit);
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::MovimientoId;

    fn mov(id: i64, fecha: &str, cantidad: f64, tipo: TipoMovimiento) -> Movimiento {
        Movimiento {
            id: MovimientoId(id),
            fecha: fecha.into(),
            concepto: String::new(),
            cantidad,
            tipo,
        }
    }

    fn sample() -> Vec<Movimiento> {
        vec![
            mov(1, "2024-05-01", 650.0, TipoMovimiento::Ingreso),
            mov(2, "2024-05-10", 80.5, TipoMovimiento::Egreso),
            mov(3, "2024-05-20", 320.0, TipoMovimiento::Ingreso),
            mov(4, "2024-03-02", 100.0, TipoMovimiento::Egreso),
            mov(5, "sin fecha", 999.0, TipoMovimiento::Ingreso),
        ]
    }

    #[test]
    fn test_month_summary() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 25).unwrap();
        let s = month_summary(&sample(), today);
        assert_eq!(s.ingresos, 970.0);
        assert_eq!(s.egresos, 80.5);
        assert_eq!(s.balance(), 889.5);
        assert_eq!(s.period_label(), "5/2024");
    }

    #[test]
    fn test_monthly_series_fills_gaps() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 25).unwrap();
        let series = monthly_series(&sample(), today, 3);
        let keys: Vec<&str> = series.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-03", "2024-04", "2024-05"]);
        assert_eq!(series[0].summary.egresos, 100.0);
        assert_eq!(series[1].summary, MonthSummary { year: 2024, month: 4, ..Default::default() });
        assert_eq!(series[2].summary.ingresos, 970.0);
    }

    #[test]
    fn test_latest() {
        let ids: Vec<i64> = latest(&sample(), 2).iter().map(|m| m.id.value()).collect();
        assert_eq!(ids, vec![3, 2]);
    }
}
