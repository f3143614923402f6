//! Dashboard figures derived from the live movimientos and albaranes lists.

use crate::domain::a004_albaran::aggregate::Albaran;
use crate::domain::a004_albaran::estado::EstadoAlbaran;
use crate::domain::a005_movimiento::aggregate::Movimiento;
use crate::domain::a005_movimiento::ledger::{
    latest, month_summary, monthly_series, MonthPoint, MonthSummary,
};
use crate::shared::format::round2;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Months in the income/expense chart
pub const SERIES_MONTHS: u32 = 6;
/// Rows in "Últimos movimientos"
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstadoCount {
    pub estado: EstadoAlbaran,
    pub count: usize,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumenDashboard {
    pub mes: MonthSummary,
    /// Known estados in lifecycle order, then unknown ones as they appear
    pub estados: Vec<EstadoCount>,
    pub series: Vec<MonthPoint>,
    pub recientes: Vec<Movimiento>,
}

impl ResumenDashboard {
    pub fn build(movimientos: &[Movimiento], albaranes: &[Albaran], today: NaiveDate) -> Self {
        Self {
            mes: month_summary(movimientos, today),
            estados: count_by_estado(albaranes),
            series: monthly_series(movimientos, today, SERIES_MONTHS),
            recientes: latest(movimientos, RECENT_LIMIT),
        }
    }

    /// Albaranes not yet delivered
    pub fn abiertos(&self) -> usize {
        self.estados
            .iter()
            .filter(|e| !e.estado.is_final())
            .map(|e| e.count)
            .sum()
    }

    /// (labels, ingresos, egresos) for the line chart
    pub fn chart_series(&self) -> (Vec<String>, Vec<f64>, Vec<f64>) {
        let labels = self.series.iter().map(|p| p.summary.period_label()).collect();
        let ingresos = self.series.iter().map(|p| p.summary.ingresos).collect();
        let egresos = self.series.iter().map(|p| p.summary.egresos).collect();
        (labels, ingresos, egresos)
    }
}

pub fn count_by_estado(albaranes: &[Albaran]) -> Vec<EstadoCount> {
    let mut out: Vec<EstadoCount> = EstadoAlbaran::CHAIN
        .iter()
        .map(|estado| EstadoCount {
            estado: estado.clone(),
            count: 0,
            total: 0.0,
        })
        .collect();

    for a in albaranes {
        match out.iter_mut().find(|e| e.estado == a.estado) {
            Some(entry) => {
                entry.count += 1;
                entry.total = round2(entry.total + a.total);
            }
            None => out.push(EstadoCount {
                estado: a.estado.clone(),
                count: 1,
                total: round2(a.total),
            }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a005_movimiento::aggregate::TipoMovimiento;
    use crate::domain::ids::{AlbaranId, MovimientoId};

    fn mov(id: i64, fecha: &str, cantidad: f64, tipo: TipoMovimiento) -> Movimiento {
        Movimiento {
            id: MovimientoId(id),
            fecha: fecha.into(),
            concepto: format!("m{}", id),
            cantidad,
            tipo,
        }
    }

    fn alb(id: i64, estado: EstadoAlbaran, total: f64) -> Albaran {
        Albaran {
            id: AlbaranId(id),
            estado,
            total,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_dashboard() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let movs = vec![
            mov(1, "2024-05-02", 1000.0, TipoMovimiento::Ingreso),
            mov(2, "2024-05-10", 250.5, TipoMovimiento::Egreso),
            mov(3, "2024-03-01", 80.0, TipoMovimiento::Ingreso),
            mov(4, "2023-10-01", 999.0, TipoMovimiento::Ingreso),
        ];
        let albs = vec![
            alb(1, EstadoAlbaran::Fianza, 100.0),
            alb(2, EstadoAlbaran::Fianza, 50.0),
            alb(3, EstadoAlbaran::Entregado, 300.0),
            alb(4, EstadoAlbaran::Otro("ANULADO".into()), 10.0),
        ];
        let d = ResumenDashboard::build(&movs, &albs, today);

        assert_eq!(d.mes.balance(), 749.5);
        assert_eq!(d.estados.len(), 5);
        assert_eq!(d.estados[0].count, 2);
        assert_eq!(d.estados[0].total, 150.0);
        assert_eq!(d.estados[4].estado, EstadoAlbaran::Otro("ANULADO".into()));
        assert_eq!(d.abiertos(), 3);

        let (labels, ingresos, _) = d.chart_series();
        assert_eq!(labels.len(), SERIES_MONTHS as usize);
        assert_eq!(labels.last().map(String::as_str), Some("5/2024"));
        assert_eq!(ingresos[3], 80.0);
        assert_eq!(d.recientes[0].id, MovimientoId(2));
        assert_eq!(d.recientes.len(), 4);
    }
}
