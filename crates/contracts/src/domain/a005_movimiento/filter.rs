use super::aggregate::{Movimiento, TipoMovimiento};
use crate::shared::list_query::{apply_predicates, normalize_query, DateRange, Predicate, Searchable};

impl Searchable for Movimiento {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.concepto, self.tipo.code(), self.cantidad)
    }
}

/// Filters of the Movimientos table. `tipo == None` means all types.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovimientoFilter {
    pub query: String,
    pub tipo: Option<TipoMovimiento>,
    /// Both ends inclusive; `max` covers the whole day
    pub fechas: DateRange,
}

impl MovimientoFilter {
    pub fn predicates(&self) -> Vec<Predicate<'_, Movimiento>> {
        let mut preds: Vec<Predicate<'_, Movimiento>> = Vec::new();
        if let Some(tipo) = self.tipo {
            preds.push(Box::new(move |m: &Movimiento| m.tipo == tipo));
        }
        if !self.fechas.is_unbounded() {
            let fechas = self.fechas;
            preds.push(Box::new(move |m: &Movimiento| {
                m.fecha_date().map_or(false, |d| fechas.contains(d))
            }));
        }
        let q = normalize_query(&self.query);
        if !q.is_empty() {
            preds.push(Box::new(move |m: &Movimiento| m.matches_query(&q)));
        }
        preds
    }

    /// Filtered rows in server order
    pub fn apply(&self, items: &[Movimiento]) -> Vec<Movimiento> {
        apply_predicates(items, &self.predicates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::MovimientoId;
    use chrono::NaiveDate;

    fn mov(id: i64, fecha: &str, concepto: &str, cantidad: f64, tipo: TipoMovimiento) -> Movimiento {
        Movimiento {
            id: MovimientoId(id),
            fecha: fecha.into(),
            concepto: concepto.into(),
            cantidad,
            tipo,
        }
    }

    fn sample() -> Vec<Movimiento> {
        vec![
            mov(1, "2024-05-01", "Venta sofá", 650.0, TipoMovimiento::Ingreso),
            mov(2, "2024-05-10T17:45:00", "Gasoil camión", 80.0, TipoMovimiento::Egreso),
            mov(3, "2024-04-28", "Venta mesa", 320.0, TipoMovimiento::Ingreso),
        ]
    }

    fn ids(list: &[Movimiento]) -> Vec<i64> {
        list.iter().map(|m| m.id.value()).collect()
    }

    #[test]
    fn test_until_is_inclusive_of_whole_day() {
        let f = MovimientoFilter {
            fechas: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 5, 1),
                NaiveDate::from_ymd_opt(2024, 5, 10),
            ),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&sample())), vec![1, 2]);
    }

    #[test]
    fn test_tipo_and_text() {
        let f = MovimientoFilter {
            tipo: Some(TipoMovimiento::Ingreso),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&sample())), vec![1, 3]);

        let f = MovimientoFilter {
            query: "egreso".into(),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&sample())), vec![2]);

        let f = MovimientoFilter {
            query: "320".into(),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&sample())), vec![3]);
    }

    #[test]
    fn test_predicates_commute() {
        let f = MovimientoFilter {
            query: "venta".into(),
            tipo: Some(TipoMovimiento::Ingreso),
            fechas: DateRange::new(NaiveDate::from_ymd_opt(2024, 5, 1), None),
        };
        let data = sample();
        let mut reversed = f.predicates();
        reversed.reverse();
        assert_eq!(f.apply(&data), apply_predicates(&data, &reversed));
        assert_eq!(ids(&f.apply(&data)), vec![1]);
    }
}
