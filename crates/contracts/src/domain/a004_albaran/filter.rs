use super::aggregate::Albaran;
use super::estado::EstadoAlbaran;
use crate::domain::a001_cliente::aggregate::ClienteIndex;
use crate::shared::list_query::{
    apply_predicates, apply_sort, cmp_f64, normalize_query, DateRange, FilterChip, NumericRange,
    Predicate, SortDirection, Sortable,
};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Total range used before any data is loaded
pub const TOTAL_RANGE_FALLBACK: (f64, f64) = (0.0, 9_999_999.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbaranKey {
    Fecha,
    Total,
}

impl Sortable for Albaran {
    type Key = AlbaranKey;

    fn compare_by(&self, other: &Self, key: AlbaranKey) -> Ordering {
        match key {
            AlbaranKey::Fecha => self.fecha_date().cmp(&other.fecha_date()),
            AlbaranKey::Total => cmp_f64(self.total, other.total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlbaranSort {
    #[default]
    FechaDesc,
    FechaAsc,
    TotalDesc,
    TotalAsc,
}

impl AlbaranSort {
    pub const ALL: [AlbaranSort; 4] = [
        AlbaranSort::FechaDesc,
        AlbaranSort::FechaAsc,
        AlbaranSort::TotalDesc,
        AlbaranSort::TotalAsc,
    ];

    pub fn key_direction(self) -> (AlbaranKey, SortDirection) {
        match self {
            AlbaranSort::FechaDesc => (AlbaranKey::Fecha, SortDirection::Desc),
            AlbaranSort::FechaAsc => (AlbaranKey::Fecha, SortDirection::Asc),
            AlbaranSort::TotalDesc => (AlbaranKey::Total, SortDirection::Desc),
            AlbaranSort::TotalAsc => (AlbaranKey::Total, SortDirection::Asc),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            AlbaranSort::FechaDesc => "fecha_desc",
            AlbaranSort::FechaAsc => "fecha_asc",
            AlbaranSort::TotalDesc => "total_desc",
            AlbaranSort::TotalAsc => "total_asc",
        }
    }

    pub fn from_code(code: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            AlbaranSort::FechaDesc => "Fecha ↓",
            AlbaranSort::FechaAsc => "Fecha ↑",
            AlbaranSort::TotalDesc => "Total ↓",
            AlbaranSort::TotalAsc => "Total ↑",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbaranChip {
    Query,
    Fechas,
    Total,
    Domain(String),
    Estado(EstadoAlbaran),
    Sort,
}

/// [floor(min), ceil(max)] of the loaded totals
pub fn default_total_range(items: &[Albaran]) -> NumericRange {
    let (lo, hi) = items.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), a| {
        (lo.min(a.total), hi.max(a.total))
    });
    if items.is_empty() || !lo.is_finite() || !hi.is_finite() {
        let (lo, hi) = TOTAL_RANGE_FALLBACK;
        return NumericRange::new(Some(lo), Some(hi));
    }
    NumericRange::new(Some(lo.floor()), Some(hi.ceil()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlbaranFilter {
    pub query: String,
    pub total: NumericRange,
    pub fechas: DateRange,
    pub domains: BTreeSet<String>,
    /// Selected estados in the order they were ticked
    pub estados: Vec<EstadoAlbaran>,
    pub sort: AlbaranSort,
}

impl Default for AlbaranFilter {
    fn default() -> Self {
        Self::with_total_range(default_total_range(&[]))
    }
}

impl AlbaranFilter {
    pub fn with_total_range(total: NumericRange) -> Self {
        Self {
            query: String::new(),
            total,
            fechas: DateRange::unbounded(),
            domains: BTreeSet::new(),
            estados: Vec::new(),
            sort: AlbaranSort::default(),
        }
    }

    pub fn for_items(items: &[Albaran]) -> Self {
        Self::with_total_range(default_total_range(items))
    }

    /// After a reload, move the total range to the new data bounds only when
    /// the user had left it at the previous default. Other selections stay.
    pub fn rebase_total(&mut self, previous_default: NumericRange, new_default: NumericRange) {
        if self.total == previous_default {
            self.total = new_default;
        }
    }

    pub fn toggle_estado(&mut self, estado: &EstadoAlbaran) {
        match self.estados.iter().position(|e| e == estado) {
            Some(pos) => {
                self.estados.remove(pos);
            }
            None => self.estados.push(estado.clone()),
        }
    }

    pub fn predicates<'a>(&'a self, clientes: &'a ClienteIndex) -> Vec<Predicate<'a, Albaran>> {
        let mut preds: Vec<Predicate<'a, Albaran>> = Vec::new();

        let q = normalize_query(&self.query);
        if !q.is_empty() {
            preds.push(Box::new(move |a: &Albaran| {
                let en_cliente = clientes.get(a.cliente_id).map_or(false, |c| {
                    c.nombre_completo().to_lowercase().contains(&q)
                        || c.email.to_lowercase().contains(&q)
                        || c.dni.to_lowercase().contains(&q)
                });
                a.id.to_string().contains(&q)
                    || a.descripcion.to_lowercase().contains(&q)
                    || en_cliente
            }));
        }

        let total = self.total;
        preds.push(Box::new(move |a: &Albaran| total.contains(a.total)));

        if !self.fechas.is_unbounded() {
            let fechas = self.fechas;
            preds.push(Box::new(move |a: &Albaran| {
                a.fecha_date().map_or(false, |d| fechas.contains(d))
            }));
        }

        if !self.domains.is_empty() {
            preds.push(Box::new(move |a: &Albaran| {
                clientes
                    .email_domain(a.cliente_id)
                    .map_or(false, |d| self.domains.contains(&d))
            }));
        }

        if !self.estados.is_empty() {
            preds.push(Box::new(move |a: &Albaran| self.estados.contains(&a.estado)));
        }
        preds
    }

    pub fn apply(&self, items: &[Albaran], clientes: &ClienteIndex) -> Vec<Albaran> {
        let mut list = apply_predicates(items, &self.predicates(clientes));
        let (key, direction) = self.sort.key_direction();
        apply_sort(&mut list, key, direction);
        list
    }

    /// Active chips. The total chip only shows when the range differs from
    /// `default_total`, the range derived from the loaded data.
    pub fn chips(&self, default_total: NumericRange) -> Vec<FilterChip<AlbaranChip>> {
        let mut chips = Vec::new();
        let q = self.query.trim();
        if !q.is_empty() {
            chips.push(FilterChip::new(AlbaranChip::Query, format!("Buscar: \"{}\"", q)));
        }
        if !self.fechas.is_unbounded() {
            let bound = |d: Option<chrono::NaiveDate>| {
                d.map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "—".to_string())
            };
            chips.push(FilterChip::new(
                AlbaranChip::Fechas,
                format!("Fecha {} → {}", bound(self.fechas.min), bound(self.fechas.max)),
            ));
        }
        if self.total != default_total {
            let bound = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_else(|| "—".into());
            chips.push(FilterChip::new(
                AlbaranChip::Total,
                format!("Total {}–{} €", bound(self.total.min), bound(self.total.max)),
            ));
        }
        for dom in &self.domains {
            chips.push(FilterChip::new(
                AlbaranChip::Domain(dom.clone()),
                format!("Dominio: {}", dom),
            ));
        }
        for estado in &self.estados {
            chips.push(FilterChip::new(
                AlbaranChip::Estado(estado.clone()),
                format!("Estado: {}", estado.label()),
            ));
        }
        if self.sort != AlbaranSort::default() {
            chips.push(FilterChip::new(AlbaranChip::Sort, self.sort.label()));
        }
        chips
    }

    pub fn remove_chip(&mut self, chip: &AlbaranChip, default_total: NumericRange) {
        match chip {
            AlbaranChip::Query => self.query.clear(),
            AlbaranChip::Fechas => self.fechas = DateRange::unbounded(),
            AlbaranChip::Total => self.total = default_total,
            AlbaranChip::Domain(dom) => {
                self.domains.remove(dom);
            }
            AlbaranChip::Estado(estado) => self.estados.retain(|e| e != estado),
            AlbaranChip::Sort => self.sort = AlbaranSort::default(),
        }
    }

    pub fn clear(&mut self, default_total: NumericRange) {
        *self = Self::with_total_range(default_total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_cliente::aggregate::Cliente;
    use crate::domain::ids::{AlbaranId, ClienteId};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn albaran(id: i64, fecha: &str, total: f64, cliente: i64, estado: EstadoAlbaran) -> Albaran {
        Albaran {
            id: AlbaranId(id),
            fecha: fecha.into(),
            cliente_id: ClienteId(cliente),
            total,
            estado,
            descripcion: format!("Pedido {}", id),
            ..Default::default()
        }
    }

    fn clientes() -> ClienteIndex {
        ClienteIndex::new(&[
            Cliente {
                id: ClienteId(1),
                nombre: "Lucía".into(),
                apellidos: "Pérez".into(),
                email: "lucia@gmail.com".into(),
                dni: "11111111H".into(),
                ..Default::default()
            },
            Cliente {
                id: ClienteId(2),
                nombre: "Jorge".into(),
                email: "jorge@empresa.es".into(),
                ..Default::default()
            },
        ])
    }

    fn sample() -> Vec<Albaran> {
        vec![
            albaran(1, "2024-01-15", 100.0, 1, EstadoAlbaran::Fianza),
            albaran(2, "2024-02-03", 250.0, 2, EstadoAlbaran::Almacen),
            albaran(3, "2024-01-28T18:30:00", 999.0, 2, EstadoAlbaran::Entregado),
        ]
    }

    fn ids(list: &[Albaran]) -> Vec<i64> {
        list.iter().map(|a| a.id.value()).collect()
    }

    #[test]
    fn test_total_and_month_filter() {
        let data = sample();
        let mut f = AlbaranFilter::for_items(&data);
        f.total = NumericRange::new(Some(100.0), Some(300.0));
        f.fechas = DateRange::new(Some(d(2024, 1, 1)), Some(d(2024, 1, 31)));
        assert_eq!(ids(&f.apply(&data, &clientes())), vec![1]);
    }

    #[test]
    fn test_default_range_and_sort() {
        let data = sample();
        let defaults = default_total_range(&data);
        assert_eq!(defaults, NumericRange::new(Some(100.0), Some(999.0)));
        assert_eq!(
            default_total_range(&[]),
            NumericRange::new(Some(0.0), Some(9_999_999.0))
        );

        let f = AlbaranFilter::for_items(&data);
        assert_eq!(ids(&f.apply(&data, &clientes())), vec![2, 3, 1]);
        assert!(f.chips(defaults).is_empty());

        let f = AlbaranFilter { sort: AlbaranSort::TotalAsc, ..f };
        assert_eq!(ids(&f.apply(&data, &clientes())), vec![1, 2, 3]);
    }

    #[test]
    fn test_search_domain_and_estado() {
        let data = sample();
        let idx = clientes();
        let mut f = AlbaranFilter::for_items(&data);
        f.query = "pérez".into();
        assert_eq!(ids(&f.apply(&data, &idx)), vec![1]);

        f.query.clear();
        f.domains.insert("empresa.es".into());
        assert_eq!(ids(&f.apply(&data, &idx)), vec![2, 3]);

        f.toggle_estado(&EstadoAlbaran::Entregado);
        assert_eq!(ids(&f.apply(&data, &idx)), vec![3]);
        f.toggle_estado(&EstadoAlbaran::Entregado);
        assert!(f.estados.is_empty());
    }

    #[test]
    fn test_predicates_commute() {
        let data = sample();
        let idx = clientes();
        let mut f = AlbaranFilter::for_items(&data);
        f.total = NumericRange::new(Some(200.0), None);
        f.domains.insert("empresa.es".into());
        f.estados.push(EstadoAlbaran::Almacen);

        let forward = apply_predicates(&data, &f.predicates(&idx));
        let mut reversed = f.predicates(&idx);
        reversed.reverse();
        assert_eq!(forward, apply_predicates(&data, &reversed));
        assert_eq!(ids(&forward), vec![2]);
    }

    #[test]
    fn test_reload_keeps_selections() {
        let first = vec![albaran(1, "2024-05-01", 120.0, 1, EstadoAlbaran::Fianza)];
        let second = vec![
            albaran(1, "2024-05-01", 120.0, 1, EstadoAlbaran::Fianza),
            albaran(2, "2024-05-03", 980.4, 2, EstadoAlbaran::Almacen),
        ];

        let mut f = AlbaranFilter::default();
        f.rebase_total(default_total_range(&[]), default_total_range(&first));
        assert_eq!(f.total, default_total_range(&first));

        f.toggle_estado(&EstadoAlbaran::Almacen);
        f.sort = AlbaranSort::FechaAsc;
        f.domains.insert("empresa.es".into());
        f.rebase_total(default_total_range(&first), default_total_range(&second));
        assert_eq!(f.total, NumericRange::new(Some(120.0), Some(981.0)));
        assert_eq!(f.estados, vec![EstadoAlbaran::Almacen]);
        assert_eq!(f.sort, AlbaranSort::FechaAsc);
        assert!(f.domains.contains("empresa.es"));

        f.total = NumericRange::new(Some(500.0), None);
        f.rebase_total(default_total_range(&second), default_total_range(&first));
        assert_eq!(f.total, NumericRange::new(Some(500.0), None));
    }

    #[test]
    fn test_chips() {
        let data = sample();
        let defaults = default_total_range(&data);
        let mut f = AlbaranFilter::for_items(&data);
        f.query = "sofá".into();
        f.fechas = DateRange::new(Some(d(2024, 1, 1)), None);
        f.total = NumericRange::new(Some(100.0), Some(300.0));
        f.estados.push(EstadoAlbaran::Transporte);
        f.sort = AlbaranSort::FechaAsc;

        let labels: Vec<String> = f.chips(defaults).into_iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            vec![
                "Buscar: \"sofá\"",
                "Fecha 2024-01-01 → —",
                "Total 100–300 €",
                "Estado: Ruta",
                "Fecha ↑",
            ]
        );

        f.remove_chip(&AlbaranChip::Total, defaults);
        assert_eq!(f.total, defaults);
        f.clear(defaults);
        assert_eq!(f, AlbaranFilter::for_items(&data));
    }
}
