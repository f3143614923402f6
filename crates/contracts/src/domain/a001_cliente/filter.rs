use super::aggregate::Cliente;
use crate::shared::list_query::{
    apply_predicates, apply_sort, cmp_text, collect_domains, normalize_query, FilterChip, IdRange,
    Predicate, Searchable, SortDirection, Sortable,
};
use std::cmp::Ordering;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClienteKey {
    Nombre,
    Id,
}

impl Sortable for Cliente {
    type Key = ClienteKey;

    fn compare_by(&self, other: &Self, key: ClienteKey) -> Ordering {
        match key {
            ClienteKey::Nombre => cmp_text(&self.nombre, &other.nombre),
            ClienteKey::Id => self.id.cmp(&other.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClienteSort {
    #[default]
    NombreAz,
    NombreZa,
    IdAsc,
    IdDesc,
}

impl ClienteSort {
    pub const ALL: [ClienteSort; 4] = [
        ClienteSort::NombreAz,
        ClienteSort::NombreZa,
        ClienteSort::IdAsc,
        ClienteSort::IdDesc,
    ];

    pub fn key_direction(self) -> (ClienteKey, SortDirection) {
        match self {
            ClienteSort::NombreAz => (ClienteKey::Nombre, SortDirection::Asc),
            ClienteSort::NombreZa => (ClienteKey::Nombre, SortDirection::Desc),
            ClienteSort::IdAsc => (ClienteKey::Id, SortDirection::Asc),
            ClienteSort::IdDesc => (ClienteKey::Id, SortDirection::Desc),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ClienteSort::NombreAz => "az",
            ClienteSort::NombreZa => "za",
            ClienteSort::IdAsc => "id_up",
            ClienteSort::IdDesc => "id_down",
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
            ClienteSort::NombreAz => "A→Z",
            ClienteSort::NombreZa => "Z→A",
            ClienteSort::IdAsc => "ID↑",
            ClienteSort::IdDesc => "ID↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClienteChip {
    Query,
    Ids,
    Domain(String),
    Sort,
}

/// Search, filters and sort of the Clientes list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClienteFilter {
    /// Debounced query as typed
    pub query: String,
    pub ids: IdRange,
    pub domains: BTreeSet<String>,
    pub sort: ClienteSort,
}

/// [min id, max id] of the loaded rows, unbounded when empty
pub fn default_id_range(items: &[Cliente]) -> IdRange {
    let min = items.iter().map(|c| c.id.value()).min();
    let max = items.iter().map(|c| c.id.value()).max();
    IdRange::new(min, max)
}

pub fn available_domains(items: &[Cliente]) -> Vec<String> {
    collect_domains(items.iter().map(|c| c.email.as_str()))
}

impl ClienteFilter {
    pub fn for_items(items: &[Cliente]) -> Self {
        Self {
            ids: default_id_range(items),
            ..Default::default()
        }
    }

    pub fn set_ids(&mut self, min: Option<i64>, max: Option<i64>) {
        self.ids = IdRange::new(min, max).clamped_non_negative();
    }

    pub fn predicates(&self) -> Vec<Predicate<'_, Cliente>> {
        let mut preds: Vec<Predicate<'_, Cliente>> = Vec::new();

        let q = normalize_query(&self.query);
        if !q.is_empty() {
            preds.push(Box::new(move |c: &Cliente| c.matches_query(&q)));
        }
        if !self.ids.is_unbounded() {
            let ids = self.ids;
            preds.push(Box::new(move |c: &Cliente| ids.contains(c.id.value())));
        }
        if !self.domains.is_empty() {
            preds.push(Box::new(move |c: &Cliente| {
                c.email_domain()
                    .map_or(false, |d| self.domains.contains(&d))
            }));
        }
        preds
    }

    /// Filtered and sorted view
    pub fn apply(&self, items: &[Cliente]) -> Vec<Cliente> {
        let mut list = apply_predicates(items, &self.predicates());
        let (key, direction) = self.sort.key_direction();
        apply_sort(&mut list, key, direction);
        list
    }

    pub fn chips(&self, default_ids: IdRange) -> Vec<FilterChip<ClienteChip>> {
        let mut chips = Vec::new();
        let q = self.query.trim();
        if !q.is_empty() {
            chips.push(FilterChip::new(ClienteChip::Query, format!("Buscar: \"{}\"", q)));
        }
        if self.ids != default_ids {
            let lo = self.ids.min.map(|v| v.to_string()).unwrap_or_else(|| "—".into());
            let hi = self.ids.max.map(|v| v.to_string()).unwrap_or_else(|| "—".into());
            chips.push(FilterChip::new(ClienteChip::Ids, format!("ID {}–{}", lo, hi)));
        }
        for dom in &self.domains {
            chips.push(FilterChip::new(
                ClienteChip::Domain(dom.clone()),
                format!("Dominio: {}", dom),
            ));
        }
        if self.sort != ClienteSort::default() {
            chips.push(FilterChip::new(
                ClienteChip::Sort,
                format!("Orden: {}", self.sort.label()),
            ));
        }
        chips
    }

    pub fn remove_chip(&mut self, chip: &ClienteChip, default_ids: IdRange) {
        match chip {
            ClienteChip::Query => self.query.clear(),
            ClienteChip::Ids => self.ids = default_ids,
            ClienteChip::Domain(dom) => {
                self.domains.remove(dom);
            }
            ClienteChip::Sort => self.sort = ClienteSort::default(),
        }
    }

    pub fn clear(&mut self, default_ids: IdRange) {
        *self = Self {
            ids: default_ids,
            ..Default::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::ClienteId;

    fn cliente(id: i64, nombre: &str, email: &str) -> Cliente {
        Cliente {
            id: ClienteId(id),
            nombre: nombre.into(),
            apellidos: "García".into(),
            email: email.into(),
            dni: format!("{:08}X", id),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Cliente> {
        vec![
            cliente(4, "Marta", "marta@gmail.com"),
            cliente(1, "Álvaro", "alvaro@empresa.es"),
            cliente(7, "Bea", "bea@gmail.com"),
            cliente(2, "Carlos", "carlos@yahoo.es"),
        ]
    }

    fn ids(list: &[Cliente]) -> Vec<i64> {
        list.iter().map(|c| c.id.value()).collect()
    }

    #[test]
    fn test_default_sort_is_alphabetical() {
        let data = sample();
        let filter = ClienteFilter::for_items(&data);
        assert_eq!(ids(&filter.apply(&data)), vec![1, 7, 2, 4]);
        assert!(filter.chips(default_id_range(&data)).is_empty());
    }

    #[test]
    fn test_query_domain_and_ids() {
        let data = sample();
        let mut filter = ClienteFilter::for_items(&data);
        filter.domains.insert("gmail.com".into());
        assert_eq!(ids(&filter.apply(&data)), vec![7, 4]);

        filter.set_ids(Some(5), Some(10));
        assert_eq!(ids(&filter.apply(&data)), vec![7]);

        filter.query = "  MARTA ".into();
        assert!(filter.apply(&data).is_empty());
    }

    #[test]
    fn test_predicate_order_does_not_matter() {
        let data = sample();
        let mut filter = ClienteFilter::for_items(&data);
        filter.query = "garcía".into();
        filter.domains.insert("gmail.com".into());
        filter.set_ids(Some(0), Some(5));

        let forward = apply_predicates(&data, &filter.predicates());
        let mut reversed_preds = filter.predicates();
        reversed_preds.reverse();
        let backward = apply_predicates(&data, &reversed_preds);
        assert_eq!(forward, backward);
        assert_eq!(ids(&forward), vec![4]);
    }

    #[test]
    fn test_sort_variants() {
        let data = sample();
        let mut filter = ClienteFilter::for_items(&data);
        filter.sort = ClienteSort::IdDesc;
        assert_eq!(ids(&filter.apply(&data)), vec![7, 4, 2, 1]);
        filter.sort = ClienteSort::from_code("za");
        assert_eq!(ids(&filter.apply(&data)), vec![4, 2, 7, 1]);
        assert_eq!(ClienteSort::from_code("???"), ClienteSort::NombreAz);
    }

    #[test]
    fn test_chips_and_removal() {
        let data = sample();
        let defaults = default_id_range(&data);
        let mut filter = ClienteFilter::for_items(&data);
        filter.query = "ana".into();
        filter.set_ids(Some(2), Some(4));
        filter.domains.insert("gmail.com".into());
        filter.sort = ClienteSort::IdAsc;

        let labels: Vec<String> = filter.chips(defaults).into_iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            vec!["Buscar: \"ana\"", "ID 2–4", "Dominio: gmail.com", "Orden: ID↑"]
        );

        filter.remove_chip(&ClienteChip::Domain("gmail.com".into()), defaults);
        filter.remove_chip(&ClienteChip::Ids, defaults);
        assert_eq!(filter.chips(defaults).len(), 2);

        filter.clear(defaults);
        assert_eq!(filter, ClienteFilter::for_items(&data));
    }

    #[test]
    fn test_available_domains() {
        assert_eq!(
            available_domains(&sample()),
            vec!["empresa.es", "gmail.com", "yahoo.es"]
        );
    }
}
