use super::aggregate::Producto;
use crate::domain::a002_proveedor::aggregate::ProveedorIndex;
use crate::domain::ids::ProveedorId;
use crate::shared::list_query::{
    apply_predicates, apply_sort, cmp_f64, cmp_text, normalize_query, FilterChip, NumericRange,
    Predicate, Searchable, SortDirection, Sortable,
};
use std::cmp::Ordering;

/// Product joined with its supplier name
#[derive(Debug, Clone, PartialEq)]
pub struct ProductoRow {
    pub producto: Producto,
    pub proveedor: String,
}

impl ProductoRow {
    pub fn join(items: &[Producto], proveedores: &ProveedorIndex) -> Vec<ProductoRow> {
        items
            .iter()
            .map(|p| ProductoRow {
                producto: p.clone(),
                proveedor: proveedores.name(p.proveedor_id),
            })
            .collect()
    }
}

impl Searchable for ProductoRow {
    fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.producto.nombre, self.producto.descripcion, self.producto.id, self.proveedor
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductoKey {
    Nombre,
    Precio,
    Proveedor,
}

impl Sortable for ProductoRow {
    type Key = ProductoKey;

    fn compare_by(&self, other: &Self, key: ProductoKey) -> Ordering {
        match key {
            ProductoKey::Nombre => cmp_text(&self.producto.nombre, &other.producto.nombre),
            ProductoKey::Precio => cmp_f64(self.producto.precio, other.producto.precio),
            ProductoKey::Proveedor => cmp_text(&self.proveedor, &other.proveedor),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductoSort {
    #[default]
    NombreAz,
    NombreZa,
    PrecioAsc,
    PrecioDesc,
    ProveedorAz,
    ProveedorZa,
}

impl ProductoSort {
    pub const ALL: [ProductoSort; 6] = [
        ProductoSort::NombreAz,
        ProductoSort::NombreZa,
        ProductoSort::PrecioAsc,
        ProductoSort::PrecioDesc,
        ProductoSort::ProveedorAz,
        ProductoSort::ProveedorZa,
    ];

    pub fn key_direction(self) -> (ProductoKey, SortDirection) {
        use SortDirection::*;
        match self {
            ProductoSort::NombreAz => (ProductoKey::Nombre, Asc),
            ProductoSort::NombreZa => (ProductoKey::Nombre, Desc),
            ProductoSort::PrecioAsc => (ProductoKey::Precio, Asc),
            ProductoSort::PrecioDesc => (ProductoKey::Precio, Desc),
            ProductoSort::ProveedorAz => (ProductoKey::Proveedor, Asc),
            ProductoSort::ProveedorZa => (ProductoKey::Proveedor, Desc),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ProductoSort::NombreAz => "nombre_az",
            ProductoSort::NombreZa => "nombre_za",
            ProductoSort::PrecioAsc => "precio_up",
            ProductoSort::PrecioDesc => "precio_down",
            ProductoSort::ProveedorAz => "prov_az",
            ProductoSort::ProveedorZa => "prov_za",
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
            ProductoSort::NombreAz => "Nombre A→Z",
            ProductoSort::NombreZa => "Nombre Z→A",
            ProductoSort::PrecioAsc => "Precio ↑",
            ProductoSort::PrecioDesc => "Precio ↓",
            ProductoSort::ProveedorAz => "Proveedor A→Z",
            ProductoSort::ProveedorZa => "Proveedor Z→A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductoChip {
    Query,
    Proveedor,
    Precio,
    Sort,
    SoloConDescripcion,
    SoloPrecioPositivo,
}

/// Search, filters and sort of the product catalogue
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductoFilter {
    pub query: String,
    pub proveedor: Option<ProveedorId>,
    pub precio: NumericRange,
    pub solo_con_descripcion: bool,
    pub solo_precio_positivo: bool,
    pub sort: ProductoSort,
}

impl ProductoFilter {
    /// min > max; the price bounds are ignored while this holds
    pub fn precio_range_invalid(&self) -> bool {
        !self.precio.is_valid()
    }

    pub fn predicates(&self) -> Vec<Predicate<'_, ProductoRow>> {
        let mut preds: Vec<Predicate<'_, ProductoRow>> = Vec::new();

        let q = normalize_query(&self.query);
        if !q.is_empty() {
            preds.push(Box::new(move |r: &ProductoRow| r.matches_query(&q)));
        }
        if let Some(prov) = self.proveedor {
            preds.push(Box::new(move |r: &ProductoRow| r.producto.proveedor_id == prov));
        }
        if self.solo_con_descripcion {
            preds.push(Box::new(|r: &ProductoRow| {
                !r.producto.descripcion.trim().is_empty()
            }));
        }
        if self.solo_precio_positivo {
            preds.push(Box::new(|r: &ProductoRow| r.producto.precio > 0.0));
        }
        if !self.precio.is_unbounded() {
            let range = self.precio;
            preds.push(Box::new(move |r: &ProductoRow| {
                range.contains_lenient(r.producto.precio)
            }));
        }
        preds
    }

    pub fn apply(&self, rows: &[ProductoRow]) -> Vec<ProductoRow> {
        let mut list = apply_predicates(rows, &self.predicates());
        let (key, direction) = self.sort.key_direction();
        apply_sort(&mut list, key, direction);
        list
    }

    pub fn chips(&self, proveedores: &ProveedorIndex) -> Vec<FilterChip<ProductoChip>> {
        let mut chips = Vec::new();
        let q = self.query.trim();
        if !q.is_empty() {
            chips.push(FilterChip::new(ProductoChip::Query, format!("Buscar: \"{}\"", q)));
        }
        if let Some(prov) = self.proveedor {
            chips.push(FilterChip::new(
                ProductoChip::Proveedor,
                format!("Proveedor: {}", proveedores.name(prov)),
            ));
        }
        if !self.precio.is_unbounded() {
            let bound = |v: Option<f64>| v.map(|n| format!("{}€", n)).unwrap_or_else(|| "—".into());
            chips.push(FilterChip::new(
                ProductoChip::Precio,
                format!("Precio: {} – {}", bound(self.precio.min), bound(self.precio.max)),
            ));
        }
        if self.sort != ProductoSort::default() {
            chips.push(FilterChip::new(
                ProductoChip::Sort,
                format!("Orden: {}", self.sort.label()),
            ));
        }
        if self.solo_con_descripcion {
            chips.push(FilterChip::new(ProductoChip::SoloConDescripcion, "Solo con descripción"));
        }
        if self.solo_precio_positivo {
            chips.push(FilterChip::new(ProductoChip::SoloPrecioPositivo, "Precio > 0"));
        }
        chips
    }

    pub fn remove_chip(&mut self, chip: &ProductoChip) {
        match chip {
            ProductoChip::Query => self.query.clear(),
            ProductoChip::Proveedor => self.proveedor = None,
            ProductoChip::Precio => self.precio = NumericRange::unbounded(),
            ProductoChip::Sort => self.sort = ProductoSort::default(),
            ProductoChip::SoloConDescripcion => self.solo_con_descripcion = false,
            ProductoChip::SoloPrecioPositivo => self.solo_precio_positivo = false,
        }
    }
}

/// Products of one supplier, for the grouped view
#[derive(Debug, Clone, PartialEq)]
pub struct ProveedorGroup {
    pub proveedor_id: ProveedorId,
    pub titulo: String,
    pub items: Vec<ProductoRow>,
}

/// Group an already filtered list by supplier, groups sorted by title.
/// Items keep the list order inside each group.
pub fn group_by_proveedor(rows: &[ProductoRow], proveedores: &ProveedorIndex) -> Vec<ProveedorGroup> {
    let mut groups: Vec<ProveedorGroup> = Vec::new();
    for row in rows {
        let pid = row.producto.proveedor_id;
        match groups.iter_mut().find(|g| g.proveedor_id == pid) {
            Some(group) => group.items.push(row.clone()),
            None => groups.push(ProveedorGroup {
                proveedor_id: pid,
                titulo: proveedores.group_title(pid),
                items: vec![row.clone()],
            }),
        }
    }
    groups.sort_by(|a, b| cmp_text(&a.titulo, &b.titulo));
    groups
}

/// List of the management tab: own search, always sorted by name
pub fn gestion_list(rows: &[ProductoRow], query: &str) -> Vec<ProductoRow> {
    let q = normalize_query(query);
    let mut list: Vec<ProductoRow> = rows.iter().filter(|r| r.matches_query(&q)).cloned().collect();
    apply_sort(&mut list, ProductoKey::Nombre, SortDirection::Asc);
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a002_proveedor::aggregate::Proveedor;
    use crate::domain::ids::ProductoId;

    fn index() -> ProveedorIndex {
        ProveedorIndex::new(&[
            Proveedor { id: ProveedorId(1), nombre: "Tapicerías Norte".into(), contacto: String::new() },
            Proveedor { id: ProveedorId(2), nombre: "Carpintería Eloy".into(), contacto: String::new() },
        ])
    }

    fn producto(id: i64, nombre: &str, precio: f64, prov: i64, desc: &str) -> Producto {
        Producto {
            id: ProductoId(id),
            nombre: nombre.into(),
            descripcion: desc.into(),
            precio,
            proveedor_id: ProveedorId(prov),
        }
    }

    fn rows() -> Vec<ProductoRow> {
        ProductoRow::join(
            &[
                producto(1, "Sofá cama", 650.0, 1, "tres plazas"),
                producto(2, "Mesa comedor", 320.0, 2, ""),
                producto(3, "Estantería", 0.0, 2, "pino"),
                producto(4, "Puf", 45.0, 9, ""),
            ],
            &index(),
        )
    }

    fn ids(list: &[ProductoRow]) -> Vec<i64> {
        list.iter().map(|r| r.producto.id.value()).collect()
    }

    #[test]
    fn test_default_view() {
        let f = ProductoFilter::default();
        assert_eq!(ids(&f.apply(&rows())), vec![3, 2, 4, 1]);
        assert!(f.chips(&index()).is_empty());
    }

    #[test]
    fn test_search_matches_supplier_name() {
        let f = ProductoFilter { query: "eloy".into(), ..Default::default() };
        assert_eq!(ids(&f.apply(&rows())), vec![3, 2]);
    }

    #[test]
    fn test_invalid_price_range_is_ignored() {
        let mut f = ProductoFilter {
            precio: NumericRange::new(Some(500.0), Some(100.0)),
            ..Default::default()
        };
        assert!(f.precio_range_invalid());
        assert_eq!(f.apply(&rows()).len(), 4);

        f.precio = NumericRange::new(Some(40.0), Some(400.0));
        assert_eq!(ids(&f.apply(&rows())), vec![2, 4]);
    }

    #[test]
    fn test_flags_and_sorts() {
        let f = ProductoFilter {
            solo_con_descripcion: true,
            solo_precio_positivo: true,
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&rows())), vec![1]);

        let f = ProductoFilter { sort: ProductoSort::PrecioDesc, ..Default::default() };
        assert_eq!(ids(&f.apply(&rows())), vec![1, 2, 4, 3]);

        let f = ProductoFilter { sort: ProductoSort::from_code("prov_az"), ..Default::default() };
        // "#9" sorts before letters
        assert_eq!(ids(&f.apply(&rows())), vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_chips() {
        let mut f = ProductoFilter {
            query: "mesa".into(),
            proveedor: Some(ProveedorId(2)),
            precio: NumericRange::new(Some(10.0), None),
            sort: ProductoSort::PrecioAsc,
            solo_con_descripcion: true,
            solo_precio_positivo: true,
        };
        let labels: Vec<String> = f.chips(&index()).into_iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            vec![
                "Buscar: \"mesa\"",
                "Proveedor: Carpintería Eloy",
                "Precio: 10€ – —",
                "Orden: Precio ↑",
                "Solo con descripción",
                "Precio > 0",
            ]
        );
        for chip in f.chips(&index()) {
            f.remove_chip(&chip.key);
        }
        assert_eq!(f, ProductoFilter::default());
    }

    #[test]
    fn test_grouping() {
        let groups = group_by_proveedor(&rows(), &index());
        let titles: Vec<&str> = groups.iter().map(|g| g.titulo.as_str()).collect();
        assert_eq!(titles, vec!["Carpintería Eloy", "Proveedor #9", "Tapicerías Norte"]);
        assert_eq!(ids(&groups[0].items), vec![2, 3]);
    }

    #[test]
    fn test_gestion_list() {
        assert_eq!(ids(&gestion_list(&rows(), "")), vec![3, 2, 4, 1]);
        assert_eq!(ids(&gestion_list(&rows(), "3")), vec![3]);
    }
}
