//! Building blocks of every list screen: text search, ranges, sorting,
//! pagination and the removable filter chips.
//!
//! Entity filters compose independent predicates. Each predicate only looks
//! at one aspect of a row, so the order they are applied in never changes
//! the result.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ===== Search =====

/// Trim and lowercase a query before matching
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Lowercase and drop Spanish diacritics ("Sofá Ñandú" -> "sofa nandu")
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Types that expose a lowercase text used by the free-text search
pub trait Searchable {
    fn search_text(&self) -> String;

    /// `query` must already be normalized; an empty query matches everything
    fn matches_query(&self, query: &str) -> bool {
        query.is_empty() || self.search_text().to_lowercase().contains(query)
    }
}

/// Lower-cased domain of an email address
pub fn email_domain(email: &str) -> Option<String> {
    let (_, domain) = email.trim().rsplit_once('@')?;
    let domain = domain.trim().to_lowercase();
    (!domain.is_empty()).then_some(domain)
}

/// Sorted unique email domains, used to build the domain multi-select
pub fn collect_domains<'a>(emails: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let set: std::collections::BTreeSet<String> =
        emails.into_iter().filter_map(email_domain).collect();
    set.into_iter().collect()
}

// ===== Predicates =====

pub type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;

/// Keep the rows accepted by every predicate, preserving input order
pub fn apply_predicates<T: Clone>(items: &[T], predicates: &[Predicate<'_, T>]) -> Vec<T> {
    items
        .iter()
        .filter(|item| predicates.iter().all(|p| p(item)))
        .cloned()
        .collect()
}

/// Inclusive range with optional bounds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueRange<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

pub type NumericRange = ValueRange<f64>;
pub type IdRange = ValueRange<i64>;
pub type DateRange = ValueRange<chrono::NaiveDate>;

impl<T: PartialOrd + Copy> ValueRange<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn unbounded() -> Self {
        Self { min: None, max: None }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// False when both bounds are set and min > max
    pub fn is_valid(&self) -> bool {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) => lo <= hi,
            _ => true,
        }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.map_or(true, |lo| value >= lo) && self.max.map_or(true, |hi| value <= hi)
    }

    /// Same as `contains` but an invalid range accepts everything
    pub fn contains_lenient(&self, value: T) -> bool {
        !self.is_valid() || self.contains(value)
    }
}

impl ValueRange<i64> {
    /// Clamp bounds to non-negative values and keep max >= min
    pub fn clamped_non_negative(&self) -> Self {
        let min = self.min.map(|v| v.max(0));
        let max = match (min, self.max.map(|v| v.max(0))) {
            (Some(lo), Some(hi)) => Some(hi.max(lo)),
            (_, hi) => hi,
        };
        Self { min, max }
    }
}

// ===== Sorting =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// Types sortable by a closed set of keys
pub trait Sortable {
    type Key: Copy;

    /// Total order for `key` in ascending direction
    fn compare_by(&self, other: &Self, key: Self::Key) -> Ordering;
}

/// Stable sort; equal rows keep their input order in both directions
pub fn apply_sort<T: Sortable>(items: &mut [T], key: T::Key, direction: SortDirection) {
    items.sort_by(|a, b| direction.apply(a.compare_by(b, key)));
}

/// Total order over f64 for comparators (NaN sorts first)
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Case-insensitive text comparison used by name sorts
pub fn cmp_text(a: &str, b: &str) -> Ordering {
    fold_accents(a).cmp(&fold_accents(b))
}

// ===== Pagination =====

/// 1-based page cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self, total: usize) -> usize {
        let size = self.page_size.max(1);
        total.div_ceil(size).max(1)
    }

    /// Current page clamped into [1, total_pages]
    pub fn current_page(&self, total: usize) -> usize {
        self.page.clamp(1, self.total_pages(total))
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let size = self.page_size.max(1);
        let start = (self.current_page(items.len()) - 1) * size;
        let end = (start + size).min(items.len());
        items.get(start..end).unwrap_or(&[])
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}

// ===== Chips =====

/// Removable label describing one active filter
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChip<K> {
    pub key: K,
    pub label: String,
}

impl<K> FilterChip<K> {
    pub fn new(key: K, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        name: &'static str,
        amount: f64,
    }

    #[derive(Clone, Copy)]
    enum RowKey {
        Name,
        Amount,
    }

    impl Sortable for Row {
        type Key = RowKey;
        fn compare_by(&self, other: &Self, key: RowKey) -> Ordering {
            match key {
                RowKey::Name => cmp_text(self.name, other.name),
                RowKey::Amount => cmp_f64(self.amount, other.amount),
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, name: "beta", amount: 10.0 },
            Row { id: 2, name: "Álamo", amount: 10.0 },
            Row { id: 3, name: "alfa", amount: 5.0 },
            Row { id: 4, name: "beta", amount: 1.0 },
        ]
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let mut asc = rows();
        apply_sort(&mut asc, RowKey::Amount, SortDirection::Asc);
        assert_eq!(asc.iter().map(|r| r.id).collect::<Vec<_>>(), vec![4, 3, 1, 2]);

        let mut desc = rows();
        apply_sort(&mut desc, RowKey::Amount, SortDirection::Desc);
        // ties (1 and 2) keep input order
        assert_eq!(desc.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);

        let mut by_name = rows();
        apply_sort(&mut by_name, RowKey::Name, SortDirection::Asc);
        assert_eq!(by_name.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_predicates_commute() {
        let data = rows();
        let min_amount: Predicate<Row> = Box::new(|r| r.amount >= 5.0);
        let name_b: Predicate<Row> = Box::new(|r| r.name.starts_with('b'));
        let a = apply_predicates(&data, &[min_amount, name_b]);

        let min_amount: Predicate<Row> = Box::new(|r| r.amount >= 5.0);
        let name_b: Predicate<Row> = Box::new(|r| r.name.starts_with('b'));
        let b = apply_predicates(&data, &[name_b, min_amount]);

        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].id, 1);
    }

    #[test]
    fn test_ranges() {
        let r = NumericRange::new(Some(100.0), Some(300.0));
        assert!(r.contains(100.0) && r.contains(300.0));
        assert!(!r.contains(999.0));

        let inverted = NumericRange::new(Some(10.0), Some(1.0));
        assert!(!inverted.is_valid());
        assert!(inverted.contains_lenient(500.0));

        let ids = IdRange::new(Some(-5), Some(-9)).clamped_non_negative();
        assert_eq!(ids, IdRange::new(Some(0), Some(0)));
        let ids = IdRange::new(Some(10), Some(3)).clamped_non_negative();
        assert_eq!(ids, IdRange::new(Some(10), Some(10)));
    }

    #[test]
    fn test_pagination() {
        let items: Vec<u32> = (1..=25).collect();
        let mut p = Pagination::new(12);
        assert_eq!(p.total_pages(items.len()), 3);
        assert_eq!(p.slice(&items), &items[0..12]);
        p.page = 3;
        assert_eq!(p.slice(&items), &items[24..25]);
        p.page = 9;
        assert_eq!(p.current_page(items.len()), 3);
        assert_eq!(p.total_pages(0), 1);
        assert!(p.slice::<u32>(&[]).is_empty());
    }

    #[test]
    fn test_text_helpers() {
        assert_eq!(normalize_query("  Sofá "), "sofá");
        assert_eq!(fold_accents("Sofá Ñandú"), "sofa nandu");
        assert_eq!(email_domain("Ana@Gmail.COM").as_deref(), Some("gmail.com"));
        assert_eq!(email_domain("no-at"), None);
        assert_eq!(email_domain("x@"), None);
        assert_eq!(
            collect_domains(["b@x.es", "a@A.com", "c@x.es", "none"]),
            vec!["a.com".to_string(), "x.es".to_string()]
        );
    }
}
