//! Suggestion boxes of the new sale form.

use crate::domain::a001_cliente::aggregate::Cliente;
use crate::domain::a003_producto::aggregate::Producto;
use crate::shared::list_query::{fold_accents, normalize_query, Searchable};

pub const MAX_SUGGESTIONS: usize = 8;

/// Products whose accent-folded name contains the query, best match
/// (earliest position) first, at most eight
pub fn rank_product_suggestions(items: &[Producto], query: &str) -> Vec<Producto> {
    let q = fold_accents(query.trim());
    if q.is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<(usize, &Producto)> = items
        .iter()
        .filter_map(|p| fold_accents(&p.nombre).find(&q).map(|pos| (pos, p)))
        .collect();
    scored.sort_by_key(|(pos, _)| *pos);
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, p)| p.clone())
        .collect()
}

/// Client-side fallback when `/clientes/search` is unavailable
pub fn filter_clientes(items: &[Cliente], query: &str) -> Vec<Cliente> {
    let q = normalize_query(query);
    if q.is_empty() {
        return Vec::new();
    }
    items
        .iter()
        .filter(|c| c.matches_query(&q))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

/// Text put in the client box once a client is chosen
pub fn cliente_caption(c: &Cliente) -> String {
    let extra = if !c.dni.is_empty() {
        format!(" · {}", c.dni)
    } else if !c.email.is_empty() {
        format!(" · {}", c.email)
    } else {
        String::new()
    };
    format!("{} {}{}", c.nombre, c.apellidos, extra)
}

/// Open suggestion list with a keyboard cursor
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionList<T> {
    pub items: Vec<T>,
    pub active: Option<usize>,
}

impl<T> Default for SuggestionList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            active: None,
        }
    }
}

impl<T: Clone> SuggestionList<T> {
    /// New results; the cursor starts on the first one
    pub fn with_items(items: Vec<T>) -> Self {
        let active = if items.is_empty() { None } else { Some(0) };
        Self { items, active }
    }

    pub fn is_open(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn move_down(&mut self) {
        if let Some(last) = self.items.len().checked_sub(1) {
            self.active = Some(self.active.map_or(0, |i| (i + 1).min(last)));
        }
    }

    pub fn move_up(&mut self) {
        if !self.items.is_empty() {
            self.active = Some(self.active.map_or(0, |i| i.saturating_sub(1)));
        }
    }

    pub fn current(&self) -> Option<T> {
        self.active.and_then(|i| self.items.get(i).cloned())
    }

    pub fn close(&mut self) {
        self.items.clear();
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{ClienteId, ProductoId};

    fn p(id: i64, nombre: &str) -> Producto {
        Producto {
            id: ProductoId(id),
            nombre: nombre.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rank_by_position_ignoring_accents() {
        let items = vec![
            p(1, "Mesa de salón"),
            p(2, "Salón modular"),
            p(3, "Silla"),
            p(4, "Aparador salon"),
        ];
        let ids: Vec<i64> = rank_product_suggestions(&items, "SALON")
            .iter()
            .map(|p| p.id.value())
            .collect();
        assert_eq!(ids, vec![2, 1, 4]);
        assert!(rank_product_suggestions(&items, "  ").is_empty());

        let many: Vec<Producto> = (0..12).map(|i| p(i, "Cojín")).collect();
        assert_eq!(rank_product_suggestions(&many, "coj").len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_client_fallback_and_caption() {
        let c = Cliente {
            id: ClienteId(1),
            nombre: "Lucía".into(),
            apellidos: "Pérez".into(),
            email: "lucia@x.es".into(),
            ..Default::default()
        };
        assert_eq!(filter_clientes(&[c.clone()], "x.es").len(), 1);
        assert_eq!(cliente_caption(&c), "Lucía Pérez · lucia@x.es");
    }

    #[test]
    fn test_keyboard_cursor() {
        let mut list = SuggestionList::with_items(vec!["a", "b", "c"]);
        assert_eq!(list.current(), Some("a"));
        list.move_down();
        list.move_down();
        list.move_down();
        assert_eq!(list.current(), Some("c"));
        list.move_up();
        assert_eq!(list.current(), Some("b"));
        list.close();
        assert!(!list.is_open());
        assert_eq!(list.current(), None);
        list.move_down();
        assert_eq!(list.active, None);
    }
}
