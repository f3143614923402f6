//! Closed set of screens reachable from the sidebar.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Page {
    #[default]
    Dashboard,
    Clientes,
    Productos,
    Albaranes,
    Movimientos,
    Transporte,
    NuevaVenta,
    Tendencias,
    Banco,
}

impl Page {
    pub const ALL: [Page; 9] = [
        Page::Dashboard,
        Page::Clientes,
        Page::Productos,
        Page::Albaranes,
        Page::Movimientos,
        Page::Transporte,
        Page::NuevaVenta,
        Page::Tendencias,
        Page::Banco,
    ];

    /// Value of the `?page=` query parameter
    pub fn key(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Clientes => "clientes",
            Page::Productos => "productos",
            Page::Albaranes => "albaranes",
            Page::Movimientos => "movimientos",
            Page::Transporte => "transporte",
            Page::NuevaVenta => "nueva-venta",
            Page::Tendencias => "tendencias",
            Page::Banco => "banco",
        }
    }

    pub fn from_key(key: &str) -> Option<Page> {
        Self::ALL.into_iter().find(|p| p.key() == key.trim())
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Clientes => "Clientes",
            Page::Productos => "Productos",
            Page::Albaranes => "Albaranes",
            Page::Movimientos => "Movimientos",
            Page::Transporte => "Transporte",
            Page::NuevaVenta => "Nueva venta",
            Page::Tendencias => "Tendencias",
            Page::Banco => "Banco",
        }
    }

    pub fn icon(self) -> &'static str {
        self.key()
    }
}

/// Sidebar sections as (title, pages)
pub const MENU: [(&str, &[Page]); 3] = [
    ("Panel", &[Page::Dashboard, Page::Tendencias]),
    (
        "Operaciones",
        &[Page::NuevaVenta, Page::Albaranes, Page::Transporte, Page::Movimientos],
    ),
    ("Maestros", &[Page::Clientes, Page::Productos, Page::Banco]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip_and_unknown() {
        for page in Page::ALL {
            assert_eq!(Page::from_key(page.key()), Some(page));
        }
        assert_eq!(Page::from_key("nope"), None);
        assert_eq!(Page::from_key(" banco "), Some(Page::Banco));
    }

    #[test]
    fn test_menu_lists_every_page_once() {
        let mut listed: Vec<Page> = MENU.iter().flat_map(|(_, pages)| pages.iter().copied()).collect();
        listed.sort_by_key(|p| p.key());
        listed.dedup();
        assert_eq!(listed.len(), Page::ALL.len());
    }
}
