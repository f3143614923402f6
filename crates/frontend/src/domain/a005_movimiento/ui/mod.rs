pub mod list;

pub use list::MovimientoList;
