pub mod aggregate;
pub mod estado;
pub mod filter;
