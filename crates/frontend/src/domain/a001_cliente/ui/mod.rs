pub mod details;
pub mod list;

pub use details::open_cliente_details;
pub use list::ClienteList;
