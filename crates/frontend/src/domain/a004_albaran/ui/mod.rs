pub mod details;
pub mod list;

pub use details::open_albaran_details;
pub use list::AlbaranList;
