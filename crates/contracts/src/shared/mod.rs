pub mod ai;
pub mod chart;
pub mod config;
pub mod dates;
pub mod debounce;
pub mod error;
pub mod format;
pub mod list_query;
