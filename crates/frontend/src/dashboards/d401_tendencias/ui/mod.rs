mod chat;
mod dashboard;

pub use dashboard::TendenciasDashboard;
