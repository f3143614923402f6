mod dashboard;

pub use dashboard::ResumenDashboardView;
