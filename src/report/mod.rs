//! Growth analytics derived from the raw collections

pub mod stats;
pub mod trend;

pub use stats::DashboardStats;
pub use trend::{growth_pct, TrendReport};
