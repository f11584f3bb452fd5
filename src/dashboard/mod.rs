//! Dashboard module
//!
//! Computes monthly summaries and multi-month trends from a user's
//! transactions and serves them as JSON.

mod aggregation;
mod format;
mod handlers;
mod period;
mod summary;
mod trends;

pub use aggregation::{CategoryTotal, PeriodTotals, TrendPoint};
pub use handlers::{get_summary_endpoint, get_trends_endpoint};
pub use period::{MonthPeriod, TrendRange};
pub use summary::{Summary, get_summary};
pub use trends::{Trends, get_trends};
