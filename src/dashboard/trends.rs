//! Computes the multi-month trends shown on the dashboard.

use time::OffsetDateTime;
use time_tz::Tz;

use crate::{
    Error,
    dashboard::{
        aggregation::{CategoryTotal, TrendPoint, monthly_series, top_expense_categories},
        period::{TrendRange, resolve_range},
        summary::computation_failed,
    },
    transaction::{DateInterval, TransactionStore},
    user::UserID,
};

/// The number of expense categories ranked in the trends.
pub const TOP_CATEGORY_LIMIT: usize = 10;

/// Monthly totals and the largest expense categories over a rolling window.
#[derive(Debug, Clone, PartialEq)]
pub struct Trends {
    /// The window the trends cover.
    pub range: TrendRange,
    /// The interval the window resolved to.
    pub interval: DateInterval,
    /// Income and expense totals per month, oldest first.
    pub series: Vec<TrendPoint>,
    /// The expense categories with the largest totals over the whole window.
    pub categories: Vec<CategoryTotal>,
}

/// Compute `owner`'s trends over `range` ending at `now`, with calendar
/// months taken in `timezone`.
///
/// # Errors
/// Returns:
/// - [Error::InvalidPeriod] if the window cannot be represented,
/// - or [Error::ComputationFailed] if the store fails.
pub fn get_trends(
    store: &impl TransactionStore,
    owner: UserID,
    range: TrendRange,
    now: OffsetDateTime,
    timezone: &Tz,
) -> Result<Trends, Error> {
    let interval = resolve_range(range, now, timezone)?;

    let transactions = store.find(owner, interval).map_err(computation_failed)?;

    Ok(Trends {
        range,
        interval,
        series: monthly_series(&transactions, timezone),
        categories: top_expense_categories(&transactions, TOP_CATEGORY_LIMIT),
    })
}
