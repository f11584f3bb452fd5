//! Computes the monthly summary shown on the dashboard.

use time::OffsetDateTime;
use time_tz::Tz;

use crate::{
    Error,
    dashboard::{
        aggregation::{PeriodTotals, summarize},
        period::{MonthPeriod, resolve_month},
    },
    transaction::{Transaction, TransactionStore},
    user::UserID,
};

/// The number of transactions listed as recent activity in a summary.
pub const RECENT_TRANSACTION_LIMIT: u64 = 5;

/// The totals of one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// The month the totals cover.
    pub period: MonthPeriod,
    /// The totals of the transactions dated within the month.
    pub totals: PeriodTotals,
    /// The owner's most recently dated transactions over all time, newest first.
    ///
    /// These are not limited to the summary's month.
    pub recent_transactions: Vec<Transaction>,
}

/// Summarise `owner`'s transactions for a month, see [resolve_month] for how
/// `month` and `year` are interpreted in `timezone`.
///
/// # Errors
/// Returns:
/// - [Error::InvalidPeriod] if the month cannot be represented,
/// - or [Error::ComputationFailed] if the store fails.
pub fn get_summary(
    store: &impl TransactionStore,
    owner: UserID,
    month: Option<i32>,
    year: Option<i32>,
    now: OffsetDateTime,
    timezone: &Tz,
) -> Result<Summary, Error> {
    let period = resolve_month(month, year, now, timezone)?;

    let transactions = store
        .find(owner, period.interval)
        .map_err(computation_failed)?;
    let totals = summarize(&transactions);

    let recent_transactions = store
        .find_recent(owner, RECENT_TRANSACTION_LIMIT)
        .map_err(computation_failed)?;

    Ok(Summary {
        period,
        totals,
        recent_transactions,
    })
}

pub(super) fn computation_failed(error: Error) -> Error {
    tracing::error!("could not read transactions for the dashboard: {error}");
    Error::ComputationFailed(error.to_string())
}
