//! Converts a requested month or rolling range into a concrete date interval.
//!
//! All calendar calculations happen in the server's local timezone, using
//! the UTC offset in effect on each day rather than the current one.

use time::{Date, Month, OffsetDateTime};
use time_tz::{OffsetDateTimeExt, Tz};

use crate::{
    Error,
    timezone::{end_of_day, start_of_day},
    transaction::DateInterval,
};

/// A calendar month and the closed interval covering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPeriod {
    /// The month number, 1 for January through to 12 for December.
    pub month: u8,
    /// The calendar year.
    pub year: i32,
    /// From midnight on the first day to 23:59:59 on the last day of the month.
    pub interval: DateInterval,
}

/// Resolve a 1-indexed `month` of `year` into a [MonthPeriod].
///
/// Missing values default to the month and year of `now` in `timezone`. Months outside
/// 1-12 roll over into the neighbouring years, so month 13 of 2024 is
/// January 2025 and month 0 of 2024 is December 2023.
///
/// # Errors
/// Returns [Error::InvalidPeriod] if the resulting month lies outside the
/// range of representable dates.
pub fn resolve_month(
    month: Option<i32>,
    year: Option<i32>,
    now: OffsetDateTime,
    timezone: &Tz,
) -> Result<MonthPeriod, Error> {
    let now = now.to_timezone(timezone);
    let requested_month = month.unwrap_or_else(|| i32::from(u8::from(now.month())));
    let requested_year = year.unwrap_or_else(|| now.year());
    let invalid_period = || Error::InvalidPeriod {
        month: requested_month,
        year: requested_year,
    };

    let index = month_index(requested_year, requested_month);
    let first_day = month_start(index).ok_or_else(invalid_period)?;
    let last_day = month_end(first_day).ok_or_else(invalid_period)?;

    let interval = DateInterval {
        start: start_of_day(first_day, timezone).ok_or_else(invalid_period)?,
        end: end_of_day(last_day, timezone).ok_or_else(invalid_period)?,
    };

    tracing::debug!(
        "Resolved month {requested_month} of {requested_year} to {} - {}",
        interval.start,
        interval.end
    );

    Ok(MonthPeriod {
        month: u8::from(first_day.month()),
        year: first_day.year(),
        interval,
    })
}

/// A rolling window of whole months that ends now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrendRange {
    /// The current month and the two before it.
    ThreeMonths,
    /// The current month and the five before it.
    #[default]
    SixMonths,
    /// The current month and the eleven before it.
    TwelveMonths,
}

impl TrendRange {
    /// Parse a range token such as "3months".
    ///
    /// Missing or unknown tokens fall back to [TrendRange::SixMonths].
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some("3months") => TrendRange::ThreeMonths,
            Some("12months") => TrendRange::TwelveMonths,
            Some("6months") | None => TrendRange::SixMonths,
            Some(other) => {
                tracing::debug!("Unknown trend range {other:?}, using 6months");
                TrendRange::SixMonths
            }
        }
    }

    /// The token that identifies the range in requests and responses.
    pub fn as_token(&self) -> &'static str {
        match self {
            TrendRange::ThreeMonths => "3months",
            TrendRange::SixMonths => "6months",
            TrendRange::TwelveMonths => "12months",
        }
    }

    /// The number of calendar months in the window, including the current one.
    pub fn months(&self) -> i32 {
        match self {
            TrendRange::ThreeMonths => 3,
            TrendRange::SixMonths => 6,
            TrendRange::TwelveMonths => 12,
        }
    }
}

/// Resolve `range` into an interval from the first instant of the earliest
/// month in the window, in `timezone`, up to `now`.
///
/// # Errors
/// Returns [Error::InvalidPeriod] if the start of the window lies outside the
/// range of representable dates.
pub fn resolve_range(
    range: TrendRange,
    now: OffsetDateTime,
    timezone: &Tz,
) -> Result<DateInterval, Error> {
    let now = now.to_timezone(timezone);
    let current_month = i32::from(u8::from(now.month()));
    let index = month_index(now.year(), current_month) - i64::from(range.months() - 1);
    let invalid_period = || Error::InvalidPeriod {
        month: current_month,
        year: now.year(),
    };

    let first_day = month_start(index).ok_or_else(invalid_period)?;

    Ok(DateInterval {
        start: start_of_day(first_day, timezone).ok_or_else(invalid_period)?,
        end: now,
    })
}

/// Count months from January of year zero, so that month arithmetic is plain
/// integer arithmetic.
fn month_index(year: i32, month: i32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

/// The first day of the month at `index`, see [month_index].
fn month_start(index: i64) -> Option<Date> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u8::try_from(index.rem_euclid(12) + 1).ok()?;
    let month = Month::try_from(month).ok()?;

    Date::from_calendar_date(year, month, 1).ok()
}

/// The last day of the month starting on `first_day`.
fn month_end(first_day: Date) -> Option<Date> {
    if first_day.month() == Month::December {
        return Date::from_calendar_date(first_day.year(), Month::December, 31).ok();
    }

    let index = month_index(first_day.year(), i32::from(u8::from(first_day.month())));
    month_start(index + 1)?.previous_day()
}
