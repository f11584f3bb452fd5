//! Resolves the server's configured timezone and the local calendar days in it.

use time::{Date, Duration, OffsetDateTime};
use time_tz::{Offset, OffsetResult, PrimitiveDateTimeExt, TimeZone, Tz};

use crate::Error;

/// Get a timezone by its canonical name, e.g. "Pacific/Auckland".
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the timezone name is not known.
pub fn get_timezone(canonical_timezone: &str) -> Result<&'static Tz, Error> {
    time_tz::timezones::get_by_name(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })
}

/// The first instant of `date` in `timezone`.
///
/// The offset is the one in effect on that day, not the current one, so
/// days on either side of a daylight saving change start at local midnight.
///
/// Returns `None` if the instant cannot be represented.
pub fn start_of_day(date: Date, timezone: &Tz) -> Option<OffsetDateTime> {
    let midnight = date.midnight();

    match midnight.assume_timezone(timezone) {
        OffsetResult::Some(start) => Some(start),
        OffsetResult::Ambiguous(first, second) => Some(first.min(second)),
        // The clocks skipped midnight, so the day starts when they jumped.
        OffsetResult::None => {
            let day_before = midnight.assume_utc().checked_sub(Duration::DAY)?;
            let offset_before = timezone.get_offset_utc(&day_before).to_utc();
            Some(midnight.assume_offset(offset_before))
        }
    }
}

/// The last whole second of `date` in `timezone`.
///
/// Returns `None` if the instant cannot be represented.
pub fn end_of_day(date: Date, timezone: &Tz) -> Option<OffsetDateTime> {
    start_of_day(date.next_day()?, timezone)?.checked_sub(Duration::SECOND)
}
