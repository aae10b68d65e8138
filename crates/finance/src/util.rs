//! Internal helpers for input normalization and calendar-day arithmetic.
//!
//! These utilities are **not** part of the public API. Day truncation lives
//! here so snapshot writes, snapshot lookups and report ranges agree on
//! where a day starts.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::{FinanceError, ResultFinance};

/// Time zone used for day boundaries when none is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Jakarta;

/// Calendar day of `at` as seen in `tz`.
pub fn local_day(at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

/// `[start, end)` of `day` in `tz`, in UTC.
pub fn day_bounds(day: NaiveDate, tz: Tz) -> ResultFinance<(DateTime<Utc>, DateTime<Utc>)> {
    let next = day
        .succ_opt()
        .ok_or_else(|| FinanceError::Validation(format!("date out of range: {day}")))?;
    Ok((start_of(day, tz)?, start_of(next, tz)?))
}

fn start_of(day: NaiveDate, tz: Tz) -> ResultFinance<DateTime<Utc>> {
    tz.from_local_datetime(&day.and_time(NaiveTime::MIN))
        .earliest()
        .map(|start| start.with_timezone(&Utc))
        .ok_or_else(|| FinanceError::Validation(format!("no midnight on {day} in {tz}")))
}

/// Parse an IANA zone name such as `Asia/Jakarta`.
pub fn parse_timezone(name: &str) -> ResultFinance<Tz> {
    name.parse::<Tz>()
        .map_err(|_| FinanceError::Validation(format!("unknown time zone: {name}")))
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultFinance<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FinanceError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}
