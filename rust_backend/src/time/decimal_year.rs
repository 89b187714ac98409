use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::Serialize;

use crate::core::error::DateParseError;

/// Canonical display format for schedule times, e.g. `2022-06-21--02:41:18`.
pub const SCHEDULE_FORMAT: &str = "%Y-%m-%d--%H:%M:%S";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Date-and-time layouts seen in visit status reports, tried in order.
const DATETIME_FORMATS: [&str; 5] = [
    "%b %d, %Y %H:%M:%S",
    "%d-%b-%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    SCHEDULE_FORMAT,
];

/// Date-only layouts; these resolve to midnight.
const DATE_FORMATS: [&str; 3] = ["%d-%b-%Y", "%b %d, %Y", "%Y-%m-%d"];

/// A parsed schedule instant with its derived representations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleDate {
    pub datetime: NaiveDateTime,
    /// Unrounded decimal year.
    pub decimal_year: f64,
    /// `YYYY-MM-DD--HH:MM:SS`
    pub formatted: String,
}

impl ScheduleDate {
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self {
            datetime,
            decimal_year: decimal_year(&datetime),
            formatted: datetime.format(SCHEDULE_FORMAT).to_string(),
        }
    }

    /// Decimal year rounded to three places, as reported in summaries.
    pub fn decimal_year_rounded(&self) -> f64 {
        round3(self.decimal_year)
    }
}

/// Parses a visit report date such as `"Jun 21, 2022 02:41:18"` or `"15-JAN-2024"`.
///
/// Month names are matched case-insensitively. Times are taken as UTC.
///
/// # Examples
///
/// ```
/// use trexolists::time::parse_vsr_date;
///
/// let date = parse_vsr_date("Jun 21, 2022 02:41:18").unwrap();
/// assert_eq!(date.formatted, "2022-06-21--02:41:18");
/// assert_eq!(date.decimal_year_rounded(), 2022.469);
/// ```
pub fn parse_vsr_date(input: &str) -> Result<ScheduleDate, DateParseError> {
    let trimmed = input.trim().trim_end_matches('Z');

    let datetime = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| DateParseError {
            input: input.to_string(),
        })?;

    Ok(ScheduleDate::from_datetime(datetime))
}

fn days_in_year(year: i32) -> f64 {
    match NaiveDate::from_ymd_opt(year, 12, 31) {
        Some(last) => f64::from(last.ordinal()),
        None => 365.0,
    }
}

/// Fractional year: seconds elapsed since January 1 00:00:00 divided by the
/// length of that calendar year (365 or 366 days).
pub fn decimal_year(datetime: &NaiveDateTime) -> f64 {
    let year = datetime.year();
    let elapsed = f64::from(datetime.ordinal0()) * SECONDS_PER_DAY
        + f64::from(datetime.num_seconds_from_midnight())
        + f64::from(datetime.nanosecond()) / 1e9;
    f64::from(year) + elapsed / (days_in_year(year) * SECONDS_PER_DAY)
}

/// Inverse of [`decimal_year`], rounded to the nearest second.
pub fn from_decimal_year(value: f64) -> Option<NaiveDateTime> {
    if !value.is_finite() {
        return None;
    }
    let floor = value.floor();
    if floor < f64::from(i32::MIN) || floor > f64::from(i32::MAX) {
        return None;
    }
    let year = floor as i32;
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let seconds = ((value - floor) * days_in_year(year) * SECONDS_PER_DAY).round() as i64;
    start.checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
