//! Human time expressions used by the dashboard ("2d", "1hr", a date range or
//! a same-day clock range) and the absolute [`TimeRange`] they resolve to.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimeRangeError {
    #[error("Invalid time format provided")]
    InvalidFormat,
    #[error("Error parsing time field")]
    Unparseable,
    #[error("Start time must be before end time")]
    StartNotBeforeEnd,
}

/// Absolute, half-open query window. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeRangeError> {
        if start >= end {
            return Err(TimeRangeError::StartNotBeforeEnd);
        }
        Ok(Self { start, end })
    }

    /// The window of length `span` ending at `now`.
    pub fn trailing(span: Duration, now: DateTime<Utc>) -> Result<Self, TimeRangeError> {
        let start = now
            .checked_sub_signed(span)
            .ok_or(TimeRangeError::Unparseable)?;
        Self::new(start, now)
    }

    /// Trailing window measured in (possibly fractional) hours.
    pub fn trailing_hours(hours: f64, now: DateTime<Utc>) -> Result<Self, TimeRangeError> {
        if !hours.is_finite() {
            return Err(TimeRangeError::Unparseable);
        }
        let millis = hours * 3_600_000.0;
        if millis.abs() > i64::MAX as f64 {
            return Err(TimeRangeError::Unparseable);
        }
        let span = Duration::try_milliseconds(millis.round() as i64)
            .ok_or(TimeRangeError::Unparseable)?;
        Self::trailing(span, now)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl DurationUnit {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "d" => Some(Self::Days),
            "hr" => Some(Self::Hours),
            "min" => Some(Self::Minutes),
            "sec" => Some(Self::Seconds),
            _ => None,
        }
    }

    pub fn seconds(self) -> i64 {
        match self {
            Self::Days => 86_400,
            Self::Hours => 3_600,
            Self::Minutes => 60,
            Self::Seconds => 1,
        }
    }
}

/// A parsed, not yet anchored, time expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeExpression {
    /// `<n>d`, `<n>hr`, `<n>min`, `<n>sec`: the last n units up to now.
    Relative { amount: i64, unit: DurationUnit },
    /// `YYYY/MM/DD-YYYY/MM/DD`: from the first day's midnight to the last
    /// second of the second day.
    DateRange { from: NaiveDate, to: NaiveDate },
    /// `HH:mm-HH:mm` on the current day.
    ClockRange { from: NaiveTime, to: NaiveTime },
}

impl FromStr for TimeExpression {
    type Err = TimeRangeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if let Some((digits, suffix)) = split_relative(raw) {
            let amount = digits
                .parse::<i64>()
                .map_err(|_| TimeRangeError::Unparseable)?;
            return Ok(Self::Relative { amount, unit: suffix });
        }
        if is_date_range(raw) {
            let (from, to) = raw.split_once('-').ok_or(TimeRangeError::InvalidFormat)?;
            return Ok(Self::DateRange {
                from: parse_date(from)?,
                to: parse_date(to)?,
            });
        }
        if let Some(((fh, fm), (th, tm))) = split_clock_range(raw) {
            return Ok(Self::ClockRange {
                from: clock_time(fh, fm)?,
                to: clock_time(th, tm)?,
            });
        }
        Err(TimeRangeError::InvalidFormat)
    }
}

impl TimeExpression {
    /// Anchors the expression at `now`. Calendar values are interpreted in
    /// `now`'s time zone; the result is always UTC.
    pub fn resolve<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<TimeRange, TimeRangeError> {
        match *self {
            Self::Relative { amount, unit } => {
                let span = unit
                    .seconds()
                    .checked_mul(amount)
                    .and_then(Duration::try_seconds)
                    .ok_or(TimeRangeError::Unparseable)?;
                TimeRange::trailing(span, now.with_timezone(&Utc))
            }
            Self::DateRange { from, to } => {
                let tz = now.timezone();
                let end_of_day =
                    NaiveTime::from_hms_opt(23, 59, 59).ok_or(TimeRangeError::Unparseable)?;
                let start = localize(&tz, from.and_time(NaiveTime::MIN))?;
                let end = localize(&tz, to.and_time(end_of_day))?;
                TimeRange::new(start, end)
            }
            Self::ClockRange { from, to } => {
                let tz = now.timezone();
                let today = now.date_naive();
                let start = localize(&tz, today.and_time(from))?;
                let end = localize(&tz, today.and_time(to))?;
                TimeRange::new(start, end)
            }
        }
    }
}

/// Parses and anchors a time expression in one step.
pub fn parse_time_range<Tz: TimeZone>(
    raw: &str,
    now: &DateTime<Tz>,
) -> Result<TimeRange, TimeRangeError> {
    raw.parse::<TimeExpression>()?.resolve(now)
}

fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Result<DateTime<Utc>, TimeRangeError> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(TimeRangeError::Unparseable)
}

fn split_relative(raw: &str) -> Option<(&str, DurationUnit)> {
    let boundary = raw.find(|c: char| !c.is_ascii_digit())?;
    let (digits, suffix) = raw.split_at(boundary);
    if digits.is_empty() {
        return None;
    }
    DurationUnit::from_suffix(suffix).map(|unit| (digits, unit))
}

fn is_digits(s: &str, min_len: usize, max_len: usize) -> bool {
    (min_len..=max_len).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_date(s: &str) -> bool {
    let mut parts = s.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some(y), Some(m), Some(d), None)
            if is_digits(y, 4, 4) && is_digits(m, 2, 2) && is_digits(d, 2, 2)
    )
}

fn is_date_range(raw: &str) -> bool {
    match raw.split_once('-') {
        Some((from, to)) => is_date(from) && is_date(to),
        None => false,
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, TimeRangeError> {
    NaiveDate::parse_from_str(s, "%Y/%m/%d").map_err(|_| TimeRangeError::Unparseable)
}

fn split_clock(s: &str) -> Option<(&str, &str)> {
    let (hours, minutes) = s.split_once(':')?;
    (is_digits(hours, 1, 2) && is_digits(minutes, 2, 2)).then_some((hours, minutes))
}

#[allow(clippy::type_complexity)]
fn split_clock_range(raw: &str) -> Option<((&str, &str), (&str, &str))> {
    let (from, to) = raw.split_once('-')?;
    Some((split_clock(from)?, split_clock(to)?))
}

fn clock_time(hours: &str, minutes: &str) -> Result<NaiveTime, TimeRangeError> {
    let h = hours.parse::<u32>().map_err(|_| TimeRangeError::Unparseable)?;
    let m = minutes.parse::<u32>().map_err(|_| TimeRangeError::Unparseable)?;
    NaiveTime::from_hms_opt(h, m, 0).ok_or(TimeRangeError::Unparseable)
}
