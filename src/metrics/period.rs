use crate::constants::MIN_PERIOD_SECS;
use crate::timerange::TimeRange;

/// Rounds a period up to the next whole minute, never below one minute.
pub fn round_up_to_minute(secs: i64) -> i32 {
    let base = i64::from(MIN_PERIOD_SECS);
    if secs <= base {
        return MIN_PERIOD_SECS;
    }
    let remainder = secs % base;
    let rounded = if remainder == 0 {
        secs
    } else {
        secs.saturating_add(base - remainder)
    };
    i32::try_from(rounded).unwrap_or(i32::MAX - i32::MAX % MIN_PERIOD_SECS)
}

/// Smallest whole-minute period that keeps a series over `range` within
/// `max_points` datapoints.
pub fn period_for_budget(range: &TimeRange, max_points: u32) -> i32 {
    let range_ms = range.duration().num_milliseconds().max(0);
    let bucket_ms = i64::from(max_points.max(1)) * 1000;
    let secs = range_ms / bucket_ms + i64::from(range_ms % bucket_ms != 0);
    round_up_to_minute(secs)
}
