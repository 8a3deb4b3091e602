//! Date helpers shared by the scheduler and the stats queries.

use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Last instant of the UTC day containing `as_of`.
///
/// Cards due at any point today count as due, so the study queue does not
/// change as the day goes on.
pub fn end_of_day(as_of: DateTime<Utc>) -> DateTime<Utc> {
    let last = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    as_of.date_naive().and_time(last).and_utc()
}

/// Whole days elapsed between two instants, never negative.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    to.signed_duration_since(from).num_days().max(0)
}

/// Duration of `minutes` minutes.
pub fn minutes(minutes: u32) -> Duration {
    Duration::minutes(i64::from(minutes))
}
