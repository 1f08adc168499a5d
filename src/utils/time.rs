use chrono::{DateTime, Duration, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Whole days left until `deadline`, rounded up.
///
/// A deadline 1ms away counts as one day; a deadline in the past yields zero
/// or a negative count.
pub fn days_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (deadline - now).num_milliseconds();
    if millis > 0 {
        (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    } else {
        millis / MILLIS_PER_DAY
    }
}

/// `start` plus `days`, clamped to the latest representable instant
pub fn add_days(start: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    start
        .checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

pub fn is_expired(deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= deadline
}
