//! Time source for the data layer.
//!
//! Every timestamp the store writes on its own (tracking start/stop, archive
//! auto-close, elapsed time of open logs) comes from a [`Clock`], so tests can
//! pin "now" instead of racing the wall clock.

use chrono::{Local, NaiveDate, TimeZone};
use std::sync::atomic::{AtomicI64, Ordering};

/// Milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self { now: AtomicI64::new(now) }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Epoch-millisecond bounds `[start, end]` of a calendar day in local time:
/// 00:00:00.000 through 23:59:59.999.
///
/// On days where local midnight does not exist (DST gaps) the earliest valid
/// instant of the day is used.
pub fn local_day_bounds(date: NaiveDate) -> (i64, i64) {
    day_bounds_in(&Local, date)
}

/// [`local_day_bounds`] for an arbitrary time zone.
pub fn day_bounds_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> (i64, i64) {
    let start = midnight_millis(tz, date);
    let end = match date.succ_opt() {
        Some(next) => midnight_millis(tz, next) - 1,
        None => start + 86_400_000 - 1,
    };
    (start, end)
}

fn midnight_millis<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> i64 {
    let mut naive = date.and_time(chrono::NaiveTime::MIN);
    // Walk forward through a DST gap until a local instant exists
    for _ in 0..24 * 4 {
        if let Some(local) = tz.from_local_datetime(&naive).earliest() {
            return local.timestamp_millis();
        }
        naive += chrono::Duration::minutes(15);
    }
    naive.and_utc().timestamp_millis()
}
