//! Calendar bucketing in the viewer's UTC offset.
//!
//! Stored timestamps are UTC. Month and day boundaries are taken in the
//! offset carried by `now`, so a booking created at 23:30 local time lands
//! in the viewer's day, not the UTC one.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::Serialize;

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based.
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    pub fn of<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self { year: dt.year(), month: dt.month() }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// Abbreviated month plus two-digit year, e.g. `"Mar 26"`.
    pub fn label(self) -> String {
        let name = MONTH_ABBREV[(self.month.clamp(1, 12) - 1) as usize];
        format!("{name} {:02}", self.year.rem_euclid(100))
    }

    /// The `n` months ending at `self` (inclusive), oldest first.
    pub fn trailing(self, n: usize) -> Vec<MonthKey> {
        let mut months = Vec::with_capacity(n);
        let mut cursor = self;
        for _ in 0..n {
            months.push(cursor);
            cursor = cursor.previous();
        }
        months.reverse();
        months
    }
}

/// `dt` seen from the viewer's offset.
pub fn localize(dt: &DateTime<Utc>, now: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    dt.with_timezone(now.offset())
}

pub fn month_of(dt: &DateTime<Utc>, now: &DateTime<FixedOffset>) -> MonthKey {
    MonthKey::of(&localize(dt, now))
}

pub fn year_of(dt: &DateTime<Utc>, now: &DateTime<FixedOffset>) -> i32 {
    localize(dt, now).year()
}

/// Date-only component in the viewer's offset.
pub fn local_date(dt: &DateTime<Utc>, now: &DateTime<FixedOffset>) -> NaiveDate {
    localize(dt, now).date_naive()
}
