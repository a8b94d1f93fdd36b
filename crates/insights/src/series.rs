use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use staybook_core::Reservation;

use crate::calendar::{month_of, MonthKey};
use crate::earnings::{earned, host_earning};

/// One month of the revenue series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: MonthKey,
    pub label: String,
    pub earnings_cents: i64,
    /// Earned reservations created in the month.
    pub bookings: usize,
}

/// Earned revenue per month for the `months` months ending at `now`'s
/// month, oldest first. Always returns exactly `months` points; months
/// without revenue are present with zero.
pub fn monthly_revenue(reservations: &[Reservation], now: &DateTime<FixedOffset>, months: usize) -> Vec<MonthlyPoint> {
    let keys = MonthKey::of(now).trailing(months);
    let mut buckets: HashMap<MonthKey, (i64, usize)> = keys.iter().map(|k| (*k, (0, 0))).collect();

    for r in earned(reservations) {
        let Some(created) = r.created_at.as_ref() else {
            continue;
        };
        if let Some(bucket) = buckets.get_mut(&month_of(created, now)) {
            bucket.0 = bucket.0.saturating_add(host_earning(r));
            bucket.1 += 1;
        }
    }

    keys.into_iter()
        .map(|month| {
            let (earnings_cents, bookings) = buckets[&month];
            MonthlyPoint { month, label: month.label(), earnings_cents, bookings }
        })
        .collect()
}
