use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use staybook_core::{Reservation, ReservationStatus};

use crate::period::Period;

/// Display order of the distribution; also the donut rotation order.
pub const STATUS_ORDER: [ReservationStatus; 5] = [
    ReservationStatus::Confirmed,
    ReservationStatus::Completed,
    ReservationStatus::Pending,
    ReservationStatus::Cancelled,
    ReservationStatus::Refunded,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ReservationStatus,
    pub count: usize,
}

/// Reservation counts per status inside `period`.
///
/// Unrecognized statuses are counted as pending. Statuses with no
/// reservations are left out.
pub fn status_distribution(
    reservations: &[Reservation],
    now: &DateTime<FixedOffset>,
    period: Period,
) -> Vec<StatusCount> {
    let mut counts = [0usize; STATUS_ORDER.len()];
    for r in reservations.iter().filter(|r| period.admits(r.created_at.as_ref(), now)) {
        let status = match r.status() {
            ReservationStatus::Unrecognized => ReservationStatus::Pending,
            s => s,
        };
        if let Some(slot) = STATUS_ORDER.iter().position(|s| *s == status) {
            counts[slot] += 1;
        }
    }

    STATUS_ORDER
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(status, count)| StatusCount { status: *status, count })
        .collect()
}
