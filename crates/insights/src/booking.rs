//! Today / upcoming check-in views.
//!
//! Comparisons are by calendar date in the viewer's offset; time of day is
//! ignored. Reservations without a readable check-in appear in neither view.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use staybook_core::{Reservation, ReservationStatus};

use crate::calendar::local_date;
use crate::earnings::host_earning;

fn check_in_date(r: &Reservation, now: &DateTime<FixedOffset>) -> Option<NaiveDate> {
    r.check_in.as_ref().map(|c| local_date(c, now))
}

/// Checking in today, and still expected (confirmed or pending).
pub fn is_today(r: &Reservation, now: &DateTime<FixedOffset>) -> bool {
    check_in_date(r, now) == Some(now.date_naive())
        && matches!(r.status(), ReservationStatus::Confirmed | ReservationStatus::Pending)
}

/// Checking in on a later date than today.
pub fn is_upcoming(r: &Reservation, now: &DateTime<FixedOffset>) -> bool {
    check_in_date(r, now).is_some_and(|d| d > now.date_naive())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingEntry {
    pub id: String,
    pub listing_id: String,
    pub guest_id: String,
    pub status: ReservationStatus,
    pub check_in: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<DateTime<Utc>>,
    pub host_earning_cents: i64,
}

impl BookingEntry {
    fn from_reservation(r: &Reservation, check_in: DateTime<Utc>) -> Self {
        Self {
            id: r.id.clone(),
            listing_id: r.listing_id.clone(),
            guest_id: r.guest_id.clone(),
            status: r.status(),
            check_in,
            check_out: r.check_out,
            host_earning_cents: host_earning(r),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingWindows {
    pub today: Vec<BookingEntry>,
    /// Ascending by check-in.
    pub upcoming: Vec<BookingEntry>,
}

pub fn booking_windows(reservations: &[Reservation], now: &DateTime<FixedOffset>) -> BookingWindows {
    let mut windows = BookingWindows::default();
    for r in reservations {
        let Some(check_in) = r.check_in else {
            continue;
        };
        if is_today(r, now) {
            windows.today.push(BookingEntry::from_reservation(r, check_in));
        } else if is_upcoming(r, now) {
            windows.upcoming.push(BookingEntry::from_reservation(r, check_in));
        }
    }
    windows.upcoming.sort_by_key(|e| e.check_in);
    windows
}
