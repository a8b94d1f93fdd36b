//! Host earnings.
//!
//! Revenue counts only for confirmed/completed reservations. Everything
//! else still counts as a booking.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use staybook_core::{Reservation, ReservationStatus};

use crate::calendar::{month_of, year_of, MonthKey};

/// `pricing.total − pricing.serviceFee`, missing parts read as 0.
/// Not clamped: malformed data may yield a negative earning.
pub fn host_earning(r: &Reservation) -> i64 {
    let pricing = r.pricing.as_ref();
    let total = pricing.and_then(|p| p.total_cents).unwrap_or(0);
    let fee = pricing.and_then(|p| p.service_fee_cents).unwrap_or(0);
    total.saturating_sub(fee)
}

pub fn is_earned(r: &Reservation) -> bool {
    r.status().is_earned()
}

pub fn earned(reservations: &[Reservation]) -> impl Iterator<Item = &Reservation> {
    reservations.iter().filter(|r| is_earned(r))
}

/// Sums cents, clamping at the `i64` bounds instead of wrapping.
fn sum_cents(values: impl IntoIterator<Item = i64>) -> i64 {
    values.into_iter().fold(0i64, i64::saturating_add)
}

pub fn total_earnings(reservations: &[Reservation]) -> i64 {
    sum_cents(earned(reservations).map(host_earning))
}

/// Mean host earning per earned reservation, rounded to the cent; 0 when
/// nothing is earned.
pub fn average_booking_value(reservations: &[Reservation]) -> i64 {
    let (sum, count) = earned(reservations).fold((0i64, 0usize), |(s, c), r| {
        (s.saturating_add(host_earning(r)), c + 1)
    });
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as i64
}

/// Earned revenue for reservations created in `month`.
pub fn earnings_in_month(reservations: &[Reservation], month: MonthKey, now: &DateTime<FixedOffset>) -> i64 {
    earned(reservations)
        .filter(|r| r.created_at.as_ref().is_some_and(|c| month_of(c, now) == month))
        .map(host_earning)
        .fold(0i64, i64::saturating_add)
}

/// Earned revenue for reservations created in calendar `year`.
pub fn earnings_in_year(reservations: &[Reservation], year: i32, now: &DateTime<FixedOffset>) -> i64 {
    earned(reservations)
        .filter(|r| r.created_at.as_ref().is_some_and(|c| year_of(c, now) == year))
        .map(host_earning)
        .fold(0i64, i64::saturating_add)
}

/// Reservations of any status created in `month`.
pub fn bookings_in_month(reservations: &[Reservation], month: MonthKey, now: &DateTime<FixedOffset>) -> usize {
    reservations
        .iter()
        .filter(|r| r.created_at.as_ref().is_some_and(|c| month_of(c, now) == month))
        .count()
}

/// Completed stays whose earnings have not been disbursed yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PendingPayout {
    pub amount_cents: i64,
    pub reservations: usize,
}

pub fn pending_payout(reservations: &[Reservation]) -> PendingPayout {
    reservations
        .iter()
        .filter(|r| r.status() == ReservationStatus::Completed && !r.paid_out)
        .fold(PendingPayout::default(), |acc, r| PendingPayout {
            amount_cents: acc.amount_cents.saturating_add(host_earning(r)),
            reservations: acc.reservations + 1,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, reservation};

    #[test]
    fn earning_defaults_missing_pricing() {
        let mut r = reservation("r1", "confirmed", 10_000, 1_000, None);
        assert_eq!(host_earning(&r), 9_000);
        r.pricing = None;
        assert_eq!(host_earning(&r), 0);
    }

    #[test]
    fn negative_earning_tolerated() {
        let r = reservation("r1", "confirmed", 1_000, 1_500, None);
        assert_eq!(host_earning(&r), -500);
    }

    #[test]
    fn only_confirmed_and_completed_earn() {
        let rs = vec![
            reservation("a", "confirmed", 10_000, 1_000, None),
            reservation("b", "Completed", 5_000, 500, None),
            reservation("c", "pending", 99_999, 0, None),
            reservation("d", "cancelled", 99_999, 0, None),
            reservation("e", "refunded", 99_999, 0, None),
            reservation("f", "", 99_999, 0, None),
        ];
        assert_eq!(total_earnings(&rs), 13_500);
        assert_eq!(average_booking_value(&rs), 6_750);
    }

    #[test]
    fn average_is_zero_without_earned_bookings() {
        let rs = vec![reservation("c", "pending", 10_000, 0, None)];
        assert_eq!(average_booking_value(&rs), 0);
        assert_eq!(average_booking_value(&[]), 0);
    }

    #[test]
    fn month_and_year_windows_use_created_at() {
        let now = at("2026-03-20T12:00:00Z");
        let rs = vec![
            reservation("a", "confirmed", 10_000, 0, Some("2026-03-01T00:00:00Z")),
            reservation("b", "confirmed", 20_000, 0, Some("2026-02-28T23:59:59Z")),
            reservation("c", "confirmed", 40_000, 0, Some("2025-03-10T00:00:00Z")),
            reservation("d", "confirmed", 80_000, 0, None),
        ];
        assert_eq!(earnings_in_month(&rs, MonthKey::new(2026, 3), &now), 10_000);
        assert_eq!(earnings_in_month(&rs, MonthKey::new(2026, 2), &now), 20_000);
        assert_eq!(earnings_in_year(&rs, 2026, &now), 30_000);
        assert_eq!(earnings_in_year(&rs, 2025, &now), 40_000);
        assert_eq!(bookings_in_month(&rs, MonthKey::new(2026, 3), &now), 1);
        // Undated records still count toward unconditional totals.
        assert_eq!(total_earnings(&rs), 150_000);
    }

    #[test]
    fn pending_payout_counts_unpaid_completed() {
        let mut paid = reservation("a", "completed", 10_000, 1_000, None);
        paid.paid_out = true;
        let rs = vec![
            paid,
            reservation("b", "completed", 20_000, 2_000, None),
            reservation("c", "confirmed", 30_000, 0, None),
        ];
        assert_eq!(pending_payout(&rs), PendingPayout { amount_cents: 18_000, reservations: 1 });
    }

    #[test]
    fn huge_totals_clamp_instead_of_overflowing() {
        let now = at("2026-03-20T12:00:00Z");
        let created = Some("2026-03-01T00:00:00Z");
        let rs = vec![
            reservation("a", "completed", 6_000_000_000_000_000_000, 0, created),
            reservation("b", "completed", 6_000_000_000_000_000_000, 0, created),
        ];
        assert_eq!(total_earnings(&rs), i64::MAX);
        assert_eq!(earnings_in_month(&rs, MonthKey::new(2026, 3), &now), i64::MAX);
        assert_eq!(earnings_in_year(&rs, 2026, &now), i64::MAX);
        assert_eq!(pending_payout(&rs).amount_cents, i64::MAX);
        assert!(average_booking_value(&rs) > 4_000_000_000_000_000_000);
    }

    #[test]
    fn decoded_extreme_totals_do_not_panic() {
        use staybook_core::{decode_all, Document};
        let docs = vec![
            Document::new("a", serde_json::json!({"status": "confirmed", "pricing": {"total": 6.0e16}})),
            Document::new("b", serde_json::json!({"status": "confirmed", "pricing": {"total": 6.0e16}})),
        ];
        let rs: Vec<Reservation> = decode_all(&docs);
        assert_eq!(host_earning(&rs[0]), 6_000_000_000_000_000_000);
        assert_eq!(total_earnings(&rs), i64::MAX);
        assert_eq!(average_booking_value(&rs), (i64::MAX as f64 / 2.0).round() as i64);
    }
}
