//! Dashboard and analytics reports assembled from the pure aggregations.

use chrono::{DateTime, Datelike, FixedOffset};
use serde::Serialize;
use staybook_core::{Listing, Reservation};

use crate::booking::{is_today, is_upcoming};
use crate::calendar::MonthKey;
use crate::chart::{donut_arcs, line_points, svg_path, ChartFrame, DonutArc, Point};
use crate::compare::Comparison;
use crate::distribution::{status_distribution, StatusCount};
use crate::earnings::{
    average_booking_value, bookings_in_month, earned, earnings_in_month, earnings_in_year,
    pending_payout, total_earnings, PendingPayout,
};
use crate::period::Period;
use crate::ranking::{top_listings, ListingRank, DEFAULT_TOP_LISTINGS};
use crate::series::{monthly_revenue, MonthlyPoint};

/// Knobs shared by the reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    pub top_listings: usize,
    pub frame: ChartFrame,
    pub donut_radius: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_listings: DEFAULT_TOP_LISTINGS,
            frame: ChartFrame::default(),
            donut_radius: 60.0,
        }
    }
}

/// Host dashboard headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub generated_at: DateTime<FixedOffset>,
    /// Every reservation, whatever its status or dates.
    pub total_bookings: usize,
    pub earned_bookings: usize,
    pub total_earnings_cents: i64,
    /// Earnings this calendar month vs last.
    pub month_earnings: Comparison,
    /// Earnings this calendar year vs last.
    pub year_earnings: Comparison,
    /// Bookings created this calendar month vs last.
    pub month_bookings: Comparison,
    pub average_booking_value_cents: i64,
    pub pending_payout: PendingPayout,
    pub top_listings: Vec<ListingRank>,
    pub check_ins_today: usize,
    pub check_ins_upcoming: usize,
}

impl DashboardSummary {
    pub fn build(
        reservations: &[Reservation],
        listings: &[Listing],
        now: &DateTime<FixedOffset>,
        options: &ReportOptions,
    ) -> Self {
        let this_month = MonthKey::of(now);
        let last_month = this_month.previous();
        let year = now.year();

        Self {
            generated_at: *now,
            total_bookings: reservations.len(),
            earned_bookings: earned(reservations).count(),
            total_earnings_cents: total_earnings(reservations),
            month_earnings: Comparison::new(
                earnings_in_month(reservations, this_month, now),
                earnings_in_month(reservations, last_month, now),
            ),
            year_earnings: Comparison::new(
                earnings_in_year(reservations, year, now),
                earnings_in_year(reservations, year - 1, now),
            ),
            month_bookings: Comparison::new(
                bookings_in_month(reservations, this_month, now) as i64,
                bookings_in_month(reservations, last_month, now) as i64,
            ),
            average_booking_value_cents: average_booking_value(reservations),
            pending_payout: pending_payout(reservations),
            top_listings: top_listings(reservations, listings, options.top_listings),
            check_ins_today: reservations.iter().filter(|r| is_today(r, now)).count(),
            check_ins_upcoming: reservations.iter().filter(|r| is_upcoming(r, now)).count(),
        }
    }

    /// The summary of an empty reservation set.
    pub fn empty(now: &DateTime<FixedOffset>) -> Self {
        Self::build(&[], &[], now, &ReportOptions::default())
    }
}

/// Analytics page: series, distribution and their chart geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub generated_at: DateTime<FixedOffset>,
    pub period: Period,
    pub monthly_revenue: Vec<MonthlyPoint>,
    pub status_distribution: Vec<StatusCount>,
    pub top_listings: Vec<ListingRank>,
    pub revenue_line: Vec<Point>,
    pub revenue_path: String,
    pub status_arcs: Vec<DonutArc>,
}

impl AnalyticsReport {
    pub fn build(
        reservations: &[Reservation],
        listings: &[Listing],
        now: &DateTime<FixedOffset>,
        period: Period,
        options: &ReportOptions,
    ) -> Self {
        let monthly = monthly_revenue(reservations, now, period.series_len());
        let distribution = status_distribution(reservations, now, period);

        let values: Vec<f64> = monthly.iter().map(|p| p.earnings_cents as f64).collect();
        let revenue_line = line_points(&values, &options.frame);
        let revenue_path = svg_path(&revenue_line);

        let segments: Vec<(String, usize)> = distribution
            .iter()
            .map(|s| (s.status.to_string(), s.count))
            .collect();
        let status_arcs = donut_arcs(&segments, options.donut_radius);

        log::debug!(
            "analytics {}: {} reservations, {} months, {} statuses",
            period,
            reservations.len(),
            monthly.len(),
            distribution.len()
        );

        Self {
            generated_at: *now,
            period,
            monthly_revenue: monthly,
            status_distribution: distribution,
            top_listings: top_listings(reservations, listings, options.top_listings),
            revenue_line,
            revenue_path,
            status_arcs,
        }
    }
}
