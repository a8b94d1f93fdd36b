use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use staybook_core::{decode_all, documents_from_json, Listing, MemoryStore, Reservation, ReservationStatus};
use staybook_insights::{
    booking_windows, AnalyticsReport, DashboardFeed, DashboardSummary, Period, ReportOptions,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load<T: staybook_core::DocumentModel>(name: &str) -> Vec<T> {
    let path = fixtures_dir().join(name);
    let raw = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    decode_all(&documents_from_json(&raw).unwrap())
}

fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2026-03-15T12:00:00Z").unwrap()
}

fn fixtures() -> (Vec<Reservation>, Vec<Listing>) {
    (load("reservations.json"), load("listings.json"))
}

// -------------------------------------------------------------------------
// Ingestion
// -------------------------------------------------------------------------

#[test]
fn mixed_shapes_normalize_once() {
    let (rs, listings) = fixtures();
    // The trailing string entry is not a document and is dropped.
    assert_eq!(rs.len(), 8);
    assert_eq!(listings.len(), 3);

    let by_id = |id: &str| rs.iter().find(|r| r.id == id).unwrap();
    assert_eq!(by_id("r1").created_at.unwrap().to_rfc3339(), "2026-03-02T00:00:00+00:00");
    assert_eq!(by_id("r3").created_at.unwrap().to_rfc3339(), "2026-01-01T00:00:00+00:00");
    assert_eq!(by_id("r5").created_at.unwrap().to_rfc3339(), "2026-03-10T09:00:00+00:00");
    assert!(by_id("r6").created_at.is_none());
    assert!(by_id("r6").check_in.is_none());
    assert_eq!(by_id("r2").pricing.as_ref().unwrap().total_cents, Some(120_000));
    assert_eq!(by_id("r3").status(), ReservationStatus::Completed);
    assert_eq!(by_id("r6").status(), ReservationStatus::Unrecognized);
}

// -------------------------------------------------------------------------
// Dashboard
// -------------------------------------------------------------------------

#[test]
fn dashboard_over_fixture_host() {
    let (rs, listings) = fixtures();
    let s = DashboardSummary::build(&rs, &listings, &now(), &ReportOptions::default());

    assert_eq!(s.total_bookings, 8);
    assert_eq!(s.earned_bookings, 4);
    assert_eq!(s.total_earnings_cents, 22_500 + 108_000 + 36_000 + 45_000);
    assert_eq!(s.average_booking_value_cents, 52_875);

    assert_eq!(s.month_earnings.current, 22_500);
    assert_eq!(s.month_earnings.previous, 108_000);
    assert!(s.month_earnings.change_percent < 0.0);
    assert_eq!(s.year_earnings.current, 166_500);
    assert_eq!(s.year_earnings.previous, 45_000);
    assert_eq!(s.month_bookings.current, 3);
    assert_eq!(s.month_bookings.previous, 1);

    assert_eq!(s.pending_payout.amount_cents, 108_000);
    assert_eq!(s.pending_payout.reservations, 1);

    let top: Vec<(&str, Option<&str>, usize, i64)> = s
        .top_listings
        .iter()
        .map(|t| (t.listing_id.as_str(), t.title.as_deref(), t.bookings, t.earnings_cents))
        .collect();
    assert_eq!(
        top,
        [("L1", Some("Harbor Loft"), 3, 175_500), ("L2", Some("Cedar Cabin"), 1, 36_000)]
    );

    assert_eq!(s.check_ins_today, 2);
    assert_eq!(s.check_ins_upcoming, 1);
}

#[test]
fn unearned_statuses_count_only_toward_totals() {
    let (rs, _) = fixtures();
    let unearned: Vec<Reservation> = rs.into_iter().filter(|r| !r.status().is_earned()).collect();
    let s = DashboardSummary::build(&unearned, &[], &now(), &ReportOptions::default());
    assert_eq!(s.total_bookings, 4);
    assert_eq!(s.total_earnings_cents, 0);
    assert_eq!(s.average_booking_value_cents, 0);
    assert_eq!(s.month_earnings.change_percent, 0.0);
    assert!(s.top_listings.is_empty());
}

// -------------------------------------------------------------------------
// Analytics
// -------------------------------------------------------------------------

#[test]
fn six_month_analytics() {
    let (rs, listings) = fixtures();
    let report = AnalyticsReport::build(&rs, &listings, &now(), Period::SixMonths, &ReportOptions::default());

    let labels: Vec<&str> = report.monthly_revenue.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, ["Oct 25", "Nov 25", "Dec 25", "Jan 26", "Feb 26", "Mar 26"]);
    let values: Vec<i64> = report.monthly_revenue.iter().map(|p| p.earnings_cents).collect();
    assert_eq!(values, [0, 0, 0, 36_000, 108_000, 22_500]);

    let dist: Vec<(ReservationStatus, usize)> =
        report.status_distribution.iter().map(|s| (s.status, s.count)).collect();
    assert_eq!(
        dist,
        [
            (ReservationStatus::Confirmed, 1),
            (ReservationStatus::Completed, 2),
            (ReservationStatus::Pending, 1),
            (ReservationStatus::Cancelled, 1),
        ]
    );

    // The peak month touches the top of the plot area.
    let frame = ReportOptions::default().frame;
    let peak = &report.revenue_line[4];
    assert!((peak.y - frame.padding).abs() < 1e-9);
    assert!((report.revenue_line[0].y - (frame.height - frame.padding)).abs() < 1e-9);
}

#[test]
fn twelve_months_and_all() {
    let (rs, listings) = fixtures();
    let options = ReportOptions::default();

    let twelve = AnalyticsReport::build(&rs, &listings, &now(), Period::TwelveMonths, &options);
    assert_eq!(twelve.monthly_revenue.len(), 12);
    assert_eq!(twelve.monthly_revenue[0].label, "Apr 25");
    let counted: usize = twelve.status_distribution.iter().map(|s| s.count).sum();
    assert_eq!(counted, 7);

    let all = AnalyticsReport::build(&rs, &listings, &now(), Period::All, &options);
    assert_eq!(all.monthly_revenue.len(), 12);
    let pending = all
        .status_distribution
        .iter()
        .find(|s| s.status == ReservationStatus::Pending)
        .unwrap();
    // r5 plus the undated unrecognized r6.
    assert_eq!(pending.count, 2);

    let circumference = 2.0 * std::f64::consts::PI * options.donut_radius;
    let sum: f64 = all.status_arcs.iter().map(|a| a.length).sum();
    assert!((sum - circumference).abs() < 1e-9);
}

// -------------------------------------------------------------------------
// Booking windows
// -------------------------------------------------------------------------

#[test]
fn booking_windows_over_fixture_host() {
    let (rs, _) = fixtures();
    let w = booking_windows(&rs, &now());
    let today: Vec<&str> = w.today.iter().map(|e| e.id.as_str()).collect();
    let upcoming: Vec<&str> = w.upcoming.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(today, ["r1", "r5"]);
    assert_eq!(upcoming, ["r4"]);
    assert_eq!(w.today[0].host_earning_cents, 22_500);
}

// -------------------------------------------------------------------------
// Live feed
// -------------------------------------------------------------------------

#[test]
fn feed_over_store_loaded_from_fixtures() {
    let store = MemoryStore::new();
    let raw = std::fs::read_to_string(fixtures_dir().join("reservations.json")).unwrap();
    for doc in documents_from_json(&raw).unwrap() {
        store.insert("reservations", &doc.id, doc.data);
    }
    let raw = std::fs::read_to_string(fixtures_dir().join("listings.json")).unwrap();
    for doc in documents_from_json(&raw).unwrap() {
        store.insert("listings", &doc.id, doc.data);
    }

    let fixed = now();
    let mut feed = DashboardFeed::watch_host(&store, "host-1", ReportOptions::default(), move || fixed).unwrap();
    let view = feed.poll().unwrap();
    assert!(view.banner.is_none());
    assert_eq!(view.summary.total_bookings, 8);
    assert_eq!(view.summary.top_listings[0].title.as_deref(), Some("Harbor Loft"));
}
