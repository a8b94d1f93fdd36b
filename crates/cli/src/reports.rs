// dashboard / analytics / bookings

use staybook_config::Settings;
use staybook_core::money::format_cents;
use staybook_core::{Listing, Reservation};
use staybook_insights::{
    booking_windows, AnalyticsReport, BookingEntry, ChartFrame, DashboardSummary, ListingRank,
    Period, ReportOptions,
};

use crate::util::{load_documents, print_json, resolve_now, signed_percent};
use crate::{CliError, ReservationInput};

pub fn report_options(settings: &Settings) -> ReportOptions {
    ReportOptions {
        top_listings: settings.top_listings,
        frame: ChartFrame {
            width: settings.chart_width,
            height: settings.chart_height,
            padding: settings.chart_padding,
        },
        donut_radius: settings.donut_radius,
    }
}

/// Load inputs and apply `--host`.
fn load_input(input: &ReservationInput) -> Result<(Vec<Reservation>, Vec<Listing>), CliError> {
    let mut reservations: Vec<Reservation> = load_documents(&input.reservations)?;
    let mut listings: Vec<Listing> = match &input.listings {
        Some(path) => load_documents(path)?,
        None => Vec::new(),
    };
    if let Some(host) = &input.host {
        reservations.retain(|r| &r.host_id == host);
        listings.retain(|l| &l.host_id == host);
    }
    log::debug!("{} reservations, {} listings", reservations.len(), listings.len());
    Ok((reservations, listings))
}

// ============================================================================
// dashboard
// ============================================================================

pub fn cmd_dashboard(input: &ReservationInput, settings: &Settings, json: bool) -> Result<(), CliError> {
    let (reservations, listings) = load_input(input)?;
    let now = resolve_now(input.now.as_deref(), settings)?;
    let summary = DashboardSummary::build(&reservations, &listings, &now, &report_options(settings));

    if json {
        return print_json(&summary);
    }

    let money = |cents: i64| format_cents(cents, &settings.currency);
    println!("Dashboard ({})", now.format("%Y-%m-%d %H:%M %:z"));
    println!();
    println!(
        "  Total earnings       {:>12}  ({} of {} bookings)",
        money(summary.total_earnings_cents),
        summary.earned_bookings,
        summary.total_bookings
    );
    println!(
        "  This month           {:>12}  ({} vs last month)",
        money(summary.month_earnings.current),
        signed_percent(summary.month_earnings.change_percent)
    );
    println!(
        "  This year            {:>12}  ({} vs last year)",
        money(summary.year_earnings.current),
        signed_percent(summary.year_earnings.change_percent)
    );
    println!(
        "  Bookings this month  {:>12}  ({} vs last month)",
        summary.month_bookings.current,
        signed_percent(summary.month_bookings.change_percent)
    );
    println!("  Average booking      {:>12}", money(summary.average_booking_value_cents));
    println!(
        "  Pending payout       {:>12}  ({} reservations)",
        money(summary.pending_payout.amount_cents),
        summary.pending_payout.reservations
    );
    println!(
        "  Check-ins            {} today, {} upcoming",
        summary.check_ins_today, summary.check_ins_upcoming
    );

    if !summary.top_listings.is_empty() {
        println!();
        println!("Top listings");
        print_rankings(&summary.top_listings, &settings.currency);
    }
    Ok(())
}

fn print_rankings(rankings: &[ListingRank], currency: &str) {
    for (i, rank) in rankings.iter().enumerate() {
        let name = rank.title.as_deref().unwrap_or(&rank.listing_id);
        println!(
            "  {}. {:<24} {:>3} bookings  {:>12}",
            i + 1,
            name,
            rank.bookings,
            format_cents(rank.earnings_cents, currency)
        );
    }
}

// ============================================================================
// analytics
// ============================================================================

pub fn cmd_analytics(
    input: &ReservationInput,
    period: Option<&str>,
    settings: &Settings,
    json: bool,
) -> Result<(), CliError> {
    let period: Period = match period {
        Some(p) => p.parse()?,
        None => settings.default_period.parse().unwrap_or_else(|e| {
            log::warn!("analytics.defaultPeriod: {e}; using {}", Period::default());
            Period::default()
        }),
    };
    let (reservations, listings) = load_input(input)?;
    let now = resolve_now(input.now.as_deref(), settings)?;
    let report = AnalyticsReport::build(&reservations, &listings, &now, period, &report_options(settings));

    if json {
        return print_json(&report);
    }

    println!("Analytics ({}, {})", report.period, now.format("%Y-%m-%d"));
    println!();
    println!("Monthly revenue");
    for point in &report.monthly_revenue {
        println!(
            "  {:<8} {:>12}  {:>3} bookings",
            point.label,
            format_cents(point.earnings_cents, &settings.currency),
            point.bookings
        );
    }

    println!();
    println!("Status");
    if report.status_distribution.is_empty() {
        println!("  (no reservations in period)");
    }
    for entry in &report.status_distribution {
        println!("  {:<10} {:>4}", entry.status, entry.count);
    }

    if !report.top_listings.is_empty() {
        println!();
        println!("Top listings");
        print_rankings(&report.top_listings, &settings.currency);
    }
    Ok(())
}

// ============================================================================
// bookings
// ============================================================================

pub fn cmd_bookings(input: &ReservationInput, settings: &Settings, json: bool) -> Result<(), CliError> {
    let (reservations, _) = load_input(input)?;
    let now = resolve_now(input.now.as_deref(), settings)?;
    let windows = booking_windows(&reservations, &now);

    if json {
        return print_json(&windows);
    }

    println!("Today ({})", now.format("%Y-%m-%d"));
    print_entries(&windows.today, settings);
    println!();
    println!("Upcoming");
    print_entries(&windows.upcoming, settings);
    Ok(())
}

fn print_entries(entries: &[BookingEntry], settings: &Settings) {
    if entries.is_empty() {
        println!("  (none)");
        return;
    }
    let offset = settings.utc_offset();
    for entry in entries {
        println!(
            "  {:<10} {:<10} {:<10} {:<10} {}  {:>12}",
            entry.id,
            entry.listing_id,
            entry.guest_id,
            entry.status,
            entry.check_in.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
            format_cents(entry.host_earning_cents, &settings.currency)
        );
    }
}
