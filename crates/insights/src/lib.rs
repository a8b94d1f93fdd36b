//! `staybook-insights`: host dashboard aggregation.
//!
//! Pure engine crate: receives already-decoded reservations and listings
//! plus a reference time, returns summaries, series and chart geometry.
//! The only store contact is the live [`feed`], which re-runs the same
//! pure functions on every snapshot.

pub mod booking;
pub mod calendar;
pub mod chart;
pub mod compare;
pub mod distribution;
pub mod earnings;
pub mod error;
pub mod feed;
pub mod period;
pub mod ranking;
pub mod report;
pub mod series;

#[cfg(test)]
pub(crate) mod testing;

pub use booking::{booking_windows, BookingEntry, BookingWindows};
pub use chart::{donut_arcs, line_points, svg_path, ChartFrame, DonutArc, Point};
pub use compare::{change_percent, Comparison};
pub use distribution::{status_distribution, StatusCount};
pub use error::InsightsError;
pub use feed::{DashboardFeed, DashboardView};
pub use period::Period;
pub use ranking::{top_listings, ListingRank};
pub use report::{AnalyticsReport, DashboardSummary, ReportOptions};
pub use series::{monthly_revenue, MonthlyPoint};
