//! Live dashboard.
//!
//! A store subscription pushes the host's full reservation set on every
//! change; each push is decoded and the summary recomputed from scratch.
//! A store error does not end the feed: it yields an empty summary with a
//! banner, and the next good snapshot clears it.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use staybook_core::store::SnapshotResult;
use staybook_core::{collections, decode_all, DocumentStore, Listing, Query, Reservation, StoreError, Subscription};

use crate::report::{DashboardSummary, ReportOptions};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub summary: DashboardSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

/// Turn one pushed snapshot into a view.
pub fn view_from_snapshot(
    snapshot: SnapshotResult,
    listings: &[Listing],
    now: &DateTime<FixedOffset>,
    options: &ReportOptions,
) -> DashboardView {
    match snapshot {
        Ok(docs) => {
            let reservations: Vec<Reservation> = decode_all(&docs);
            DashboardView {
                summary: DashboardSummary::build(&reservations, listings, now, options),
                banner: None,
            }
        }
        Err(e) => {
            log::warn!("dashboard feed degraded: {e}");
            DashboardView {
                summary: DashboardSummary::empty(now),
                banner: Some(banner_for(&e)),
            }
        }
    }
}

fn banner_for(err: &StoreError) -> String {
    match err {
        StoreError::Unavailable(_) => "Live data is temporarily unavailable. Showing no bookings until the connection returns.".into(),
        other => format!("Could not load bookings: {other}"),
    }
}

/// Iterator of recomputed dashboard views for one host. `clock` supplies
/// the reference time for each recomputation.
pub struct DashboardFeed<C> {
    subscription: Subscription,
    listings: Vec<Listing>,
    options: ReportOptions,
    clock: C,
}

impl<C> DashboardFeed<C>
where
    C: FnMut() -> DateTime<FixedOffset>,
{
    /// Subscribe to `host_id`'s reservations. Listing titles are read once;
    /// if that read fails the feed runs without titles.
    pub fn watch_host(
        store: &dyn DocumentStore,
        host_id: &str,
        options: ReportOptions,
        clock: C,
    ) -> Result<Self, StoreError> {
        let listings = match store.query(&Query::collection(collections::LISTINGS).where_eq("hostId", host_id)) {
            Ok(docs) => decode_all(&docs),
            Err(e) => {
                log::warn!("listing titles unavailable for host {host_id}: {e}");
                Vec::new()
            }
        };
        let subscription =
            store.subscribe(Query::collection(collections::RESERVATIONS).where_eq("hostId", host_id))?;
        Ok(Self { subscription, listings, options, clock })
    }

    /// Recompute from the next snapshot if one is already queued.
    pub fn poll(&mut self) -> Option<DashboardView> {
        let snapshot = self.subscription.try_next()?;
        Some(self.recompute(snapshot))
    }

    fn recompute(&mut self, snapshot: SnapshotResult) -> DashboardView {
        let now = (self.clock)();
        view_from_snapshot(snapshot, &self.listings, &now, &self.options)
    }
}

impl<C> Iterator for DashboardFeed<C>
where
    C: FnMut() -> DateTime<FixedOffset>,
{
    type Item = DashboardView;

    fn next(&mut self) -> Option<Self::Item> {
        let snapshot = self.subscription.next()?;
        Some(self.recompute(snapshot))
    }
}
