use std::collections::HashMap;

use serde::Serialize;
use staybook_core::{Listing, Reservation};

use crate::earnings::{earned, host_earning};

pub const DEFAULT_TOP_LISTINGS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRank {
    pub listing_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub bookings: usize,
    pub earnings_cents: i64,
}

/// Best-earning listings over all earned reservations (not period
/// filtered), highest first, at most `limit` entries.
///
/// Ties keep first-seen order. Reservations without a listing id are
/// skipped. Titles come from `listings` when the listing is known.
pub fn top_listings(reservations: &[Reservation], listings: &[Listing], limit: usize) -> Vec<ListingRank> {
    let mut ranks: Vec<ListingRank> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for r in earned(reservations) {
        if r.listing_id.is_empty() {
            continue;
        }
        let slot = *index.entry(r.listing_id.as_str()).or_insert_with(|| {
            ranks.push(ListingRank {
                listing_id: r.listing_id.clone(),
                title: None,
                bookings: 0,
                earnings_cents: 0,
            });
            ranks.len() - 1
        });
        ranks[slot].bookings += 1;
        ranks[slot].earnings_cents = ranks[slot].earnings_cents.saturating_add(host_earning(r));
    }

    // `sort_by` is stable, which is what keeps ties in input order.
    ranks.sort_by(|a, b| b.earnings_cents.cmp(&a.earnings_cents));
    ranks.truncate(limit);

    for rank in &mut ranks {
        rank.title = listings
            .iter()
            .find(|l| l.id == rank.listing_id)
            .map(|l| l.title.clone())
            .filter(|t| !t.is_empty());
    }
    ranks
}
