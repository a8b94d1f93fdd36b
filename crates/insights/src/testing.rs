//! Fixture builders shared by the unit tests.

use chrono::{DateTime, FixedOffset, Utc};
use staybook_core::{Pricing, Reservation};

pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

/// An empty `status` leaves the field unset.
pub fn reservation(id: &str, status: &str, total_cents: i64, fee_cents: i64, created: Option<&str>) -> Reservation {
    Reservation {
        id: id.into(),
        status: (!status.is_empty()).then(|| status.to_string()),
        pricing: Some(Pricing {
            total_cents: Some(total_cents),
            service_fee_cents: Some(fee_cents),
        }),
        created_at: created.map(|c| at(c).with_timezone(&Utc)),
        ..Reservation::default()
    }
}

pub fn with_listing(mut r: Reservation, listing_id: &str) -> Reservation {
    r.listing_id = listing_id.into();
    r
}

pub fn with_check_in(mut r: Reservation, rfc3339: &str) -> Reservation {
    r.check_in = Some(at(rfc3339).with_timezone(&Utc));
    r
}
