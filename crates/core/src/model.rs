use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::lenient;
use crate::store::Document;

/// Collection names in the document store.
pub mod collections {
    pub const USERS: &str = "users";
    pub const RESERVATIONS: &str = "reservations";
    pub const LISTINGS: &str = "listings";
    pub const POINTS_TRANSACTIONS: &str = "pointsTransactions";
    pub const WALLET_TRANSACTIONS: &str = "walletTransactions";
    pub const REDEEMED_REWARDS: &str = "redeemedRewards";
    pub const NOTIFICATIONS: &str = "notifications";
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// A typed view of a store document.
pub trait DocumentModel: DeserializeOwned {
    /// Store the document id on the decoded value. The document id is
    /// authoritative over any `id` field inside the body.
    fn set_id(&mut self, id: &str);

    /// Decode one document. Field content never fails decoding; only a body
    /// that is not a JSON object is rejected.
    fn from_document(doc: &Document) -> Option<Self> {
        if !doc.data.is_object() {
            log::warn!("skipping document {}: body is not an object", doc.id);
            return None;
        }
        match serde_json::from_value::<Self>(doc.data.clone()) {
            Ok(mut model) => {
                model.set_id(&doc.id);
                Some(model)
            }
            Err(e) => {
                log::warn!("skipping document {}: {}", doc.id, e);
                None
            }
        }
    }
}

/// Decode a snapshot, dropping documents that cannot be read.
pub fn decode_all<T: DocumentModel>(docs: &[Document]) -> Vec<T> {
    docs.iter().filter_map(T::from_document).collect()
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Refunded,
    /// Missing or not one of the known values.
    Unrecognized,
}

impl ReservationStatus {
    /// Case-insensitive parse of a raw status string.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unrecognized;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            "refunded" => Self::Refunded,
            _ => Self::Unrecognized,
        }
    }

    /// Whether the reservation's revenue counts as earned.
    pub fn is_earned(self) -> bool {
        matches!(self, Self::Confirmed | Self::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Pricing {
    #[serde(rename = "total", default, deserialize_with = "lenient::cents")]
    pub total_cents: Option<i64>,
    #[serde(rename = "serviceFee", default, deserialize_with = "lenient::cents")]
    pub service_fee_cents: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub host_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub guest_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub listing_id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "pricing")]
    pub pricing: Option<Pricing>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub check_in: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub check_out: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub paid_out: bool,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub payment_method: Option<String>,
}

impl Reservation {
    pub fn status(&self) -> ReservationStatus {
        ReservationStatus::parse(self.status.as_deref())
    }
}

impl DocumentModel for Reservation {
    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}

fn pricing<'de, D>(de: D) -> Result<Option<Pricing>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub host_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(rename = "price", default, deserialize_with = "lenient::cents")]
    pub price_cents: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub service_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub photos: Vec<String>,
}

impl DocumentModel for Listing {
    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

/// Point and wallet balances embedded in a `users` document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsAccount {
    #[serde(skip)]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub loyalty_points: i64,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub lifetime_loyalty_points: i64,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub wallet_balance_cents: i64,
}

impl DocumentModel for PointsAccount {
    fn set_id(&mut self, id: &str) {
        self.user_id = id.to_string();
    }
}

/// Append-only audit entry for a points balance change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsTransaction {
    #[serde(skip)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_id: String,
    /// Signed delta.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub points: i64,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp", serialize_with = "lenient::millis")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DocumentModel for PointsTransaction {
    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}

/// Cash-ledger entry for wallet credits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    #[serde(skip)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub amount_cents: i64,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp", serialize_with = "lenient::millis")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DocumentModel for WalletTransaction {
    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemedReward {
    #[serde(skip)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub reward_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub cost: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::timestamp", serialize_with = "lenient::millis")]
    pub redeemed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp", serialize_with = "lenient::millis")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl DocumentModel for RedeemedReward {
    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(skip)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub read: bool,
    #[serde(default, deserialize_with = "lenient::timestamp", serialize_with = "lenient::millis")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DocumentModel for Notification {
    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn decodes_reservation_with_mixed_shapes() {
        let doc = Document::new(
            "res_1",
            json!({
                "hostId": "h1",
                "guestId": "g1",
                "listingId": "l1",
                "status": "Confirmed",
                "pricing": {"total": 250.0, "serviceFee": "25"},
                "checkIn": "2026-02-10",
                "checkOut": {"seconds": 1_770_940_800},
                "createdAt": 1_769_904_000_000_i64,
                "paidOut": false,
                "paymentMethod": "card"
            }),
        );
        let r = Reservation::from_document(&doc).unwrap();
        assert_eq!(r.id, "res_1");
        assert_eq!(r.status(), ReservationStatus::Confirmed);
        let pricing = r.pricing.unwrap();
        assert_eq!(pricing.total_cents, Some(25_000));
        assert_eq!(pricing.service_fee_cents, Some(2_500));
        assert_eq!(r.check_in, Some(Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap()));
        assert!(r.check_out.is_some());
        assert!(r.created_at.is_some());
    }

    #[test]
    fn missing_fields_are_empty() {
        let r = Reservation::from_document(&Document::new("r", json!({"pricing": "free"}))).unwrap();
        assert!(r.pricing.is_none());
        assert_eq!(r.status(), ReservationStatus::Unrecognized);
        assert!(r.created_at.is_none());
        assert!(!r.paid_out);
    }

    #[test]
    fn non_object_bodies_are_skipped() {
        let docs = vec![
            Document::new("a", json!({"status": "pending"})),
            Document::new("b", json!([1, 2, 3])),
            Document::new("c", json!("text")),
        ];
        let decoded: Vec<Reservation> = decode_all(&docs);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id, "a");
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(ReservationStatus::parse(Some("COMPLETED")), ReservationStatus::Completed);
        assert_eq!(ReservationStatus::parse(Some(" pending ")), ReservationStatus::Pending);
        assert_eq!(ReservationStatus::parse(Some("on-hold")), ReservationStatus::Unrecognized);
        assert_eq!(ReservationStatus::parse(None), ReservationStatus::Unrecognized);
        assert!(ReservationStatus::Confirmed.is_earned());
        assert!(!ReservationStatus::Refunded.is_earned());
    }

    #[test]
    fn points_account_from_user_document() {
        let doc = Document::new("u1", json!({"loyaltyPoints": 1200, "lifetimeLoyaltyPoints": "3400"}));
        let account = PointsAccount::from_document(&doc).unwrap();
        assert_eq!(account.user_id, "u1");
        assert_eq!(account.loyalty_points, 1_200);
        assert_eq!(account.lifetime_loyalty_points, 3_400);
        assert_eq!(account.wallet_balance_cents, 0);
    }

    #[test]
    fn transaction_serializes_millis_and_type() {
        let tx = PointsTransaction {
            id: "ignored".into(),
            user_id: "u1".into(),
            points: -500,
            kind: "redeem_cash".into(),
            reason: None,
            created_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "redeem_cash");
        assert_eq!(value["createdAt"], 1_767_225_600_000_i64);
        assert!(value.get("id").is_none());
        assert!(value.get("reason").is_none());
    }
}
