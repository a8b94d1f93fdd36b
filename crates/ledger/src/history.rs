use std::cmp::Reverse;

use serde::Serialize;
use staybook_core::{collections, decode_all, DocumentStore, PointsTransaction, Query};

use crate::error::LedgerError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointsHistory {
    /// Newest first; undated entries last.
    pub entries: Vec<PointsTransaction>,
    pub total_earned: i64,
    /// Sum of redemptions, as a positive number.
    pub total_redeemed: i64,
}

impl PointsHistory {
    pub fn from_transactions(mut entries: Vec<PointsTransaction>) -> Self {
        entries.sort_by_key(|t| Reverse(t.created_at));
        let total_earned = entries.iter().filter(|t| t.points > 0).map(|t| t.points).sum();
        let total_redeemed = entries.iter().filter(|t| t.points < 0).map(|t| -t.points).sum();
        Self { entries, total_earned, total_redeemed }
    }
}

pub fn points_history(store: &dyn DocumentStore, user_id: &str) -> Result<PointsHistory, LedgerError> {
    let docs = store.query(&Query::collection(collections::POINTS_TRANSACTIONS).where_eq("userId", user_id))?;
    Ok(PointsHistory::from_transactions(decode_all(&docs)))
}
