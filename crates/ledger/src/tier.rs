//! Loyalty tiers.
//!
//! A tier is unlocked once the point balance reaches its `min_points`
//! (inclusive). The table is kept sorted by strictly increasing
//! `min_points` and is never empty.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierLevel {
    pub id: String,
    pub label: String,
    pub min_points: i64,
    /// Points earned per currency unit booked.
    pub multiplier: f64,
}

impl TierLevel {
    pub fn new(id: &str, label: &str, min_points: i64, multiplier: f64) -> Self {
        Self { id: id.into(), label: label.into(), min_points, multiplier }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TierLevel>", into = "Vec<TierLevel>")]
pub struct TierTable(Vec<TierLevel>);

impl TryFrom<Vec<TierLevel>> for TierTable {
    type Error = LedgerError;

    fn try_from(levels: Vec<TierLevel>) -> Result<Self, Self::Error> {
        if levels.is_empty() {
            return Err(LedgerError::ConfigValidation("at least one tier is required".into()));
        }
        for pair in levels.windows(2) {
            if pair[1].min_points <= pair[0].min_points {
                return Err(LedgerError::ConfigValidation(format!(
                    "tier '{}' must have min_points strictly greater than '{}' ({} <= {})",
                    pair[1].id, pair[0].id, pair[1].min_points, pair[0].min_points
                )));
            }
        }
        if let Some(bad) = levels.iter().find(|t| !(t.multiplier.is_finite() && t.multiplier > 0.0)) {
            return Err(LedgerError::ConfigValidation(format!(
                "tier '{}': multiplier must be a positive number",
                bad.id
            )));
        }
        Ok(Self(levels))
    }
}

impl From<TierTable> for Vec<TierLevel> {
    fn from(table: TierTable) -> Self {
        table.0
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self(vec![
            TierLevel::new("member", "Member", 0, 1.0),
            TierLevel::new("silver", "Silver", 1_000, 1.25),
            TierLevel::new("gold", "Gold", 5_000, 1.5),
            TierLevel::new("platinum", "Platinum", 15_000, 2.0),
        ])
    }
}

impl TierTable {
    pub fn levels(&self) -> &[TierLevel] {
        &self.0
    }

    /// Highest tier whose threshold the balance reaches; the lowest tier
    /// when none does (negative balances).
    pub fn compute_tier(&self, balance: i64) -> &TierLevel {
        self.0
            .iter()
            .rev()
            .find(|t| t.min_points <= balance)
            .unwrap_or(&self.0[0])
    }

    /// The tier after `tier`, `None` at the top.
    pub fn next_tier(&self, tier: &TierLevel) -> Option<&TierLevel> {
        self.0.iter().find(|t| t.min_points > tier.min_points)
    }

    pub fn status(&self, balance: i64) -> TierStatus {
        let tier = self.compute_tier(balance);
        let next = self.next_tier(tier);
        TierStatus {
            balance,
            tier: tier.clone(),
            next: next.cloned(),
            progress_percent: progress_to_next(balance, tier, next),
            points_to_next: next.map(|n| (n.min_points - balance).max(0)),
        }
    }
}

/// Percent of the way from `tier` to `next`, clamped to `0..=100`.
/// Always 100 at the top tier.
pub fn progress_to_next(balance: i64, tier: &TierLevel, next: Option<&TierLevel>) -> f64 {
    let Some(next) = next else {
        return 100.0;
    };
    let span = (next.min_points - tier.min_points).max(1) as f64;
    ((balance - tier.min_points) as f64 / span * 100.0).clamp(0.0, 100.0)
}

/// Points earned for a booking: whole currency units times the tier
/// multiplier, rounded down. Nothing for zero or negative amounts.
pub fn points_for_booking(amount_cents: i64, tier: &TierLevel) -> i64 {
    if amount_cents <= 0 {
        return 0;
    }
    ((amount_cents / 100) as f64 * tier.multiplier).floor() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierStatus {
    pub balance: i64,
    pub tier: TierLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<TierLevel>,
    pub progress_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_to_next: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive() {
        let table = TierTable::default();
        assert_eq!(table.compute_tier(0).id, "member");
        assert_eq!(table.compute_tier(999).id, "member");
        assert_eq!(table.compute_tier(1_000).id, "silver");
        assert_eq!(table.compute_tier(4_999).id, "silver");
        assert_eq!(table.compute_tier(5_000).id, "gold");
        assert_eq!(table.compute_tier(15_000).id, "platinum");
        assert_eq!(table.compute_tier(1_000_000).id, "platinum");
    }

    #[test]
    fn negative_balance_is_lowest_tier() {
        assert_eq!(TierTable::default().compute_tier(-50).id, "member");
    }

    #[test]
    fn progress() {
        let table = TierTable::default();
        let silver = table.compute_tier(3_000);
        let gold = table.next_tier(silver);
        assert_eq!(progress_to_next(3_000, silver, gold), 50.0);
        assert_eq!(progress_to_next(-10, table.compute_tier(-10), table.next_tier(table.compute_tier(-10))), 0.0);

        let top = table.compute_tier(20_000);
        assert!(table.next_tier(top).is_none());
        assert_eq!(progress_to_next(20_000, top, None), 100.0);
    }

    #[test]
    fn degenerate_span_does_not_divide_by_zero() {
        let a = TierLevel::new("a", "A", 10, 1.0);
        let b = TierLevel::new("b", "B", 10, 1.0);
        assert_eq!(progress_to_next(10, &a, Some(&b)), 0.0);
        assert_eq!(progress_to_next(11, &a, Some(&b)), 100.0);
    }

    #[test]
    fn status_reports_distance_to_next() {
        let status = TierTable::default().status(4_200);
        assert_eq!(status.tier.id, "silver");
        assert_eq!(status.next.as_ref().map(|t| t.id.as_str()), Some("gold"));
        assert_eq!(status.points_to_next, Some(800));
        assert_eq!(status.progress_percent, 80.0);

        let top = TierTable::default().status(15_000);
        assert_eq!(top.points_to_next, None);
        assert_eq!(top.progress_percent, 100.0);
    }

    #[test]
    fn booking_points() {
        let table = TierTable::default();
        assert_eq!(points_for_booking(12_599, table.compute_tier(0)), 125);
        assert_eq!(points_for_booking(10_000, table.compute_tier(1_000)), 125);
        assert_eq!(points_for_booking(10_100, table.compute_tier(5_000)), 151);
        assert_eq!(points_for_booking(-500, table.compute_tier(0)), 0);
    }

    #[test]
    fn rejects_unordered_or_empty_tables() {
        assert!(TierTable::try_from(Vec::new()).is_err());
        let dup = vec![TierLevel::new("a", "A", 0, 1.0), TierLevel::new("b", "B", 0, 1.5)];
        assert!(matches!(TierTable::try_from(dup), Err(LedgerError::ConfigValidation(_))));
        let zero = vec![TierLevel::new("a", "A", 0, 0.0)];
        assert!(TierTable::try_from(zero).is_err());
    }

    proptest::proptest! {
        #[test]
        fn tier_threshold_never_exceeds_balance(balance in -10_000i64..100_000) {
            let table = TierTable::default();
            let tier = table.compute_tier(balance);
            if balance >= 0 {
                proptest::prop_assert!(tier.min_points <= balance);
            }
            if let Some(next) = table.next_tier(tier) {
                proptest::prop_assert!(next.min_points > balance);
            }
            let p = progress_to_next(balance, tier, table.next_tier(tier));
            proptest::prop_assert!((0.0..=100.0).contains(&p));
        }
    }
}
