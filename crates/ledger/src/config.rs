//! Loyalty programme definition: tiers, cash-out options, the rewards
//! catalogue and reward expiry rules.
//!
//! ```toml
//! default_expiry_days = 30
//!
//! [[tiers]]
//! id = "member"
//! label = "Member"
//! min_points = 0
//! multiplier = 1.0
//!
//! [[cash_options]]
//! id = "cash_10"
//! label = "$10 wallet credit"
//! points_required = 1000
//! cash_amount_cents = 1000
//!
//! [[rewards]]
//! id = "late_checkout"
//! title = "Late checkout"
//! cost = 500
//!
//! [[expiry]]
//! pattern = "checkout"
//! days = 7
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::tier::TierTable;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyConfig {
    #[serde(default = "default_expiry_days")]
    pub default_expiry_days: i64,
    /// ISO 4217 code of the wallet; cash options are denominated in it.
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub tiers: TierTable,
    #[serde(default)]
    pub cash_options: Vec<CashOption>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    /// Checked in order; the first pattern contained in the reward id wins.
    #[serde(default)]
    pub expiry: Vec<ExpiryRule>,
}

fn default_expiry_days() -> i64 {
    30
}

fn default_currency() -> String {
    "USD".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashOption {
    pub id: String,
    pub label: String,
    pub points_required: i64,
    pub cash_amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub title: String,
    pub cost: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryRule {
    pub pattern: String,
    pub days: i64,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        let cash = |id: &str, label: &str, points: i64, cents: i64| CashOption {
            id: id.into(),
            label: label.into(),
            points_required: points,
            cash_amount_cents: cents,
        };
        let reward = |id: &str, title: &str, cost: i64| Reward {
            id: id.into(),
            title: title.into(),
            cost,
            description: None,
        };
        let rule = |pattern: &str, days: i64| ExpiryRule { pattern: pattern.into(), days };

        Self {
            default_expiry_days: default_expiry_days(),
            currency: default_currency(),
            tiers: TierTable::default(),
            cash_options: vec![
                cash("cash_10", "$10 wallet credit", 1_000, 1_000),
                cash("cash_25", "$25 wallet credit", 2_500, 2_500),
                cash("cash_50", "$50 wallet credit", 5_000, 5_000),
            ],
            rewards: vec![
                reward("early_checkin", "Early check-in", 500),
                reward("late_checkout", "Late checkout", 500),
                reward("discount_10", "10% off your next stay", 1_500),
                reward("room_upgrade", "Room upgrade", 3_000),
                reward("free_night", "One free night", 8_000),
            ],
            expiry: vec![
                rule("checkin", 7),
                rule("checkout", 7),
                rule("discount", 30),
                rule("upgrade", 60),
                rule("free_night", 90),
            ],
        }
    }
}

impl LoyaltyConfig {
    pub fn from_toml(input: &str) -> Result<Self, LedgerError> {
        let config: LoyaltyConfig =
            toml::from_str(input).map_err(|e| LedgerError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        let mut seen = HashSet::new();
        for option in &self.cash_options {
            if !seen.insert(option.id.as_str()) {
                return Err(LedgerError::ConfigValidation(format!(
                    "duplicate cash option '{}'",
                    option.id
                )));
            }
            if option.points_required <= 0 || option.cash_amount_cents <= 0 {
                return Err(LedgerError::ConfigValidation(format!(
                    "cash option '{}': points_required and cash_amount_cents must be positive",
                    option.id
                )));
            }
        }

        let mut seen = HashSet::new();
        for reward in &self.rewards {
            if !seen.insert(reward.id.as_str()) {
                return Err(LedgerError::ConfigValidation(format!("duplicate reward '{}'", reward.id)));
            }
            if reward.cost <= 0 {
                return Err(LedgerError::ConfigValidation(format!(
                    "reward '{}': cost must be positive",
                    reward.id
                )));
            }
        }

        for rule in &self.expiry {
            if rule.pattern.is_empty() || rule.days <= 0 {
                return Err(LedgerError::ConfigValidation(format!(
                    "expiry rule '{}': pattern must be non-empty and days positive",
                    rule.pattern
                )));
            }
        }
        if self.default_expiry_days <= 0 {
            return Err(LedgerError::ConfigValidation("default_expiry_days must be positive".into()));
        }
        Ok(())
    }

    pub fn cash_option(&self, id: &str) -> Result<&CashOption, LedgerError> {
        self.cash_options
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| LedgerError::UnknownCashOption(id.to_string()))
    }

    pub fn reward(&self, id: &str) -> Result<&Reward, LedgerError> {
        self.rewards
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| LedgerError::UnknownReward(id.to_string()))
    }
}
