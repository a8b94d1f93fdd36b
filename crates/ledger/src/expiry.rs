use chrono::{DateTime, Duration, Utc};

use crate::config::LoyaltyConfig;

/// Validity of a redeemed reward in days: the first rule whose pattern
/// appears in the reward id (case-insensitive), else the default.
pub fn expiry_days(config: &LoyaltyConfig, reward_id: &str) -> i64 {
    let id = reward_id.to_ascii_lowercase();
    config
        .expiry
        .iter()
        .find(|rule| id.contains(&rule.pattern.to_ascii_lowercase()))
        .map_or(config.default_expiry_days, |rule| rule.days)
}

pub fn expires_at(config: &LoyaltyConfig, reward_id: &str, redeemed_at: DateTime<Utc>) -> DateTime<Utc> {
    redeemed_at + Duration::days(expiry_days(config, reward_id))
}
