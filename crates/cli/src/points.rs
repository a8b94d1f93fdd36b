// tier / points history / redeem-cash / redeem-reward / options

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use staybook_config::Settings;
use staybook_core::money::{format_cents, group_thousands, parse_amount};
use staybook_ledger::{points_for_booking, points_history, LoyaltyConfig, Redeemer, TierStatus};

use crate::util::{load_loyalty, load_store, print_json, resolve_now, save_store};
use crate::{AccountInput, CliError, LoyaltyInput};

pub enum TierSource {
    Balance(i64),
    Account { store: PathBuf, user: String },
}

impl TierSource {
    /// Clap's argument group guarantees one of the two is present.
    pub fn from_args(balance: Option<i64>, user: Option<String>, store: Option<PathBuf>) -> Result<Self, CliError> {
        match (balance, user, store) {
            (Some(balance), _, _) => Ok(Self::Balance(balance)),
            (None, Some(user), Some(store)) => Ok(Self::Account { store, user }),
            _ => Err(CliError::args("tier needs --balance, or --user with --store")),
        }
    }
}

#[derive(Serialize)]
struct TierOutput {
    #[serde(flatten)]
    status: TierStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    booking_points: Option<i64>,
}

fn redemption_time(flag: Option<&str>, settings: &Settings) -> Result<DateTime<Utc>, CliError> {
    Ok(resolve_now(flag, settings)?.with_timezone(&Utc))
}

fn points(n: i64) -> String {
    let out = group_thousands(n.unsigned_abs());
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}

// ============================================================================
// tier
// ============================================================================

pub fn cmd_tier(
    source: Result<TierSource, CliError>,
    booking: Option<&str>,
    loyalty: &LoyaltyInput,
    settings: &Settings,
    json: bool,
) -> Result<(), CliError> {
    let config = load_loyalty(loyalty.loyalty.as_deref(), settings)?;
    let balance = match source? {
        TierSource::Balance(balance) => balance,
        TierSource::Account { store, user } => {
            let store = load_store(&store)?;
            Redeemer::new(&store, &config).account(&user)?.loyalty_points
        }
    };
    let status = config.tiers.status(balance);

    let booking_points = match booking {
        Some(raw) => {
            let cents = parse_amount(raw).ok_or_else(|| {
                CliError::args(format!("invalid --booking amount \"{raw}\""))
                    .with_hint("use a currency amount such as 250 or $1,200.50")
            })?;
            Some(points_for_booking(cents, &status.tier))
        }
        None => None,
    };

    if json {
        return print_json(&TierOutput { status, booking_points });
    }

    println!(
        "{} ({} points, x{} on bookings)",
        status.tier.label,
        points(status.balance),
        status.tier.multiplier
    );
    match (&status.next, status.points_to_next) {
        (Some(next), Some(remaining)) => println!(
            "  {} points to {} ({:.0}% there)",
            points(remaining),
            next.label,
            status.progress_percent
        ),
        _ => println!("  Top tier"),
    }
    if let (Some(earned), Some(raw)) = (booking_points, booking) {
        println!("  A {} booking earns {} points", raw, points(earned));
    }
    Ok(())
}

// ============================================================================
// points history
// ============================================================================

pub fn cmd_history(account: &AccountInput, settings: &Settings, json: bool) -> Result<(), CliError> {
    let store = load_store(&account.store)?;
    let history = points_history(&store, &account.user)?;

    if json {
        return print_json(&history);
    }

    let offset = settings.utc_offset();
    println!("Points history for {}", account.user);
    if history.entries.is_empty() {
        println!("  (no transactions)");
    }
    for entry in &history.entries {
        let date = entry
            .created_at
            .map(|d| d.with_timezone(&offset).format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let delta = if entry.points > 0 {
            format!("+{}", points(entry.points))
        } else {
            points(entry.points)
        };
        println!(
            "  {:<10} {:>9}  {:<18} {}",
            date,
            delta,
            entry.kind,
            entry.reason.as_deref().unwrap_or("")
        );
    }
    println!();
    println!(
        "  Earned {}, redeemed {}",
        points(history.total_earned),
        points(history.total_redeemed)
    );
    Ok(())
}

// ============================================================================
// points redeem-cash / redeem-reward
// ============================================================================

pub fn cmd_redeem_cash(
    account: &AccountInput,
    option_id: &str,
    now: Option<&str>,
    loyalty: &LoyaltyInput,
    settings: &Settings,
    json: bool,
) -> Result<(), CliError> {
    let config = load_loyalty(loyalty.loyalty.as_deref(), settings)?;
    let now = redemption_time(now, settings)?;
    let store = load_store(&account.store)?;

    let redemption = Redeemer::new(&store, &config).redeem_for_cash(&account.user, option_id, now)?;
    save_store(&account.store, &store)?;

    if json {
        return print_json(&redemption);
    }
    println!(
        "Redeemed {} points for {}",
        points(redemption.points_spent),
        format_cents(redemption.cash_credited_cents, &config.currency)
    );
    println!(
        "  Balance {} points, wallet {}",
        points(redemption.points_balance),
        format_cents(redemption.wallet_balance_cents, &config.currency)
    );
    Ok(())
}

pub fn cmd_redeem_reward(
    account: &AccountInput,
    reward_id: &str,
    now: Option<&str>,
    loyalty: &LoyaltyInput,
    settings: &Settings,
    json: bool,
) -> Result<(), CliError> {
    let config = load_loyalty(loyalty.loyalty.as_deref(), settings)?;
    let now = redemption_time(now, settings)?;
    let store = load_store(&account.store)?;

    let redemption = Redeemer::new(&store, &config).redeem_for_reward(&account.user, reward_id, now)?;
    save_store(&account.store, &store)?;

    if json {
        return print_json(&redemption);
    }
    let title = config.reward(reward_id).map(|r| r.title.as_str()).unwrap_or(reward_id);
    println!("Redeemed {} points for {}", points(redemption.points_spent), title);
    println!(
        "  Balance {} points, expires {}",
        points(redemption.points_balance),
        redemption.expires_at.with_timezone(&settings.utc_offset()).format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

// ============================================================================
// points options
// ============================================================================

pub fn cmd_options(loyalty: &LoyaltyInput, settings: &Settings, json: bool) -> Result<(), CliError> {
    let config = load_loyalty(loyalty.loyalty.as_deref(), settings)?;
    if json {
        return print_json(&config);
    }
    print_options(&config);
    Ok(())
}

fn print_options(config: &LoyaltyConfig) {
    println!("Cash options");
    for option in &config.cash_options {
        println!(
            "  {:<16} {:>7} points  {}",
            option.id,
            points(option.points_required),
            format_cents(option.cash_amount_cents, &config.currency)
        );
    }
    println!();
    println!("Rewards");
    for reward in &config.rewards {
        println!(
            "  {:<16} {:>7} points  {} (valid {} days)",
            reward.id,
            points(reward.cost),
            reward.title,
            staybook_ledger::expiry::expiry_days(config, &reward.id)
        );
    }
    println!();
    println!("Tiers");
    for level in config.tiers.levels() {
        println!("  {:<16} {:>7}+ points  x{}", level.label, points(level.min_points), level.multiplier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_grouped() {
        assert_eq!(points(0), "0");
        assert_eq!(points(950), "950");
        assert_eq!(points(15_000), "15,000");
        assert_eq!(points(-1_234_567), "-1,234,567");
    }

    #[test]
    fn balance_wins_over_account() {
        let source = TierSource::from_args(Some(10), Some("u".into()), None).unwrap();
        assert!(matches!(source, TierSource::Balance(10)));
        assert!(TierSource::from_args(None, Some("u".into()), None).is_err());
    }
}
