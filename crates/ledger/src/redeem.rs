//! Point redemptions.
//!
//! Each redemption reads the account fresh, validates against that read,
//! and then commits a single write batch guarded by a compare-and-decrement
//! precondition on `users/{uid}.loyaltyPoints`. The store evaluates the
//! guard inside the commit, so a balance spent concurrently after the read
//! fails the whole batch instead of going negative.

use chrono::{DateTime, Utc};
use serde::Serialize;
use staybook_core::money::format_cents;
use staybook_core::{
    collections, DocumentModel, DocumentStore, Notification, PointsAccount, PointsTransaction,
    RedeemedReward, StoreError, WalletTransaction, WriteBatch,
};

use crate::config::LoyaltyConfig;
use crate::error::LedgerError;
use crate::expiry::expires_at;

const POINTS_FIELD: &str = "loyaltyPoints";
const WALLET_FIELD: &str = "walletBalanceCents";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashRedemption {
    pub user_id: String,
    pub option_id: String,
    pub points_spent: i64,
    pub cash_credited_cents: i64,
    pub points_balance: i64,
    pub wallet_balance_cents: i64,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardRedemption {
    pub user_id: String,
    pub reward_id: String,
    pub points_spent: i64,
    pub points_balance: i64,
    pub redeemed_reward_id: Option<String>,
    pub expires_at: DateTime<Utc>,
}

pub struct Redeemer<'a> {
    store: &'a dyn DocumentStore,
    config: &'a LoyaltyConfig,
}

impl<'a> Redeemer<'a> {
    pub fn new(store: &'a dyn DocumentStore, config: &'a LoyaltyConfig) -> Self {
        Self { store, config }
    }

    /// The authoritative balances for `user_id`.
    pub fn account(&self, user_id: &str) -> Result<PointsAccount, LedgerError> {
        let doc = self
            .store
            .get(collections::USERS, user_id)?
            .ok_or_else(|| LedgerError::AccountNotFound(user_id.to_string()))?;
        PointsAccount::from_document(&doc).ok_or_else(|| LedgerError::AccountNotFound(user_id.to_string()))
    }

    pub fn redeem_for_cash(
        &self,
        user_id: &str,
        option_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CashRedemption, LedgerError> {
        let option = self.config.cash_option(option_id)?;
        let account = self.account(user_id)?;
        let required = option.points_required;
        check_balance(user_id, required, account.loyalty_points)?;

        let cash = format_cents(option.cash_amount_cents, &self.config.currency);
        let points_tx = PointsTransaction {
            user_id: user_id.into(),
            points: -required,
            kind: "redeem_cash".into(),
            reason: Some(format!("Redeemed {required} points for {cash}")),
            created_at: Some(now),
            ..PointsTransaction::default()
        };
        let wallet_tx = WalletTransaction {
            user_id: user_id.into(),
            amount_cents: option.cash_amount_cents,
            kind: "points_redemption".into(),
            description: Some(option.label.clone()),
            created_at: Some(now),
            ..WalletTransaction::default()
        };
        let notification = Notification {
            user_id: user_id.into(),
            kind: "points_redeemed".into(),
            title: "Points redeemed".into(),
            message: format!("{cash} was added to your wallet for {required} points."),
            read: false,
            created_at: Some(now),
            ..Notification::default()
        };

        let batch = WriteBatch::new()
            .require_at_least(collections::USERS, user_id, POINTS_FIELD, required)
            .increment(collections::USERS, user_id, POINTS_FIELD, -required)
            .increment(collections::USERS, user_id, WALLET_FIELD, option.cash_amount_cents)
            .create(collections::POINTS_TRANSACTIONS, serde_json::to_value(&points_tx)?)
            .create(collections::WALLET_TRANSACTIONS, serde_json::to_value(&wallet_tx)?)
            .create(collections::NOTIFICATIONS, serde_json::to_value(&notification)?);

        let receipt = self.commit(user_id, required, batch)?;
        log::info!("user {user_id} redeemed {required} points for {cash} ({option_id})");

        let after = self.balances_after(
            user_id,
            account.loyalty_points - required,
            account.wallet_balance_cents + option.cash_amount_cents,
        );
        Ok(CashRedemption {
            user_id: user_id.into(),
            option_id: option_id.into(),
            points_spent: required,
            cash_credited_cents: option.cash_amount_cents,
            points_balance: after.0,
            wallet_balance_cents: after.1,
            transaction_id: receipt.created_in(collections::POINTS_TRANSACTIONS).map(str::to_string),
        })
    }

    pub fn redeem_for_reward(
        &self,
        user_id: &str,
        reward_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RewardRedemption, LedgerError> {
        let reward = self.config.reward(reward_id)?;
        let account = self.account(user_id)?;
        let cost = reward.cost;
        check_balance(user_id, cost, account.loyalty_points)?;

        let expires = expires_at(self.config, reward_id, now);
        let record = RedeemedReward {
            user_id: user_id.into(),
            reward_id: reward_id.into(),
            title: reward.title.clone(),
            cost,
            status: "active".into(),
            redeemed_at: Some(now),
            expires_at: Some(expires),
            ..RedeemedReward::default()
        };
        let points_tx = PointsTransaction {
            user_id: user_id.into(),
            points: -cost,
            kind: "redeem_reward".into(),
            reason: Some(format!("Redeemed {}", reward.title)),
            created_at: Some(now),
            ..PointsTransaction::default()
        };
        let notification = Notification {
            user_id: user_id.into(),
            kind: "reward_redeemed".into(),
            title: "Reward redeemed".into(),
            message: format!(
                "{} is yours. Use it before {}.",
                reward.title,
                expires.format("%b %-d, %Y")
            ),
            read: false,
            created_at: Some(now),
            ..Notification::default()
        };

        let batch = WriteBatch::new()
            .require_at_least(collections::USERS, user_id, POINTS_FIELD, cost)
            .increment(collections::USERS, user_id, POINTS_FIELD, -cost)
            .create(collections::REDEEMED_REWARDS, serde_json::to_value(&record)?)
            .create(collections::POINTS_TRANSACTIONS, serde_json::to_value(&points_tx)?)
            .create(collections::NOTIFICATIONS, serde_json::to_value(&notification)?);

        let receipt = self.commit(user_id, cost, batch)?;
        log::info!("user {user_id} redeemed {cost} points for reward {reward_id}");

        let after = self.balances_after(user_id, account.loyalty_points - cost, account.wallet_balance_cents);
        Ok(RewardRedemption {
            user_id: user_id.into(),
            reward_id: reward_id.into(),
            points_spent: cost,
            points_balance: after.0,
            redeemed_reward_id: receipt.created_in(collections::REDEEMED_REWARDS).map(str::to_string),
            expires_at: expires,
        })
    }

    fn commit(
        &self,
        user_id: &str,
        required: i64,
        batch: WriteBatch,
    ) -> Result<staybook_core::CommitReceipt, LedgerError> {
        self.store.commit(batch).map_err(|e| match e {
            StoreError::PreconditionFailed { actual, .. } => {
                log::info!("redemption refused at commit for {user_id}: balance is now {actual}");
                LedgerError::InsufficientPoints { required, available: actual }
            }
            StoreError::NotFound { .. } => LedgerError::AccountNotFound(user_id.to_string()),
            other => LedgerError::Store(other),
        })
    }

    /// Re-read balances after a commit. Falls back to the values implied by
    /// the pre-commit read if the store cannot answer.
    fn balances_after(&self, user_id: &str, points: i64, wallet_cents: i64) -> (i64, i64) {
        match self.account(user_id) {
            Ok(account) => (account.loyalty_points, account.wallet_balance_cents),
            Err(e) => {
                log::warn!("could not re-read balances for {user_id} after redemption: {e}");
                (points, wallet_cents)
            }
        }
    }
}

fn check_balance(user_id: &str, required: i64, available: i64) -> Result<(), LedgerError> {
    if required > available {
        log::info!("redemption refused for {user_id}: {required} required, {available} available");
        return Err(LedgerError::InsufficientPoints { required, available });
    }
    Ok(())
}
