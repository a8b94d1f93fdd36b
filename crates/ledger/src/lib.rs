//! `staybook-ledger`: loyalty points ledger.
//!
//! Tier lookup and booking points are pure functions over a [`TierTable`].
//! Redemptions go through a [`DocumentStore`](staybook_core::DocumentStore)
//! as one conditional write batch each; payouts go through a
//! [`PayoutGateway`].

pub mod config;
pub mod error;
pub mod expiry;
pub mod history;
pub mod payout;
pub mod redeem;
pub mod tier;

pub use config::{CashOption, ExpiryRule, LoyaltyConfig, Reward};
pub use error::LedgerError;
pub use history::{points_history, PointsHistory};
pub use payout::{request_payout, PayoutGateway, PayoutReceipt, PayoutRecipient, PayoutRequest};
pub use redeem::{CashRedemption, Redeemer, RewardRedemption};
pub use tier::{points_for_booking, progress_to_next, TierLevel, TierStatus, TierTable};
