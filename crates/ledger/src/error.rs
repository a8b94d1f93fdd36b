use staybook_core::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// TOML parse / deserialization error.
    #[error("loyalty config parse error: {0}")]
    ConfigParse(String),

    #[error("loyalty config validation error: {0}")]
    ConfigValidation(String),

    #[error("insufficient points: {required} required, {available} available")]
    InsufficientPoints { required: i64, available: i64 },

    /// The `users` document is absent at redemption time.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("unknown cash option: {0}")]
    UnknownCashOption(String),

    #[error("unknown reward: {0}")]
    UnknownReward(String),

    #[error("not signed in")]
    NotAuthenticated,

    #[error("email address is not verified")]
    EmailNotVerified,

    #[error("invalid payout: {0}")]
    InvalidPayout(String),

    /// The gateway errored or answered without a payout batch id.
    #[error("payout failed: {0}")]
    PayoutFailure(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cannot encode record: {0}")]
    Encode(#[from] serde_json::Error),
}
