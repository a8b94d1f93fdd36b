//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, bad values)   |
//! | 3-9     | input            | Files, documents and configuration       |
//! | 10-19   | points           | Redemption and account codes             |
//! | 20-29   | payout           | Sign-in and payout gateway codes         |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into [`ledger_exit_code`] or the command's error handling

use staybook_core::StoreError;
use staybook_ledger::LedgerError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unparseable flag values.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Input (3-9)
// =============================================================================

/// Input file missing or unreadable, or output could not be written.
pub const EXIT_IO: u8 = 3;

/// Reservation, listing or store file is not valid JSON.
pub const EXIT_PARSE: u8 = 4;

/// Loyalty programme TOML failed to parse or validate.
pub const EXIT_CONFIG: u8 = 5;

/// The document store refused the read or write.
pub const EXIT_STORE_UNAVAILABLE: u8 = 6;

// =============================================================================
// Points (10-19)
// =============================================================================

/// Balance is below the cost of the option or reward.
/// Nothing was written.
pub const EXIT_INSUFFICIENT_POINTS: u8 = 10;

/// No `users` document for the given id.
pub const EXIT_ACCOUNT_NOT_FOUND: u8 = 11;

/// Cash option or reward id is not in the programme.
pub const EXIT_UNKNOWN_OPTION: u8 = 12;

// =============================================================================
// Payout (20-29)
// =============================================================================

/// No saved session.
pub const EXIT_NOT_AUTH: u8 = 20;

/// Signed in, but the email address is not verified.
pub const EXIT_EMAIL_UNVERIFIED: u8 = 21;

/// Request rejected before reaching the gateway (amount, recipient, currency).
pub const EXIT_PAYOUT_INVALID: u8 = 22;

/// Gateway errored, was unreachable, or returned no payout batch id.
pub const EXIT_PAYOUT_FAILED: u8 = 23;

// =============================================================================
// Ledger Error Types
// =============================================================================

/// Map a LedgerError to its exit code.
pub fn ledger_exit_code(err: &LedgerError) -> u8 {
    match err {
        LedgerError::ConfigParse(_) | LedgerError::ConfigValidation(_) => EXIT_CONFIG,
        LedgerError::InsufficientPoints { .. } => EXIT_INSUFFICIENT_POINTS,
        LedgerError::AccountNotFound(_) => EXIT_ACCOUNT_NOT_FOUND,
        LedgerError::UnknownCashOption(_) | LedgerError::UnknownReward(_) => EXIT_UNKNOWN_OPTION,
        LedgerError::NotAuthenticated => EXIT_NOT_AUTH,
        LedgerError::EmailNotVerified => EXIT_EMAIL_UNVERIFIED,
        LedgerError::InvalidPayout(_) => EXIT_PAYOUT_INVALID,
        LedgerError::PayoutFailure(_) => EXIT_PAYOUT_FAILED,
        LedgerError::Store(StoreError::Unavailable(_)) => EXIT_STORE_UNAVAILABLE,
        LedgerError::Store(_) | LedgerError::Encode(_) => EXIT_ERROR,
    }
}

/// Stable machine name for a ledger error, used in `--json` error output.
pub fn ledger_error_kind(err: &LedgerError) -> &'static str {
    match err {
        LedgerError::ConfigParse(_) | LedgerError::ConfigValidation(_) => "config_invalid",
        LedgerError::InsufficientPoints { .. } => "insufficient_points",
        LedgerError::AccountNotFound(_) => "account_not_found",
        LedgerError::UnknownCashOption(_) => "unknown_cash_option",
        LedgerError::UnknownReward(_) => "unknown_reward",
        LedgerError::NotAuthenticated => "not_authenticated",
        LedgerError::EmailNotVerified => "email_not_verified",
        LedgerError::InvalidPayout(_) => "invalid_payout",
        LedgerError::PayoutFailure(_) => "payout_failed",
        LedgerError::Store(StoreError::Unavailable(_)) => "store_unavailable",
        LedgerError::Store(_) => "store_error",
        LedgerError::Encode(_) => "encode_error",
    }
}
