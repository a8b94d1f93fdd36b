//! Wallet payouts through the payment provider.
//!
//! The provider call itself lives behind [`PayoutGateway`]. This module
//! enforces who may ask for a payout and what counts as success.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use staybook_core::money::format_cents;
use staybook_core::AuthProvider;

use crate::error::LedgerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutRecipient {
    Email(String),
    PayerId(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayoutRequest {
    pub recipient: PayoutRecipient,
    pub amount_cents: i64,
    /// ISO 4217 code.
    pub currency: String,
}

impl PayoutRequest {
    /// Gateway payload: `{payoutEmail | payerId, amount, currency}` with the
    /// amount as a two-decimal string.
    pub fn to_payload(&self) -> Value {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        let amount = format!("{sign}{}.{:02}", abs / 100, abs % 100);
        let mut payload = json!({ "amount": amount, "currency": self.currency });
        match &self.recipient {
            PayoutRecipient::Email(email) => payload["payoutEmail"] = json!(email),
            PayoutRecipient::PayerId(id) => payload["payerId"] = json!(id),
        }
        payload
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub payout_batch_id: Option<String>,
    #[serde(default)]
    pub batch_status: Option<String>,
    #[serde(default)]
    pub transaction_status: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

pub type GatewayResult = Result<PayoutReceipt, Box<dyn std::error::Error + Send + Sync>>;

pub trait PayoutGateway {
    fn send_payout(&self, request: &PayoutRequest) -> GatewayResult;
}

/// Ask the gateway to pay out. The signed-in user must have a verified
/// email, and the gateway must answer with a payout batch id.
pub fn request_payout(
    auth: &dyn AuthProvider,
    gateway: &dyn PayoutGateway,
    request: &PayoutRequest,
) -> Result<PayoutReceipt, LedgerError> {
    let user = auth.current_user().ok_or(LedgerError::NotAuthenticated)?;
    if !user.email_verified {
        return Err(LedgerError::EmailNotVerified);
    }
    if request.amount_cents <= 0 {
        return Err(LedgerError::InvalidPayout(format!(
            "amount must be positive, got {}",
            format_cents(request.amount_cents, &request.currency)
        )));
    }
    let recipient = match &request.recipient {
        PayoutRecipient::Email(s) | PayoutRecipient::PayerId(s) => s,
    };
    if recipient.trim().is_empty() {
        return Err(LedgerError::InvalidPayout("recipient is empty".into()));
    }
    if request.currency.len() != 3 {
        return Err(LedgerError::InvalidPayout(format!("unknown currency '{}'", request.currency)));
    }

    log::info!(
        "user {} requesting payout of {}",
        user.user_id,
        format_cents(request.amount_cents, &request.currency)
    );
    let receipt = gateway
        .send_payout(request)
        .map_err(|e| LedgerError::PayoutFailure(e.to_string()))?;

    match receipt.payout_batch_id.as_deref() {
        Some(id) if !id.is_empty() && receipt.success => {
            log::info!("payout batch {id} accepted ({:?})", receipt.batch_status);
            Ok(receipt)
        }
        _ => {
            log::warn!("payout rejected by gateway: {receipt:?}");
            Err(LedgerError::PayoutFailure("gateway returned no payout batch id".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staybook_core::{AuthUser, StaticAuth};

    struct FixedGateway(Result<PayoutReceipt, String>);

    impl PayoutGateway for FixedGateway {
        fn send_payout(&self, _request: &PayoutRequest) -> GatewayResult {
            self.0.clone().map_err(Into::into)
        }
    }

    fn verified() -> StaticAuth {
        StaticAuth(Some(AuthUser {
            user_id: "u1".into(),
            email: Some("host@example.com".into()),
            email_verified: true,
        }))
    }

    fn request() -> PayoutRequest {
        PayoutRequest {
            recipient: PayoutRecipient::Email("host@example.com".into()),
            amount_cents: 12_505,
            currency: "USD".into(),
        }
    }

    fn accepted() -> PayoutReceipt {
        PayoutReceipt {
            success: true,
            payout_batch_id: Some("B-1".into()),
            batch_status: Some("PENDING".into()),
            ..PayoutReceipt::default()
        }
    }

    #[test]
    fn payload_shape() {
        let payload = request().to_payload();
        assert_eq!(payload["payoutEmail"], "host@example.com");
        assert_eq!(payload["amount"], "125.05");
        assert_eq!(payload["currency"], "USD");
        assert!(payload.get("payerId").is_none());

        let by_id = PayoutRequest { recipient: PayoutRecipient::PayerId("P9".into()), ..request() };
        assert_eq!(by_id.to_payload()["payerId"], "P9");
    }

    #[test]
    fn payload_amount_keeps_sign_outside_digits() {
        let small = PayoutRequest { amount_cents: -5, ..request() };
        assert_eq!(small.to_payload()["amount"], "-0.05");
        let large = PayoutRequest { amount_cents: -12_345, ..request() };
        assert_eq!(large.to_payload()["amount"], "-123.45");
        let whole = PayoutRequest { amount_cents: 700, ..request() };
        assert_eq!(whole.to_payload()["amount"], "7.00");
    }

    #[test]
    fn accepted_payout() {
        let receipt = request_payout(&verified(), &FixedGateway(Ok(accepted())), &request()).unwrap();
        assert_eq!(receipt.payout_batch_id.as_deref(), Some("B-1"));
    }

    #[test]
    fn requires_signed_in_verified_user() {
        let gateway = FixedGateway(Ok(accepted()));
        let err = request_payout(&StaticAuth(None), &gateway, &request()).unwrap_err();
        assert!(matches!(err, LedgerError::NotAuthenticated));

        let unverified = StaticAuth(Some(AuthUser {
            user_id: "u1".into(),
            email: Some("host@example.com".into()),
            email_verified: false,
        }));
        let err = request_payout(&unverified, &gateway, &request()).unwrap_err();
        assert!(matches!(err, LedgerError::EmailNotVerified));
    }

    #[test]
    fn missing_batch_id_is_failure() {
        let gateway = FixedGateway(Ok(PayoutReceipt { success: true, ..PayoutReceipt::default() }));
        let err = request_payout(&verified(), &gateway, &request()).unwrap_err();
        assert!(matches!(err, LedgerError::PayoutFailure(_)));
    }

    #[test]
    fn gateway_error_is_failure() {
        let gateway = FixedGateway(Err("RECEIVER_UNREGISTERED".into()));
        let err = request_payout(&verified(), &gateway, &request()).unwrap_err();
        assert!(matches!(err, LedgerError::PayoutFailure(msg) if msg.contains("RECEIVER_UNREGISTERED")));
    }

    #[test]
    fn rejects_bad_requests() {
        let gateway = FixedGateway(Ok(accepted()));
        let zero = PayoutRequest { amount_cents: 0, ..request() };
        assert!(matches!(request_payout(&verified(), &gateway, &zero), Err(LedgerError::InvalidPayout(_))));
        let blank = PayoutRequest { recipient: PayoutRecipient::Email(" ".into()), ..request() };
        assert!(matches!(request_payout(&verified(), &gateway, &blank), Err(LedgerError::InvalidPayout(_))));
    }
}
