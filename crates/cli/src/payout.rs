// payout command

use std::path::PathBuf;

use staybook_config::Settings;
use staybook_core::money::{format_cents, parse_amount};
use staybook_gateway::{load_session, load_session_from, CallableClient};
use staybook_ledger::{request_payout, LedgerError, PayoutRecipient, PayoutRequest};

use crate::util::print_json;
use crate::CliError;

pub struct PayoutArgs {
    pub email: Option<String>,
    pub payer_id: Option<String>,
    pub amount: String,
    pub currency: Option<String>,
    pub auth: Option<PathBuf>,
}

impl PayoutArgs {
    fn to_request(&self, settings: &Settings) -> Result<PayoutRequest, CliError> {
        let recipient = match (&self.email, &self.payer_id) {
            (Some(email), _) => PayoutRecipient::Email(email.trim().to_string()),
            (None, Some(id)) => PayoutRecipient::PayerId(id.trim().to_string()),
            (None, None) => return Err(CliError::args("payout needs --email or --payer-id")),
        };
        let amount_cents = parse_amount(&self.amount).ok_or_else(|| {
            CliError::args(format!("invalid --amount \"{}\"", self.amount))
                .with_hint("use a currency amount such as 42.50")
        })?;
        let currency = self
            .currency
            .as_deref()
            .unwrap_or(&settings.currency)
            .trim()
            .to_ascii_uppercase();
        Ok(PayoutRequest { recipient, amount_cents, currency })
    }
}

pub fn cmd_payout(args: PayoutArgs, settings: &Settings, json: bool) -> Result<(), CliError> {
    let request = args.to_request(settings)?;

    let session = match &args.auth {
        Some(path) => load_session_from(path),
        None => load_session(),
    }
    .ok_or(LedgerError::NotAuthenticated)?;

    let client = CallableClient::new(&settings.gateway_api_base, &session)?
        .with_payout_function(&settings.payout_function);
    let receipt = request_payout(&session, &client, &request)?;

    if json {
        return print_json(&receipt);
    }
    println!(
        "Payout of {} accepted",
        format_cents(request.amount_cents, &request.currency)
    );
    if let Some(batch) = &receipt.payout_batch_id {
        println!("  Batch        {batch}");
    }
    if let Some(status) = &receipt.batch_status {
        println!("  Status       {status}");
    }
    if let Some(status) = &receipt.transaction_status {
        println!("  Transaction  {status}");
    }
    Ok(())
}
