//! Blocking reqwest client (no Tokio runtime required).

use std::time::Duration;

use serde_json::{json, Value};
use staybook_ledger::payout::GatewayResult;
use staybook_ledger::{PayoutGateway, PayoutReceipt, PayoutRequest};

use crate::session::AuthSession;

pub const DEFAULT_PAYOUT_FUNCTION: &str = "createPayout";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {0}: {1}")]
    Http(u16, String),
    /// 400/422 without a callable error body.
    #[error("{0}")]
    Validation(String),
    /// The function ran and reported an error.
    #[error("{status}: {message}")]
    Function { status: String, message: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("I/O error: {0}")]
    Io(String),
}

#[derive(Clone)]
pub struct CallableClient {
    http: reqwest::blocking::Client,
    api_base: String,
    id_token: String,
    payout_function: String,
}

impl CallableClient {
    pub fn new(api_base: &str, session: &AuthSession) -> Result<Self, GatewayError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("staybook/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            id_token: session.id_token.clone(),
            payout_function: DEFAULT_PAYOUT_FUNCTION.to_string(),
        })
    }

    pub fn with_payout_function(mut self, name: &str) -> Self {
        self.payout_function = name.to_string();
        self
    }

    /// Invoke a function and return its `result` payload.
    pub fn call(&self, function: &str, data: &Value) -> Result<Value, GatewayError> {
        let url = format!("{}/{}", self.api_base, function);
        log::debug!("calling {url}");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.id_token)
            .json(&json!({ "data": data }))
            .send()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(error_from_body(status, body));
        }

        let mut body: Value = response.json().map_err(|e| GatewayError::Parse(e.to_string()))?;
        if let Some(err) = callable_error(&body) {
            return Err(err);
        }
        match body.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(GatewayError::Parse("response has no 'result' field".into())),
        }
    }

    pub fn payout(&self, request: &PayoutRequest) -> Result<PayoutReceipt, GatewayError> {
        let result = self.call(&self.payout_function, &request.to_payload())?;
        serde_json::from_value(result).map_err(|e| GatewayError::Parse(e.to_string()))
    }
}

impl PayoutGateway for CallableClient {
    fn send_payout(&self, request: &PayoutRequest) -> GatewayResult {
        Ok(self.payout(request)?)
    }
}

fn callable_error(body: &Value) -> Option<GatewayError> {
    let err = body.get("error")?;
    Some(GatewayError::Function {
        status: err["status"].as_str().unwrap_or("UNKNOWN").to_string(),
        message: err["message"].as_str().unwrap_or("function failed").to_string(),
    })
}

fn error_from_body(status: u16, body: String) -> GatewayError {
    if let Some(err) = serde_json::from_str::<Value>(&body).ok().as_ref().and_then(callable_error) {
        return err;
    }
    if status == 422 || status == 400 {
        return GatewayError::Validation(body);
    }
    GatewayError::Http(status, body)
}
