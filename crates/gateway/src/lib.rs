//! Callable-function gateway client.
//!
//! Wire contract for server-side functions: `POST {api_base}/{name}` with a
//! bearer id token and a `{"data": ...}` envelope, answered by
//! `{"result": ...}` or `{"error": {status, message}}`.
//!
//! Blocking, no retries.

mod client;
mod session;

pub use client::{CallableClient, GatewayError, DEFAULT_PAYOUT_FUNCTION};
pub use session::{
    auth_file_path, delete_session, delete_session_at, load_session, load_session_from, save_session,
    save_session_to, AuthSession,
};
