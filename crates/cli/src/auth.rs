// login / logout

use std::path::{Path, PathBuf};

use serde::Serialize;
use staybook_gateway::{
    auth_file_path, delete_session, delete_session_at, save_session, save_session_to, AuthSession,
    GatewayError,
};

use crate::util::print_json;
use crate::CliError;

pub struct LoginArgs {
    pub token: String,
    pub user: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub auth: Option<PathBuf>,
}

#[derive(Serialize)]
struct SessionOutput {
    user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    email_verified: bool,
    path: Option<String>,
}

fn session_io(err: GatewayError) -> CliError {
    CliError::io(err.to_string())
}

fn shown_path(flag: Option<&Path>) -> Option<String> {
    flag.map(Path::to_path_buf)
        .or_else(auth_file_path)
        .map(|p| p.display().to_string())
}

impl LoginArgs {
    fn to_session(&self) -> Result<AuthSession, CliError> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(CliError::args("empty --token").with_hint("pass --token or set STAYBOOK_TOKEN"));
        }
        let user_id = self.user.trim();
        if user_id.is_empty() {
            return Err(CliError::args("empty --user"));
        }
        Ok(AuthSession {
            id_token: token.to_string(),
            user_id: user_id.to_string(),
            email: self.email.as_deref().map(str::trim).filter(|e| !e.is_empty()).map(str::to_string),
            email_verified: self.email_verified,
        })
    }
}

pub fn cmd_login(args: LoginArgs, json: bool) -> Result<(), CliError> {
    let session = args.to_session()?;
    match &args.auth {
        Some(path) => save_session_to(path, &session),
        None => save_session(&session),
    }
    .map_err(session_io)?;
    log::debug!("saved session for {}", session.user_id);

    if json {
        return print_json(&SessionOutput {
            user_id: session.user_id,
            email: session.email,
            email_verified: session.email_verified,
            path: shown_path(args.auth.as_deref()),
        });
    }
    match &session.email {
        Some(email) => eprintln!("Signed in as {} ({})", session.user_id, email),
        None => eprintln!("Signed in as {}", session.user_id),
    }
    if !session.email_verified {
        eprintln!("note: email not verified; payouts will be refused");
    }
    Ok(())
}

pub fn cmd_logout(auth: Option<&Path>, json: bool) -> Result<(), CliError> {
    let removed = match auth {
        Some(path) => delete_session_at(path),
        None => delete_session(),
    }
    .map_err(session_io)?;

    if json {
        return print_json(&serde_json::json!({ "removed": removed, "path": shown_path(auth) }));
    }
    if removed {
        eprintln!("Signed out");
    } else {
        eprintln!("No saved session");
    }
    Ok(())
}
