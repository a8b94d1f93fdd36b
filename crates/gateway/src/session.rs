//! Saved sign-in session.
//!
//! Reads/writes ~/.config/staybook/auth.json (0600 on Unix).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use staybook_core::{AuthProvider, AuthUser};

use crate::client::GatewayError;

/// Identity and bearer token stored after sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Bearer id token for the function gateway
    pub id_token: String,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

impl AuthSession {
    pub fn user(&self) -> AuthUser {
        AuthUser {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            email_verified: self.email_verified,
        }
    }
}

impl AuthProvider for AuthSession {
    fn current_user(&self) -> Option<AuthUser> {
        Some(self.user())
    }
}

/// Returns the path to the saved session file.
pub fn auth_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("staybook/auth.json"))
}

/// Load the saved session. `None` if nothing is saved or the file is invalid.
pub fn load_session() -> Option<AuthSession> {
    load_session_from(&auth_file_path()?)
}

pub fn load_session_from(path: &Path) -> Option<AuthSession> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("ignoring invalid session file {}: {e}", path.display());
            None
        }
    }
}

pub fn save_session(session: &AuthSession) -> Result<(), GatewayError> {
    let path = auth_file_path()
        .ok_or_else(|| GatewayError::Io("could not determine config directory".into()))?;
    save_session_to(&path, session)
}

/// Write the session, creating the parent directory. Sets 0600 on Unix.
pub fn save_session_to(path: &Path, session: &AuthSession) -> Result<(), GatewayError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| GatewayError::Io(format!("failed to create config directory: {e}")))?;
    }

    let contents = serde_json::to_string_pretty(session)
        .map_err(|e| GatewayError::Parse(format!("failed to serialize session: {e}")))?;
    std::fs::write(path, contents)
        .map_err(|e| GatewayError::Io(format!("failed to write session file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| GatewayError::Io(format!("failed to set file permissions: {e}")))?;
    }
    Ok(())
}

pub fn delete_session() -> Result<bool, GatewayError> {
    match auth_file_path() {
        Some(path) => delete_session_at(&path),
        None => Ok(false),
    }
}

/// Remove the session file. `Ok(false)` when there was nothing to remove.
pub fn delete_session_at(path: &Path) -> Result<bool, GatewayError> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)
        .map_err(|e| GatewayError::Io(format!("failed to delete session file: {e}")))?;
    Ok(true)
}
