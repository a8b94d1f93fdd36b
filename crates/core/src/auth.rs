use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

pub trait AuthProvider {
    /// `None` when nobody is signed in.
    fn current_user(&self) -> Option<AuthUser>;
}

/// Fixed identity, for tests and offline tools.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth(pub Option<AuthUser>);

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Option<AuthUser> {
        self.0.clone()
    }
}
