//! Core types shared between the database and the server.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// The identity a request is made on behalf of.
///
/// Resolved once per request by the authentication middleware and passed
/// explicitly to everything that needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Principal {
    /// Holder of the configured admin API key, or a user flagged as admin.
    Administrator,
    /// A regular signed-in user.
    User(UserId),
    /// No credentials were presented.
    Guest,
}

impl Principal {
    /// Whether any credentials were presented.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Principal::Guest)
    }

    /// The user ID, if this principal is a regular user.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Principal::User(id) => Some(*id),
            _ => None,
        }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Principal::Administrator => write!(f, "administrator"),
            Principal::User(id) => write!(f, "user:{id}"),
            Principal::Guest => write!(f, "guest"),
        }
    }
}
