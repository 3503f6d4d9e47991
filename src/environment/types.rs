use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::User;

// Repository Types

/// The identity the repository remembers between launches. Enough to ask the
/// backend for the full user record on the next start.
#[derive(Default, Clone, Debug, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub last_login: DateTime<Utc>,
}

impl StoredUser {
    pub fn new(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            avatar: user.avatar.clone(),
            last_login: Utc::now(),
        }
    }
}

// Provider Types

/// What the external sign-in provider hands back after a successful login.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}
