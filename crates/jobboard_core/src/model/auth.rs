//! Per-entity authorization rules.
//!
//! Rules are declarations only; the hosting platform enforces them.

use crate::config::AuthorizationMode;
use serde::{Deserialize, Serialize};

/// Access rule attached to one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationRule {
    /// Anyone holding the public API key may run CRUD operations.
    PublicApiKey,
    /// Any signed-in user-pool identity may run CRUD operations.
    Authenticated,
    /// Only the record owner may run CRUD operations.
    Owner,
}

impl AuthorizationRule {
    /// Authorization mode the platform must enable for this rule.
    pub fn required_mode(self) -> AuthorizationMode {
        match self {
            Self::PublicApiKey => AuthorizationMode::ApiKey,
            Self::Authenticated | Self::Owner => AuthorizationMode::UserPool,
        }
    }
}
