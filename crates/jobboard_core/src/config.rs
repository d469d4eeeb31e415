//! Data API authorization configuration.
//!
//! # Responsibility
//! - Describe which authorization modes the hosting platform enables.
//! - Validate API-key settings before they are passed through in a snapshot.
//!
//! # Invariants
//! - `apiKey` as default mode requires API-key settings.
//! - API-key expiry stays within 1..=365 days.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default API-key lifetime used by the shipped configuration.
pub const DEFAULT_API_KEY_EXPIRY_DAYS: u32 = 30;
/// Longest API-key lifetime the platform accepts.
pub const MAX_API_KEY_EXPIRY_DAYS: u32 = 365;

/// Platform authorization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationMode {
    ApiKey,
    UserPool,
    Iam,
}

impl AuthorizationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApiKey => "apiKey",
            Self::UserPool => "userPool",
            Self::Iam => "iam",
        }
    }
}

/// API-key mode settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyAuthorizationMode {
    pub expires_in_days: u32,
}

/// Authorization modes handed to the platform together with the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConfig {
    pub default_authorization_mode: AuthorizationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_authorization_mode: Option<ApiKeyAuthorizationMode>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            default_authorization_mode: AuthorizationMode::ApiKey,
            api_key_authorization_mode: Some(ApiKeyAuthorizationMode {
                expires_in_days: DEFAULT_API_KEY_EXPIRY_DAYS,
            }),
        }
    }
}

impl DataConfig {
    /// Validates mode settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_authorization_mode == AuthorizationMode::ApiKey
            && self.api_key_authorization_mode.is_none()
        {
            return Err(ConfigError::MissingApiKeySettings);
        }
        if let Some(api_key) = self.api_key_authorization_mode {
            if api_key.expires_in_days == 0 || api_key.expires_in_days > MAX_API_KEY_EXPIRY_DAYS {
                return Err(ConfigError::InvalidApiKeyExpiry(api_key.expires_in_days));
            }
        }
        Ok(())
    }

    /// Returns whether `mode` is available to entity rules.
    ///
    /// The default mode is always enabled; `apiKey` is also enabled as a
    /// secondary mode whenever API-key settings are present.
    pub fn enables(&self, mode: AuthorizationMode) -> bool {
        mode == self.default_authorization_mode
            || (mode == AuthorizationMode::ApiKey && self.api_key_authorization_mode.is_some())
    }
}

/// Authorization configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingApiKeySettings,
    InvalidApiKeyExpiry(u32),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKeySettings => write!(
                f,
                "default authorization mode `apiKey` requires apiKeyAuthorizationMode settings"
            ),
            Self::InvalidApiKeyExpiry(days) => write!(
                f,
                "api key expiry of {days} days is invalid; expected 1..={MAX_API_KEY_EXPIRY_DAYS}"
            ),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{
        ApiKeyAuthorizationMode, AuthorizationMode, ConfigError, DataConfig,
        DEFAULT_API_KEY_EXPIRY_DAYS,
    };

    #[test]
    fn default_config_is_api_key_with_thirty_days() {
        let config = DataConfig::default();
        assert_eq!(config.default_authorization_mode, AuthorizationMode::ApiKey);
        assert_eq!(
            config.api_key_authorization_mode,
            Some(ApiKeyAuthorizationMode {
                expires_in_days: DEFAULT_API_KEY_EXPIRY_DAYS
            })
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_api_key_default_without_settings() {
        let config = DataConfig {
            default_authorization_mode: AuthorizationMode::ApiKey,
            api_key_authorization_mode: None,
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::MissingApiKeySettings
        );
    }

    #[test]
    fn rejects_out_of_range_expiry() {
        for days in [0, 366] {
            let config = DataConfig {
                default_authorization_mode: AuthorizationMode::ApiKey,
                api_key_authorization_mode: Some(ApiKeyAuthorizationMode {
                    expires_in_days: days,
                }),
            };
            assert_eq!(
                config.validate().unwrap_err(),
                ConfigError::InvalidApiKeyExpiry(days)
            );
        }
    }

    #[test]
    fn api_key_stays_enabled_as_secondary_mode() {
        let config = DataConfig {
            default_authorization_mode: AuthorizationMode::UserPool,
            api_key_authorization_mode: Some(ApiKeyAuthorizationMode { expires_in_days: 7 }),
        };
        assert!(config.enables(AuthorizationMode::UserPool));
        assert!(config.enables(AuthorizationMode::ApiKey));
        assert!(!config.enables(AuthorizationMode::Iam));
    }
}
