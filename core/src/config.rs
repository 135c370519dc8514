//! Synchronizer configuration.
//!
//! Read from the environment by hosts that have one, or deserialized from
//! JSON by hosts that embed it.

use std::time::Duration;

use serde::Deserialize;

use crate::banner::DEFAULT_ERROR_TIMEOUT;
use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://mate.academy/students-api";

pub const ENV_BASE_URL: &str = "TODO_API_URL";
pub const ENV_OWNER_ID: &str = "TODO_OWNER_ID";
pub const ENV_ERROR_TIMEOUT_MS: &str = "TODO_ERROR_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub owner_id: i64,
    #[serde(default = "default_error_timeout_ms")]
    pub error_timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_error_timeout_ms() -> u64 {
    DEFAULT_ERROR_TIMEOUT.as_millis() as u64
}

impl SyncConfig {
    pub fn new(base_url: &str, owner_id: i64) -> Self {
        Self {
            base_url: base_url.to_string(),
            owner_id,
            error_timeout_ms: default_error_timeout_ms(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source using the `TODO_*` names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_BASE_URL).unwrap_or_else(default_base_url);
        let owner_id = match lookup(ENV_OWNER_ID) {
            Some(raw) => parse_number(ENV_OWNER_ID, &raw)?,
            None => return Err(ConfigError::MissingOwner),
        };
        let error_timeout_ms = match lookup(ENV_ERROR_TIMEOUT_MS) {
            Some(raw) => parse_number(ENV_ERROR_TIMEOUT_MS, &raw)?,
            None => default_error_timeout_ms(),
        };

        let config = Self {
            base_url,
            owner_id,
            error_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Invalid {
            key: "config",
            value: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner_id <= 0 {
            return Err(ConfigError::MissingOwner);
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        Ok(())
    }

    pub fn error_timeout(&self) -> Duration {
        Duration::from_millis(self.error_timeout_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_in_missing_keys() {
        let config = SyncConfig::from_lookup(lookup(&[(ENV_OWNER_ID, "2171")])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.owner_id, 2171);
        assert_eq!(config.error_timeout(), Duration::from_millis(3000));
    }

    #[test]
    fn missing_owner_is_rejected() {
        let err = SyncConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingOwner);

        let err = SyncConfig::from_lookup(lookup(&[(ENV_OWNER_ID, "0")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingOwner);
    }

    #[test]
    fn bad_numbers_name_their_key() {
        let err = SyncConfig::from_lookup(lookup(&[
            (ENV_OWNER_ID, "7"),
            (ENV_ERROR_TIMEOUT_MS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_ERROR_TIMEOUT_MS, .. }));
    }

    #[test]
    fn from_json_uses_camel_case() {
        let config =
            SyncConfig::from_json(r#"{"baseUrl":"http://localhost:3000","ownerId":5}"#).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.owner_id, 5);
        assert_eq!(config.error_timeout_ms, 3000);
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let config = SyncConfig::new("  ", 1);
        assert_eq!(config.validate(), Err(ConfigError::EmptyBaseUrl));
    }
}
