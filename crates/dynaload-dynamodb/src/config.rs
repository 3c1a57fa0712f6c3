use serde::Deserialize;

/// Error for an unusable `destination.config` block.
#[derive(Debug, thiserror::Error)]
#[error("invalid DynamoDB config: {0}")]
pub struct ConfigError(pub String);

/// DynamoDB connection config from job YAML `destination.config`.
///
/// Anything left unset falls back to the standard AWS environment and
/// profile chain.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint, e.g. DynamoDB Local.
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub session_token: Option<String>,
    /// SDK-level attempts per request, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Resubmissions of `UnprocessedItems` before a batch is failed.
    #[serde(default = "default_unprocessed_retries")]
    pub unprocessed_retries: u32,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_unprocessed_retries() -> u32 {
    8
}

impl Config {
    /// Parse the opaque `destination.config` value. `null` means defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unknown fields or mistyped values.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        if value.is_null() {
            return Ok(Self {
                max_attempts: default_max_attempts(),
                unprocessed_retries: default_unprocessed_retries(),
                ..Self::default()
            });
        }
        Self::deserialize(value).map_err(|e| ConfigError(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] if only half of a static credential pair is
    /// set, or a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(ConfigError(
                    "access_key_id and secret_access_key must be set together".to_string(),
                ))
            }
            _ => {}
        }
        if self.session_token.is_some() && self.access_key_id.is_none() {
            return Err(ConfigError(
                "session_token requires access_key_id and secret_access_key".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError("max_attempts must be at least 1".to_string()));
        }
        if let Some(url) = &self.endpoint_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError(format!(
                    "endpoint_url '{url}' must start with http:// or https://"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}
