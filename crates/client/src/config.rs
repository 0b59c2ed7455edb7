//! Loadable client configuration.
//!
//! [`ClientConfig`] is the serialisable counterpart of [`ClientBuilder`]: an
//! application can deserialise it from its own configuration file, apply
//! environment overrides, and hand it to [`Client::from_config`].
//!
//! [`Client::from_config`]: crate::Client::from_config

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shodan_core::{
    ApiToken, ShodanError, DEFAULT_BASE_URL, DEFAULT_EXPLOIT_BASE_URL, DEFAULT_STREAM_BASE_URL,
};
use url::Url;

use crate::client::{Client, ClientBuilder};

/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BASE_URL: &str = "SHODAN_BASE_URL";
/// Environment variable overriding [`ClientConfig::exploit_base_url`].
pub const ENV_EXPLOIT_BASE_URL: &str = "SHODAN_EXPLOIT_BASE_URL";
/// Environment variable overriding [`ClientConfig::stream_base_url`].
pub const ENV_STREAM_BASE_URL: &str = "SHODAN_STREAM_BASE_URL";

/// Connection settings for a [`Client`].
///
/// Every field has a default, so an empty document deserialises to the
/// production configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Standard API root.
    pub base_url: String,
    /// Exploit API root.
    pub exploit_base_url: String,
    /// Streaming API root.
    pub stream_base_url: String,
    /// Overall per-request timeout in seconds. `None` disables it, which is
    /// what long-lived streams need.
    pub timeout_secs: Option<u64>,
    /// `User-Agent` header. `None` uses the crate default.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            exploit_base_url: DEFAULT_EXPLOIT_BASE_URL.to_string(),
            stream_base_url: DEFAULT_STREAM_BASE_URL.to_string(),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Applies `SHODAN_BASE_URL`, `SHODAN_EXPLOIT_BASE_URL`, and
    /// `SHODAN_STREAM_BASE_URL` when set to a non-empty value.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(url) = lookup(ENV_EXPLOIT_BASE_URL) {
            self.exploit_base_url = url;
        }
        if let Some(url) = lookup(ENV_STREAM_BASE_URL) {
            self.stream_base_url = url;
        }
        self
    }

    /// Checks that every base address is an absolute URL.
    ///
    /// ## Errors
    ///
    /// Returns [`ShodanError::Configuration`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ShodanError> {
        for (field, value) in [
            ("base_url", &self.base_url),
            ("exploit_base_url", &self.exploit_base_url),
            ("stream_base_url", &self.stream_base_url),
        ] {
            Url::parse(value).map_err(|e| ShodanError::Configuration {
                message: format!("{field} '{value}' is not an absolute URL: {e}"),
            })?;
        }

        if self.timeout_secs == Some(0) {
            return Err(ShodanError::Configuration {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    pub(crate) fn to_builder(&self, token: ApiToken) -> ClientBuilder {
        let mut builder = Client::builder(token)
            .base_url(self.base_url.clone())
            .exploit_base_url(self.exploit_base_url.clone())
            .stream_base_url(self.stream_base_url.clone());

        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn token() -> ApiToken {
        ApiToken::new("TEST_TOKEN").unwrap()
    }

    #[test]
    fn empty_document_yields_production_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "https://api.shodan.io");
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"stream_base_url": "http://localhost:8080", "timeout_secs": 30}"#)
                .unwrap();

        assert_eq!(config.base_url, "https://api.shodan.io");
        assert_eq!(config.stream_base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn overrides_apply_non_empty_values_only() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://localhost:1"),
            (ENV_EXPLOIT_BASE_URL, "  "),
        ]
        .into_iter()
        .collect();

        let config =
            ClientConfig::default().with_overrides_from(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.base_url, "http://localhost:1");
        assert_eq!(config.exploit_base_url, "https://exploits.shodan.io/api");
        assert_eq!(config.stream_base_url, "https://stream.shodan.io");
    }

    #[test]
    fn validate_rejects_relative_urls() {
        let config = ClientConfig {
            exploit_base_url: "exploits.shodan.io".to_string(),
            ..ClientConfig::default()
        };

        match config.validate() {
            Err(ShodanError::Configuration { message }) => {
                assert!(message.contains("exploit_base_url"));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = ClientConfig {
            timeout_secs: Some(0),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_config_applies_bases() {
        let config = ClientConfig {
            base_url: "http://localhost:1".to_string(),
            timeout_secs: Some(5),
            user_agent: Some("config-test".to_string()),
            ..ClientConfig::default()
        };

        let client = Client::from_config(&config, token()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1");
        assert_eq!(client.stream_base_url(), "https://stream.shodan.io");
    }
}
