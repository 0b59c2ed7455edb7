//! Client handle and builder.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use std::time::Duration;

use shodan_core::{ApiToken, BaseUrls, ShodanError};
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;

/// Default `User-Agent` sent by clients built through [`ClientBuilder`].
const DEFAULT_USER_AGENT: &str = concat!("shodan-client/", env!("CARGO_PKG_VERSION"));

/// Builder for configuring a [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    token: ApiToken,
    base_urls: BaseUrls,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    fn new(token: ApiToken) -> Self {
        Self {
            token,
            base_urls: BaseUrls::default(),
            timeout: None,
            user_agent: None,
            http: None,
        }
    }

    /// Overrides the standard API root.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_urls.standard = url.into();
        self
    }

    /// Overrides the exploit API root.
    pub fn exploit_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_urls.exploit = url.into();
        self
    }

    /// Overrides the streaming API root.
    pub fn stream_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_urls.stream = url.into();
        self
    }

    /// Sets an overall per-request timeout.
    ///
    /// The timeout covers the whole exchange including the body, so it also
    /// bounds the lifetime of streams opened by the client. Unset by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Uses a caller-supplied transport.
    ///
    /// When set, [`timeout`](Self::timeout) and
    /// [`user_agent`](Self::user_agent) are ignored; configure them on the
    /// supplied client instead.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Builds the [`Client`].
    ///
    /// ## Errors
    ///
    /// Returns [`ShodanError::Configuration`] if a base address is not an
    /// absolute URL or the HTTP client cannot be constructed.
    pub fn build(self) -> Result<Client, ShodanError> {
        validate_base_url("base_url", &self.base_urls.standard)?;
        validate_base_url("exploit_base_url", &self.base_urls.exploit)?;
        validate_base_url("stream_base_url", &self.base_urls.stream)?;

        let http = match self.http {
            Some(http) => {
                if self.timeout.is_some() || self.user_agent.is_some() {
                    debug!("custom HTTP client supplied; ignoring timeout and user agent");
                }
                http
            }
            None => {
                let mut builder = reqwest::Client::builder().user_agent(
                    self.user_agent
                        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                );
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(|e| ShodanError::Configuration {
                    message: format!("HTTP client could not be constructed: {e}"),
                })?
            }
        };

        Ok(Client::from_parts(http, self.token, self.base_urls))
    }
}

/// Async client for the Shodan API.
///
/// Cheap to clone. Clones share the transport and the base addresses, so a
/// base replaced through one clone is seen by all of them. Base addresses are
/// read at call time, never cached by in-flight builders.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    token: ApiToken,
    base_urls: Arc<RwLock<BaseUrls>>,
}

impl Client {
    /// Creates a client with the production base addresses.
    ///
    /// `http` is the transport to use; `None` selects a default
    /// `reqwest::Client`.
    pub fn new(http: Option<reqwest::Client>, token: ApiToken) -> Self {
        Self::from_parts(http.unwrap_or_default(), token, BaseUrls::default())
    }

    /// Creates a new builder for configuring a client.
    pub fn builder(token: ApiToken) -> ClientBuilder {
        ClientBuilder::new(token)
    }

    /// Creates a client from a loaded [`ClientConfig`].
    ///
    /// ## Errors
    ///
    /// Returns [`ShodanError::Configuration`] if the configuration is invalid.
    pub fn from_config(config: &ClientConfig, token: ApiToken) -> Result<Self, ShodanError> {
        config.validate()?;
        config.to_builder(token).build()
    }

    fn from_parts(http: reqwest::Client, token: ApiToken, base_urls: BaseUrls) -> Self {
        Self {
            http,
            token,
            base_urls: Arc::new(RwLock::new(base_urls)),
        }
    }

    /// Returns the API token.
    pub fn token(&self) -> &ApiToken {
        &self.token
    }

    /// Returns the underlying transport.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    /// Returns a consistent snapshot of all three base addresses.
    pub fn base_urls(&self) -> BaseUrls {
        self.read_base_urls().clone()
    }

    /// Current standard API root.
    pub fn base_url(&self) -> String {
        self.read_base_urls().standard.clone()
    }

    /// Current exploit API root.
    pub fn exploit_base_url(&self) -> String {
        self.read_base_urls().exploit.clone()
    }

    /// Current streaming API root.
    pub fn stream_base_url(&self) -> String {
        self.read_base_urls().stream.clone()
    }

    /// Replaces the standard API root for all subsequent calls.
    pub fn set_base_url(&self, url: impl Into<String>) {
        self.write_base_urls(|urls| urls.standard = url.into());
    }

    /// Replaces the exploit API root for all subsequent calls.
    pub fn set_exploit_base_url(&self, url: impl Into<String>) {
        self.write_base_urls(|urls| urls.exploit = url.into());
    }

    /// Replaces the streaming API root for all subsequent calls.
    pub fn set_stream_base_url(&self, url: impl Into<String>) {
        self.write_base_urls(|urls| urls.stream = url.into());
    }

    // Writers only assign whole strings, so a poisoned lock still holds valid data.
    fn read_base_urls(&self) -> RwLockReadGuard<'_, BaseUrls> {
        self.base_urls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_base_urls(&self, update: impl FnOnce(&mut BaseUrls)) {
        let mut guard = self
            .base_urls
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        update(&mut guard);
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<(), ShodanError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ShodanError::Configuration {
            message: format!("{field} '{value}' is not an absolute URL: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> ApiToken {
        ApiToken::new("TEST_TOKEN").unwrap()
    }

    #[test]
    fn new_client_keeps_token_and_production_bases() {
        let client = Client::new(None, token());

        assert_eq!(client.token().as_str(), "TEST_TOKEN");
        assert_eq!(client.base_urls(), BaseUrls::default());
    }

    #[test]
    fn new_client_accepts_custom_transport() {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let client = Client::new(Some(http), token());

        assert_eq!(client.token().as_str(), "TEST_TOKEN");
    }

    #[test]
    fn setters_replace_each_base_independently() {
        let client = Client::new(None, token());

        client.set_base_url("http://127.0.0.1:1");
        assert_eq!(client.base_url(), "http://127.0.0.1:1");
        assert_eq!(client.exploit_base_url(), "https://exploits.shodan.io/api");
        assert_eq!(client.stream_base_url(), "https://stream.shodan.io");

        client.set_exploit_base_url("http://127.0.0.1:2");
        client.set_stream_base_url("http://127.0.0.1:3");
        assert_eq!(client.exploit_base_url(), "http://127.0.0.1:2");
        assert_eq!(client.stream_base_url(), "http://127.0.0.1:3");
    }

    #[test]
    fn clones_share_base_addresses() {
        let client = Client::new(None, token());
        let clone = client.clone();

        clone.set_base_url("http://localhost:9999");

        assert_eq!(client.base_url(), "http://localhost:9999");
    }

    #[test]
    fn builder_overrides_bases() {
        let client = Client::builder(token())
            .base_url("http://localhost:1")
            .exploit_base_url("http://localhost:2")
            .stream_base_url("http://localhost:3")
            .timeout(Duration::from_secs(10))
            .user_agent("tests")
            .build()
            .unwrap();

        assert_eq!(
            client.base_urls(),
            BaseUrls {
                standard: "http://localhost:1".to_string(),
                exploit: "http://localhost:2".to_string(),
                stream: "http://localhost:3".to_string(),
            }
        );
    }

    #[test]
    fn builder_rejects_relative_base() {
        let result = Client::builder(token()).stream_base_url("stream.shodan.io").build();

        match result {
            Err(ShodanError::Configuration { message }) => {
                assert!(message.contains("stream_base_url"));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn builder_accepts_custom_transport() {
        let client = Client::builder(token())
            .http_client(reqwest::Client::new())
            .timeout(Duration::from_secs(1))
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://api.shodan.io");
    }

    #[test]
    fn concurrent_readers_and_writers_see_whole_values() {
        let client = Client::new(None, token());
        let writer = client.clone();

        let handle = std::thread::spawn(move || {
            for i in 0..200 {
                writer.set_base_url(format!("http://host-{i}.test"));
            }
        });

        for _ in 0..200 {
            let base = client.base_url();
            assert!(base == "https://api.shodan.io" || base.starts_with("http://host-"));
        }
        handle.join().unwrap();
        assert_eq!(client.base_url(), "http://host-199.test");
    }
}
