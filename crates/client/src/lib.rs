//! Shodan API client.
//!
//! Exposes the Shodan REST and streaming APIs over `reqwest`. The engine has
//! three parts:
//!
//! - **URL building** ([`Client::build_url`] and its base-specific variants):
//!   `base + path + "?key=<token>" [+ "&" + params]`.
//! - **Request execution** ([`Client::send_request`],
//!   [`Client::execute_request`], [`Client::execute_request_discard`]): one
//!   round trip, status classification, JSON decoding when a result is wanted.
//! - **Stream execution** ([`Client::execute_stream_request`]): connection
//!   setup awaited by the caller, body lines forwarded to a channel by a
//!   background task.
//!
//! Endpoint wrappers ([`Client::account_profile`], [`Client::stream_banners`])
//! sit on top and also implement the [`shodan_core::AccountApi`] and
//! [`shodan_core::StreamApi`] ports.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** All HTTP transport, URL encoding, and body framing live
//! here. Error classification uses [`shodan_core::ShodanError`]; no transport
//! type escapes this crate except the raw [`reqwest::Response`] returned by
//! [`Client::send_request`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use shodan_client::Client;
//! use shodan_core::ApiToken;
//!
//! # async fn run() -> Result<(), shodan_core::ShodanError> {
//! let token = ApiToken::new("MY_API_KEY").expect("non-empty token");
//! let client = Client::new(None, token);
//!
//! let profile = client.account_profile().await?;
//! println!("{} credits left", profile.credits);
//! # Ok(())
//! # }
//! ```

mod account;
mod banners;
mod client;
mod config;
mod lines;
mod request;
mod stream;
mod url_builder;

pub use account::PROFILE_PATH;
pub use banners::BANNERS_PATH;
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ENV_BASE_URL, ENV_EXPLOIT_BASE_URL, ENV_STREAM_BASE_URL};

pub use reqwest::Method;
