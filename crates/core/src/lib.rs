//! Domain layer of the Shodan API client.
//!
//! This crate contains the credential newtype, shared value types, the error
//! taxonomy, and the port traits used throughout the client. The transport
//! crate (`shodan-client`) implements the traits defined here.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate performs no network I/O.
//! It defines *what* a request is made of and *how* failures are classified;
//! `shodan-client` defines *how* requests are carried.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | `ApiToken` |
//! | [`types`] | `BaseUrls`, `QueryParams`, `Chunk`, `Profile`, `Timestamp` |
//! | [`errors`] | `ShodanError` and `RetryPolicy` |
//! | [`stream`] | `StreamHandle` for background stream readers |
//! | [`ports`] | `AccountApi`, `StreamApi` |

pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod stream;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{RetryPolicy, ShodanError};
pub use identifiers::ApiToken;
pub use ports::{AccountApi, StreamApi};
pub use stream::StreamHandle;
pub use types::{
    BaseUrls, Chunk, Profile, QueryParams, Timestamp, DEFAULT_BASE_URL, DEFAULT_EXPLOIT_BASE_URL,
    DEFAULT_STREAM_BASE_URL, TOKEN_PARAM,
};
