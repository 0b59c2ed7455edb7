//! Error and retry-policy types for the Shodan client.
//!
//! [`ShodanError`] is the single error type returned by every engine operation
//! and endpoint wrapper. Each variant corresponds to one failure class:
//! transport, malformed request, remote status, decode, stream setup, and
//! client configuration.
//!
//! The library never retries or suppresses an error. [`RetryPolicy`] lets the
//! application decide, from the error alone, whether a retry is reasonable.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// Produced by [`ShodanError::retry_policy`]. The client never acts on this
/// itself; back-off is the caller's decision.
///
/// ## Rules
///
/// - `Retryable` errors: transport failures, HTTP 429, HTTP 5xx. `after` is
///   taken from the server's `Retry-After` header when present.
/// - `NonRetryable` errors: malformed URLs or parameters, other 4xx statuses,
///   decode failures, invalid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means retry
        /// immediately or apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried without changing the request.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Client errors
// ---------------------------------------------------------------------------

/// Errors produced while building, sending, or decoding a Shodan API request.
///
/// Payloads are plain strings so the error can be serialised, logged, or sent
/// across task boundaries without dragging transport types along.
///
/// Transport messages never contain the request URL; the URL carries the API
/// token in its query string.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ShodanError {
    /// The request never produced an HTTP response: connection refused, DNS
    /// failure, TLS failure, timeout, or an I/O error while reading the body.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the underlying transport failure.
        message: String,
    },

    /// A URL could not be parsed before dispatch.
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The offending URL with any query string removed.
        url: String,
        /// Parser diagnostic.
        message: String,
    },

    /// The query parameters could not be encoded, or they attempted to set
    /// the reserved `key` parameter.
    #[error("Invalid query parameters: {message}")]
    InvalidQuery {
        /// Description of the encoding problem.
        message: String,
    },

    /// The server answered with a non-success status (>= 400).
    ///
    /// `body` is the raw response text, JSON or plain text alike. It is never
    /// decoded into the caller's response type.
    #[error("Shodan API returned HTTP {status}: {body}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Response body as (lossy) UTF-8 text.
        body: String,
        /// Delay in seconds from a `Retry-After` header, when the server sent
        /// one in the delta-seconds form.
        #[serde(default)]
        retry_after: Option<u64>,
    },

    /// A success response body did not match the expected JSON shape.
    #[error("Failed to decode response body: {message}")]
    Decode {
        /// Decoder diagnostic.
        message: String,
    },

    /// A streaming connection could not be established.
    ///
    /// Produced before any chunk is delivered; the output channel is unused.
    #[error("Stream could not be established: {source}")]
    StreamSetup {
        /// The failure that prevented the stream from starting.
        source: Box<ShodanError>,
    },

    /// The client configuration is invalid.
    ///
    /// Produced at construction time; a client never exists with an invalid
    /// configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl ShodanError {
    /// Returns the HTTP status reported by the server, if the failure was a
    /// remote error (including one that prevented a stream from starting).
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::StreamSetup { source } => source.status(),
            _ => None,
        }
    }

    /// Returns the raw body of a remote error response, if any.
    pub fn remote_body(&self) -> Option<&str> {
        match self {
            Self::Remote { body, .. } => Some(body),
            Self::StreamSetup { source } => source.remote_body(),
            _ => None,
        }
    }

    /// Classifies whether retrying the same request could succeed.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport { .. } => RetryPolicy::Retryable { after: None },
            Self::Remote {
                status,
                retry_after,
                ..
            } if *status == 429 || *status >= 500 => RetryPolicy::Retryable {
                after: retry_after.map(Duration::from_secs),
            },
            Self::StreamSetup { source } => source.retry_policy(),
            _ => RetryPolicy::NonRetryable,
        }
    }
}
