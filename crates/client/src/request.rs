//! Request execution with tracing instrumentation.

use std::error::Error as _;

use bytes::Bytes;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use shodan_core::ShodanError;
use tracing::{debug, instrument, Span};

use crate::url_builder::parse_url;
use crate::Client;

impl Client {
    /// Sends one request and returns the raw response.
    ///
    /// No status interpretation happens here: a 404 is an `Ok` response.
    ///
    /// ## Errors
    ///
    /// - [`ShodanError::InvalidUrl`] if `url` cannot be parsed.
    /// - [`ShodanError::Transport`] if no response was received.
    pub async fn send_request(
        &self,
        method: Method,
        url: &str,
        body: Option<Bytes>,
    ) -> Result<reqwest::Response, ShodanError> {
        let url = parse_url(url)?;

        Span::current().record("http.path", url.path());
        debug!(%method, path = url.path(), "sending request");

        let mut request = self.http_client().request(method, url);
        if let Some(body) = body {
            request = request.body(body);
        }

        request.send().await.map_err(transport_error)
    }

    /// Performs one request and decodes a JSON success body into `T`.
    ///
    /// The response body is always read to the end before the status is
    /// classified. When the response carries nothing worth decoding, use
    /// [`execute_request_discard`](Self::execute_request_discard) instead.
    ///
    /// ## Errors
    ///
    /// - Errors from [`send_request`](Self::send_request), unchanged.
    /// - [`ShodanError::Transport`] if the body cannot be read.
    /// - [`ShodanError::Remote`] for status >= 400, carrying the body text
    ///   whether it is JSON or plain text. The body is not decoded.
    /// - [`ShodanError::Decode`] if a success body does not fit `T`.
    #[instrument(
        name = "shodan_request",
        skip(self, url, body),
        fields(
            http.method = %method,
            http.path = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn execute_request<T>(
        &self,
        method: Method,
        url: &str,
        body: Option<Bytes>,
    ) -> Result<T, ShodanError>
    where
        T: DeserializeOwned,
    {
        let body = self.fetch_success_body(method, url, body).await?;

        serde_json::from_slice(&body).map_err(|e| ShodanError::Decode {
            message: e.to_string(),
        })
    }

    /// Performs one request for its effect only.
    ///
    /// Status handling matches [`execute_request`](Self::execute_request), and
    /// the body is still read to the end, but a success body is never decoded.
    /// An empty `204 No Content` reply is `Ok`.
    ///
    /// ## Errors
    ///
    /// As [`execute_request`](Self::execute_request), minus
    /// [`ShodanError::Decode`].
    #[instrument(
        name = "shodan_request",
        skip(self, url, body),
        fields(
            http.method = %method,
            http.path = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn execute_request_discard(
        &self,
        method: Method,
        url: &str,
        body: Option<Bytes>,
    ) -> Result<(), ShodanError> {
        self.fetch_success_body(method, url, body).await?;
        Ok(())
    }

    /// Sends the request, drains the body, and turns a failure status into
    /// [`ShodanError::Remote`]. Records status fields on the current span.
    async fn fetch_success_body(
        &self,
        method: Method,
        url: &str,
        body: Option<Bytes>,
    ) -> Result<Bytes, ShodanError> {
        let response = self.send_request(method, url, body).await?;

        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());
        let retry_after = retry_after_secs(response.headers());

        let body = response.bytes().await.map_err(transport_error)?;

        if is_failure(status) {
            record_failure(status);
            return Err(remote_error(status, retry_after, &body));
        }

        Span::current().record("otel.status_code", "OK");
        Ok(body)
    }
}

/// Any status from 400 up, including non-standard codes above 599.
pub(crate) fn is_failure(status: StatusCode) -> bool {
    status.as_u16() >= 400
}

pub(crate) fn record_failure(status: StatusCode) {
    let otel_status = if status.as_u16() >= 500 {
        "ERROR"
    } else {
        "UNSET"
    };
    Span::current().record("otel.status_code", otel_status);
    debug!(status = status.as_u16(), "request failed with remote error");
}

pub(crate) fn remote_error(
    status: StatusCode,
    retry_after: Option<u64>,
    body: &[u8],
) -> ShodanError {
    ShodanError::Remote {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).trim_end().to_string(),
        retry_after,
    }
}

/// Reads `Retry-After` in its delta-seconds form. HTTP-date values are
/// ignored.
pub(crate) fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Converts a transport failure without the request URL, which carries the
/// token, and with the full source chain flattened into the message.
pub(crate) fn transport_error(err: reqwest::Error) -> ShodanError {
    let err = err.without_url();
    let mut message = err.to_string();

    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    ShodanError::Transport { message }
}
