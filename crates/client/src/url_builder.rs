//! URL composition with embedded authentication.

use shodan_core::{QueryParams, ShodanError, TOKEN_PARAM};
use url::{form_urlencoded, Url};

use crate::Client;

impl Client {
    /// Composes `base + path + "?key=<token>" [+ "&" + params]`.
    ///
    /// The token is always the first parameter. `params` follow in their
    /// recorded order, form-urlencoded. With `params` absent (or empty) the
    /// result is exactly `base + path + "?key=" + token`.
    ///
    /// ## Errors
    ///
    /// - [`ShodanError::InvalidQuery`] if `params` contains the reserved
    ///   `key` name.
    /// - [`ShodanError::InvalidUrl`] if `path` contains `?` or `#`, or if
    ///   the composed string is not an absolute URL.
    pub fn build_url(
        &self,
        base: &str,
        path: &str,
        params: Option<&QueryParams>,
    ) -> Result<String, ShodanError> {
        // A fragment would swallow the token; a query would split it.
        if path.contains(['?', '#']) {
            return Err(ShodanError::InvalidUrl {
                url: format!("{base}{}", strip_query(path)),
                message: "path must not carry a query or fragment".to_string(),
            });
        }

        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair(TOKEN_PARAM, self.token().as_str());

        if let Some(params) = params {
            if params.contains(TOKEN_PARAM) {
                return Err(ShodanError::InvalidQuery {
                    message: format!("'{TOKEN_PARAM}' is reserved for the API token"),
                });
            }
            query.extend_pairs(params.iter());
        }

        let url = format!("{base}{path}?{}", query.finish());
        Url::parse(&url).map_err(|e| ShodanError::InvalidUrl {
            url: format!("{base}{path}"),
            message: e.to_string(),
        })?;

        Ok(url)
    }

    /// [`build_url`](Self::build_url) against the current standard API root.
    pub fn build_base_url(
        &self,
        path: &str,
        params: Option<&QueryParams>,
    ) -> Result<String, ShodanError> {
        self.build_url(&self.base_url(), path, params)
    }

    /// [`build_url`](Self::build_url) against the current exploit API root.
    pub fn build_exploit_base_url(
        &self,
        path: &str,
        params: Option<&QueryParams>,
    ) -> Result<String, ShodanError> {
        self.build_url(&self.exploit_base_url(), path, params)
    }

    /// [`build_url`](Self::build_url) against the current streaming API root.
    pub fn build_stream_base_url(
        &self,
        path: &str,
        params: Option<&QueryParams>,
    ) -> Result<String, ShodanError> {
        self.build_url(&self.stream_base_url(), path, params)
    }
}

/// Parses a URL before dispatch.
///
/// The query string is stripped from the URL echoed in the error, since it
/// carries the token.
pub(crate) fn parse_url(url: &str) -> Result<Url, ShodanError> {
    Url::parse(url).map_err(|e| ShodanError::InvalidUrl {
        url: strip_query(url).to_string(),
        message: e.to_string(),
    })
}

fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(head, _)| head)
}
