//! Newtype credential identifiers.
//!
//! The API token is a distinct newtype rather than a bare `String` so it cannot
//! be confused with a path or parameter value, and so its `Debug` output never
//! reveals the secret.

use serde::{Deserialize, Serialize};

/// The Shodan API key.
///
/// Always transmitted as the `key` query parameter; never placed in a header
/// or body. `Debug` prints a redacted form. It has no `Display`
/// implementation.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiToken(String);

impl ApiToken {
    /// Creates a new token, returning `None` if the value is empty or blank.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.trim().is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}
