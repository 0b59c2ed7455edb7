//! Shared value types for the Shodan client.
//!
//! Unlike [`crate::identifiers`], these types carry values that participate in
//! request construction (base addresses, query parameters), in stream delivery
//! (chunks), or in decoded payloads (the account profile).

use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ShodanError;

// ---------------------------------------------------------------------------
// Base addresses
// ---------------------------------------------------------------------------

/// Production root of the standard REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.shodan.io";

/// Production root of the exploit search API.
pub const DEFAULT_EXPLOIT_BASE_URL: &str = "https://exploits.shodan.io/api";

/// Production root of the streaming API.
pub const DEFAULT_STREAM_BASE_URL: &str = "https://stream.shodan.io";

/// The three root URLs endpoint paths are appended to.
///
/// Each is independently replaceable (e.g. to point a client at a mock server).
/// Values are used verbatim: no trailing slash is added or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseUrls {
    /// Root of the standard REST API.
    pub standard: String,
    /// Root of the exploit search API.
    pub exploit: String,
    /// Root of the streaming API.
    pub stream: String,
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self {
            standard: DEFAULT_BASE_URL.to_string(),
            exploit: DEFAULT_EXPLOIT_BASE_URL.to_string(),
            stream: DEFAULT_STREAM_BASE_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Name of the query parameter that carries the API token.
///
/// Reserved: a [`QueryParams`] containing it is rejected by the URL builder.
pub const TOKEN_PARAM: &str = "key";

/// An ordered set of query parameters supplied by an endpoint wrapper.
///
/// Order is preserved exactly as pairs are added, so generated URLs are
/// reproducible. Values are stored already stringified; encoding happens when
/// the URL is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a parameter set from any serialisable struct.
    ///
    /// Field names follow serde naming (including `#[serde(rename)]`), pairs
    /// appear in declaration order, booleans render as `true`/`false`,
    /// integers in decimal, and `None` fields are omitted.
    ///
    /// ## Errors
    ///
    /// Returns [`ShodanError::InvalidQuery`] if the value is not a flat
    /// struct or map of scalar values.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, ShodanError> {
        let encoded =
            serde_urlencoded::to_string(value).map_err(|e| ShodanError::InvalidQuery {
                message: e.to_string(),
            })?;

        let pairs = url::form_urlencoded::parse(encoded.as_bytes())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        Ok(Self { pairs })
    }

    /// Appends a parameter and returns `self`, for chained construction.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        self.pairs.push((name.into(), value.to_string()));
    }

    /// Returns the first value recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if any pair uses `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(n, _)| n == name)
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.push(name, value);
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Stream chunks
// ---------------------------------------------------------------------------

/// One newline-delimited unit of a streaming response body.
///
/// Holds the line's raw bytes without its `\n` / `\r\n` terminator. Chunks
/// delivered by the stream executor are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chunk(Bytes);

impl Chunk {
    /// Wraps raw line bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the chunk, returning the underlying buffer.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns the chunk as UTF-8, replacing invalid sequences.
    pub fn to_string_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the chunk holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Chunk {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Bytes> for Chunk {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// Account profile
// ---------------------------------------------------------------------------

/// Account information for the API key, as returned by `/account/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Whether the account holds a paid membership.
    pub member: bool,

    /// Remaining query credits.
    pub credits: i64,

    /// Display name chosen by the account holder, if any.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Account creation time as reported by the server
    /// (e.g. `"2015-06-02T09:51:44.330000"`).
    pub created: String,
}

impl Profile {
    /// Parses [`Profile::created`] as a UTC timestamp.
    ///
    /// Returns `None` if the server used an unexpected format.
    pub fn created_at(&self) -> Option<Timestamp> {
        NaiveDateTime::parse_from_str(&self.created, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Timestamp::from_utc(naive.and_utc()))
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[derive(Serialize)]
    struct SearchOptions {
        page: u32,
        #[serde(rename = "show_all")]
        show_everything: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        facets: Option<String>,
    }

    #[test]
    fn base_urls_default_to_production() {
        let urls = BaseUrls::default();
        assert_eq!(urls.standard, "https://api.shodan.io");
        assert_eq!(urls.exploit, "https://exploits.shodan.io/api");
        assert_eq!(urls.stream, "https://stream.shodan.io");
    }

    #[test]
    fn from_serialize_keeps_declaration_order_and_names() {
        let params = QueryParams::from_serialize(&SearchOptions {
            page: 100,
            show_everything: true,
            facets: None,
        })
        .unwrap();

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("page", "100"), ("show_all", "true")]);
    }

    #[test]
    fn from_serialize_includes_present_options() {
        let params = QueryParams::from_serialize(&SearchOptions {
            page: 2,
            show_everything: false,
            facets: Some("country:10".to_string()),
        })
        .unwrap();

        assert_eq!(params.len(), 3);
        assert_eq!(params.get("show_all"), Some("false"));
        assert_eq!(params.get("facets"), Some("country:10"));
    }

    #[test]
    fn from_serialize_rejects_non_flat_values() {
        let result = QueryParams::from_serialize(&vec![1, 2, 3]);
        assert!(matches!(result, Err(ShodanError::InvalidQuery { .. })));
    }

    #[test]
    fn explicit_construction_preserves_order() {
        let params = QueryParams::new()
            .with("query", "apache")
            .with("page", 3)
            .with("minify", false);

        let names: Vec<_> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["query", "page", "minify"]);
        assert!(params.contains("page"));
        assert!(!params.contains("key"));
    }

    #[test]
    fn collects_from_iterator() {
        let params: QueryParams = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(params.get("b"), Some("2"));
        assert!(!params.is_empty());
    }

    #[test]
    fn chunk_exposes_bytes() {
        let chunk = Chunk::new(Bytes::from_static(b"{\"ip\": 1}"));
        assert_eq!(chunk.as_bytes(), b"{\"ip\": 1}");
        assert_eq!(chunk.len(), 9);
        assert_eq!(chunk.to_string_lossy(), "{\"ip\": 1}");
        assert!(!chunk.is_empty());
    }

    #[test]
    fn profile_deserializes_from_api_payload() {
        let json = r#"{
            "member": true,
            "credits": 100,
            "display_name": "tester",
            "created": "2015-06-02T09:51:44.330000"
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();
        assert!(profile.member);
        assert_eq!(profile.credits, 100);
        assert_eq!(profile.display_name.as_deref(), Some("tester"));

        let created = profile.created_at().unwrap().as_datetime();
        assert_eq!(created.year(), 2015);
        assert_eq!(created.month(), 6);
        assert_eq!(created.hour(), 9);
    }

    #[test]
    fn profile_accepts_null_display_name() {
        let json = r#"{"member": false, "credits": 0, "display_name": null, "created": "bogus"}"#;

        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.display_name, None);
        assert!(profile.created_at().is_none());
    }
}
