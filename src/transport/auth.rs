//! Bearer credential handling.

use std::fmt;
use std::sync::LazyLock;

use http::HeaderValue;
use http::header::InvalidHeaderValue;
use regex::Regex;

static BEARER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*bearer\s+").expect("bearer prefix pattern is valid"));

/// Access token for the platform API.
///
/// Accepts either a raw token or a `Bearer <token>` string; the prefix is
/// stripped on construction and re-added exactly once when the header is
/// built. `Debug` and `Display` never reveal the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a token, stripping any leading `Bearer ` prefix (case-insensitive).
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(BEARER_PREFIX.replace(raw, "").trim().to_string())
    }

    /// Returns true if nothing is left after normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the bare token.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Builds the `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHeaderValue`] if the token contains bytes that are
    /// not allowed in a header.
    pub fn header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
