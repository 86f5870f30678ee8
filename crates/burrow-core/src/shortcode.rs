use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Number of characters in every generated short code.
pub const SHORT_CODE_LEN: usize = 4;

/// The public identifier handed out in place of a long URL.
///
/// Codes produced by the codec are always [`SHORT_CODE_LEN`] characters drawn
/// from the base62 alphabet. Codes arriving from callers are wrapped with
/// [`ShortCode::new_unchecked`] and simply fail to match anything in the store
/// when they are malformed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    ///
    /// Valid codes are exactly four characters of `[0-9a-zA-Z]`.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this for codes produced by the codec, or for lookups where an
    /// invalid code should resolve to "not found" rather than an error.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the code and returns the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.len() != SHORT_CODE_LEN {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be exactly {}, got {}",
                SHORT_CODE_LEN,
                code.len()
            )));
        }

        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only base62 characters: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
