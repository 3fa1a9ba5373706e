//! Content digest newtype for registry bundle blobs.
//!
//! The registry serves blobs under `blobs/sha256/<digest>`, so a digest is a
//! 64-character lowercase hexadecimal string naming the SHA-256 of the blob.

use sha2::{Digest as _, Sha256};
use std::fmt;
use thiserror::Error;

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Error raised when a digest string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bundle digest \"{value}\": {reason}")]
pub struct DigestError {
    /// The rejected digest text.
    pub value: String,
    /// Description of the validation failure.
    pub reason: String,
}

/// A validated content address for one bundle blob.
///
/// # Examples
///
/// ```
/// use csv_collector::registry::digest::Digest;
///
/// let hex = "a".repeat(64);
/// let digest = Digest::try_from(hex.as_str()).expect("valid digest");
/// assert_eq!(digest.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(String);

impl Digest {
    /// Compute the digest of `bytes`.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_collector::registry::digest::Digest;
    ///
    /// let digest = Digest::of(b"");
    /// assert!(digest.as_str().starts_with("e3b0c442"));
    /// ```
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return an abbreviated form for progress messages.
    #[must_use]
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl TryFrom<&str> for Digest {
    type Error = DigestError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate_digest(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for Digest {
    type Error = DigestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_digest(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_digest(value: &str) -> Result<(), DigestError> {
    let reject = |reason: String| DigestError {
        value: value.to_owned(),
        reason,
    };
    if value.len() != DIGEST_HEX_LEN {
        return Err(reject(format!(
            "expected {DIGEST_HEX_LEN} hex characters, got {}",
            value.len()
        )));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !c.is_ascii_hexdigit() || c.is_ascii_uppercase())
    {
        return Err(reject(format!("unexpected character '{bad}'")));
    }
    Ok(())
}
