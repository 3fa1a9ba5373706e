//! Verification policy for downloaded bundle blobs.
//!
//! A blob is addressed by the SHA-256 of its bytes, so a download that does
//! not hash to its digest was truncated or tampered with and must not be
//! opened.

use std::fmt;

use crate::registry::digest::Digest;

/// Error raised when a blob does not hash to its digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("digest mismatch: expected {expected}, got {actual}")]
pub struct DigestMismatch {
    /// The digest the blob was requested under.
    pub expected: Digest,
    /// The digest of the bytes actually received.
    pub actual: Digest,
}

/// Policy governing whether blobs are checked against their digest.
///
/// # Examples
///
/// ```
/// use csv_collector::bundle::verification::VerificationPolicy;
///
/// let policy = VerificationPolicy::default();
/// assert!(policy.require_digest_match());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationPolicy {
    require_digest_match: bool,
}

impl VerificationPolicy {
    /// Build a policy from the `verify_digests` setting.
    #[must_use]
    pub const fn new(require_digest_match: bool) -> Self {
        Self {
            require_digest_match,
        }
    }

    /// Return whether blobs must hash to their digest.
    #[must_use]
    pub const fn require_digest_match(&self) -> bool {
        self.require_digest_match
    }

    /// Check `bytes` against `expected` when the policy requires it.
    ///
    /// # Errors
    ///
    /// Returns [`DigestMismatch`] if verification is required and the
    /// SHA-256 of `bytes` differs from `expected`.
    pub fn verify(&self, expected: &Digest, bytes: &[u8]) -> Result<(), DigestMismatch> {
        if !self.require_digest_match {
            return Ok(());
        }
        let actual = Digest::of(bytes);
        if &actual != expected {
            return Err(DigestMismatch {
                expected: expected.clone(),
                actual,
            });
        }
        Ok(())
    }
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

impl fmt::Display for VerificationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.require_digest_match {
            write!(f, "digest verification required")
        } else {
            write!(f, "digest verification disabled")
        }
    }
}
